use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use fabric_connector::GpsFabricConnector;
use fabric_core::{load_config_file, AgentConfig, ChatMessage, MemoryRuntimeState, ProcessEnv};
use fabric_history::ExportFormat;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fabric agent utilities.
#[derive(Debug, Parser)]
#[command(name = "fabric-agent", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a configuration file with environment variables substituted.
    Interpolate {
        /// Path to the JSON configuration file.
        #[arg(long, env = "FABRIC_CONFIG")]
        config: PathBuf,
    },
    /// Share one GPS fix with the Fabric network.
    Share {
        /// Path to the JSON configuration file (defaults apply if omitted).
        #[arg(long, env = "FABRIC_CONFIG")]
        config: Option<PathBuf>,
        /// Latitude in decimal degrees.
        #[arg(long, allow_hyphen_values = true)]
        latitude: Option<f64>,
        /// Longitude in decimal degrees.
        #[arg(long, allow_hyphen_values = true)]
        longitude: Option<f64>,
        /// Heading in degrees.
        #[arg(long, allow_hyphen_values = true)]
        yaw: Option<f64>,
    },
    /// Export a conversation (JSON array of {role, content}) to a file.
    Export {
        /// File holding the messages.
        #[arg(long)]
        input: PathBuf,
        /// Output format: json or markdown.
        #[arg(long, default_value = "json")]
        format: ExportFormat,
        /// Agent name written into the export.
        #[arg(long)]
        agent_name: Option<String>,
        /// Output path (timestamped file in the working directory if omitted).
        #[arg(long)]
        output: Option<PathBuf>,
        /// Configuration file providing the agent name.
        #[arg(long, env = "FABRIC_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,fabric_connector=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Interpolate { config } => {
            let value = load_config_file(&config, &ProcessEnv)
                .with_context(|| format!("loading {}", config.display()))?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Command::Share {
            config,
            latitude,
            longitude,
            yaw,
        } => {
            let config = load_agent_config(config.as_ref())?;
            share(config, latitude, longitude, yaw).await?;
        }
        Command::Export {
            input,
            format,
            agent_name,
            output,
            config,
        } => {
            let agent_name = match agent_name {
                Some(name) => name,
                None => load_agent_config(config.as_ref())?.name,
            };
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let messages: Vec<ChatMessage> = serde_json::from_str(&text)
                .with_context(|| format!("parsing messages in {}", input.display()))?;

            let written = fabric_history::export(format, &messages, &agent_name, output.as_deref())?;
            tracing::info!("Exported {} messages to {}", messages.len(), written.display());
        }
    }

    Ok(())
}

fn load_agent_config(path: Option<&PathBuf>) -> anyhow::Result<AgentConfig> {
    match path {
        Some(path) => AgentConfig::load(path, &ProcessEnv)
            .with_context(|| format!("loading {}", path.display())),
        None => Ok(AgentConfig::default()),
    }
}

/// Seed the runtime state with whatever was given and publish once.
async fn share(
    config: AgentConfig,
    latitude: Option<f64>,
    longitude: Option<f64>,
    yaw: Option<f64>,
) -> anyhow::Result<()> {
    let gps = config.gps;
    let state = Arc::new(MemoryRuntimeState::new());
    for (name, value) in [
        (&gps.latitude_variable, latitude),
        (&gps.longitude_variable, longitude),
        (&gps.yaw_variable, yaw),
    ] {
        if let Some(value) = value {
            state.add_dynamic_variable(name, value);
        }
    }

    let connector = GpsFabricConnector::new(gps.clone(), state)?;
    tracing::info!("Agent {} sharing status with {}", config.name, connector.endpoint());

    let outcome = connector.publish().await;
    if !outcome.is_success() {
        anyhow::bail!("share failed ({}): {}", outcome.label(), outcome);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabric_core::GpsFabricConfig;
    use httpmock::prelude::*;
    use serde_json::json;

    fn config_for(endpoint: String) -> AgentConfig {
        AgentConfig {
            gps: GpsFabricConfig {
                fabric_endpoint: endpoint,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_share_args_parse() {
        let cli = Cli::try_parse_from([
            "fabric-agent",
            "share",
            "--latitude",
            "52.1",
            "--longitude",
            "-4.9",
            "--yaw",
            "90",
        ])
        .unwrap();
        match cli.command {
            Command::Share {
                latitude,
                longitude,
                yaw,
                ..
            } => {
                assert_eq!(latitude, Some(52.1));
                assert_eq!(longitude, Some(-4.9));
                assert_eq!(yaw, Some(90.0));
            }
            other => panic!("Expected Share, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_share_without_latitude_fails_without_request() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/rpc");
            then.status(200).json_body(json!({"result": true}));
        });

        let result = share(config_for(server.url("/rpc")), None, Some(4.9), Some(90.0)).await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("invalid_input"), "{err}");
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_share_full_fix_uses_configured_variables() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/rpc").json_body(json!({
                "method": "omp2p_shareStatus",
                "params": [{"latitude": 52.1, "longitude": -4.9, "yaw": 90.0}],
                "id": 1,
                "jsonrpc": "2.0"
            }));
            then.status(200).json_body(json!({"result": true}));
        });

        let mut config = config_for(server.url("/rpc"));
        config.gps.latitude_variable = "gps.lat".to_string();
        config.gps.yaw_variable = "heading".to_string();

        share(config, Some(52.1), Some(-4.9), Some(90.0)).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_share_http_error_fails() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/rpc");
            then.status(500);
        });

        let result = share(config_for(server.url("/rpc")), Some(52.1), Some(4.9), Some(90.0)).await;

        assert!(result.is_err());
        mock.assert_hits_async(1).await;
    }
}
