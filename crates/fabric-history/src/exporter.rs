//! Conversation history export.
//!
//! Writes a list of [`ChatMessage`]s to disk for debugging, sharing and
//! analysis. Two formats are supported:
//!
//! ## JSON
//!
//! ```json
//! {
//!   "metadata": {
//!     "agent_name": "IRIS",
//!     "export_timestamp": "2024-01-17T10:30:00.123456",
//!     "message_count": 1
//!   },
//!   "messages": [
//!     { "role": "user", "content": "Hello", "index": 0 }
//!   ]
//! }
//! ```
//!
//! ## Markdown
//!
//! A `# Conversation History` header with agent, export time and message
//! count, followed by one `## Message <n> (<role>)` section per message.
//!
//! When no output path is given, files are named
//! `conversation_history_<YYYYMMDD_HHMMSS>.<ext>` in the working directory.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Local, NaiveDateTime, Timelike};
use fabric_core::ChatMessage;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

/// Errors that can occur while exporting a conversation.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The export document could not be serialized.
    #[error("Failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The output file could not be written.
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    /// File extension used for default file names.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            other => Err(format!("unknown export format '{}'", other)),
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

#[derive(Serialize)]
struct ExportDocument<'a> {
    metadata: ExportMetadata<'a>,
    messages: Vec<ExportedMessage<'a>>,
}

#[derive(Serialize)]
struct ExportMetadata<'a> {
    agent_name: &'a str,
    export_timestamp: String,
    message_count: usize,
}

#[derive(Serialize)]
struct ExportedMessage<'a> {
    role: &'a str,
    content: &'a str,
    index: usize,
}

/// ISO 8601 local timestamp; microseconds are omitted when zero.
fn iso_timestamp(now: NaiveDateTime) -> String {
    if now.nanosecond() / 1_000 == 0 {
        now.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// Default output file name for an export made at `now`.
pub fn default_file_name(format: ExportFormat, now: NaiveDateTime) -> String {
    format!(
        "conversation_history_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Render the JSON export document, pretty-printed with two-space indentation.
pub fn render_json(
    messages: &[ChatMessage],
    agent_name: &str,
    now: NaiveDateTime,
) -> Result<String, ExportError> {
    let document = ExportDocument {
        metadata: ExportMetadata {
            agent_name,
            export_timestamp: iso_timestamp(now),
            message_count: messages.len(),
        },
        messages: messages
            .iter()
            .enumerate()
            .map(|(index, msg)| ExportedMessage {
                role: &msg.role,
                content: &msg.content,
                index,
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Render the Markdown export. Lines are joined with `\n`.
pub fn render_markdown(messages: &[ChatMessage], agent_name: &str, now: NaiveDateTime) -> String {
    let mut lines = vec![
        "# Conversation History".to_string(),
        String::new(),
        format!("**Agent**: {}", agent_name),
        format!("**Export Time**: {}", now.format("%Y-%m-%d %H:%M:%S")),
        format!("**Messages**: {}", messages.len()),
        String::new(),
        "---".to_string(),
        String::new(),
    ];

    if messages.is_empty() {
        lines.push("*No messages in this conversation.*".to_string());
    } else {
        for (idx, msg) in messages.iter().enumerate() {
            lines.push(format!("## Message {} ({})", idx + 1, msg.role));
            lines.push(String::new());
            lines.push(msg.content.clone());
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

// ============================================================================
// Export
// ============================================================================

/// Export conversation history to a JSON file.
///
/// Returns the absolute path of the written file.
pub fn export_to_json(
    messages: &[ChatMessage],
    agent_name: &str,
    output_path: Option<&Path>,
) -> Result<PathBuf, ExportError> {
    export(ExportFormat::Json, messages, agent_name, output_path)
}

/// Export conversation history to a Markdown file.
///
/// Returns the absolute path of the written file.
pub fn export_to_markdown(
    messages: &[ChatMessage],
    agent_name: &str,
    output_path: Option<&Path>,
) -> Result<PathBuf, ExportError> {
    export(ExportFormat::Markdown, messages, agent_name, output_path)
}

/// Export conversation history in the given format.
pub fn export(
    format: ExportFormat,
    messages: &[ChatMessage],
    agent_name: &str,
    output_path: Option<&Path>,
) -> Result<PathBuf, ExportError> {
    let now = Local::now().naive_local();
    let output_file = match output_path {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(default_file_name(format, now)),
    };

    let contents = match format {
        ExportFormat::Json => render_json(messages, agent_name, now)?,
        ExportFormat::Markdown => render_markdown(messages, agent_name, now),
    };

    if let Err(source) = std::fs::write(&output_file, contents) {
        error!("Failed to write {} file: {}", format, source);
        return Err(ExportError::Write {
            path: output_file,
            source,
        });
    }
    info!(
        "Successfully exported {} messages to {}",
        messages.len(),
        output_file.display()
    );

    absolute(&output_file)
}

/// Make `path` absolute against the working directory without resolving links.
fn absolute(path: &Path) -> Result<PathBuf, ExportError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })
}
