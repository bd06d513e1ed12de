//! GPS Fabric connector.
//!
//! Shares the robot's current position and heading with the Fabric network by
//! calling `omp2p_shareStatus` on a JSON-RPC endpoint:
//! - Reads latitude, longitude and yaw from the runtime state
//! - Rejects the attempt if any of them is missing
//! - Sends a single POST with a bounded timeout, no retries
//! - Classifies the response into a [`PublishOutcome`]

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

use fabric_core::{GpsFabricConfig, GpsReading, RuntimeStateProvider};
use fabric_protocol::{decode_response, encode_request, share_status_request, CodecError, RpcReply};

use crate::outcome::{MalformedKind, NetworkFailure, PublishOutcome};

/// Errors raised while building a connector.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The configured endpoint is not a valid URL.
    #[error("Invalid fabric endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Actions the GPS connector understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GpsAction {
    /// Share the current location with the Fabric network.
    ShareLocation,
}

/// Input handed to the connector by the action layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsInput {
    pub action: GpsAction,
}

/// Connector that shares GPS coordinates via a Fabric network.
pub struct GpsFabricConnector {
    config: GpsFabricConfig,
    endpoint: Url,
    timeout: Duration,
    client: Client,
    state: Arc<dyn RuntimeStateProvider>,
}

impl GpsFabricConnector {
    /// Create a connector for the configured endpoint.
    pub fn new(
        config: GpsFabricConfig,
        state: Arc<dyn RuntimeStateProvider>,
    ) -> Result<Self, ConnectorError> {
        let endpoint =
            Url::parse(&config.fabric_endpoint).map_err(|e| ConnectorError::InvalidEndpoint {
                endpoint: config.fabric_endpoint.clone(),
                reason: e.to_string(),
            })?;
        let client = Client::builder().build()?;
        let timeout = Duration::from_secs(config.timeout_secs);

        Ok(Self {
            config,
            endpoint,
            timeout,
            client,
            state,
        })
    }

    /// Override the request timeout taken from the configuration.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Handle an action from the action layer.
    pub async fn connect(&self, input: &GpsInput) -> PublishOutcome {
        info!("GPSFabricConnector: {:?}", input.action);

        match input.action {
            GpsAction::ShareLocation => self.publish().await,
        }
    }

    /// Send the current GPS coordinates to the Fabric network.
    ///
    /// Makes at most one request and never fails: every result, including
    /// rejected input, is reported through the returned outcome.
    pub async fn publish(&self) -> PublishOutcome {
        info!("GPSFabricConnector: Sending coordinates to Fabric network.");

        let latitude = self.state.get_dynamic_variable(&self.config.latitude_variable);
        let longitude = self.state.get_dynamic_variable(&self.config.longitude_variable);
        let yaw = self.state.get_dynamic_variable(&self.config.yaw_variable);
        info!(latitude = ?latitude, longitude = ?longitude, yaw = ?yaw, "GPSFabricConnector: Fetched coordinates");

        let reading = GpsReading::from_values(latitude.as_ref(), longitude.as_ref(), yaw.as_ref());

        let outcome = match reading {
            Some(reading) => self.send(reading).await,
            None => PublishOutcome::RejectedInvalidInput {
                latitude,
                longitude,
                yaw,
            },
        };
        outcome.log();
        outcome
    }

    async fn send(&self, reading: GpsReading) -> PublishOutcome {
        let body = match encode_request(&share_status_request(reading)) {
            Ok(body) => body,
            Err(e) => return PublishOutcome::UnexpectedError(e.to_string()),
        };
        debug!(endpoint = %self.endpoint, %body, "GPSFabricConnector: POST");

        let response = match self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .timeout(self.timeout)
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return classify_transport_error(&e),
        };

        // The body of a non-2xx reply is never inspected.
        let status = response.status();
        if !status.is_success() {
            return classify_response(status, &[]);
        }

        match response.bytes().await {
            Ok(bytes) => classify_response(status, &bytes),
            Err(e) => classify_transport_error(&e),
        }
    }
}

/// Classify an HTTP response by status and body.
///
/// This is the only place the status code is judged: any non-2xx status is
/// an [`PublishOutcome::HttpError`] whatever the body says.
pub fn classify_response(status: StatusCode, body: &[u8]) -> PublishOutcome {
    if !status.is_success() {
        return PublishOutcome::HttpError {
            status: status.as_u16(),
        };
    }

    match decode_response(body) {
        Ok(RpcReply::Error(error)) => PublishOutcome::RpcError { error },
        Ok(RpcReply::Result(_)) => PublishOutcome::Success,
        Ok(RpcReply::MissingResult) => PublishOutcome::MalformedResponse(MalformedKind::MissingResult),
        Err(CodecError::InvalidJson(e)) => {
            PublishOutcome::MalformedResponse(MalformedKind::InvalidJson(e.to_string()))
        }
        Err(e) => PublishOutcome::UnexpectedError(e.to_string()),
    }
}

/// Map a reqwest failure onto the network taxonomy.
fn classify_transport_error(err: &reqwest::Error) -> PublishOutcome {
    if err.is_timeout() {
        PublishOutcome::NetworkError(NetworkFailure::Timeout)
    } else if err.is_connect() {
        PublishOutcome::NetworkError(NetworkFailure::Connection(err.to_string()))
    } else if err.is_request()
        || err.is_body()
        || err.is_decode()
        || err.is_redirect()
        || err.is_builder()
    {
        PublishOutcome::NetworkError(NetworkFailure::Transport(err.to_string()))
    } else {
        error!(error = %err, "GPSFabricConnector: Unclassified request failure");
        PublishOutcome::UnexpectedError(err.to_string())
    }
}
