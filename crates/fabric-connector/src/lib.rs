//! # fabric-connector
//!
//! Shares GPS coordinates with the Fabric network over JSON-RPC.
//!
//! This crate provides:
//! - `GpsFabricConnector` for publishing the current position
//! - `PublishOutcome`, the full taxonomy of how a publish attempt ends
//!
//! Requests are made with `reqwest` and must run inside a tokio runtime.

pub mod connector;
pub mod outcome;

pub use connector::{classify_response, ConnectorError, GpsAction, GpsFabricConnector, GpsInput};
pub use outcome::{MalformedKind, NetworkFailure, PublishOutcome};
