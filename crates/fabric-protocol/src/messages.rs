//! JSON-RPC 2.0 message types for the Fabric network.
//!
//! Only one call is made by the agent today:
//!
//! ```json
//! {"method": "omp2p_shareStatus",
//!  "params": [{"latitude": 52.1, "longitude": 4.9, "yaw": 90.0}],
//!  "id": 1, "jsonrpc": "2.0"}
//! ```

use fabric_core::GpsReading;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC protocol version sent with every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// Method used to share the robot's status (position and heading).
pub const SHARE_STATUS_METHOD: &str = "omp2p_shareStatus";

/// Request id used for share-status calls. Calls are never pipelined.
pub const SHARE_STATUS_REQUEST_ID: u64 = 1;

/// A JSON-RPC request. Field order matches what the Fabric node expects on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest<P> {
    pub method: String,
    pub params: Vec<P>,
    pub id: u64,
    pub jsonrpc: String,
}

impl<P> JsonRpcRequest<P> {
    pub fn new(method: &str, params: Vec<P>, id: u64) -> Self {
        Self {
            method: method.to_string(),
            params,
            id,
            jsonrpc: JSONRPC_VERSION.to_string(),
        }
    }
}

/// Parameters of `omp2p_shareStatus`.
pub type ShareStatusParams = GpsReading;

/// Build the `omp2p_shareStatus` request for a reading.
pub fn share_status_request(reading: GpsReading) -> JsonRpcRequest<ShareStatusParams> {
    JsonRpcRequest::new(SHARE_STATUS_METHOD, vec![reading], SHARE_STATUS_REQUEST_ID)
}

/// What a JSON-RPC response body says, in the order it is checked.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcReply {
    /// The body carries an `error` member (takes precedence over `result`).
    Error(Value),
    /// The body carries a truthy `result` member.
    Result(Value),
    /// No `error` and no truthy `result` (includes non-object bodies).
    MissingResult,
}

impl RpcReply {
    /// Classify a parsed response body.
    pub fn from_body(body: &Value) -> Self {
        let Some(obj) = body.as_object() else {
            return RpcReply::MissingResult;
        };
        if let Some(error) = obj.get("error") {
            return RpcReply::Error(error.clone());
        }
        match obj.get("result") {
            Some(result) if is_truthy(result) => RpcReply::Result(result.clone()),
            _ => RpcReply::MissingResult,
        }
    }
}

/// Truthiness of a JSON value: `null`, `false`, zero, and empty
/// strings/arrays/objects are falsy, everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
