//! JSON encoding and decoding for Fabric JSON-RPC messages.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::messages::{JsonRpcRequest, RpcReply};

/// Errors that can occur during message encoding/decoding.
#[derive(Debug, Error)]
pub enum CodecError {
    /// JSON serialization failed.
    #[error("Failed to serialize request: {0}")]
    SerializeError(#[source] serde_json::Error),

    /// The response body is not valid JSON.
    #[error("Invalid JSON response: {0}")]
    InvalidJson(#[source] serde_json::Error),
}

/// Encode a request to a JSON string.
pub fn encode_request<P: Serialize>(request: &JsonRpcRequest<P>) -> Result<String, CodecError> {
    serde_json::to_string(request).map_err(CodecError::SerializeError)
}

/// Decode and classify a JSON-RPC response body.
pub fn decode_response(body: &[u8]) -> Result<RpcReply, CodecError> {
    let value: Value = serde_json::from_slice(body).map_err(CodecError::InvalidJson)?;
    Ok(RpcReply::from_body(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::share_status_request;
    use fabric_core::GpsReading;

    #[test]
    fn test_encode_share_status() {
        let reading = GpsReading::from_degrees(1.0, 2.0, 3.0).unwrap();
        let json = encode_request(&share_status_request(reading)).unwrap();

        assert!(json.contains("\"method\":\"omp2p_shareStatus\""));
        assert!(json.contains("\"jsonrpc\":\"2.0\""));
        assert!(json.contains("\"id\":1"));
    }

    #[test]
    fn test_decode_success() {
        let reply = decode_response(br#"{"jsonrpc":"2.0","id":1,"result":true}"#).unwrap();
        assert_eq!(reply, RpcReply::Result(serde_json::json!(true)));
    }

    #[test]
    fn test_decode_error() {
        let reply =
            decode_response(br#"{"jsonrpc":"2.0","id":1,"error":{"code":1,"message":"busy"}}"#)
                .unwrap();
        match reply {
            RpcReply::Error(err) => assert_eq!(err["message"], "busy"),
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_invalid_json() {
        let err = decode_response(b"<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, CodecError::InvalidJson(_)));
        assert!(decode_response(b"").is_err());
    }
}
