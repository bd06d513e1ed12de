//! # fabric-protocol
//!
//! JSON-RPC message types and codec for the Fabric network.

pub mod codec;
pub mod messages;

pub use codec::{decode_response, encode_request, CodecError};
pub use messages::*;
