//! # fabric-core
//!
//! Core data model and configuration plumbing for the Fabric agent.
//!
//! This crate provides:
//! - Data model types (GpsReading, ChatMessage)
//! - Environment lookup abstraction and `${VAR}` interpolation
//! - Runtime state provider (dynamic variables such as live sensor readings)
//! - Configuration loading
//!
//! This crate is intentionally runtime-agnostic and contains no async code.

pub mod config;
pub mod env;
pub mod interpolate;
pub mod model;
pub mod runtime;

pub use config::{
    load_config_file, load_config_str, AgentConfig, ConfigError, GpsFabricConfig,
    DEFAULT_AGENT_NAME, DEFAULT_FABRIC_ENDPOINT,
};
pub use env::{EnvLookup, ProcessEnv};
pub use interpolate::{interpolate_env_vars, interpolate_string};
pub use model::*;
pub use runtime::{MemoryRuntimeState, RuntimeStateProvider};
