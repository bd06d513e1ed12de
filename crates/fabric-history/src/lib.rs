//! # fabric-history
//!
//! Conversation history export for the Fabric agent.
//!
//! Messages come from the agent's history manager as [`fabric_core::ChatMessage`]s
//! and are written to JSON or Markdown files.

pub mod exporter;

pub use exporter::{
    default_file_name, export, export_to_json, export_to_markdown, render_json, render_markdown,
    ExportError, ExportFormat,
};
