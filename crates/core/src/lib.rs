//! Core types for the grounded voice pipeline
//!
//! This crate provides foundational types used across all other crates:
//! - Chat message and conversation types
//! - Retrieved document type
//! - Per-invocation pipeline context
//! - Pipeline result types (grounded response, summary, synthesis result)
//! - Error types

pub mod context;
pub mod document;
pub mod error;
pub mod message;
pub mod result;

pub use context::PipelineContext;
pub use document::Document;
pub use error::{Error, Result};
pub use message::{Message, Role};
pub use result::{GroundedResponse, Summary, SynthesisResult};
