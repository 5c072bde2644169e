//! Core types shared by every SNL crate.
//!
//! - [`Span`] - source locations
//! - [`error`] - the error hierarchy of the whole pipeline
//! - [`tm`] - the TM target instruction set

pub mod error;
mod span;
pub mod tm;

pub use error::{CompileError, InternalError, RuntimeError, SemanticError, SnlError};
pub use span::Span;
