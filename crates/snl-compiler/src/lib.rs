//! SNL Compiler Back End
//!
//! A two-phase compiler from an SNL syntax tree to TM code.
//!
//! ## Architecture
//!
//! - **Analysis**: declare names, build types, lay out frames and type-check
//!   every statement. The result is an [`Analysis`]: the type and symbol
//!   tables plus annotations keyed by node id.
//! - **Generation**: walk the tree again and emit TM instructions in one
//!   pass, backpatching forward jumps. Variable access goes through a
//!   per-frame display table.
//!
//! ## Modules
//!
//! - [`analysis`]: the semantic analyzer
//! - [`annotations`]: analysis results
//! - [`codegen`]: the code generator and the call protocol
//! - [`emit`]: the instruction buffer with reserve/seek/resume
//! - [`scope`]: the lexical scope stack
//! - [`symbols`]: symbol entries
//! - [`types`]: type descriptors
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use snl_ast::AstBuilder;
//! use snl_compiler::{CompileOptions, compile};
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let program = b.program("p", [], [b.write(b.add(b.int(2), b.int(3)))]);
//!
//! let tm = compile(&program, &CompileOptions::default()).unwrap();
//! assert!(tm.listing().contains("HALT"));
//! ```

pub mod analysis;
pub mod annotations;
pub mod codegen;
pub mod emit;
mod options;
pub mod scope;
pub mod symbols;
pub mod types;

pub use analysis::Analyzer;
pub use annotations::{Analysis, Annotations};
pub use codegen::CodeGenerator;
pub use emit::InstructionEmitter;
pub use options::CompileOptions;
pub use scope::{ClosedScope, FRAME_HEADER_SIZE, Scopes};
pub use symbols::{AccessMode, ProcInfo, SymbolEntry, SymbolId, SymbolKind, SymbolTable, VarInfo};
pub use types::{Field, TypeDescriptor, TypeId, TypeTable};

// Re-export the error types from core for convenience
pub use snl_core::{CompileError, InternalError, SemanticError};

use snl_ast::Program;
use snl_core::tm::TmProgram;

/// Run semantic analysis on a program.
pub fn analyze(program: &Program<'_>) -> Result<Analysis, CompileError> {
    Analyzer::new().analyze_program(program)
}

/// Analyze a program and generate its TM code.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile(program: &Program<'_>, options: &CompileOptions) -> Result<TmProgram, CompileError> {
    let analysis = analyze(program)?;
    codegen::generate(program, &analysis, options)
}
