//! SNL compiler back end and TM simulator.
//!
//! This crate ties the workspace together:
//!
//! - [`ast`]: the arena-allocated syntax tree and [`AstBuilder`]
//! - [`compiler`]: semantic analysis and TM code generation
//! - [`vm`]: the TM simulator
//!
//! # Example
//!
//! ```
//! use snl::{AstBuilder, Bump};
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let program = b.program(
//!     "square",
//!     [b.vars([b.var_decl(&["x"], b.integer())])],
//!     [b.read(b.var_ref("x")), b.write(b.mul(b.var("x"), b.var("x")))],
//! );
//!
//! assert_eq!(snl::run(&program, [7]).unwrap(), [49]);
//! ```

pub use bumpalo::Bump;
pub use snl_ast as ast;
pub use snl_ast::AstBuilder;
pub use snl_compiler as compiler;
pub use snl_compiler::{Analysis, CompileOptions, analyze};
pub use snl_core::tm;
pub use snl_core::tm::TmProgram;
pub use snl_core::{CompileError, InternalError, RuntimeError, SemanticError, SnlError, Span};
pub use snl_vm as vm;
pub use snl_vm::{Machine, MachineConfig};

use snl_ast::Program;

/// Compile a program to TM code.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile(program: &Program<'_>, options: &CompileOptions) -> Result<TmProgram, SnlError> {
    Ok(snl_compiler::compile(program, options)?)
}

/// Compile a program with default options and run it on a default machine.
///
/// Returns every value the program wrote.
pub fn run(program: &Program<'_>, input: impl IntoIterator<Item = i64>) -> Result<Vec<i64>, SnlError> {
    run_with(program, &CompileOptions::default(), MachineConfig::default(), input)
}

/// Compile and run with explicit options.
pub fn run_with(
    program: &Program<'_>,
    options: &CompileOptions,
    config: MachineConfig,
    input: impl IntoIterator<Item = i64>,
) -> Result<Vec<i64>, SnlError> {
    let tm = compile(program, options)?;
    Ok(Machine::with_config(&tm, config).with_input(input).run()?)
}
