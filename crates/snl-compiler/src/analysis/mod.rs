//! Semantic analysis.
//!
//! The [`Analyzer`] walks the tree once, in declaration order:
//!
//! - builds type descriptors for type expressions ([`type_builder`])
//! - declares types, variables and parameters and assigns their frame
//!   offsets ([`declarations`])
//! - opens a scope per procedure and freezes its frame layout before the
//!   nested procedures and the body are visited ([`procedures`])
//! - type-checks expressions and statements ([`expr`], [`stmt`])
//!
//! Analysis stops at the first error.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use snl_ast::AstBuilder;
//! use snl_compiler::analyze;
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let program = b.program(
//!     "p",
//!     [b.vars([b.var_decl(&["x", "y"], b.integer())])],
//!     [b.assign(b.var_ref("x"), b.var("y"))],
//! );
//!
//! let analysis = analyze(&program).unwrap();
//! assert_eq!(analysis.main_display_base, 2);
//! ```

mod declarations;
mod expr;
mod procedures;
mod stmt;
mod type_builder;

use snl_ast::{Decl, ProcDecl, Program};
use snl_core::{CompileError, InternalError, SemanticError};
use tracing::debug;

use crate::annotations::{Analysis, Annotations};
use crate::scope::{ClosedScope, Scopes};
use crate::symbols::SymbolTable;
use crate::types::TypeTable;

type Result<T> = std::result::Result<T, CompileError>;

/// Semantic analyzer state for one program.
#[derive(Debug, Default)]
pub struct Analyzer {
    scopes: Scopes,
    symbols: SymbolTable,
    types: TypeTable,
    annotations: Annotations,
    closed: Vec<ClosedScope>,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyze a whole program.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn analyze_program(mut self, program: &Program<'_>) -> Result<Analysis> {
        debug!(program = program.name.name, "analyzing program");

        let procedures = self.process_declarations(program.decls)?;
        let main_display_base = self.scopes.offset();
        if main_display_base == i64::MAX {
            return Err(SemanticError::StorageOverflow {
                span: program.name.span,
            }
            .into());
        }

        for procedure in procedures {
            self.process_procedure(procedure)?;
        }
        self.analyze_block(program.body)?;

        self.closed.push(ClosedScope {
            level: 0,
            entries: self.scopes.capture_entries(),
        });

        Ok(Analysis {
            types: self.types,
            symbols: self.symbols,
            annotations: self.annotations,
            main_display_base,
            closed_scopes: self.closed,
        })
    }

    /// Process the type and variable sections of a declaration part and
    /// return the procedures that follow them.
    ///
    /// Type and variable sections must all come before the first procedure.
    fn process_declarations<'ast>(
        &mut self,
        decls: &'ast [Decl<'ast>],
    ) -> Result<Vec<&'ast ProcDecl<'ast>>> {
        let mut procedures = Vec::new();
        for decl in decls {
            match decl {
                Decl::Procedure(procedure) => procedures.push(*procedure),
                Decl::Types(_) | Decl::Vars(_) if !procedures.is_empty() => {
                    return Err(InternalError::MalformedTree {
                        message: "declaration section after a procedure".to_string(),
                        span: decl.span(),
                    }
                    .into());
                }
                Decl::Types(section) => self.process_type_section(section)?,
                Decl::Vars(section) => self.process_var_section(section)?,
            }
        }
        Ok(procedures)
    }
}
