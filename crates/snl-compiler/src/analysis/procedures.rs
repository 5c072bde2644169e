//! Procedure declarations and frame layout.
//!
//! A procedure's frame is laid out as the header, its parameters, its
//! locals and finally the display block with one slot per enclosing level
//! plus its own:
//!
//! ```text
//! 0..7                    header (saved registers, level, return address)
//! 7..display_base         parameters, then locals
//! display_base..          display[0..=level]
//! frame_size              display_base + level + 1
//! ```

use snl_ast::ProcDecl;
use snl_core::{InternalError, SemanticError};
use tracing::debug;

use crate::scope::ClosedScope;
use crate::symbols::{ProcInfo, SymbolId, SymbolKind};

use super::{Analyzer, Result};

impl Analyzer {
    /// Analyze a procedure declaration, its nested procedures and its body.
    pub(super) fn process_procedure(&mut self, procedure: &ProcDecl<'_>) -> Result<()> {
        let id = self.process_header(procedure)?;
        self.process_body(id, procedure)
    }

    /// Declare the procedure in the enclosing scope, open its scope and
    /// declare the parameters.
    ///
    /// The procedure's scope stays open for [`Self::process_body`].
    fn process_header(&mut self, procedure: &ProcDecl<'_>) -> Result<SymbolId> {
        let level = self.scopes.level() + 1;
        let id = self.scopes.declare(
            &mut self.symbols,
            procedure.name.name,
            SymbolKind::Procedure(ProcInfo {
                level,
                params: Vec::new(),
                frame_size: 0,
                display_base: 0,
            }),
            procedure.name.span,
        )?;
        self.annotations.record_symbol(procedure.id, id);

        self.scopes.open_scope();
        for group in procedure.params {
            let ty = self.build_type(&group.ty)?;
            self.declare_parameters(group.names, group.mode, ty)?;
        }

        let params = self.scopes.capture_entries();
        self.proc_info_mut(id)?.params = params;
        Ok(id)
    }

    /// Process local declarations, freeze the frame layout, then analyze
    /// nested procedures and the body and close the scope.
    fn process_body(&mut self, id: SymbolId, procedure: &ProcDecl<'_>) -> Result<()> {
        let nested = self.process_declarations(procedure.decls)?;

        let level = self.scopes.level();
        let display_base = self.scopes.offset();
        let frame_size = display_base
            .checked_add(i64::from(level) + 1)
            .ok_or(SemanticError::StorageOverflow {
                span: procedure.name.span,
            })?;
        {
            let info = self.proc_info_mut(id)?;
            info.display_base = display_base;
            info.frame_size = frame_size;
        }
        debug!(
            procedure = procedure.name.name,
            level, display_base, frame_size, "procedure frame"
        );

        for inner in nested {
            self.process_procedure(inner)?;
        }
        self.analyze_block(procedure.body)?;

        let entries = self
            .scopes
            .close_scope()
            .ok_or_else(|| InternalError::MalformedTree {
                message: format!("scope of '{}' already closed", procedure.name.name),
                span: procedure.span,
            })?;
        self.closed.push(ClosedScope { level, entries });
        Ok(())
    }

    fn proc_info_mut(&mut self, id: SymbolId) -> Result<&mut ProcInfo> {
        let entry = self.symbols.get_mut(id);
        match &mut entry.kind {
            SymbolKind::Procedure(info) => Ok(info),
            _ => Err(InternalError::UnexpectedSymbol {
                name: entry.name.clone(),
                expected: "procedure",
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use bumpalo::Bump;
    use snl_ast::AstBuilder;
    use snl_core::{CompileError, SemanticError};

    use crate::annotations::Analysis;
    use crate::symbols::AccessMode;

    use super::*;

    fn proc_info<'a>(analysis: &'a Analysis, name: &str) -> &'a ProcInfo {
        analysis
            .symbols
            .iter()
            .find(|(_, e)| e.name == name && e.as_proc().is_some())
            .and_then(|(_, e)| e.as_proc())
            .unwrap()
    }

    #[test]
    fn frame_without_room_for_its_display() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        b.set_line(3);
        let program = b.program(
            "main",
            [b.procedure(
                "p",
                [],
                [b.vars([b.var_decl(&["t"], b.array(8, i64::MAX, b.integer()))])],
                [],
            )],
            [],
        );
        let err = Analyzer::new().analyze_program(&program).unwrap_err();
        assert_eq!(
            err,
            CompileError::Semantic(SemanticError::StorageOverflow {
                span: snl_core::Span::line(3)
            })
        );

        let program = b.program(
            "main",
            [b.vars([b.var_decl(&["t"], b.array(1, i64::MAX, b.integer()))])],
            [],
        );
        let err = Analyzer::new().analyze_program(&program).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Semantic(SemanticError::StorageOverflow { .. })
        ));
    }

    #[test]
    fn frame_layout_of_level_one_procedure() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(
            "main",
            [b.procedure(
                "p",
                [b.value_param(&["a"], b.integer()), b.ref_param(&["r"], b.integer())],
                [b.vars([b.var_decl(&["t"], b.array(1, 3, b.integer()))])],
                [b.ret()],
            )],
            [b.call("p", [b.int(1), b.var("x")])],
        );
        let err = Analyzer::new().analyze_program(&program).unwrap_err();
        // `x` is not declared in main
        assert!(matches!(
            err,
            CompileError::Semantic(SemanticError::UndefinedIdentifier { .. })
        ));

        let program = b.program(
            "main",
            [b.procedure(
                "p",
                [b.value_param(&["a"], b.integer()), b.ref_param(&["r"], b.integer())],
                [b.vars([b.var_decl(&["t"], b.array(1, 3, b.integer()))])],
                [b.ret()],
            )],
            [],
        );
        let analysis = Analyzer::new().analyze_program(&program).unwrap();
        let info = proc_info(&analysis, "p");

        assert_eq!(info.level, 1);
        assert_eq!(info.params.len(), 2);
        // header 7, a at 7, r at 8, t at 9..12
        assert_eq!(info.display_base, 12);
        assert_eq!(info.frame_size, 14);

        let r = analysis.symbols.get(info.params[1]).as_var().unwrap();
        assert_eq!(r.access, AccessMode::Indirect);
        assert_eq!(r.offset, 8);
    }

    #[test]
    fn nested_frame_is_frozen_before_children() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(
            "main",
            [b.procedure(
                "outer",
                [],
                [
                    b.vars([b.var_decl(&["o"], b.integer())]),
                    b.procedure(
                        "inner",
                        [b.value_param(&["i"], b.integer())],
                        [],
                        [b.assign(b.var_ref("o"), b.var("i"))],
                    ),
                ],
                [b.call("inner", [b.var("o")])],
            )],
            [b.call("outer", [])],
        );

        let analysis = Analyzer::new().analyze_program(&program).unwrap();
        let outer = proc_info(&analysis, "outer");
        let inner = proc_info(&analysis, "inner");

        assert_eq!((outer.level, outer.display_base, outer.frame_size), (1, 8, 10));
        assert_eq!((inner.level, inner.display_base, inner.frame_size), (2, 8, 11));
    }

    #[test]
    fn declarations_after_procedure_are_malformed() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(
            "main",
            [
                b.procedure("p", [], [], []),
                b.vars([b.var_decl(&["late"], b.integer())]),
            ],
            [],
        );

        let err = Analyzer::new().analyze_program(&program).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Internal(InternalError::MalformedTree { .. })
        ));
    }

    #[test]
    fn duplicate_parameter() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(
            "main",
            [b.procedure(
                "p",
                [b.value_param(&["a"], b.integer()), b.ref_param(&["a"], b.char())],
                [],
                [],
            )],
            [],
        );

        let err = Analyzer::new().analyze_program(&program).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Semantic(SemanticError::DuplicateIdentifier { .. })
        ));
    }

    #[test]
    fn closed_scopes_are_logged_per_level() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let program = b.program(
            "main",
            [
                b.vars([b.var_decl(&["g"], b.integer())]),
                b.procedure(
                    "p",
                    [],
                    [b.procedure("q", [], [], [])],
                    [],
                ),
            ],
            [],
        );

        let analysis = Analyzer::new().analyze_program(&program).unwrap();
        let levels: Vec<u32> = analysis.closed_scopes.iter().map(|s| s.level).collect();
        assert_eq!(levels, [2, 1, 0]);
        // main scope holds g and p
        assert_eq!(analysis.closed_scopes[2].entries.len(), 2);
    }
}
