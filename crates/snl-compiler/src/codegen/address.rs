//! Address computation for variable references.

use snl_ast::{Expr, VarAccess, VarRef};
use snl_core::InternalError;
use snl_core::tm::{Opcode, Register};

use crate::symbols::AccessMode;
use crate::types::{TypeDescriptor, TypeId};

use super::{CodeGenerator, Result};

/// The part of an address known at compile time plus an optional index.
struct Selector<'e, 'ast> {
    /// Constant word offset (field offset).
    offset: i64,
    /// Index expression, array lower bound and element size.
    index: Option<(&'e Expr<'ast>, i64, i64)>,
}

impl<'a> CodeGenerator<'a> {
    /// Leave the absolute address of the referenced storage in `ac`.
    ///
    /// The relative part (field offset, scaled index) is computed first
    /// because evaluating an index may use `ac1` and temporaries. For a
    /// direct variable the frame offset is folded in and the frame base is
    /// added; for an indirect one the frame slot is dereferenced and the
    /// relative part is added to the pointer.
    pub(super) fn find_address(&mut self, var: &VarRef<'_>) -> Result<()> {
        let symbol = self.analysis.annotations.require_symbol(var.id)?;
        let info = self.var_info(symbol)?;
        let selector = self.selector(var, info.ty)?;
        let name = var.name.name;

        let base_offset = match info.access {
            AccessMode::Direct => info.offset + selector.offset,
            AccessMode::Indirect => selector.offset,
        };
        match selector.index {
            None => self.emitter.emit_rm(
                Opcode::Ldc,
                Register::Ac,
                base_offset,
                Register::Ac,
                &format!("relative address of {name}"),
            ),
            Some((index, low, size)) => {
                self.generate_expr(index)?;
                self.emitter
                    .emit_rm(Opcode::Lda, Register::Ac, low.wrapping_neg(), Register::Ac, "index - low");
                if size != 1 {
                    self.emitter
                        .emit_rm(Opcode::Ldc, Register::Ac1, size, Register::Ac, "element size");
                    self.emitter.emit_ro(
                        Opcode::Mul,
                        Register::Ac,
                        Register::Ac,
                        Register::Ac1,
                        "scale index",
                    );
                }
                self.emitter.emit_rm(
                    Opcode::Lda,
                    Register::Ac,
                    base_offset,
                    Register::Ac,
                    &format!("relative address of {name}[]"),
                );
            }
        }

        let level = i64::from(info.level);
        self.emitter.emit_rm(
            Opcode::Ld,
            Register::Ac1,
            level,
            Register::DisplayOff,
            &format!("frame base of level {level}"),
        );
        if info.access == AccessMode::Indirect {
            self.emitter.emit_rm(
                Opcode::Ld,
                Register::Ac1,
                info.offset,
                Register::Ac1,
                &format!("load pointer {name}"),
            );
        }
        self.emitter.emit_ro(
            Opcode::Add,
            Register::Ac,
            Register::Ac,
            Register::Ac1,
            &format!("absolute address of {name}"),
        );
        Ok(())
    }

    /// Split a reference's selector into its constant and indexed parts.
    fn selector<'e, 'ast>(
        &self,
        var: &'e VarRef<'ast>,
        declared: TypeId,
    ) -> Result<Selector<'e, 'ast>> {
        let types = &self.analysis.types;
        let array_index = |index: &'e Expr<'ast>, ty: TypeId| match types.get(ty) {
            TypeDescriptor::Array { element, low, .. } => Ok((index, *low, types.size(*element))),
            _ => Err(InternalError::MalformedTree {
                message: format!("indexed '{}' is not an array", var.name.name),
                span: var.span,
            }),
        };

        match var.access {
            VarAccess::Plain => Ok(Selector {
                offset: 0,
                index: None,
            }),
            VarAccess::Index(index) => Ok(Selector {
                offset: 0,
                index: Some(array_index(index, declared)?),
            }),
            VarAccess::Field { field, index } => {
                let field = types.get(declared).field(field.name).ok_or_else(|| {
                    InternalError::MalformedTree {
                        message: format!("'{}' has no field '{}'", var.name.name, field.name),
                        span: var.span,
                    }
                })?;
                let index = match index {
                    Some(index) => Some(array_index(index, field.ty)?),
                    None => None,
                };
                Ok(Selector {
                    offset: field.offset,
                    index,
                })
            }
        }
    }
}
