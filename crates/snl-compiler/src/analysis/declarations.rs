//! Type, variable and parameter declarations.

use snl_ast::{Ident, ParamMode, TypeSection, VarSection};
use snl_core::SemanticError;
use tracing::trace;

use crate::symbols::{AccessMode, SymbolKind, VarInfo};
use crate::types::TypeId;

use super::{Analyzer, Result};

impl Analyzer {
    /// Declare every type of a `type` section.
    pub(super) fn process_type_section(&mut self, section: &TypeSection<'_>) -> Result<()> {
        for decl in section.decls {
            let ty = self.build_type(&decl.ty)?;
            trace!(name = decl.name.name, ty = %self.types.describe(ty), "type");
            self.scopes.declare(
                &mut self.symbols,
                decl.name.name,
                SymbolKind::Type(ty),
                decl.name.span,
            )?;
        }
        Ok(())
    }

    /// Declare every variable of a `var` section.
    pub(super) fn process_var_section(&mut self, section: &VarSection<'_>) -> Result<()> {
        for decl in section.decls {
            let ty = self.build_type(&decl.ty)?;
            self.declare_variables(decl.names, ty, AccessMode::Direct)?;
        }
        Ok(())
    }

    /// Declare one parameter group.
    pub(super) fn declare_parameters(
        &mut self,
        names: &[Ident<'_>],
        mode: ParamMode,
        ty: TypeId,
    ) -> Result<()> {
        let access = match mode {
            ParamMode::Value => AccessMode::Direct,
            ParamMode::Reference => AccessMode::Indirect,
        };
        self.declare_variables(names, ty, access)
    }

    /// Declare names sharing one type, allocating their frame slots in order.
    ///
    /// An indirect variable occupies one word (the address); a direct one
    /// occupies the size of its type.
    fn declare_variables(
        &mut self,
        names: &[Ident<'_>],
        ty: TypeId,
        access: AccessMode,
    ) -> Result<()> {
        let words = match access {
            AccessMode::Direct => self.types.size(ty),
            AccessMode::Indirect => 1,
        };
        for name in names {
            let info = VarInfo {
                ty,
                access,
                level: self.scopes.level(),
                offset: self.scopes.offset(),
            };
            self.scopes.declare(
                &mut self.symbols,
                name.name,
                SymbolKind::Variable(info),
                name.span,
            )?;
            if self.scopes.allocate(words).is_none() {
                return Err(SemanticError::StorageOverflow { span: name.span }.into());
            }
            trace!(
                name = name.name,
                ty = %self.types.describe(ty),
                offset = info.offset,
                "variable"
            );
        }
        Ok(())
    }
}
