//! Type construction from type expressions.

use snl_ast::TypeExpr;
use snl_core::SemanticError;

use crate::types::TypeId;

use super::{Analyzer, Result};

impl Analyzer {
    /// Build (or look up) the type a type expression denotes.
    ///
    /// `array` and `record` expressions always create a new type; named
    /// types resolve to the descriptor they were declared with.
    pub(super) fn build_type(&mut self, ty: &TypeExpr<'_>) -> Result<TypeId> {
        match ty {
            TypeExpr::Integer(_) => Ok(TypeId::INTEGER),
            TypeExpr::Char(_) => Ok(TypeId::CHAR),
            TypeExpr::Named(name) => {
                let symbol = self.scopes.resolve(name.name, name.span)?;
                self.symbols.get(symbol).as_type().ok_or_else(|| {
                    SemanticError::NotAType {
                        name: name.name.to_string(),
                        span: name.span,
                    }
                    .into()
                })
            }
            TypeExpr::Array(array) => {
                if array.low > array.high {
                    return Err(SemanticError::InvalidArrayBounds {
                        low: array.low,
                        high: array.high,
                        span: array.span,
                    }
                    .into());
                }
                let element = self.build_type(&array.element)?;
                self.types
                    .add_array(element, array.low, array.high)
                    .ok_or_else(|| SemanticError::StorageOverflow { span: array.span }.into())
            }
            TypeExpr::Record(record) => {
                let mut fields = Vec::new();
                for group in record.fields {
                    let ty = self.build_type(&group.ty)?;
                    fields.extend(group.names.iter().map(|name| (name.name.to_string(), ty)));
                }
                self.types
                    .add_record(fields)
                    .ok_or_else(|| SemanticError::StorageOverflow { span: record.span }.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bumpalo::Bump;
    use snl_ast::AstBuilder;
    use snl_core::CompileError;

    use super::*;
    use crate::types::TypeDescriptor;

    #[test]
    fn array_of_integer() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut analyzer = Analyzer::new();

        let ty = analyzer.build_type(&b.array(2, 5, b.integer())).unwrap();
        assert_eq!(analyzer.types.size(ty), 4);
        match analyzer.types.get(ty) {
            TypeDescriptor::Array { element, low, .. } => {
                assert_eq!(*element, TypeId::INTEGER);
                assert_eq!(*low, 2);
            }
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn single_element_array_is_allowed() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut analyzer = Analyzer::new();

        let ty = analyzer.build_type(&b.array(3, 3, b.char())).unwrap();
        assert_eq!(analyzer.types.size(ty), 1);
    }

    #[test]
    fn reversed_bounds_are_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut analyzer = Analyzer::new();

        let err = analyzer.build_type(&b.array(5, 2, b.integer())).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Semantic(SemanticError::InvalidArrayBounds { low: 5, high: 2, .. })
        ));
    }

    #[test]
    fn array_too_large_to_address() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut analyzer = Analyzer::new();

        let err = analyzer
            .build_type(&b.array(0, i64::MAX, b.integer()))
            .unwrap_err();
        assert!(matches!(
            err,
            CompileError::Semantic(SemanticError::StorageOverflow { .. })
        ));

        let nested = b.array(1, 4, b.array(1, i64::MAX / 2, b.integer()));
        let err = analyzer.build_type(&nested).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Semantic(SemanticError::StorageOverflow { .. })
        ));
    }

    #[test]
    fn record_too_large_to_address() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut analyzer = Analyzer::new();

        let err = analyzer
            .build_type(&b.record([
                b.field_decl(&["a"], b.array(1, i64::MAX, b.integer())),
                b.field_decl(&["b"], b.integer()),
            ]))
            .unwrap_err();
        assert!(matches!(
            err,
            CompileError::Semantic(SemanticError::StorageOverflow { .. })
        ));
    }

    #[test]
    fn record_groups_share_a_type() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut analyzer = Analyzer::new();

        let ty = analyzer
            .build_type(&b.record([
                b.field_decl(&["a"], b.integer()),
                b.field_decl(&["p", "q"], b.array(1, 2, b.integer())),
            ]))
            .unwrap();

        let desc = analyzer.types.get(ty);
        assert_eq!(desc.size(), 5);
        let p = desc.field("p").unwrap();
        let q = desc.field("q").unwrap();
        assert_eq!(p.ty, q.ty);
        assert_eq!((p.offset, q.offset), (1, 3));
    }

    #[test]
    fn undefined_type_name() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut analyzer = Analyzer::new();

        let err = analyzer.build_type(&b.named("t")).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Semantic(SemanticError::UndefinedIdentifier { .. })
        ));
    }
}
