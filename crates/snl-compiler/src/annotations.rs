//! Analysis results consumed by the code generator.
//!
//! The tree is never mutated. Instead the analyzer records, per [`NodeId`],
//! the symbol a reference resolved to and the type an expression has.

use rustc_hash::FxHashMap;
use snl_ast::NodeId;
use snl_core::InternalError;

use crate::scope::ClosedScope;
use crate::symbols::{SymbolId, SymbolTable};
use crate::types::{TypeId, TypeTable};

/// Per-node annotations.
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    symbols: FxHashMap<NodeId, SymbolId>,
    types: FxHashMap<NodeId, TypeId>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the symbol a reference or declaration node denotes.
    pub fn record_symbol(&mut self, node: NodeId, symbol: SymbolId) {
        self.symbols.insert(node, symbol);
    }

    /// Record the type of an expression node.
    pub fn record_type(&mut self, node: NodeId, ty: TypeId) {
        self.types.insert(node, ty);
    }

    pub fn symbol(&self, node: NodeId) -> Option<SymbolId> {
        self.symbols.get(&node).copied()
    }

    pub fn type_of(&self, node: NodeId) -> Option<TypeId> {
        self.types.get(&node).copied()
    }

    /// The symbol of a node the analyzer must have annotated.
    pub fn require_symbol(&self, node: NodeId) -> Result<SymbolId, InternalError> {
        self.symbol(node).ok_or(InternalError::MissingAnnotation {
            node: node.raw(),
            what: "symbol",
        })
    }

    /// The type of a node the analyzer must have annotated.
    pub fn require_type(&self, node: NodeId) -> Result<TypeId, InternalError> {
        self.type_of(node).ok_or(InternalError::MissingAnnotation {
            node: node.raw(),
            what: "type",
        })
    }
}

/// Everything semantic analysis produces.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub types: TypeTable,
    pub symbols: SymbolTable,
    pub annotations: Annotations,
    /// Frame offset of the main program's display entry.
    pub main_display_base: i64,
    /// Scopes in closing order; the main scope comes last.
    pub closed_scopes: Vec<ClosedScope>,
}
