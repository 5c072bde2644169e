//! Symbol entries and the symbol table.
//!
//! Every declared name becomes a [`SymbolEntry`] owned by the
//! [`SymbolTable`]. Scopes only hold [`SymbolId`]s, so an entry outlives the
//! scope it was declared in and stays reachable from the annotation map
//! during code generation.

use std::fmt;

use snl_core::Span;

use crate::types::TypeId;

/// Handle to an entry in a [`SymbolTable`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

/// How a variable's frame slot relates to its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMode {
    /// The slot holds the value.
    Direct,
    /// The slot holds the address of the value (`var` parameters).
    Indirect,
}

/// Payload of a variable or parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarInfo {
    pub ty: TypeId,
    pub access: AccessMode,
    /// Lexical level of the declaring scope.
    pub level: u32,
    /// Word offset from the frame base.
    pub offset: i64,
}

/// Payload of a procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcInfo {
    /// Lexical level of the procedure's own scope.
    pub level: u32,
    /// Formal parameters in declaration order.
    pub params: Vec<SymbolId>,
    /// Words in an activation record, display included.
    pub frame_size: i64,
    /// Frame offset of the display block.
    pub display_base: i64,
}

/// What a name denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Type(TypeId),
    Variable(VarInfo),
    Procedure(ProcInfo),
}

impl SymbolKind {
    /// Short name of the kind, for trace output.
    pub fn describe(&self) -> &'static str {
        match self {
            SymbolKind::Type(_) => "type",
            SymbolKind::Variable(_) => "variable",
            SymbolKind::Procedure(_) => "procedure",
        }
    }
}

/// A declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub name: String,
    pub kind: SymbolKind,
    /// Declaration site
    pub span: Span,
}

impl SymbolEntry {
    pub fn as_type(&self) -> Option<TypeId> {
        match self.kind {
            SymbolKind::Type(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn as_var(&self) -> Option<&VarInfo> {
        match &self.kind {
            SymbolKind::Variable(var) => Some(var),
            _ => None,
        }
    }

    pub fn as_proc(&self) -> Option<&ProcInfo> {
        match &self.kind {
            SymbolKind::Procedure(info) => Some(info),
            _ => None,
        }
    }
}

/// Owns every symbol entry created during analysis.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entry and return its handle.
    pub fn add(&mut self, entry: SymbolEntry) -> SymbolId {
        let id = SymbolId(self.entries.len() as u32);
        self.entries.push(entry);
        id
    }

    /// Get an entry.
    pub fn get(&self, id: SymbolId) -> &SymbolEntry {
        &self.entries[id.index()]
    }

    pub(crate) fn get_mut(&mut self, id: SymbolId) -> &mut SymbolEntry {
        &mut self.entries[id.index()]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries with their handles, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &SymbolEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (SymbolId(i as u32), entry))
    }
}
