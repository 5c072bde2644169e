//! Lexical scope management for semantic analysis.
//!
//! [`Scopes`] is a stack of scopes. The stack depth is the lexical level:
//! the main program's scope sits at level 0 and exists from the start,
//! every procedure opens one more. Each scope also owns the running frame
//! offset its variables are allocated from.
//!
//! - Names are unique within one scope; inner scopes may shadow outer ones.
//! - Lookups search innermost to outermost.
//! - A closed scope's entries leave lookup but stay in the [`SymbolTable`].

use rustc_hash::FxHashMap;
use snl_core::{SemanticError, Span};
use tracing::trace;

use crate::symbols::{SymbolEntry, SymbolId, SymbolKind, SymbolTable};

/// Words reserved at the start of every procedure frame: saved `sp`, `ac`,
/// `ac1`, `ac2`, `displayOff`, the callee level and the return address.
pub const FRAME_HEADER_SIZE: i64 = 7;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Default)]
struct Scope {
    /// Name lookup within this scope.
    names: FxHashMap<String, SymbolId>,
    /// Entries in declaration order.
    entries: Vec<SymbolId>,
    /// Next free frame offset.
    offset: i64,
}

/// The entries of a scope after it was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedScope {
    pub level: u32,
    pub entries: Vec<SymbolId>,
}

// ============================================================================
// Scopes
// ============================================================================

/// The scope stack.
#[derive(Debug)]
pub struct Scopes {
    stack: Vec<Scope>,
}

impl Scopes {
    /// Create a stack holding only the main program's scope.
    ///
    /// The main frame has no header, so its offsets start at 0.
    pub fn new() -> Self {
        Self {
            stack: vec![Scope::default()],
        }
    }

    /// Current lexical level.
    pub fn level(&self) -> u32 {
        (self.stack.len() - 1) as u32
    }

    fn current(&self) -> &Scope {
        &self.stack[self.stack.len() - 1]
    }

    fn current_mut(&mut self) -> &mut Scope {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    // ==========================================================================
    // Scope Management
    // ==========================================================================

    /// Push an empty scope whose offsets start after the frame header.
    pub fn open_scope(&mut self) {
        self.stack.push(Scope {
            offset: FRAME_HEADER_SIZE,
            ..Scope::default()
        });
        trace!(level = self.level(), "open scope");
    }

    /// Pop the innermost scope and return its entries in declaration order.
    ///
    /// Returns `None` when only the main scope is left; it is never closed.
    pub fn close_scope(&mut self) -> Option<Vec<SymbolId>> {
        if self.stack.len() == 1 {
            return None;
        }
        let level = self.level();
        let scope = self.stack.pop()?;
        trace!(level, entries = scope.entries.len(), "close scope");
        Some(scope.entries)
    }

    /// Snapshot of the innermost scope's entries without popping it.
    pub fn capture_entries(&self) -> Vec<SymbolId> {
        self.current().entries.clone()
    }

    // ==========================================================================
    // Declaration and Lookup
    // ==========================================================================

    /// Declare a name in the innermost scope.
    ///
    /// Fails with [`SemanticError::DuplicateIdentifier`] only when the name
    /// already exists in this same scope.
    pub fn declare(
        &mut self,
        symbols: &mut SymbolTable,
        name: &str,
        kind: SymbolKind,
        span: Span,
    ) -> Result<SymbolId, SemanticError> {
        if self.current().names.contains_key(name) {
            return Err(SemanticError::DuplicateIdentifier {
                name: name.to_string(),
                span,
            });
        }

        trace!(name, kind = kind.describe(), level = self.level(), "declare");
        let id = symbols.add(SymbolEntry {
            name: name.to_string(),
            kind,
            span,
        });
        let scope = self.current_mut();
        scope.names.insert(name.to_string(), id);
        scope.entries.push(id);
        Ok(id)
    }

    /// Resolve a name, innermost scope first.
    pub fn resolve(&self, name: &str, span: Span) -> Result<SymbolId, SemanticError> {
        self.lookup(name)
            .ok_or_else(|| SemanticError::UndefinedIdentifier {
                name: name.to_string(),
                span,
            })
    }

    /// Resolve a name without producing a diagnostic.
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.stack
            .iter()
            .rev()
            .find_map(|scope| scope.names.get(name).copied())
    }

    // ==========================================================================
    // Frame Offsets
    // ==========================================================================

    /// The innermost scope's running offset.
    pub fn offset(&self) -> i64 {
        self.current().offset
    }

    /// Reserve `words` at the running offset and return where they start.
    ///
    /// Returns `None`, leaving the offset unchanged, when the frame would
    /// grow past `i64::MAX`.
    pub fn allocate(&mut self, words: i64) -> Option<i64> {
        let scope = self.current_mut();
        let start = scope.offset;
        scope.offset = start.checked_add(words)?;
        Some(start)
    }
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
