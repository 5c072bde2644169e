//! Unified error types for the SNL back end.
//!
//! This module provides a consistent error type hierarchy for every phase
//! the back end runs: semantic analysis, code generation and execution on
//! the TM simulator.
//!
//! ## Error Hierarchy
//!
//! ```text
//! SnlError (top-level wrapper)
//! ├── CompileError
//! │   ├── SemanticError  - user diagnostics, fatal at the first one
//! │   └── InternalError  - invariant violations inside the compiler
//! └── RuntimeError       - TM simulator faults
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use snl_core::SnlError;
//!
//! fn compile_and_run(program: &Program<'_>) -> Result<Vec<i64>, SnlError> {
//!     let tm = compile(program, &CompileOptions::default())?; // CompileError -> SnlError
//!     let output = Machine::new(&tm).run()?;                  // RuntimeError -> SnlError
//!     Ok(output)
//! }
//! ```

use thiserror::Error;

use crate::Span;

// ============================================================================
// Semantic Errors
// ============================================================================

/// Errors reported by semantic analysis.
///
/// Analysis stops at the first error; there is no recovery and no
/// multi-error reporting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    /// A name was declared twice in the same scope.
    #[error("at {span}: duplicate identifier '{name}'")]
    DuplicateIdentifier {
        /// The redeclared name.
        name: String,
        /// Where the second declaration occurred.
        span: Span,
    },

    /// A name is not declared in any enclosing scope.
    #[error("at {span}: undefined identifier '{name}'")]
    UndefinedIdentifier {
        /// The unresolved name.
        name: String,
        /// Where the name was referenced.
        span: Span,
    },

    /// A type position names something that is not a type.
    #[error("at {span}: '{name}' is not a type")]
    NotAType { name: String, span: Span },

    /// A variable position names something that is not a variable.
    #[error("at {span}: '{name}' is not a variable")]
    NotAVariable { name: String, span: Span },

    /// A call names something that is not a procedure.
    #[error("at {span}: '{name}' is not a procedure")]
    NotAProcedure { name: String, span: Span },

    /// An indexed variable is not of array type.
    #[error("at {span}: '{name}' is not an array")]
    NotAnArray { name: String, span: Span },

    /// A field access on a variable that is not of record type.
    #[error("at {span}: '{name}' is not a record")]
    NotARecord { name: String, span: Span },

    /// A field access names a field the record does not have.
    #[error("at {span}: record '{record}' has no field '{field}'")]
    InvalidFieldName {
        /// The record variable.
        record: String,
        /// The missing field.
        field: String,
        /// Where the access occurred.
        span: Span,
    },

    /// An array type whose lower bound exceeds its upper bound.
    #[error("at {span}: invalid array bounds [{low}..{high}]")]
    InvalidArrayBounds { low: i64, high: i64, span: Span },

    /// A type or frame whose size in words does not fit the address space.
    #[error("at {span}: storage exceeds the addressable range")]
    StorageOverflow { span: Span },

    /// Operand, index or assignment types are not compatible.
    #[error("at {span}: incompatible types")]
    IncompatibleTypes { span: Span },

    /// An `if` or `while` condition is not boolean.
    #[error("at {span}: {statement} condition must be boolean")]
    ConditionNotBoolean {
        /// `"if"` or `"while"`.
        statement: &'static str,
        span: Span,
    },

    /// A `write` of a boolean expression.
    #[error("at {span}: cannot write a boolean expression")]
    CannotWriteBoolean { span: Span },

    /// A `return` in the main program body.
    #[error("at {span}: cannot return from the main program")]
    ReturnFromMain { span: Span },

    /// A call supplies fewer arguments than the procedure declares.
    #[error("at {span}: too few arguments to '{procedure}': expected {expected}, found {found}")]
    TooFewArguments {
        procedure: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    /// A call supplies more arguments than the procedure declares.
    #[error("at {span}: too many arguments to '{procedure}': expected {expected}, found {found}")]
    TooManyArguments {
        procedure: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    /// An argument's type does not match its formal parameter.
    #[error("at {span}: incompatible type for parameter '{parameter}' of '{procedure}'")]
    IncompatibleParameterType {
        procedure: String,
        parameter: String,
        span: Span,
    },
}

impl SemanticError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            SemanticError::DuplicateIdentifier { span, .. } => *span,
            SemanticError::UndefinedIdentifier { span, .. } => *span,
            SemanticError::NotAType { span, .. } => *span,
            SemanticError::NotAVariable { span, .. } => *span,
            SemanticError::NotAProcedure { span, .. } => *span,
            SemanticError::NotAnArray { span, .. } => *span,
            SemanticError::NotARecord { span, .. } => *span,
            SemanticError::InvalidFieldName { span, .. } => *span,
            SemanticError::InvalidArrayBounds { span, .. } => *span,
            SemanticError::StorageOverflow { span } => *span,
            SemanticError::IncompatibleTypes { span } => *span,
            SemanticError::ConditionNotBoolean { span, .. } => *span,
            SemanticError::CannotWriteBoolean { span } => *span,
            SemanticError::ReturnFromMain { span } => *span,
            SemanticError::TooFewArguments { span, .. } => *span,
            SemanticError::TooManyArguments { span, .. } => *span,
            SemanticError::IncompatibleParameterType { span, .. } => *span,
        }
    }

    /// The offending source line.
    pub fn line(&self) -> u32 {
        self.span().line
    }
}

// ============================================================================
// Internal Errors
// ============================================================================

/// Invariant violations inside the compiler.
///
/// These signal a defect in the back end (or a tree the parser should never
/// have produced), never a problem in the user's program. Compilation aborts
/// and no partial program is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalError {
    /// A backpatch targeted an address that was never reserved.
    #[error("internal: patch address {address} is beyond the frontier {frontier}")]
    PatchOutOfRange { address: usize, frontier: usize },

    /// A reserved instruction slot was never backpatched.
    #[error("internal: reserved slot {address} was never filled")]
    UnfilledSlot { address: usize },

    /// The analyzer left no annotation on a node the generator needs.
    #[error("internal: node {node} has no {what} annotation")]
    MissingAnnotation {
        /// Raw node identifier.
        node: u32,
        /// Which annotation was expected.
        what: &'static str,
    },

    /// An annotation points at a symbol of the wrong kind.
    #[error("internal: symbol '{name}' is not a {expected}")]
    UnexpectedSymbol {
        name: String,
        expected: &'static str,
    },

    /// The tree does not have the shape the parser guarantees.
    #[error("internal: malformed tree at {span}: {message}")]
    MalformedTree { message: String, span: Span },

    /// The temporary area was not empty at a statement boundary.
    #[error("internal: temporary area unbalanced at {span} (offset {offset})")]
    UnbalancedTemporaries { offset: i64, span: Span },
}

// ============================================================================
// Compile Errors
// ============================================================================

/// Errors returned by the compiler pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A semantic error in the program.
    #[error(transparent)]
    Semantic(#[from] SemanticError),

    /// A compiler defect.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl CompileError {
    /// Check if this is a semantic error.
    pub fn is_semantic(&self) -> bool {
        matches!(self, CompileError::Semantic(_))
    }

    /// Check if this is an internal error.
    pub fn is_internal(&self) -> bool {
        matches!(self, CompileError::Internal(_))
    }

    /// The semantic error, if this is one.
    pub fn as_semantic(&self) -> Option<&SemanticError> {
        match self {
            CompileError::Semantic(err) => Some(err),
            CompileError::Internal(_) => None,
        }
    }
}

// ============================================================================
// Runtime Errors
// ============================================================================

/// Faults raised by the TM simulator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The program counter left the instruction memory.
    #[error("instruction fetch out of range at pc {pc}")]
    InstructionOutOfRange { pc: i64 },

    /// An opcode stored in the wrong instruction form.
    #[error("illegal instruction at pc {pc}")]
    IllegalInstruction { pc: usize },

    /// A load or store outside the data memory.
    #[error("data address {address} out of range (pc {pc})")]
    DataOutOfRange { address: i64, pc: usize },

    /// Division by zero.
    #[error("division by zero (pc {pc})")]
    DivisionByZero { pc: usize },

    /// `IN` executed with no input left.
    #[error("input exhausted (pc {pc})")]
    InputExhausted { pc: usize },

    /// The program did not halt within the configured number of steps.
    #[error("step limit of {limit} exceeded")]
    StepLimitExceeded { limit: u64 },
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// The unified error type for the whole pipeline.
///
/// Each variant uses `#[from]` to enable automatic conversion with the `?` operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnlError {
    /// A compilation error.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// A runtime error.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl From<SemanticError> for SnlError {
    fn from(err: SemanticError) -> Self {
        SnlError::Compile(err.into())
    }
}

impl From<InternalError> for SnlError {
    fn from(err: InternalError) -> Self {
        SnlError::Compile(err.into())
    }
}

impl SnlError {
    /// Check if this is a compilation error.
    pub fn is_compile(&self) -> bool {
        matches!(self, SnlError::Compile(_))
    }

    /// Check if this is a runtime error.
    pub fn is_runtime(&self) -> bool {
        matches!(self, SnlError::Runtime(_))
    }
}

// ============================================================================
// Tests
// ============================================================================
