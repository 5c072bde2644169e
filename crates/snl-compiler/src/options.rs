//! Compiler configuration.

/// Options controlling code generation.
///
/// # Example
///
/// ```
/// use snl_compiler::CompileOptions;
///
/// let options = CompileOptions::new().with_trace_code(false);
/// assert!(!options.trace_code);
/// assert!(options.temp_base_check);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Attach trace comments to emitted instructions.
    pub trace_code: bool,
    /// Check that the temporary area is empty after every statement.
    pub temp_base_check: bool,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace_code(mut self, trace_code: bool) -> Self {
        self.trace_code = trace_code;
        self
    }

    pub fn with_temp_base_check(mut self, temp_base_check: bool) -> Self {
        self.temp_base_check = temp_base_check;
        self
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            trace_code: true,
            temp_base_check: true,
        }
    }
}
