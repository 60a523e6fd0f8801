/// Knobs for one interpreter run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Name of the function `run_from_entrypoint` starts at.
    pub entrypoint: String,
    /// Calls nested deeper than this fail with a runtime error.
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            entrypoint: String::from("main"),
            max_call_depth: 1024,
        }
    }
}
