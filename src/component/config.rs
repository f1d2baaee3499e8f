//! Configuration for component transformation

/// Options for a [`Cpu`](super::Cpu) run
#[derive(Debug, Clone, Default)]
pub struct CpuConfig {
    /// Log every template before and after rewriting at debug level
    pub log_templates: bool,
}

impl CpuConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable template logging
    pub fn with_log_templates(mut self, enabled: bool) -> Self {
        self.log_templates = enabled;
        self
    }
}
