//! Configuration for catalog text output

/// Configuration options for catalog tables
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Digits after the decimal point for coordinates and steps
    pub precision: usize,

    /// Column separator
    pub separator: String,

    /// Whether to emit the `# flavor` line before each catalog
    pub header: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            precision: 6,
            separator: "\t".to_string(),
            header: true,
        }
    }
}

impl OutputConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of decimals
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Set the column separator
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set whether to emit the flavor header line
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OutputConfig::default();
        assert_eq!(config.precision, 6);
        assert_eq!(config.separator, "\t");
        assert!(config.header);
    }

    #[test]
    fn test_builder_pattern() {
        let config = OutputConfig::new()
            .with_precision(3)
            .with_separator(",")
            .with_header(false);
        assert_eq!(config.precision, 3);
        assert_eq!(config.separator, ",");
        assert!(!config.header);
    }
}
