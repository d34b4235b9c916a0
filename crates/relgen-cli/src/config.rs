use std::path::PathBuf;

/// Configuration for relgen CLI operations
#[derive(Debug, Default, Clone)]
pub struct Config {
    /// Directory generated files are written to when the command line does
    /// not name one. Defaults to the directory of the input.
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Create a new Config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default output directory
    pub fn output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }
}
