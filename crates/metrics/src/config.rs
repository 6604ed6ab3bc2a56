//! Aggregation configuration.

/// Configuration for reducing statistics before metric derivation.
#[derive(Debug, Clone, Default)]
pub struct EvaluateConfig {
    reduce_dims: Vec<String>,
    masked: bool,
}

impl EvaluateConfig {
    /// Set the dimensions statistics are averaged over.
    pub fn with_reduce_dims<S: Into<String>>(mut self, dims: impl IntoIterator<Item = S>) -> Self {
        self.reduce_dims = dims.into_iter().map(Into::into).collect();
        self
    }

    /// Set whether validity masks are honoured during averaging.
    pub fn with_masked(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }

    /// Returns the reduction dimensions.
    pub fn reduce_dims(&self) -> &[String] {
        &self.reduce_dims
    }

    /// Returns whether masked reduction is used.
    pub fn masked(&self) -> bool {
        self.masked
    }
}
