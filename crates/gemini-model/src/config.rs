/// The public endpoint of the Generative Language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Builder for [`GeminiConfig`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GeminiConfigBuilder {
    base_url: Option<String>,
    instruction: Option<String>,
}

impl GeminiConfigBuilder {
    /// Creates a builder with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom base URL.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets a fixed instruction that is prepended to every prompt.
    #[inline]
    pub fn with_instruction<S: Into<String>>(mut self, instruction: S) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> GeminiConfig {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        GeminiConfig {
            base_url: base_url.trim_end_matches('/').to_owned(),
            instruction: self.instruction.filter(|s| !s.trim().is_empty()),
        }
    }
}

/// Configuration for the Gemini provider.
///
/// The API key is not part of the configuration, it travels with every
/// [`GenerationRequest`](lead_machine_model::GenerationRequest).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GeminiConfig {
    pub(crate) base_url: String,
    pub(crate) instruction: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfigBuilder::new().build()
    }
}
