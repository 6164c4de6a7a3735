use std::fmt::{self, Debug, Formatter};

/// A request to be sent to the generation provider.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GenerationRequest {
    /// The credential used to authenticate against the provider.
    pub api_key: String,
    /// The user prompt.
    pub prompt: String,
}

impl GenerationRequest {
    /// Creates a new request.
    #[inline]
    pub fn new<K: Into<String>, P: Into<String>>(
        api_key: K,
        prompt: P,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            prompt: prompt.into(),
        }
    }
}

impl Debug for GenerationRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("api_key", &"<redacted>")
            .field("prompt", &self.prompt)
            .finish()
    }
}
