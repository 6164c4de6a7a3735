use std::fmt::{self, Debug, Formatter};

/// Location and anonymous key of the hosted database.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SupabaseConfig {
    url: String,
    anon_key: String,
}

impl SupabaseConfig {
    /// Creates a configuration for the project at `url`.
    #[inline]
    pub fn new<U: Into<String>, K: Into<String>>(
        url: U,
        anon_key: K,
    ) -> Self {
        let url = url.into();
        Self {
            url: url.trim_end_matches('/').to_owned(),
            anon_key: anon_key.into(),
        }
    }

    /// Returns the project URL.
    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the anonymous (public) key.
    #[inline]
    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }
}

impl Debug for SupabaseConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .finish()
    }
}
