use serde::{Deserialize, Serialize};

/// A successful reply from the generation provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Generation {
    /// The generated text, never empty.
    pub text: String,
}
