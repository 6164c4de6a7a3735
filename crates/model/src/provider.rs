use std::error::Error;

use crate::candidate::Candidate;
use crate::error::ErrorKind;
use crate::request::GenerationRequest;
use crate::response::Generation;

/// The error type for a generation provider.
pub trait GenerationProviderError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that represents a remote generation provider.
///
/// Once the provider is created, it should behave like a stateless object.
/// It can still have internal state (a connection pool, for example), but
/// callers should not rely on it, and the provider should be prepared for
/// being dropped anytime.
pub trait GenerationProvider: Send + Sync {
    /// The error type that may be returned by the provider.
    type Error: GenerationProviderError;

    /// Asks the model identified by `candidate` to generate a reply.
    ///
    /// Implementations must make exactly one remote call per invocation and
    /// must not retry on their own. A response that carries no usable text
    /// is an error, never an empty [`Generation`].
    fn generate(
        &self,
        candidate: &Candidate,
        req: &GenerationRequest,
    ) -> impl Future<Output = Result<Generation, Self::Error>> + Send + 'static;
}
