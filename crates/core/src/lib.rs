//! The fallback dispatcher that turns one prompt into one generated reply
//! by walking an ordered list of model candidates.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod dispatcher;
mod outcome;

pub use dispatcher::{
    DEFAULT_PROMPT, DispatchError, Dispatcher, FallbackPolicy,
};
pub use outcome::{AttemptFailure, DispatchOutcome};
