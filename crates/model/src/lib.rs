//! An abstraction layer for remote text-generation providers.
//!
//! This crate establishes a unified protocol for the chat proxy to talk to
//! a generation provider, so that the fallback dispatcher can try several
//! models of the same (or different) providers without knowing their wire
//! formats.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod candidate;
mod error;
mod provider;
mod request;
mod response;

pub use candidate::*;
pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
