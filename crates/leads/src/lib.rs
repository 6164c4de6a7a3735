//! Captured leads: the typed client for the hosted `leads` table, plus the
//! dashboard's filtering, statistics and CSV export.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod config;
mod error;
mod export;
mod filter;
mod lead;
mod stats;
mod store;

pub use config::SupabaseConfig;
pub use error::LeadError;
pub use export::to_csv;
pub use filter::LeadFilter;
pub use lead::{Lead, LeadId, LeadStatus, LeadUpdate, NewLead};
pub use stats::{LeadStats, compute_stats};
pub use store::{LEADS_TABLE, LeadStore};
