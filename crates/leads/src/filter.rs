use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::lead::{Lead, LeadStatus};

/// The dashboard's table filter.
///
/// Query strings send empty values for unused inputs, so blank fields are
/// read as "no constraint".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadFilter {
    /// Case-insensitive substring of the name or email.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub search: Option<String>,
    /// Exact status.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<LeadStatus>,
    /// Earliest capture date, inclusive.
    #[serde(default, rename = "from", deserialize_with = "blank_as_none")]
    pub date_from: Option<NaiveDate>,
    /// Latest capture date, inclusive.
    #[serde(default, rename = "to", deserialize_with = "blank_as_none")]
    pub date_to: Option<NaiveDate>,
}

impl LeadFilter {
    /// Returns `true` if `lead` passes every set constraint.
    pub fn matches(&self, lead: &Lead) -> bool {
        if let Some(search) = &self.search {
            let search = search.to_lowercase();
            if !lead.name.to_lowercase().contains(&search)
                && !lead.email.to_lowercase().contains(&search)
            {
                return false;
            }
        }
        if self.status.is_some_and(|status| status != lead.status) {
            return false;
        }
        let date = lead.timestamp.date_naive();
        if self.date_from.is_some_and(|from| date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| date > to) {
            return false;
        }
        true
    }

    /// Keeps the leads that match, preserving order.
    pub fn apply(&self, leads: Vec<Lead>) -> Vec<Lead> {
        leads.into_iter().filter(|lead| self.matches(lead)).collect()
    }
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}
