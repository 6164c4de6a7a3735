use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::lead::{Lead, LeadStatus};

/// Aggregates shown on the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeadStats {
    /// Number of leads.
    pub total: usize,
    /// Leads captured on the reference day.
    pub today: usize,
    /// Share of leads in [`LeadStatus::Cerrado`], between `0` and `1`.
    pub conversion: f64,
    /// Leads per status; every known status is present, unknown ones are
    /// only counted in `total`.
    pub by_status: BTreeMap<LeadStatus, usize>,
    /// Leads per capture date, oldest first.
    pub by_day: BTreeMap<NaiveDate, usize>,
}

/// Computes the dashboard aggregates, `today` being the reference day.
pub fn compute_stats(leads: &[Lead], today: NaiveDate) -> LeadStats {
    let mut by_status: BTreeMap<_, _> =
        LeadStatus::ALL.into_iter().map(|s| (s, 0)).collect();
    let mut by_day = BTreeMap::new();
    let mut captured_today = 0;

    for lead in leads {
        if let Some(count) = by_status.get_mut(&lead.status) {
            *count += 1;
        }
        let day = lead.timestamp.date_naive();
        *by_day.entry(day).or_default() += 1;
        if day == today {
            captured_today += 1;
        }
    }

    let closed = by_status[&LeadStatus::Cerrado];
    let conversion = if leads.is_empty() {
        0.0
    } else {
        closed as f64 / leads.len() as f64
    };

    LeadStats {
        total: leads.len(),
        today: captured_today,
        conversion,
        by_status,
        by_day,
    }
}
