use crate::error::{LedgerError, Result};
use crate::grouping::OrderedGroups;
use crate::schema::Prestation;
use crate::utils::round_half_up;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Gap between two consecutive visits that marks a client as returning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RecurrencePolicy {
    #[schemars(description = "Shortest qualifying gap in days (inclusive)")]
    pub min_days: f64,

    #[schemars(description = "Longest qualifying gap in days (inclusive)")]
    pub max_days: f64,
}

impl Default for RecurrencePolicy {
    fn default() -> Self {
        Self {
            min_days: 21.0,
            max_days: 35.0,
        }
    }
}

impl RecurrencePolicy {
    pub fn validate(&self) -> Result<()> {
        let bounds_ok = self.min_days.is_finite()
            && self.max_days.is_finite()
            && self.min_days >= 0.0
            && self.min_days <= self.max_days;

        if !bounds_ok {
            return Err(LedgerError::InvalidRecurrencePolicy {
                min_days: self.min_days,
                max_days: self.max_days,
            });
        }
        Ok(())
    }

    pub fn accepts_gap(&self, gap_days: f64) -> bool {
        gap_days >= self.min_days && gap_days <= self.max_days
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceStats {
    pub distinct_clients: usize,
    pub recurrent_clients: usize,
    /// Rounded percentage of recurrent clients, `0` when there are none.
    pub rate_percent: u32,
}

/// Gap between two instants in (fractional) days.
pub fn gap_in_days(a: &DateTime<Utc>, b: &DateTime<Utc>) -> f64 {
    (*b - *a).num_milliseconds().abs() as f64 / MILLIS_PER_DAY
}

fn has_qualifying_gap(visits: &mut [DateTime<Utc>], policy: &RecurrencePolicy) -> bool {
    visits.sort();
    visits
        .windows(2)
        .any(|pair| policy.accepts_gap(gap_in_days(&pair[0], &pair[1])))
}

/// Lifetime recurrence over every prestation, regardless of the active window.
///
/// Visits are grouped by [`Prestation::client_key`]; a client is recurrent when
/// two consecutive visits are separated by a gap the policy accepts.
pub fn recurrence_stats(prestations: &[Prestation], policy: &RecurrencePolicy) -> RecurrenceStats {
    let mut visits_by_client: OrderedGroups<String, Vec<DateTime<Utc>>> = OrderedGroups::new();
    for prestation in prestations {
        visits_by_client
            .entry_or_insert_with(prestation.client_key(), Vec::new)
            .push(prestation.date);
    }

    let distinct_clients = visits_by_client.len();
    let recurrent_clients = visits_by_client
        .into_entries()
        .into_iter()
        .filter(|(_, visits)| visits.len() > 1)
        .map(|(_, mut visits)| has_qualifying_gap(&mut visits, policy))
        .filter(|&recurrent| recurrent)
        .count();

    let rate_percent = if distinct_clients == 0 {
        0
    } else {
        round_half_up(recurrent_clients as f64 / distinct_clients as f64 * 100.0) as u32
    };

    RecurrenceStats {
        distinct_clients,
        recurrent_clients,
        rate_percent,
    }
}

pub fn recurrence_rate(prestations: &[Prestation], policy: &RecurrencePolicy) -> u32 {
    recurrence_stats(prestations, policy).rate_percent
}
