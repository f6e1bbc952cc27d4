//! # Salon Ledger
//!
//! Bookkeeping for a small beauty salon: records services sold ("prestations")
//! and expenses ("depenses") and derives the KPIs of a selected day, month or
//! year.
//!
//! ## Core Concepts
//!
//! - **Period**: a granularity plus a reference date, resolved to an inclusive window in local time
//! - **Metrics**: revenue, service count, average ticket, variable expenses and net margin
//! - **Comparison**: revenue change against the previous calendar month (month view only)
//! - **Breakdown / Series**: revenue per category and per chart bucket, in entry order
//! - **Recurrence**: share of clients who came back within 21 to 35 days, over all time
//!
//! ## Example
//!
//! ```rust,ignore
//! use salon_ledger::*;
//! use chrono::{Local, NaiveDate};
//!
//! let config = DashboardConfig::load("salon.json")?;
//! let mut ledger = PersistentLedger::open(config.storage());
//! ledger.add_prestation(PrestationDraft {
//!     date: chrono::Utc::now(),
//!     category: ServiceCategory::RussianVolume,
//!     amount: "85".to_string(),
//!     ..PrestationDraft::default()
//! })?;
//!
//! let selection = PeriodSelection::today(config.default_granularity, &Local);
//! let snapshot = DashboardProcessor::compute(ledger.document(), &selection, &Local, &config.recurrence)?;
//! println!("{}: {:.2}", snapshot.window.label, snapshot.metrics.revenue_total);
//! ```

pub mod breakdown;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod grouping;
pub mod ledger;
pub mod metrics;
pub mod period;
pub mod recurrence;
pub mod schema;
pub mod series;
pub mod utils;

pub use breakdown::{breakdown_by, expenses_by_category, revenue_by_category, CategoryShare};
pub use config::DashboardConfig;
pub use error::{LedgerError, Result};
pub use export::{export_csv, export_csv_string, export_filename};
pub use filter::{filter_in_window, Timestamped};
pub use grouping::OrderedGroups;
pub use ledger::{
    DepenseDraft, JsonFileStorage, Ledger, MemoryStorage, PersistentLedger, PrestationDraft,
    Storage,
};
pub use metrics::{
    compute_metrics, delta_percent, month_over_month, PeriodComparison, PeriodMetrics,
};
pub use period::{previous_month_window, resolve_period, PeriodSelection};
pub use recurrence::{recurrence_rate, recurrence_stats, RecurrencePolicy, RecurrenceStats};
pub use schema::*;
pub use series::{bucket_label, revenue_series, SeriesPoint};

use chrono::TimeZone;
use log::{debug, info};
use serde::Serialize;

/// Everything the dashboard shows for one period selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub window: TimeWindow,
    pub metrics: PeriodMetrics,
    pub comparison: Option<PeriodComparison>,
    pub breakdown: Vec<CategoryShare<ServiceCategory>>,
    pub series: Vec<SeriesPoint>,
    pub recurrence: RecurrenceStats,
}

pub struct DashboardProcessor;

impl DashboardProcessor {
    pub fn compute<Tz: TimeZone>(
        document: &LedgerDocument,
        selection: &PeriodSelection,
        tz: &Tz,
        policy: &RecurrencePolicy,
    ) -> Result<DashboardSnapshot> {
        policy.validate()?;

        let window = selection.window(tz)?;
        let prestations = filter_in_window(&document.prestations, &window);
        let depenses = filter_in_window(&document.depenses, &window);

        debug!(
            "Window '{}' holds {} of {} prestations and {} of {} depenses",
            window.label,
            prestations.len(),
            document.prestations.len(),
            depenses.len(),
            document.depenses.len()
        );

        let metrics = compute_metrics(prestations.iter().copied(), depenses.iter().copied());
        let comparison =
            month_over_month(&document.prestations, selection, metrics.revenue_total, tz)?;
        let breakdown = revenue_by_category(prestations.iter().copied());
        let series = revenue_series(prestations.iter().copied(), selection.granularity, tz);
        let recurrence = recurrence_stats(&document.prestations, policy);

        info!(
            "Computed dashboard for '{}': revenue {:.2} over {} services, recurrence {}%",
            window.label, metrics.revenue_total, metrics.service_count, recurrence.rate_percent
        );

        Ok(DashboardSnapshot {
            window,
            metrics,
            comparison,
            breakdown,
            series,
            recurrence,
        })
    }

    pub fn compute_with_config<Tz: TimeZone>(
        document: &LedgerDocument,
        selection: &PeriodSelection,
        tz: &Tz,
        config: &DashboardConfig,
    ) -> Result<DashboardSnapshot> {
        Self::compute(document, selection, tz, &config.recurrence)
    }
}

pub fn compute_dashboard<Tz: TimeZone>(
    document: &LedgerDocument,
    selection: &PeriodSelection,
    tz: &Tz,
) -> Result<DashboardSnapshot> {
    DashboardProcessor::compute(document, selection, tz, &RecurrencePolicy::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn prestation(
        category: ServiceCategory,
        amount: f64,
        date: chrono::DateTime<Utc>,
        email: &str,
    ) -> Prestation {
        Prestation {
            id: format!("{}-{}", email, date.timestamp()),
            date,
            category,
            amount,
            client: Some(ClientIdentity {
                email: email.to_string(),
                ..ClientIdentity::default()
            }),
            note: None,
        }
    }

    fn january_document() -> LedgerDocument {
        LedgerDocument {
            prestations: vec![
                prestation(
                    ServiceCategory::ClassicSet,
                    100.0,
                    Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap(),
                    "a@x",
                ),
                prestation(
                    ServiceCategory::Removal,
                    50.0,
                    Utc.with_ymd_and_hms(2024, 1, 20, 14, 0, 0).unwrap(),
                    "b@x",
                ),
            ],
            depenses: vec![Depense {
                id: "d".to_string(),
                date: Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap(),
                category: ExpenseCategory::LashSupplier,
                amount: 30.0,
                note: None,
                variable: true,
            }],
        }
    }

    #[test]
    fn test_month_snapshot() {
        let selection = PeriodSelection::new(
            Granularity::Month,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        );
        let snapshot = compute_dashboard(&january_document(), &selection, &Utc).unwrap();

        assert_eq!(snapshot.window.label, "janvier 2024");
        assert_eq!(snapshot.metrics.revenue_total, 150.0);
        assert_eq!(snapshot.metrics.service_count, 2);
        assert_eq!(snapshot.metrics.average_ticket, 75.0);
        assert_eq!(snapshot.metrics.net_margin, 120.0);

        let shares: Vec<(ServiceCategory, f64, i64)> = snapshot
            .breakdown
            .iter()
            .map(|s| (s.category, s.amount, s.share_percent))
            .collect();
        assert_eq!(
            shares,
            vec![
                (ServiceCategory::ClassicSet, 100.0, 67),
                (ServiceCategory::Removal, 50.0, 33),
            ]
        );

        let comparison = snapshot.comparison.unwrap();
        assert_eq!(comparison.previous_label, "décembre 2023");
        assert_eq!(comparison.delta_percent, 100.0);

        assert_eq!(snapshot.recurrence.distinct_clients, 2);
        assert_eq!(snapshot.recurrence.rate_percent, 0);
    }

    #[test]
    fn test_snapshot_is_repeatable() {
        let document = january_document();
        let selection = PeriodSelection::new(
            Granularity::Year,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        );
        let first = compute_dashboard(&document, &selection, &Utc).unwrap();
        let second = compute_dashboard(&document, &selection, &Utc).unwrap();
        assert_eq!(first, second);
        assert!(first.comparison.is_none());
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        let selection = PeriodSelection::new(
            Granularity::Day,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        );
        let policy = RecurrencePolicy {
            min_days: f64::NAN,
            max_days: 35.0,
        };
        let result =
            DashboardProcessor::compute(&january_document(), &selection, &Utc, &policy);
        assert!(matches!(
            result,
            Err(LedgerError::InvalidRecurrencePolicy { .. })
        ));
    }
}
