use crate::grouping::OrderedGroups;
use crate::schema::{Granularity, Prestation};
use crate::utils::{day_label, local_date, short_month_label};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub amount: f64,
}

/// Chart bucket of an instant for the active view: short month name in the
/// year view, day-of-month in the month view, full date in the day view.
pub fn bucket_label<Tz: TimeZone>(instant: &DateTime<Utc>, view: Granularity, tz: &Tz) -> String {
    let date = local_date(instant, tz);
    match view {
        Granularity::Year => short_month_label(date),
        Granularity::Month => date.day().to_string(),
        Granularity::Day => day_label(date),
    }
}

/// Revenue per bucket, buckets ordered by first appearance in `prestations`
/// (entry order, not calendar order).
pub fn revenue_series<'a, I, Tz>(prestations: I, view: Granularity, tz: &Tz) -> Vec<SeriesPoint>
where
    I: IntoIterator<Item = &'a Prestation>,
    Tz: TimeZone,
{
    OrderedGroups::sum_by_key(
        prestations
            .into_iter()
            .map(|p| (bucket_label(&p.date, view, tz), p.amount)),
    )
    .into_entries()
    .into_iter()
    .map(|(label, amount)| SeriesPoint { label, amount })
    .collect()
}
