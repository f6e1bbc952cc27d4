use crate::error::Result;
use crate::filter::filter_in_window;
use crate::period::{previous_month_window, PeriodSelection};
use crate::schema::{Depense, Granularity, Prestation};
use chrono::TimeZone;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodMetrics {
    pub revenue_total: f64,
    pub service_count: usize,
    /// Revenue per service, `0.0` for an empty period.
    pub average_ticket: f64,
    pub variable_expense_total: f64,
    /// Revenue minus variable expenses.
    pub net_margin: f64,
}

/// Revenue of the previous calendar month, for the month view only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodComparison {
    pub previous_label: String,
    pub previous_revenue: f64,
    pub delta_percent: f64,
}

pub fn revenue_total<'a, I>(prestations: I) -> f64
where
    I: IntoIterator<Item = &'a Prestation>,
{
    prestations.into_iter().map(|p| p.amount).sum()
}

pub fn variable_expense_total<'a, I>(depenses: I) -> f64
where
    I: IntoIterator<Item = &'a Depense>,
{
    depenses
        .into_iter()
        .filter(|d| d.variable)
        .map(|d| d.amount)
        .sum()
}

/// Aggregates the records of one period (already filtered to its window).
pub fn compute_metrics<'a, P, D>(prestations: P, depenses: D) -> PeriodMetrics
where
    P: IntoIterator<Item = &'a Prestation>,
    D: IntoIterator<Item = &'a Depense>,
{
    let mut revenue_total = 0.0;
    let mut service_count = 0;
    for prestation in prestations {
        revenue_total += prestation.amount;
        service_count += 1;
    }

    let average_ticket = if service_count == 0 {
        0.0
    } else {
        revenue_total / service_count as f64
    };

    let variable_expense_total = variable_expense_total(depenses);

    PeriodMetrics {
        revenue_total,
        service_count,
        average_ticket,
        variable_expense_total,
        net_margin: revenue_total - variable_expense_total,
    }
}

/// Percentage change from `previous` to `current`.
///
/// With no previous revenue the change is reported as `100.0` if anything was
/// earned and `0.0` otherwise.
pub fn delta_percent(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        if current > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        (current - previous) / previous * 100.0
    }
}

/// Compares `current_revenue` with the revenue of the preceding calendar month.
///
/// `all_prestations` is the whole collection, not the current window. Returns
/// `None` unless the selection is a month view.
pub fn month_over_month<Tz: TimeZone>(
    all_prestations: &[Prestation],
    selection: &PeriodSelection,
    current_revenue: f64,
    tz: &Tz,
) -> Result<Option<PeriodComparison>> {
    if selection.granularity != Granularity::Month {
        return Ok(None);
    }

    let window = previous_month_window(selection.reference, tz)?;
    let previous_revenue = revenue_total(filter_in_window(all_prestations, &window));

    debug!(
        "Previous month '{}' revenue: {:.2} (current {:.2})",
        window.label, previous_revenue, current_revenue
    );

    Ok(Some(PeriodComparison {
        previous_label: window.label,
        previous_revenue,
        delta_percent: delta_percent(current_revenue, previous_revenue),
    }))
}
