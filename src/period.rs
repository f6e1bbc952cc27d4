use crate::error::{LedgerError, Result};
use crate::schema::{Granularity, TimeWindow};
use crate::utils::{
    day_label, end_of_day, first_day_of_month, first_day_of_previous_month, last_day_of_month,
    localize, month_label, start_of_day, year_label,
};
use chrono::{Datelike, Days, Months, NaiveDate, TimeZone, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

/// Resolves the inclusive window covering `reference` at the given granularity.
///
/// Boundaries are taken from the local calendar fields of `reference` in `tz`:
/// midnight of the first day to `23:59:59.999` of the last day.
pub fn resolve_period<Tz: TimeZone>(
    reference: NaiveDate,
    granularity: Granularity,
    tz: &Tz,
) -> Result<TimeWindow> {
    let (first, last, label) = match granularity {
        Granularity::Day => (reference, reference, day_label(reference)),
        Granularity::Month => (
            first_day_of_month(reference.year(), reference.month())?,
            last_day_of_month(reference.year(), reference.month())?,
            month_label(reference),
        ),
        Granularity::Year => (
            first_day_of_month(reference.year(), 1)?,
            last_day_of_month(reference.year(), 12)?,
            year_label(reference),
        ),
    };

    let window = TimeWindow {
        start: localize(tz, start_of_day(first)?),
        end: localize(tz, end_of_day(last)?),
        label,
    };

    debug!(
        "Resolved {:?} window '{}': {} .. {}",
        granularity, window.label, window.start, window.end
    );

    Ok(window)
}

/// Window of the calendar month immediately before the month of `reference`.
pub fn previous_month_window<Tz: TimeZone>(reference: NaiveDate, tz: &Tz) -> Result<TimeWindow> {
    resolve_period(first_day_of_previous_month(reference)?, Granularity::Month, tz)
}

/// The period currently shown: a granularity and the day it is anchored on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeriodSelection {
    pub granularity: Granularity,
    pub reference: NaiveDate,
}

impl PeriodSelection {
    pub fn new(granularity: Granularity, reference: NaiveDate) -> Self {
        Self {
            granularity,
            reference,
        }
    }

    pub fn today<Tz: TimeZone>(granularity: Granularity, tz: &Tz) -> Self {
        Self::new(granularity, Utc::now().with_timezone(tz).date_naive())
    }

    pub fn window<Tz: TimeZone>(&self, tz: &Tz) -> Result<TimeWindow> {
        resolve_period(self.reference, self.granularity, tz)
    }

    /// Steps back one day, one calendar month or one year.
    pub fn previous(&self) -> Result<Self> {
        let reference = match self.granularity {
            Granularity::Day => self.reference.checked_sub_days(Days::new(1)),
            Granularity::Month => self.reference.checked_sub_months(Months::new(1)),
            Granularity::Year => self.reference.checked_sub_months(Months::new(12)),
        }
        .ok_or_else(|| {
            LedgerError::DateError(format!("No period before {}", self.reference))
        })?;

        Ok(Self::new(self.granularity, reference))
    }

    /// Steps forward one day, one calendar month or one year.
    pub fn next(&self) -> Result<Self> {
        let reference = match self.granularity {
            Granularity::Day => self.reference.checked_add_days(Days::new(1)),
            Granularity::Month => self.reference.checked_add_months(Months::new(1)),
            Granularity::Year => self.reference.checked_add_months(Months::new(12)),
        }
        .ok_or_else(|| LedgerError::DateError(format!("No period after {}", self.reference)))?;

        Ok(Self::new(self.granularity, reference))
    }
}
