use crate::schema::{Depense, Prestation, TimeWindow};
use chrono::{DateTime, Utc};

pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

impl Timestamped for Prestation {
    fn timestamp(&self) -> DateTime<Utc> {
        self.date
    }
}

impl Timestamped for Depense {
    fn timestamp(&self) -> DateTime<Utc> {
        self.date
    }
}

/// Records whose timestamp lies in `[window.start, window.end]`, in input order.
pub fn filter_in_window<'a, T: Timestamped>(records: &'a [T], window: &TimeWindow) -> Vec<&'a T> {
    records
        .iter()
        .filter(|record| window.contains(&record.timestamp()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ServiceCategory;
    use chrono::{Duration, TimeZone};

    fn prestation(id: &str, date: DateTime<Utc>) -> Prestation {
        Prestation {
            id: id.to_string(),
            date,
            category: ServiceCategory::ClassicSet,
            amount: 10.0,
            client: None,
            note: None,
        }
    }

    fn january() -> TimeWindow {
        TimeWindow {
            start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap()
                + Duration::milliseconds(999),
            label: "janvier 2024".to_string(),
        }
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let window = january();
        let records = vec![
            prestation("before", window.start - Duration::milliseconds(1)),
            prestation("start", window.start),
            prestation("end", window.end),
            prestation("after", window.end + Duration::milliseconds(1)),
        ];

        let ids: Vec<&str> = filter_in_window(&records, &window)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["start", "end"]);
    }

    #[test]
    fn test_relative_order_is_preserved() {
        let window = january();
        let records = vec![
            prestation("c", Utc.with_ymd_and_hms(2024, 1, 20, 9, 0, 0).unwrap()),
            prestation("x", Utc.with_ymd_and_hms(2024, 2, 2, 9, 0, 0).unwrap()),
            prestation("a", Utc.with_ymd_and_hms(2024, 1, 3, 9, 0, 0).unwrap()),
            prestation("b", Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap()),
        ];

        let filtered = filter_in_window(&records, &window);
        let ids: Vec<&str> = filtered.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert!(filtered.iter().all(|p| window.contains(&p.date)));
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<Prestation> = Vec::new();
        assert!(filter_in_window(&records, &january()).is_empty());
    }
}
