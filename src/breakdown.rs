use crate::grouping::OrderedGroups;
use crate::schema::{Depense, ExpenseCategory, Prestation, ServiceCategory};
use crate::utils::round_half_up;
use serde::Serialize;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare<K> {
    pub category: K,
    pub amount: f64,
    /// Whole-number share of the period total.
    pub share_percent: i64,
}

/// Sums amounts per key and computes each key's share of the total.
///
/// Only keys present in `items` are returned, in order of first appearance.
/// An all-zero total is treated as `1` so shares come out as `0`.
pub fn breakdown_by<T, I, K, FK, FA>(items: I, key: FK, amount: FA) -> Vec<CategoryShare<K>>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash + Clone,
    FK: Fn(&T) -> K,
    FA: Fn(&T) -> f64,
{
    let groups =
        OrderedGroups::sum_by_key(items.into_iter().map(|item| (key(&item), amount(&item))));

    let sum: f64 = groups.values().sum();
    let total = if sum == 0.0 { 1.0 } else { sum };

    groups
        .into_entries()
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category,
            amount,
            share_percent: round_half_up(amount / total * 100.0) as i64,
        })
        .collect()
}

pub fn revenue_by_category<'a, I>(prestations: I) -> Vec<CategoryShare<ServiceCategory>>
where
    I: IntoIterator<Item = &'a Prestation>,
{
    breakdown_by(prestations, |p| p.category, |p| p.amount)
}

pub fn expenses_by_category<'a, I>(depenses: I) -> Vec<CategoryShare<ExpenseCategory>>
where
    I: IntoIterator<Item = &'a Depense>,
{
    breakdown_by(depenses, |d| d.category, |d| d.amount)
}
