use crate::aggregate::{packaging_split, scope_total};
use crate::parse::{LineItemRecord, RowKind};
use std::collections::BTreeMap;
use time::Date;

/// The category of rows that appear before the first subtotal of their export.
pub const UNCATEGORIZED: &str = "其他";

/// What one category contributed to the sales of a record set.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: i64,
    pub quantity: u64,
    pub combo_quantity: u64,
    pub a_la_carte_quantity: u64,
    /// The share of `amount` in the amount of all categories, in percent with one decimal.
    pub percent: f64,
}

/// Compute the sales per category, largest first.
///
/// Every category is totalled per business day through [`scope_total()`], so days with subtotal rows use
/// these and days without them fall back to summing up items. Grand-total rows belong to no category.
pub fn category_shares(records: &[LineItemRecord]) -> Vec<CategoryShare> {
    let mut scopes = BTreeMap::<(&str, Date), Vec<&LineItemRecord>>::new();
    for record in records
        .iter()
        .filter(|record| record.kind() != RowKind::GrandTotal)
    {
        scopes
            .entry((category_of(record), record.date))
            .or_default()
            .push(record);
    }

    let mut by_category = BTreeMap::<&str, CategoryShare>::new();
    for ((category, _date), records) in scopes {
        let total = scope_total(records.iter().copied());
        let share = by_category
            .entry(category)
            .or_insert_with(|| CategoryShare {
                category: category.to_owned(),
                amount: 0,
                quantity: 0,
                combo_quantity: 0,
                a_la_carte_quantity: 0,
                percent: 0.0,
            });
        share.amount = share.amount.saturating_add(total.amount);
        share.quantity = share.quantity.saturating_add(total.quantity);
        for record in records.iter().filter(|record| record.is_item()) {
            let (combo, a_la_carte) = packaging_split(record);
            share.combo_quantity = share.combo_quantity.saturating_add(combo);
            share.a_la_carte_quantity = share.a_la_carte_quantity.saturating_add(a_la_carte);
        }
    }

    let grand_total = by_category
        .values()
        .fold(0_i64, |total, share| total.saturating_add(share.amount));
    let mut shares: Vec<_> = by_category
        .into_values()
        .map(|mut share| {
            share.percent = if grand_total == 0 {
                0.0
            } else {
                (share.amount as f64 / grand_total as f64 * 1000.0).round() / 10.0
            };
            share
        })
        .collect();
    shares.sort_by(|a, b| b.amount.cmp(&a.amount));
    shares
}

fn category_of(record: &LineItemRecord) -> &str {
    if record.category.is_empty() {
        UNCATEGORIZED
    } else {
        &record.category
    }
}
