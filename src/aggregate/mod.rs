//! Derive the views of the dashboard from a set of records.
//!
//! Exports are inconsistent about totals: some days carry a grand-total row, some only subtotals per category,
//! some neither. Whenever records need to be collapsed into one total for a scope, [`scope_total()`] decides
//! once which kind of row to trust. All functions in here only read the records they are given, and an
//! empty record set produces zeroes or empty tables.
use crate::normalize::Packaging;
use crate::parse::{LineItemRecord, RowKind};
use std::collections::BTreeMap;
use time::Date;

mod categories;
pub use categories::{category_shares, CategoryShare, UNCATEGORIZED};

mod daily;
pub use daily::{
    daily_totals, daily_trend, sales_summary, weekday_averages, DailyTotal, SalesSummary,
    TrendPoint, WeekdayAverage,
};

mod products;
pub use products::{product_aggregates, product_summary, top_products, ProductAggregate, ProductSummary};

mod series;
pub use series::{product_series, SeriesPoint};

/// The kind of rows a scope total was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Tier {
    /// The grand-total row of the scope.
    GrandTotal,
    /// The sum of all category subtotal rows of the scope.
    CategorySubtotals,
    /// The sum of all item rows of the scope.
    Items,
}

/// The collapsed amount and quantity of a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeTotal {
    pub tier: Tier,
    pub amount: i64,
    pub quantity: u64,
}

impl Default for ScopeTotal {
    fn default() -> Self {
        ScopeTotal {
            tier: Tier::Items,
            amount: 0,
            quantity: 0,
        }
    }
}

/// Collapse `records`, which should all belong to one scope, into a single total.
///
/// A grand-total row is taken as is, with the last one winning if there are more. Without one, category
/// subtotals are summed, and without these all remaining item rows are. Rows of different tiers are never mixed.
/// Sums saturate instead of overflowing.
pub fn scope_total<'a>(records: impl IntoIterator<Item = &'a LineItemRecord>) -> ScopeTotal {
    let mut grand_total = None::<&LineItemRecord>;
    let mut subtotals = None::<(i64, u64)>;
    let mut items = (0_i64, 0_u64);
    for record in records {
        match record.kind() {
            RowKind::GrandTotal => grand_total = Some(record),
            RowKind::CategorySubtotal => {
                let (amount, quantity) = subtotals.get_or_insert((0, 0));
                *amount = amount.saturating_add(record.amount);
                *quantity = quantity.saturating_add(record.quantity);
            }
            RowKind::Item => {
                items.0 = items.0.saturating_add(record.amount);
                items.1 = items.1.saturating_add(record.quantity);
            }
        }
    }

    match (grand_total, subtotals) {
        (Some(record), _) => ScopeTotal {
            tier: Tier::GrandTotal,
            amount: record.amount,
            quantity: record.quantity,
        },
        (None, Some((amount, quantity))) => ScopeTotal {
            tier: Tier::CategorySubtotals,
            amount,
            quantity,
        },
        (None, None) => ScopeTotal {
            tier: Tier::Items,
            amount: items.0,
            quantity: items.1,
        },
    }
}

/// Group `records` by their business day, in ascending order.
pub(crate) fn by_date(records: &[LineItemRecord]) -> BTreeMap<Date, Vec<&LineItemRecord>> {
    let mut out = BTreeMap::<_, Vec<_>>::new();
    for record in records {
        out.entry(record.date).or_default().push(record);
    }
    out
}

/// Return the quantity of `record` sold as `(combo, à la carte)`.
pub(crate) fn packaging_split(record: &LineItemRecord) -> (u64, u64) {
    match Packaging::of(&record.raw_label) {
        Some(Packaging::Combo) => (record.quantity, 0),
        Some(Packaging::ALaCarte) => (0, record.quantity),
        None => (0, 0),
    }
}
