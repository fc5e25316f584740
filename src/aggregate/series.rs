use crate::aggregate::by_date;
use crate::catalog::{Catalog, Metric};
use crate::parse::LineItemRecord;
use std::collections::BTreeMap;
use time::Date;

/// The values of all compared products on one business day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPoint {
    pub date: Date,
    /// The value per product, which is its amount or its quantity as the catalog demands.
    pub values: BTreeMap<String, i64>,
}

/// Produce one series per product in `products` across all business days of `records`.
///
/// Days on which a product wasn't sold have a value of `0` for it.
pub fn product_series(
    records: &[LineItemRecord],
    products: &[impl AsRef<str>],
    catalog: &Catalog,
) -> Vec<SeriesPoint> {
    let metrics: BTreeMap<&str, Metric> = products
        .iter()
        .map(|product| (product.as_ref(), catalog.metric_of(product.as_ref())))
        .collect();

    by_date(records)
        .into_iter()
        .map(|(date, records)| {
            let mut values: BTreeMap<String, i64> = metrics
                .keys()
                .map(|product| ((*product).to_owned(), 0))
                .collect();
            for record in records.into_iter().filter(|record| record.is_item()) {
                let Some(metric) = metrics.get(record.product.as_str()) else {
                    continue;
                };
                if let Some(value) = values.get_mut(&record.product) {
                    *value = value.saturating_add(match metric {
                        Metric::Revenue => record.amount,
                        Metric::Quantity => i64::try_from(record.quantity).unwrap_or(i64::MAX),
                    });
                }
            }
            SeriesPoint { date, values }
        })
        .collect()
}
