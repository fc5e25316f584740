use crate::aggregate::packaging_split;
use crate::parse::LineItemRecord;
use std::collections::BTreeMap;

/// What one canonical product sold over a record set.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct ProductAggregate {
    pub product: String,
    pub amount: i64,
    pub quantity: u64,
    /// The quantity sold as part of a combo.
    pub combo_quantity: u64,
    /// The quantity sold on its own. Items without packaging marker are neither combo nor à la carte.
    pub a_la_carte_quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct ProductSummary {
    pub product: String,
    pub amount: i64,
    pub quantity: u64,
    /// The rounded amount per unit, or `0` if nothing was sold.
    pub average_price: i64,
    pub combo_quantity: u64,
    pub a_la_carte_quantity: u64,
}

impl ProductAggregate {
    fn add(&mut self, record: &LineItemRecord) {
        self.amount = self.amount.saturating_add(record.amount);
        self.quantity = self.quantity.saturating_add(record.quantity);
        let (combo, a_la_carte) = packaging_split(record);
        self.combo_quantity = self.combo_quantity.saturating_add(combo);
        self.a_la_carte_quantity = self.a_la_carte_quantity.saturating_add(a_la_carte);
    }
}

/// Sum up the item rows of `records` per canonical product, ordered by product name.
pub fn product_aggregates(records: &[LineItemRecord]) -> Vec<ProductAggregate> {
    let mut by_product = BTreeMap::<&str, ProductAggregate>::new();
    for record in records.iter().filter(|record| record.is_item()) {
        by_product
            .entry(record.product.as_str())
            .or_insert_with(|| ProductAggregate {
                product: record.product.clone(),
                ..Default::default()
            })
            .add(record);
    }
    by_product.into_values().collect()
}

/// Return the `n` products with the highest amount, best first.
pub fn top_products(records: &[LineItemRecord], n: usize) -> Vec<ProductAggregate> {
    let mut products = product_aggregates(records);
    products.sort_by(|a, b| b.amount.cmp(&a.amount));
    products.truncate(n);
    products
}

pub fn product_summary(records: &[LineItemRecord], product: &str) -> ProductSummary {
    let mut total = ProductAggregate {
        product: product.to_owned(),
        ..Default::default()
    };
    for record in records
        .iter()
        .filter(|record| record.is_item() && record.product == product)
    {
        total.add(record);
    }
    ProductSummary {
        average_price: if total.quantity == 0 {
            0
        } else {
            (total.amount as f64 / total.quantity as f64).round() as i64
        },
        product: total.product,
        amount: total.amount,
        quantity: total.quantity,
        combo_quantity: total.combo_quantity,
        a_la_carte_quantity: total.a_la_carte_quantity,
    }
}
