//! The menu as configured by the shop: which category a product belongs to, and how it is to be tracked.
//!
//! Products are looked up by their canonical name. Names that aren't listed explicitly fall through to
//! keyword rules, tried in order, with the first matching one deciding about the category.
use crate::normalize::STUDENT_EXTRA_NOODLE;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to open catalog file for reading")]
    OpenFile(#[from] std::io::Error),
    #[error("Could not decode the product catalog")]
    Decode(#[from] ron::de::SpannedError),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Operation {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Statement {
    pub operation: Operation,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rule {
    /// Any statement has to be true for a match.
    pub statements: Vec<Statement>,
    /// The category to assign if the rule matches.
    pub category: String,
}

/// What to chart for a product over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Metric {
    /// The amount of money it made.
    Revenue,
    /// How many were sold, for products that are never priced on their own.
    Quantity,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// All categories in the order they appear on the menu.
    pub categories: Vec<String>,
    /// Canonical product names mapped to their category.
    pub products: BTreeMap<String, String>,
    /// Rules for products that aren't listed in `products`.
    pub rules: Vec<Rule>,
    /// Products to track by quantity instead of by revenue.
    pub quantity_tracked: BTreeSet<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog {
            categories: Vec::new(),
            products: BTreeMap::new(),
            rules: Vec::new(),
            quantity_tracked: [STUDENT_EXTRA_NOODLE.to_owned()].into(),
        }
    }
}

/// Products grouped by their category.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProductGroups {
    /// Categories in menu order, followed by categories the menu doesn't list, each with its sorted products.
    pub by_category: Vec<(String, Vec<String>)>,
    /// Products no category could be found for.
    pub unclassified: Vec<String>,
}

impl Statement {
    pub fn matches(&self, product: &str) -> bool {
        let value = self.value.as_str();
        match self.operation {
            Operation::Equals => product == value,
            Operation::Contains => product.contains(value),
            Operation::StartsWith => product.starts_with(value),
            Operation::EndsWith => product.ends_with(value),
        }
    }
}

impl Rule {
    pub fn matches(&self, product: &str) -> bool {
        self.statements.iter().any(|stm| stm.matches(product))
    }
}

impl Catalog {
    /// Read a catalog in RON format from the file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(ron::de::from_reader(std::fs::File::open(path)?)?)
    }

    /// Return the category of the canonical `product`, or `None` if neither the table nor a rule knows it.
    pub fn category_of(&self, product: &str) -> Option<&str> {
        self.products.get(product).map(String::as_str).or_else(|| {
            self.rules
                .iter()
                .find(|rule| rule.matches(product))
                .map(|rule| rule.category.as_str())
        })
    }

    pub fn metric_of(&self, product: &str) -> Metric {
        if self.quantity_tracked.contains(product) {
            Metric::Quantity
        } else {
            Metric::Revenue
        }
    }

    /// Sort `products` into their categories.
    pub fn group_products<'a>(&self, products: impl IntoIterator<Item = &'a str>) -> ProductGroups {
        let mut by_category = BTreeMap::<&str, BTreeSet<&str>>::new();
        let mut unclassified = BTreeSet::new();
        for product in products {
            match self.category_of(product) {
                Some(category) => {
                    by_category.entry(category).or_default().insert(product);
                }
                None => {
                    tracing::warn!(product, "Product is not in the catalog");
                    unclassified.insert(product);
                }
            }
        }

        let mut groups = Vec::with_capacity(by_category.len());
        for category in &self.categories {
            if let Some(products) = by_category.remove(category.as_str()) {
                groups.push((category.clone(), to_owned(products)));
            }
        }
        groups.extend(
            by_category
                .into_iter()
                .map(|(category, products)| (category.to_owned(), to_owned(products))),
        );
        ProductGroups {
            by_category: groups,
            unclassified: to_owned(unclassified),
        }
    }
}

fn to_owned(names: BTreeSet<&str>) -> Vec<String> {
    names.into_iter().map(ToOwned::to_owned).collect()
}
