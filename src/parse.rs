use crate::normalize::{is_category_subtotal_label, is_grand_total_label};
use time::Date;

/// The extension of every daily export file.
pub const EXTENSION: &str = "csv";

/// One row of a daily point-of-sale export.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LineItemRecord {
    /// The business day, as taken from the name of the file the row was read from.
    #[serde(with = "crate::slash_date")]
    pub date: Date,
    /// The category of the closest subtotal row above this one, or empty if there was none yet.
    pub category: String,
    /// The canonical name of the product.
    pub product: String,
    /// The label as it appeared in the export, with whitespace runs collapsed.
    pub raw_label: String,
    pub quantity: u64,
    pub amount: i64,
}

/// The role a row plays within its export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// A product that was sold.
    Item,
    /// The total of one category.
    CategorySubtotal,
    /// The total of the whole day.
    GrandTotal,
}

impl LineItemRecord {
    pub fn kind(&self) -> RowKind {
        if is_grand_total_label(&self.product) {
            RowKind::GrandTotal
        } else if is_category_subtotal_label(&self.product) {
            RowKind::CategorySubtotal
        } else {
            RowKind::Item
        }
    }

    /// Return `true` if this row is a sold product and not a total of any kind.
    pub fn is_item(&self) -> bool {
        self.kind() == RowKind::Item
    }
}

/// The `YYYYMMDD` key in the name of every export, which sorts like the date itself.
static DATE_KEY: &[time::format_description::FormatItem<'static>] =
    time::macros::format_description!("[year][month][day]");

/// Return the name of the export file for the business day `date`, like `20250201.csv`.
pub fn file_name(date: Date) -> Result<String, time::error::Format> {
    Ok(format!("{}.{EXTENSION}", date.format(DATE_KEY)?))
}

/// Return the `YYYYMMDD` part of an export `file_name`, or `None` if it doesn't follow the naming scheme.
pub fn date_key(file_name: &str) -> Option<&str> {
    let name = file_name.rsplit('/').next().unwrap_or(file_name);
    let stem = name
        .strip_suffix(EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))?;
    let key = stem.get(stem.len().checked_sub(8)?..)?;
    key.bytes().all(|b| b.is_ascii_digit()).then_some(key)
}

/// Return the business day encoded in an export `file_name`.
pub fn business_day(file_name: &str) -> Option<Date> {
    Date::parse(date_key(file_name)?, DATE_KEY).ok()
}

pub(crate) mod function {
    use crate::normalize::{collapse_whitespace, normalize, subtotal_category};
    use crate::parse::{business_day, LineItemRecord};
    use time::Date;

    /// Parse the `text` of the export named `file_name` into one record per data row.
    ///
    /// The first line is a header. Each data row is `<unused>,<label>,<quantity>,<amount>`, and subtotal rows
    /// set the category of all rows that follow them. Subtotal and grand-total rows are kept.
    /// Fields are split on every comma, quotes have no meaning.
    ///
    /// Nothing in here fails: a file name without a business day yields no records, rows with too few fields
    /// are skipped and numbers that can't be read count as `0`. Each of these is logged.
    pub fn parse(text: &str, file_name: &str) -> Vec<LineItemRecord> {
        let Some(date) = business_day(file_name) else {
            tracing::error!(file_name, "Export file name does not encode a business day, ignoring it");
            return Vec::new();
        };
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .from_reader(text.as_bytes());

        let (_category, records) = csv.records().fold(
            (String::new(), Vec::new()),
            |(category, mut records), row| {
                let row = match row {
                    Ok(row) => row,
                    Err(err) => {
                        tracing::warn!(file_name, %err, "Skipping unreadable row");
                        return (category, records);
                    }
                };
                match parse_row(&row, date, category) {
                    Ok((category, record)) => {
                        records.push(record);
                        (category, records)
                    }
                    Err(category) => {
                        if row.iter().any(|field| !field.trim().is_empty()) {
                            tracing::warn!(
                                file_name,
                                line = row.position().map(|pos| pos.line()),
                                fields = row.len(),
                                "Skipping row with less than 4 fields"
                            );
                        }
                        (category, records)
                    }
                }
            },
        );
        tracing::debug!(file_name, records = records.len(), "Parsed export");
        records
    }

    /// Turn `row` into a record, returning the category that is current after it.
    /// On error, `category` is handed back unchanged.
    fn parse_row(
        row: &csv::StringRecord,
        date: Date,
        category: String,
    ) -> Result<(String, LineItemRecord), String> {
        let (Some(label), Some(quantity), Some(amount)) = (row.get(1), row.get(2), row.get(3)) else {
            return Err(category);
        };
        let raw_label = collapse_whitespace(label);
        let product = normalize(&raw_label);
        let category = subtotal_category(&product)
            .map(ToOwned::to_owned)
            .unwrap_or(category);
        let record = LineItemRecord {
            date,
            category: category.clone(),
            product,
            raw_label,
            quantity: parse_int(quantity).try_into().unwrap_or(0),
            amount: parse_int(amount),
        };
        Ok((category, record))
    }

    /// Read the leading integer of `field`, ignoring anything that follows it, or `0` if there is none.
    fn parse_int(field: &str) -> i64 {
        let field = field.trim();
        let digits_end = field
            .char_indices()
            .find(|&(idx, c)| !(c.is_ascii_digit() || (idx == 0 && (c == '-' || c == '+'))))
            .map_or(field.len(), |(idx, _)| idx);
        field[..digits_end].parse().unwrap_or(0)
    }
}
