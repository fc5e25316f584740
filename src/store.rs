use crate::discover::{self, FileSource};
use crate::parse;
use crate::parse::LineItemRecord;
use crate::query::DateRange;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use time::{macros::date, Date, OffsetDateTime};

#[derive(Clone, Copy, Debug)]
pub struct Options {
    /// The first day exports may exist for.
    pub dataset_start: Date,
    /// The last day exports may exist for, or today if `None`.
    pub until: Option<Date>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            dataset_start: date!(2025-02-01),
            until: None,
        }
    }
}

/// Owns all records parsed from the exports of a [`FileSource`], and keeps what was expensive to obtain.
///
/// Exports are assumed to only ever be added for new days, so nothing is invalidated automatically.
/// Use [`reset()`](Self::reset()) to start over.
pub struct Store<S> {
    source: S,
    options: Options,
    /// Existing files per probed `(from, to)` window.
    listings: HashMap<(Date, Date), Vec<String>>,
    records: Option<Vec<LineItemRecord>>,
    business_days: Option<Vec<Date>>,
}

impl<S: FileSource> Store<S> {
    pub fn new(source: S, options: Options) -> Self {
        Store {
            source,
            options,
            listings: HashMap::new(),
            records: None,
            business_days: None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// Forget everything that was discovered or parsed so far.
    pub fn reset(&mut self) {
        self.listings.clear();
        self.records = None;
        self.business_days = None;
    }

    /// Return the names of all exports from `from` to `to` in chronological order, probing only the first
    /// time a window is asked for.
    pub fn list_files(&mut self, from: Date, to: Date) -> &[String] {
        let source = &self.source;
        self.listings
            .entry((from, to))
            .or_insert_with(|| discover::list_files(source, from, to))
    }

    /// Return all records of the dataset, reading and parsing the exports only on the first call.
    pub fn load_all(&mut self) -> &[LineItemRecord] {
        let records = match self.records.take() {
            Some(records) => records,
            None => {
                let files = self.dataset_files().to_vec();
                let records = load_files(&self.source, &files);
                tracing::info!(
                    files = files.len(),
                    records = records.len(),
                    "Loaded all exports"
                );
                records
            }
        };
        self.records.insert(records)
    }

    /// Return the records of all business days within `range`.
    ///
    /// Only the exports of the range are read, and the result is not cached.
    pub fn get_by_date_range(&mut self, range: DateRange) -> Vec<LineItemRecord> {
        let files: Vec<_> = self
            .dataset_files()
            .iter()
            .filter(|file_name| parse::business_day(file_name).map_or(false, |day| range.contains(day)))
            .cloned()
            .collect();
        if files.is_empty() {
            tracing::info!(start = %range.start(), end = %range.end(), "No exports within range");
            return Vec::new();
        }
        load_files(&self.source, &files)
    }

    /// Return all days an export exists for, in ascending order.
    pub fn business_days(&mut self) -> &[Date] {
        let days = match self.business_days.take() {
            Some(days) => days,
            None => self
                .dataset_files()
                .iter()
                .filter_map(|file_name| parse::business_day(file_name))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        };
        self.business_days.insert(days)
    }

    /// Return the last `count` business days, or all of them if there are fewer.
    pub fn recent_business_days(&mut self, count: usize) -> &[Date] {
        let days = self.business_days();
        &days[days.len().saturating_sub(count)..]
    }

    /// Return the records of the last `count` business days.
    pub fn recent_records(&mut self, count: usize) -> Vec<LineItemRecord> {
        let days = self.recent_business_days(count).to_vec();
        self.load_all()
            .iter()
            .filter(|record| days.binary_search(&record.date).is_ok())
            .cloned()
            .collect()
    }

    /// Return the sorted names of all products ever sold, leaving out totals and subtotals.
    pub fn all_canonical_products(&mut self) -> Vec<String> {
        self.load_all()
            .iter()
            .filter(|record| record.is_item() && !record.product.is_empty())
            .map(|record| record.product.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(ToOwned::to_owned)
            .collect()
    }

    fn dataset_files(&mut self) -> &[String] {
        let until = self
            .options
            .until
            .unwrap_or_else(|| OffsetDateTime::now_utc().date());
        self.list_files(self.options.dataset_start, until)
    }
}

/// Fetch and parse `files` in parallel, concatenating their records in the order of `files`.
fn load_files(source: &impl FileSource, files: &[String]) -> Vec<LineItemRecord> {
    files
        .par_iter()
        .map(|file_name| load_file(source, file_name))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

fn load_file(source: &impl FileSource, file_name: &str) -> Vec<LineItemRecord> {
    match source.fetch(file_name) {
        Ok(text) => parse(&text, file_name),
        Err(err) => {
            tracing::warn!(file_name, %err, "Could not read export, skipping it");
            Vec::new()
        }
    }
}
