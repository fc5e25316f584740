//! Validate what callers ask for before it reaches the pipeline.
use time::Date;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("'{input}' is not a date of the form YYYY-MM-DD or YYYY/MM/DD")]
    InvalidDate { input: String },
    #[error("The end date {end} lies before the start date {start}")]
    InvalidRange { start: Date, end: Date },
}

/// An inclusive range of calendar days whose end is never before its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Result<Self, Error> {
        if end < start {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(DateRange { start, end })
    }

    /// Parse both ends with [`parse_date()`] and validate them.
    pub fn parse(start: &str, end: &str) -> Result<Self, Error> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Parse `input` as `YYYY-MM-DD` or `YYYY/MM/DD`, with month and day optionally lacking their leading zero.
pub fn parse_date(input: &str) -> Result<Date, Error> {
    static DASHED: &[time::format_description::FormatItem<'static>] =
        time::macros::format_description!("[year]-[month padding:none]-[day padding:none]");
    static SLASHED: &[time::format_description::FormatItem<'static>] =
        time::macros::format_description!("[year]/[month padding:none]/[day padding:none]");

    let trimmed = input.trim();
    Date::parse(trimmed, DASHED)
        .or_else(|_| Date::parse(trimmed, SLASHED))
        .map_err(|_| Error::InvalidDate {
            input: input.to_owned(),
        })
}
