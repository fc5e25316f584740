#![deny(rust_2018_idioms)]
//! Sales analytics over the daily exports of a point-of-sale system.
//!
//! Exports are discovered per calendar day, parsed into [`LineItemRecord`]s with canonical product names,
//! kept by a [`Store`], and folded into the views of the [`aggregate`] module.

use time::Date;

pub mod normalize;
pub use normalize::normalize;

pub mod parse;
pub use parse::function::parse;
pub use parse::LineItemRecord;

pub mod discover;
pub use discover::{list_files, DirectorySource, FileSource};

pub mod store;
pub use store::Store;

pub mod aggregate;
pub mod catalog;
pub mod query;

time::serde::format_description!(slash_date, Date, "[year]/[month]/[day]");
