//! Find out which daily exports exist.
use crate::parse;
use rayon::prelude::*;
use std::path::PathBuf;
use time::Date;

/// The collaborator holding the daily export files, addressed by file name.
pub trait FileSource: Sync {
    /// Return `true` if `file_name` exists, without reading it.
    fn exists(&self, file_name: &str) -> std::io::Result<bool>;
    /// Return the full text of `file_name`.
    fn fetch(&self, file_name: &str) -> std::io::Result<String>;
}

/// Export files stored as plain files in one directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectorySource { root: root.into() }
    }
}

impl FileSource for DirectorySource {
    fn exists(&self, file_name: &str) -> std::io::Result<bool> {
        let path = self.root.join(file_name);
        Ok(path.try_exists()? && path.is_file())
    }

    fn fetch(&self, file_name: &str) -> std::io::Result<String> {
        std::fs::read_to_string(self.root.join(file_name))
    }
}

/// Return every calendar day from `from` to `to`, both inclusive, which is empty if `to` is before `from`.
pub fn days(from: Date, to: Date) -> impl Iterator<Item = Date> {
    std::iter::successors((from <= to).then_some(from), move |day| {
        day.next_day().filter(|next| *next <= to)
    })
}

/// Return the names of all exports in `source` for the days from `from` to `to`, in chronological order.
///
/// All days are probed in parallel. A probe that fails counts as a missing file.
pub fn list_files(source: &impl FileSource, from: Date, to: Date) -> Vec<String> {
    let candidates: Vec<_> = days(from, to)
        .filter_map(|day| match parse::file_name(day) {
            Ok(file_name) => Some(file_name),
            Err(err) => {
                tracing::warn!(%day, %err, "Could not name the export of a day, skipping it");
                None
            }
        })
        .collect();
    let files: Vec<_> = candidates
        .into_par_iter()
        .filter(|file_name| match source.exists(file_name) {
            Ok(exists) => exists,
            Err(err) => {
                tracing::warn!(file_name = file_name.as_str(), %err, "Could not check for export, treating it as missing");
                false
            }
        })
        .collect();
    tracing::info!(%from, %to, files = files.len(), "Discovered exports");
    files
}
