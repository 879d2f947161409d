//! Index path derivation

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};

/// Compute `root/<year>/<month>/<basename(source)>`.
///
/// Year and month are written without zero padding, so July 2023 lands in
/// `2023/7`. The day does not take part in the location.
pub fn index_path(root: &Path, date: NaiveDate, source: &Path) -> PathBuf {
    root.join(date.year().to_string())
        .join(date.month().to_string())
        .join(source.file_name().unwrap_or_default())
}
