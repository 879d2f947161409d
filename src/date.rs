//! Filename date extraction
//!
//! A file is indexable when its base name contains a run of exactly eight
//! ASCII digits followed by a non-digit character, e.g. `report-20230714-final.csv`.
//! The token is read as `YYYYMMDD` first and as `DDMMYYYY` when that is not a
//! real calendar date.

use std::path::Path;

use chrono::NaiveDate;

use crate::error::{IndexError, Result};

/// Length of a date token
const TOKEN_LEN: usize = 8;

/// `YYYYMMDD`, tried first
const YEAR_FIRST: &str = "%Y%m%d";
/// `DDMMYYYY`, tried when the token is not a date as `YYYYMMDD`
const DAY_FIRST: &str = "%d%m%Y";

/// Find the first run of exactly eight ASCII digits that is followed by a
/// non-digit byte.
///
/// Shorter or longer digit runs are skipped as a whole, and a run that ends
/// the name has no separator, so neither matches. Works on raw bytes so
/// names that are not valid UTF-8 still yield their token.
pub fn find_date_token(name: &[u8]) -> Option<&str> {
    let mut i = 0;
    while i < name.len() {
        if !name[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < name.len() && name[i].is_ascii_digit() {
            i += 1;
        }
        if i - start == TOKEN_LEN && i < name.len() {
            return std::str::from_utf8(&name[start..i]).ok();
        }
    }
    None
}

/// Resolve a date token, trying `YYYYMMDD` then `DDMMYYYY`.
///
/// The error carries the parse failure of the last (`DDMMYYYY`) attempt.
pub fn parse_date_token(token: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(token, YEAR_FIRST)
        .or_else(|_| NaiveDate::parse_from_str(token, DAY_FIRST))
        .map_err(|source| IndexError::InvalidDate {
            token: token.to_string(),
            source,
        })
}

/// Extract the date from the base name of `path`.
///
/// Returns `Ok(None)` when the name carries no date token. Directory
/// components never contribute a date.
pub fn extract_date(path: &Path) -> Result<Option<NaiveDate>> {
    let Some(name) = path.file_name() else {
        return Ok(None);
    };
    match find_date_token(name.as_encoded_bytes()) {
        Some(token) => parse_date_token(token).map(Some),
        None => Ok(None),
    }
}
