//! CSV text helpers shared by every store backend.
//!
//! The file is plain text: a fixed header line followed by one row per visit.
//! Counting and "last entry" both work on raw text so that rows appended
//! verbatim through `/log-click` are treated exactly like formatted ones.

use crate::store::types::Record;

/// First line of every log file. Never counted as data.
pub const HEADER: &str = "Date,User Agent,IP";

/// Format a record as one newline-terminated CSV row.
///
/// Field order is fixed: timestamp, quoted user agent, IP. Embedded quotes
/// in the user agent are doubled so the row always parses as three fields.
pub fn format_row(record: &Record) -> String {
    format!(
        "{},\"{}\",{}\n",
        record.iso_timestamp(),
        quote_inner(&record.user_agent),
        bare_field(&record.ip),
    )
}

/// Number of data rows in `contents`: non-blank lines minus the header.
pub fn count_records(contents: &str) -> usize {
    non_blank_lines(contents).count().saturating_sub(1)
}

/// The last data row in `contents`, or `None` when only the header (or
/// nothing at all) is present.
pub fn last_record(contents: &str) -> Option<&str> {
    if count_records(contents) == 0 {
        return None;
    }
    non_blank_lines(contents).last()
}

fn non_blank_lines(contents: &str) -> impl Iterator<Item = &str> {
    contents.lines().filter(|line| !line.trim().is_empty())
}

fn quote_inner(value: &str) -> String {
    strip_newlines(value).replace('"', "\"\"")
}

// IPs are written bare; anything that would split the row gets quoted.
fn bare_field(value: &str) -> String {
    let value = strip_newlines(value);
    if value.contains(',') || value.contains('"') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value
    }
}

fn strip_newlines(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}
