//! Row selection: which input rows are crawled and why the others are not

use super::InputTable;
use crate::model::Target;
use std::fmt;

const NAME_COLUMN: usize = 0;
const WEBSITE_COLUMN: usize = 1;
const EMAIL_COLUMN: usize = 2;
const REQUIRED_COLUMNS: usize = 3;

/// Why a row was left out of the batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoWebsiteOrEmail,
    NoWebsite,
    NoEmail,
    Other,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoWebsiteOrEmail => "no website or email",
            Self::NoWebsite => "no website",
            Self::NoEmail => "no email (website only)",
            Self::Other => "skipped",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds crawl targets from the table, in row order
///
/// A row is selected when it has at least three columns and either a
/// non-empty website or an email that is neither empty nor `placeholder`.
pub fn select_targets(table: &InputTable, placeholder: &str) -> Vec<Target> {
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.len() >= REQUIRED_COLUMNS)
        .filter_map(|(index, row)| {
            let website = row[WEBSITE_COLUMN].trim();
            let email = row[EMAIL_COLUMN].trim();
            let usable_email = !email.is_empty() && email != placeholder;

            if website.is_empty() && !usable_email {
                return None;
            }

            Some(Target::new(index, row[NAME_COLUMN].trim(), website, email))
        })
        .collect()
}

/// Explains why a row that produced no target was skipped
///
/// Here the placeholder counts as missing for both columns.
pub fn skip_reason(website: &str, email: &str, placeholder: &str) -> SkipReason {
    let present = |value: &str| {
        let value = value.trim();
        !value.is_empty() && value != placeholder
    };

    match (present(website), present(email)) {
        (false, false) => SkipReason::NoWebsiteOrEmail,
        (false, true) => SkipReason::NoWebsite,
        (true, false) => SkipReason::NoEmail,
        (true, true) => SkipReason::Other,
    }
}
