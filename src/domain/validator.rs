//! Per-record cleaning rules.
//!
//! Rules run in a fixed order and the first failure wins:
//!
//! 1. City must be non-empty and not the `"unknown city"` sentinel
//! 2. Region must be non-empty and not the `"invalid region"` sentinel
//! 3. Site count must parse as a base-10 integer
//! 4. Site count must not be negative
//! 5. Counts above [`OUTLIER_THRESHOLD`] are accepted with a warning
//!
//! [`validate`] is pure. [`clean_records`] runs it over a whole input and
//! returns the surviving records together with an ordered [`Diagnostics`] log
//! of every rejection and warning.

use serde::Serialize;
use std::fmt;

use crate::domain::entities::{CITY_COLUMN, CleanRecord, REGION_COLUMN, RawRecord, SITES_COLUMN};

/// Counts above this value are flagged as possible outliers.
pub const OUTLIER_THRESHOLD: i64 = 200;

const UNKNOWN_CITY: &str = "unknown city";
const INVALID_REGION: &str = "invalid region";

/// Why a record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    #[error("invalid city")]
    InvalidCity,

    #[error("invalid region")]
    InvalidRegion,

    #[error("site count is not a number")]
    NotANumber,

    #[error("site count is negative")]
    NegativeCount,
}

/// A rejected input row and the reason it was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct RejectionReason {
    pub kind: RejectionKind,
    pub raw_input: RawRecord,
    pub message: String,
}

impl RejectionReason {
    fn new(kind: RejectionKind, raw_input: RawRecord, message: String) -> Self {
        Self {
            kind,
            raw_input,
            message,
        }
    }
}

/// Advisory notice for an accepted record with an unusually high count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlierWarning {
    pub line: u64,
    pub record: CleanRecord,
    pub message: String,
}

/// Successful validation outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated {
    pub record: CleanRecord,
    pub warning: Option<OutlierWarning>,
}

/// Validates a single raw row.
///
/// # Errors
///
/// Returns a [`RejectionReason`] carrying the raw input when any rule fails.
pub fn validate(raw: RawRecord) -> Result<Validated, RejectionReason> {
    let city = raw.get(CITY_COLUMN).trim().to_string();
    let region = raw.get(REGION_COLUMN).trim().to_string();
    let sites = raw.get(SITES_COLUMN).trim().to_string();

    if city.is_empty() || city.to_lowercase() == UNKNOWN_CITY {
        let message = format!("Invalid city: '{city}'");
        return Err(RejectionReason::new(RejectionKind::InvalidCity, raw, message));
    }

    if region.is_empty() || region.to_lowercase() == INVALID_REGION {
        let message = format!("Invalid region for city {city}: '{region}'");
        return Err(RejectionReason::new(RejectionKind::InvalidRegion, raw, message));
    }

    let site_count = match sites.parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            let message = format!("Invalid sites count for {city}: '{sites}' is not a number");
            return Err(RejectionReason::new(RejectionKind::NotANumber, raw, message));
        }
    };

    if site_count < 0 {
        let message = format!("Negative sites count for {city}: {site_count}");
        return Err(RejectionReason::new(RejectionKind::NegativeCount, raw, message));
    }

    let record = CleanRecord::new(city, region, site_count);

    let warning = (site_count > OUTLIER_THRESHOLD).then(|| OutlierWarning {
        line: raw.line,
        message: format!(
            "Possible outlier for {}: {} sites",
            record.city, record.site_count
        ),
        record: record.clone(),
    });

    Ok(Validated { record, warning })
}

/// One entry of the cleaning log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "severity", rename_all = "snake_case")]
pub enum Diagnostic {
    Rejected(RejectionReason),
    Warning(OutlierWarning),
}

impl Diagnostic {
    /// Input line the entry refers to.
    pub fn line(&self) -> u64 {
        match self {
            Diagnostic::Rejected(r) => r.raw_input.line,
            Diagnostic::Warning(w) => w.line,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Diagnostic::Rejected(r) => &r.message,
            Diagnostic::Warning(w) => &w.message,
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Diagnostic::Warning(_))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Rejected(r) => write!(f, "line {}: {}", r.raw_input.line, r.message),
            Diagnostic::Warning(w) => write!(f, "line {}: WARNING: {}", w.line, w.message),
        }
    }
}

/// Ordered, append-only log of rejections and warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rejected_count(&self) -> usize {
        self.entries.iter().filter(|d| !d.is_warning()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.entries.iter().filter(|d| d.is_warning()).count()
    }

    /// Rejections only, in input order.
    pub fn rejections(&self) -> impl Iterator<Item = &RejectionReason> {
        self.entries.iter().filter_map(|d| match d {
            Diagnostic::Rejected(r) => Some(r),
            Diagnostic::Warning(_) => None,
        })
    }

    /// First `limit` entries, for reporting.
    pub fn samples(&self, limit: usize) -> &[Diagnostic] {
        &self.entries[..self.entries.len().min(limit)]
    }
}

/// Records that survived cleaning plus the log produced while cleaning them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanedBatch {
    pub records: Vec<CleanRecord>,
    pub diagnostics: Diagnostics,
}

/// Validates every raw row in order.
///
/// Rejected rows are excluded; outliers are kept. Input order of the
/// surviving records is preserved.
pub fn clean_records(raw: impl IntoIterator<Item = RawRecord>) -> CleanedBatch {
    let mut batch = CleanedBatch::default();

    for row in raw {
        match validate(row) {
            Ok(Validated { record, warning }) => {
                if let Some(warning) = warning {
                    batch.diagnostics.push(Diagnostic::Warning(warning));
                }
                batch.records.push(record);
            }
            Err(rejection) => batch.diagnostics.push(Diagnostic::Rejected(rejection)),
        }
    }

    batch
}
