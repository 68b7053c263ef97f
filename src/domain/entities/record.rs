//! Input and cleaned record entities.

use indexmap::IndexMap;
use serde::Serialize;

/// Header of the city column in the input file.
pub const CITY_COLUMN: &str = "City";
/// Header of the region column in the input file.
pub const REGION_COLUMN: &str = "Region";
/// Header of the site count column in the input file.
pub const SITES_COLUMN: &str = "Number_of_Galamsay_Sites";

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 3] = [CITY_COLUMN, REGION_COLUMN, SITES_COLUMN];

/// One untyped input row, keyed by column header.
///
/// Raw records only live between the CSV reader and the validator. Columns
/// keep the order in which they appeared in the header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawRecord {
    /// 1-based data line number (the header is line 0).
    pub line: u64,
    pub fields: IndexMap<String, String>,
}

impl RawRecord {
    /// Creates an empty raw record for the given data line.
    pub fn new(line: u64) -> Self {
        Self {
            line,
            fields: IndexMap::new(),
        }
    }

    /// Builds a raw record from `(column, value)` pairs.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let raw = RawRecord::from_pairs(1, [("City", "Kumasi"), ("Region", "Ashanti")]);
    /// assert_eq!(raw.get("City"), "Kumasi");
    /// ```
    pub fn from_pairs<K, V>(line: u64, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            line,
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Convenience constructor for the three standard columns.
    pub fn galamsay(line: u64, city: &str, region: &str, sites: &str) -> Self {
        Self::from_pairs(
            line,
            [
                (CITY_COLUMN, city),
                (REGION_COLUMN, region),
                (SITES_COLUMN, sites),
            ],
        )
    }

    /// Returns the value of `column`, or an empty string when the row lacks it.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }
}

/// A record that passed every cleaning rule.
///
/// `city` and `region` are trimmed and non-empty; `site_count` is never
/// negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanRecord {
    pub city: String,
    pub region: String,
    pub site_count: i64,
}

impl CleanRecord {
    pub fn new(city: impl Into<String>, region: impl Into<String>, site_count: i64) -> Self {
        Self {
            city: city.into(),
            region: region.into(),
            site_count,
        }
    }
}
