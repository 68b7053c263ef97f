//! Pagination and run selection query parameters.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

pub const DEFAULT_LIMIT: i64 = 10;

/// `?limit=&offset=` for the run history.
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListRunsParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[validate(range(min = 0, message = "offset must not be negative"))]
    pub offset: Option<i64>,
}

impl ListRunsParams {
    /// Page size, 10 when absent.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }
}

/// `?analysis_id=` selecting a run; the latest run when absent.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct RunSelector {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub analysis_id: Option<i64>,
}

/// `?analysis_id=&threshold=` for the exceeding-threshold metric.
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ThresholdParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub analysis_id: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[validate(range(min = 0, message = "threshold must not be negative"))]
    pub threshold: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(limit: Option<i64>, offset: Option<i64>) -> ListRunsParams {
        ListRunsParams { limit, offset }
    }

    #[test]
    fn test_defaults() {
        let params = list(None, None);
        assert!(params.validate().is_ok());
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_limit_bounds() {
        assert!(list(Some(1), None).validate().is_ok());
        assert!(list(Some(100), None).validate().is_ok());
        assert!(list(Some(0), None).validate().is_err());
        assert!(list(Some(101), None).validate().is_err());
    }

    #[test]
    fn test_negative_offset_is_error() {
        assert!(list(None, Some(-1)).validate().is_err());
        assert!(list(None, Some(0)).validate().is_ok());
    }

    #[test]
    fn test_negative_threshold_is_error() {
        let params = ThresholdParams {
            analysis_id: None,
            threshold: Some(-5),
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_parse_from_strings() {
        let params: ThresholdParams =
            serde_json::from_str(r#"{"analysis_id": "3", "threshold": "15"}"#).unwrap();
        assert_eq!(params.analysis_id, Some(3));
        assert_eq!(params.threshold, Some(15));

        let empty: RunSelector = serde_json::from_str("{}").unwrap();
        assert!(empty.analysis_id.is_none());
    }

    #[test]
    fn test_non_numeric_is_rejected() {
        assert!(serde_json::from_str::<RunSelector>(r#"{"analysis_id": "abc"}"#).is_err());
    }
}
