//! Dimension and metric normalization

use crate::input::ListInput;

/// Ordered dimension and metric codes. Codes are checked by the reporting
/// engine, not here.
pub fn normalize_fields(dimensions: ListInput, metrics: ListInput) -> (Vec<String>, Vec<String>) {
    (dimensions.into_items(), metrics.into_items())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_input_is_unchanged() {
        let (dimensions, metrics) =
            normalize_fields(vec!["a", "b"].into(), vec!["METRIC_CLICKS"].into());
        assert_eq!(dimensions, vec!["a", "b"]);
        assert_eq!(metrics, vec!["METRIC_CLICKS"]);
    }

    #[test]
    fn test_string_input_is_split() {
        let (dimensions, metrics) = normalize_fields(
            "a, b".into(),
            "METRIC_IMPRESSIONS,METRIC_CLICKS , METRIC_CTR".into(),
        );
        assert_eq!(dimensions, vec!["a", "b"]);
        assert_eq!(
            metrics,
            vec!["METRIC_IMPRESSIONS", "METRIC_CLICKS", "METRIC_CTR"]
        );
    }

    #[test]
    fn test_idempotent_on_normalized_output() {
        let (once, _) = normalize_fields("x , y".into(), "m".into());
        let (twice, _) = normalize_fields(once.clone().into(), "m".into());
        assert_eq!(once, twice);
    }
}
