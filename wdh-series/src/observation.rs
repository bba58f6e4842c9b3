use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// A single sensor observation as delivered by the data-fetch layer.
///
/// Wire format (normalized JSON): `dateTime` is an epoch-millisecond
/// timestamp, `value` may be `null` for masked readings, and `qualifiers`
/// carries approval/quality codes (e.g. "P", "A", "ICE"). Observations are
/// immutable once fetched; a refetch replaces the whole series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date_time: DateTime<Utc>,
    pub value: Option<f64>,
    #[serde(default)]
    pub qualifiers: Vec<String>,
    /// Preformatted display label ("<value> <unit>"), if one was built upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Observation {
    pub fn new(date_time: DateTime<Utc>, value: Option<f64>) -> Self {
        Observation {
            date_time,
            value,
            qualifiers: Vec::new(),
            label: None,
        }
    }

    /// The observation value, but only when present and finite.
    /// NaN and infinities are filtered at every aggregation boundary.
    pub fn finite_value(&self) -> Option<f64> {
        self.value.filter(|v| v.is_finite())
    }

    /// Time distance of this observation from a reference start time.
    pub fn offset_from(&self, start: DateTime<Utc>) -> TimeDelta {
        self.date_time - start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_finite_value_filters_non_finite() {
        let t = Utc.timestamp_millis_opt(1514980800000).unwrap();
        assert_eq!(Observation::new(t, Some(12.5)).finite_value(), Some(12.5));
        assert_eq!(Observation::new(t, None).finite_value(), None);
        assert_eq!(Observation::new(t, Some(f64::NAN)).finite_value(), None);
        assert_eq!(Observation::new(t, Some(f64::INFINITY)).finite_value(), None);
    }

    #[test]
    fn test_deserialize_epoch_millis() {
        let json = r#"{"dateTime": 1514980800000, "value": null, "qualifiers": ["P", "ICE"]}"#;
        let obs: Observation = serde_json::from_str(json).unwrap();
        assert_eq!(obs.date_time.timestamp_millis(), 1514980800000);
        assert_eq!(obs.value, None);
        assert_eq!(obs.qualifiers, vec!["P", "ICE"]);
    }

    #[test]
    fn test_offset_from() {
        let start = Utc.timestamp_millis_opt(1514980800000).unwrap();
        let obs = Observation::new(Utc.timestamp_millis_opt(1514995200000).unwrap(), Some(16.0));
        assert_eq!(obs.offset_from(start), TimeDelta::milliseconds(14400000));
    }
}
