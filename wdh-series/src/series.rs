use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr};

use anyhow::Context;

use crate::error::SeriesError;
use crate::observation::Observation;

/// Which of the three chart series a time series belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TsKey {
    /// The series for the selected date range; drives domain and cursor.
    Current,
    /// The same window one year earlier.
    Compare,
    /// Historical per-day-of-year median statistics.
    Median,
}

impl TsKey {
    pub const ALL: [TsKey; 3] = [TsKey::Current, TsKey::Compare, TsKey::Median];
}

impl fmt::Display for TsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TsKey::Current => write!(f, "current"),
            TsKey::Compare => write!(f, "compare"),
            TsKey::Median => write!(f, "median"),
        }
    }
}

impl FromStr for TsKey {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(TsKey::Current),
            "compare" => Ok(TsKey::Compare),
            "median" => Ok(TsKey::Median),
            _ => Err(SeriesError::BadTsKey(s.to_string())),
        }
    }
}

/// Date-range token for a request: an ISO 8601 duration or "custom".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "P7D")]
    P7D,
    #[serde(rename = "P30D")]
    P30D,
    #[serde(rename = "P1Y")]
    P1Y,
    #[serde(rename = "custom")]
    Custom,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::P7D => write!(f, "P7D"),
            Period::P30D => write!(f, "P30D"),
            Period::P1Y => write!(f, "P1Y"),
            Period::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for Period {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P7D" => Ok(Period::P7D),
            "P30D" => Ok(Period::P30D),
            "P1Y" => Ok(Period::P1Y),
            "custom" => Ok(Period::Custom),
            _ => Err(SeriesError::BadPeriod(s.to_string())),
        }
    }
}

/// Composite key identifying one time series: "{methodId}:{tsKey}:{period}".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub method_id: i64,
    pub ts_key: TsKey,
    pub period: Period,
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.method_id, self.ts_key, self.period)
    }
}

impl FromStr for SeriesKey {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let (Some(method), Some(ts_key), Some(period)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(SeriesError::BadSeriesKey(s.to_string()));
        };
        let method_id = method
            .parse::<i64>()
            .map_err(|_| SeriesError::BadSeriesKey(s.to_string()))?;
        Ok(SeriesKey {
            method_id,
            ts_key: ts_key.parse()?,
            period: period.parse()?,
        })
    }
}

/// A closed time interval, start <= end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        TimeRange { start, end }
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t <= self.end
    }

    /// Clamp a time into this range.
    pub fn clamp_time(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        t.max(self.start).min(self.end)
    }
}

/// Metadata for a measured variable (parameter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub oid: String,
    pub parameter_code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub unit: String,
}

/// A measurement technique. A variable can be measured by more than one
/// method, each producing a distinct time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    pub method_id: i64,
    #[serde(default)]
    pub description: String,
}

/// One fetched time series: ordered observations for a
/// (variable, method, period) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    pub variable_id: String,
    pub method_id: i64,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub end_time: Option<DateTime<Utc>>,
    /// Points in non-decreasing time order.
    #[serde(default)]
    pub points: Vec<Observation>,
}

impl TimeSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The last point carrying a finite value, if any. This is where the
    /// cursor parks when no explicit offset is set.
    pub fn last_finite_point(&self) -> Option<&Observation> {
        self.points.iter().rfind(|p| p.finite_value().is_some())
    }

    /// Extent of the actual point times (may be narrower than the
    /// requested query window).
    pub fn points_time_range(&self) -> Option<TimeRange> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some(TimeRange::new(first.date_time, last.date_time)),
            _ => None,
        }
    }
}

/// The full fetched slice of chart data. Built from the normalized JSON
/// payload of the data-fetch layer; replaced wholesale on refetch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesData {
    /// Series keyed by their composite key string ("69928:current:P7D").
    #[serde(default)]
    pub time_series: HashMap<String, TimeSeries>,
    /// Variables keyed by oid.
    #[serde(default)]
    pub variables: HashMap<String, Variable>,
    /// Methods keyed by method id.
    #[serde(default)]
    pub methods: HashMap<i64, Method>,
    /// Requested time window per "{tsKey}:{period}" request key.
    #[serde(default)]
    pub query_windows: HashMap<String, TimeRange>,
}

impl TimeSeriesData {
    /// Deserialize the normalized payload, validating series key strings.
    pub fn from_json(json: &str) -> anyhow::Result<TimeSeriesData> {
        let data: TimeSeriesData =
            serde_json::from_str(json).context("deserializing time-series payload")?;
        for key in data.time_series.keys() {
            if let Err(e) = key.parse::<SeriesKey>() {
                log::warn!("rejecting time-series payload: {e}");
                return Err(e).context("validating series keys");
            }
        }
        log::debug!(
            "normalized {} series, {} variables",
            data.time_series.len(),
            data.variables.len()
        );
        Ok(data)
    }

    pub fn series(&self, key: &SeriesKey) -> Option<&TimeSeries> {
        self.time_series.get(&key.to_string())
    }

    pub fn variable(&self, oid: &str) -> Option<&Variable> {
        self.variables.get(oid)
    }

    /// The requested window for a tsKey/period request, e.g. "current:P7D".
    pub fn query_window(&self, ts_key: TsKey, period: Period) -> Option<TimeRange> {
        self.query_windows.get(&format!("{ts_key}:{period}")).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ms(epoch_ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(epoch_ms).unwrap()
    }

    #[test]
    fn test_series_key_round_trip() {
        let key: SeriesKey = "69928:current:P7D".parse().unwrap();
        assert_eq!(key.method_id, 69928);
        assert_eq!(key.ts_key, TsKey::Current);
        assert_eq!(key.period, Period::P7D);
        assert_eq!(key.to_string(), "69928:current:P7D");
    }

    #[test]
    fn test_series_key_rejects_garbage() {
        assert!("69928:current".parse::<SeriesKey>().is_err());
        assert!("abc:current:P7D".parse::<SeriesKey>().is_err());
        assert!("69928:future:P7D".parse::<SeriesKey>().is_err());
        assert!("69928:current:P99D".parse::<SeriesKey>().is_err());
    }

    #[test]
    fn test_time_range() {
        let range = TimeRange::new(ms(1000), ms(5000));
        assert_eq!(range.duration(), TimeDelta::milliseconds(4000));
        let t = ms(9000);
        assert!(!range.contains(t));
        assert_eq!(range.clamp_time(t), range.end);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "timeSeries": {
                "69928:current:P7D": {
                    "variableId": "45807197",
                    "methodId": 69928,
                    "startTime": 1514980800000,
                    "endTime": 1514995200000,
                    "points": [
                        {"dateTime": 1514980800000, "value": 12.0, "qualifiers": ["P"]},
                        {"dateTime": 1514984400000, "value": null, "qualifiers": ["P", "ICE"]}
                    ]
                }
            },
            "variables": {
                "45807197": {
                    "oid": "45807197",
                    "parameterCode": "00060",
                    "name": "Streamflow",
                    "unit": "ft3/s"
                }
            },
            "methods": {"69928": {"methodId": 69928}},
            "queryWindows": {
                "current:P7D": {"start": 1514980800000, "end": 1514995200000}
            }
        }"#;
        let data = TimeSeriesData::from_json(json).unwrap();
        let key: SeriesKey = "69928:current:P7D".parse().unwrap();
        let series = data.series(&key).unwrap();
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.last_finite_point().unwrap().value, Some(12.0));
        assert_eq!(
            data.query_window(TsKey::Current, Period::P7D)
                .unwrap()
                .duration(),
            TimeDelta::milliseconds(14400000)
        );
        assert_eq!(data.variable("45807197").unwrap().parameter_code, "00060");
    }

    #[test]
    fn test_from_json_rejects_bad_series_key() {
        let json = r#"{"timeSeries": {"not-a-key": {"variableId": "v", "methodId": 1}}}"#;
        assert!(TimeSeriesData::from_json(json).is_err());
    }

    #[test]
    fn test_last_finite_point_skips_trailing_nulls() {
        let series = TimeSeries {
            variable_id: "v".to_string(),
            method_id: 1,
            start_time: None,
            end_time: None,
            points: vec![
                Observation::new(ms(0), Some(1.0)),
                Observation::new(ms(1000), Some(2.0)),
                Observation::new(ms(2000), None),
            ],
        };
        assert_eq!(series.last_finite_point().unwrap().value, Some(2.0));
    }
}
