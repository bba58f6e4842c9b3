//! Median daily statistics in USGS RDB format.
//!
//! RDB is tab-separated text with `#` comment lines, a header row, and a
//! column-format row ("5s", "15d", ...) directly below the header that
//! carries no data. Median statistics give one value per (month, day) of
//! the year; they are projected onto concrete dates inside the displayed
//! time window for use as a comparison baseline.

use chrono::{Datelike, NaiveDate, NaiveTime};
use csv::ReaderBuilder;
use std::collections::HashMap;

use crate::error::{Result, SeriesError};
use crate::observation::Observation;
use crate::series::TimeRange;

/// A single median statistic: the 50th-percentile value for one day of the
/// year, across the site's period of record.
#[derive(Debug, Clone, PartialEq)]
pub struct MedianDatum {
    pub month: u32,
    pub day: u32,
    pub value: f64,
}

/// Parse RDB text into one field map per data row.
pub fn parse_rdb(rdb: &str) -> Result<Vec<HashMap<String, String>>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .comment(Some(b'#'))
        .flexible(true)
        .from_reader(rdb.as_bytes());
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // The column-format row sits directly below the header.
        if i == 0 {
            continue;
        }
        let row: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Parse RDB median-statistics text into `MedianDatum`s, using the
/// `month_nu`, `day_nu`, and `p50_va` columns.
pub fn parse_median_statistics(rdb: &str) -> Result<Vec<MedianDatum>> {
    let rows = parse_rdb(rdb)?;
    let mut medians = Vec::with_capacity(rows.len());
    for row in rows {
        let field = |name: &str| {
            row.get(name)
                .ok_or_else(|| SeriesError::Rdb(format!("missing column {name}")))
        };
        let month = field("month_nu")?
            .parse::<u32>()
            .map_err(|e| SeriesError::Rdb(format!("month_nu: {e}")))?;
        let day = field("day_nu")?
            .parse::<u32>()
            .map_err(|e| SeriesError::Rdb(format!("day_nu: {e}")))?;
        let value = match field("p50_va")?.parse::<f64>() {
            Ok(v) => v,
            // Some sites report blank medians for a handful of days.
            Err(_) => {
                log::warn!("skipping median row with unparseable p50_va ({month}/{day})");
                continue;
            }
        };
        medians.push(MedianDatum { month, day, value });
    }
    Ok(medians)
}

/// Determine if a given year is a leap year.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Project per-day-of-year medians onto concrete dates inside the displayed
/// window.
///
/// Each (month, day) is placed in the window's ending year when that lands
/// between January 1 and the window end, otherwise in the previous year.
/// February 29 is skipped in non-leap years. The result is sorted ascending
/// and trimmed to the trailing window-length slice.
pub fn project_median_data(
    medians: &[MedianDatum],
    window: &TimeRange,
    unit: &str,
) -> Vec<Observation> {
    if medians.is_empty() {
        return Vec::new();
    }
    let end_date = window.end.date_naive();
    let start_date = window.start.date_naive();
    let year_present = end_date.year();
    let year_previous = year_present - 1;
    let days = (end_date - start_date).num_days().max(0) as usize;

    let mut data: Vec<Observation> = Vec::new();
    for datum in medians {
        if datum.month == 2 && datum.day == 29 {
            // Leap days only exist in leap years.
            if !is_leap_year(year_present) && !is_leap_year(year_previous) {
                continue;
            }
        }
        let date = NaiveDate::from_ymd_opt(year_present, datum.month, datum.day)
            .filter(|d| *d <= end_date)
            .or_else(|| NaiveDate::from_ymd_opt(year_previous, datum.month, datum.day));
        let Some(date) = date else {
            continue;
        };
        let mut obs = Observation::new(
            date.and_time(NaiveTime::MIN).and_utc(),
            Some(datum.value),
        );
        obs.label = Some(format!("{} {}", datum.value, unit));
        data.push(obs);
    }
    data.sort_by_key(|o| o.date_time);
    if data.len() > days {
        data.split_off(data.len() - days)
    } else {
        data
    }
}
