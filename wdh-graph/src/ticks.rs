//! "Nice" tick generation (1/2/5 × 10^n steps) and tick formatting.

use serde::Serialize;

use crate::domain::{uses_symlog, Y_TICK_COUNT};

/// Viewport width (px) below which symlog tick sets are thinned.
pub const MEDIUM_SCREEN_WIDTH: u32 = 641;

const E10: f64 = 7.071067811865476; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// The step between ticks covering [start, stop] with about `count` ticks.
///
/// Returns a positive step, or a negative value whose negation is the
/// reciprocal of the (sub-unit) step. Zero/non-finite results mean "no
/// ticks".
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

/// Generate about `count` round values spanning [start, stop].
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };

    let step = tick_increment(lo, hi, count);
    if step == 0.0 || !step.is_finite() {
        return Vec::new();
    }

    let mut values: Vec<f64> = if step > 0.0 {
        let mut r0 = (lo / step).round();
        let mut r1 = (hi / step).round();
        if r0 * step < lo {
            r0 += 1.0;
        }
        if r1 * step > hi {
            r1 -= 1.0;
        }
        let n = (r1 - r0 + 1.0).max(0.0) as usize;
        (0..n).map(|i| (r0 + i as f64) * step).collect()
    } else {
        let step = -step;
        let mut r0 = (lo * step).round();
        let mut r1 = (hi * step).round();
        if r0 / step < lo {
            r0 += 1.0;
        }
        if r1 / step > hi {
            r1 -= 1.0;
        }
        let n = (r1 - r0 + 1.0).max(0.0) as usize;
        (0..n).map(|i| (r0 + i as f64) / step).collect()
    };

    if reverse {
        values.reverse();
    }
    values
}

/// Display format for a tick set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TickFormat {
    /// All ticks are whole numbers: no decimal places.
    Integer,
    /// Two-decimal fixed format.
    Fixed2,
}

impl TickFormat {
    pub fn format(&self, value: f64) -> String {
        match self {
            TickFormat::Integer => format!("{value:.0}"),
            TickFormat::Fixed2 => format!("{value:.2}"),
        }
    }
}

/// Tick values and their display format for one Y axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickDetails {
    pub values: Vec<f64>,
    pub format: TickFormat,
}

/// Generate Y-axis ticks for a padded domain.
///
/// On narrow viewports, symlog tick sets with more than 3 entries keep only
/// the odd-indexed ticks; log-scale ticks sit too close together on small
/// screens otherwise.
pub fn tick_details(domain: [f64; 2], parameter_code: &str, window_width: u32) -> TickDetails {
    let mut values = ticks(domain[0], domain[1], Y_TICK_COUNT);

    if uses_symlog(parameter_code) && values.len() > 3 && window_width < MEDIUM_SCREEN_WIDTH {
        values = values
            .into_iter()
            .enumerate()
            .filter_map(|(i, v)| (i % 2 == 1).then_some(v))
            .collect();
    }

    let format = if values.iter().all(|v| v.fract() == 0.0) {
        TickFormat::Integer
    } else {
        TickFormat::Fixed2
    };
    TickDetails { values, format }
}
