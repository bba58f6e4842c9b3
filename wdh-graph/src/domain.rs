//! Y-axis domain computation.

use wdh_series::observation::Observation;

/// Fraction of the raw extent added as padding on each end of the Y domain.
pub const PADDING_RATIO: f64 = 0.2;

/// Target number of Y-axis ticks.
pub const Y_TICK_COUNT: usize = 5;

/// Parameter codes plotted on a symlog scale instead of a linear scale
/// (streamflow and estimated streamflow).
pub const SYMLOG_PARAMETER_CODES: [&str; 2] = ["00060", "72137"];

/// Domain returned when no finite values exist at all.
pub const EMPTY_DOMAIN: [f64; 2] = [0.0, 1.0];

/// Whether a parameter is charted on a symlog scale.
pub fn uses_symlog(parameter_code: &str) -> bool {
    SYMLOG_PARAMETER_CODES.contains(&parameter_code)
}

/// Return a domain padded on both ends by `PADDING_RATIO`.
///
/// With `lower_bound_pow10` set (symlog scales), the lower bound becomes the
/// nearest power of 10 at or below the unpadded minimum, provided the domain
/// is non-negative. For non-negative domains a zero lower bound is enforced.
pub fn extend_domain(domain: [f64; 2], lower_bound_pow10: bool) -> [f64; 2] {
    let is_positive = domain[0] >= 0.0 && domain[1] >= 0.0;

    let padding = PADDING_RATIO * (domain[1] - domain[0]);
    let mut extended = [domain[0] - padding, domain[1] + padding];

    if lower_bound_pow10 {
        extended[0] = if is_positive {
            10f64.powf(domain[0].log10().floor())
        } else {
            domain[0]
        };
    }

    if is_positive {
        extended[0] = extended[0].max(0.0);
    }
    extended
}

/// Compute the padded Y domain over every visible series' points.
///
/// Per series: take the extent of finite values only; a single-value extent
/// `v` is widened to `[v - v/2, v + v/2]` so a one-point series still spans
/// something (degenerate at `v = 0`, where it stays `[0, 0]` — kept as-is).
/// The per-series extents are unioned, padded via [`extend_domain`], and
/// `[0, 1]` is returned when no finite values exist anywhere.
pub fn y_domain<S: AsRef<[Observation]>>(point_arrays: &[S], parameter_code: &str) -> [f64; 2] {
    let mut endpoints: Vec<f64> = Vec::new();

    for points in point_arrays {
        let finite: Vec<f64> = points
            .as_ref()
            .iter()
            .filter_map(|p| p.finite_value())
            .collect();
        let (Some(min), Some(max)) = (
            finite.iter().copied().reduce(f64::min),
            finite.iter().copied().reduce(f64::max),
        ) else {
            continue;
        };
        let extent = if min == max {
            [min - min / 2.0, min + min / 2.0]
        } else {
            [min, max]
        };
        endpoints.extend(extent.iter().filter(|v| v.is_finite()));
    }

    match (
        endpoints.iter().copied().reduce(f64::min),
        endpoints.iter().copied().reduce(f64::max),
    ) {
        (Some(min), Some(max)) => extend_domain([min, max], uses_symlog(parameter_code)),
        _ => EMPTY_DOMAIN,
    }
}
