use serde::{Deserialize, Serialize};

use crate::observation::Observation;

/// Qualifier code marking an approved reading.
pub const APPROVED: &str = "A";

/// Qualifier code marking an estimated reading.
pub const ESTIMATED: &str = "E";

/// Qualifier code marking a provisional reading (subject to revision).
pub const PROVISIONAL: &str = "P";

/// Reason a stretch of readings is masked out of the drawn line.
///
/// Declaration order is the tie-break priority: when a masked point carries
/// more than one mask-worthy qualifier, the earliest variant listed here
/// wins. `Missing` is the fallback for a null value with no recognized
/// mask qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaskReason {
    Ice,
    Flood,
    Dry,
    Seasonal,
    Equipment,
    Maintenance,
    Test,
    Missing,
}

impl MaskReason {
    /// Pick the highest-priority mask reason among a point's qualifiers,
    /// if any qualifier is mask-worthy.
    pub fn from_qualifiers<S: AsRef<str>>(qualifiers: &[S]) -> Option<MaskReason> {
        qualifiers
            .iter()
            .filter_map(|q| MaskReason::from_code(q.as_ref()))
            .min()
    }

    /// Map a single qualifier code to a mask reason.
    pub fn from_code(code: &str) -> Option<MaskReason> {
        match code.to_ascii_uppercase().as_str() {
            "ICE" => Some(MaskReason::Ice),
            "FLD" => Some(MaskReason::Flood),
            "DRY" => Some(MaskReason::Dry),
            "SSN" => Some(MaskReason::Seasonal),
            "EQP" => Some(MaskReason::Equipment),
            "MNT" => Some(MaskReason::Maintenance),
            "TST" => Some(MaskReason::Test),
            _ => None,
        }
    }

    /// Human-readable description for legends and tooltips.
    pub fn label(&self) -> &'static str {
        match self {
            MaskReason::Ice => "Ice Affected",
            MaskReason::Flood => "Flood",
            MaskReason::Dry => "Dry",
            MaskReason::Seasonal => "Seasonal",
            MaskReason::Equipment => "Equipment Malfunction",
            MaskReason::Maintenance => "Maintenance",
            MaskReason::Test => "Test",
            MaskReason::Missing => "Missing Data",
        }
    }
}

/// Drawing classification of a single observation.
///
/// Two adjacent points belong to the same line segment exactly when their
/// classifications are equal. The mask is only populated for points whose
/// value is absent or non-finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PointClass {
    pub approved: bool,
    pub estimated: bool,
    pub mask: Option<MaskReason>,
}

impl PointClass {
    pub fn of(obs: &Observation) -> Self {
        let has = |code: &str| obs.qualifiers.iter().any(|q| q.eq_ignore_ascii_case(code));
        let mask = if obs.finite_value().is_none() {
            Some(MaskReason::from_qualifiers(&obs.qualifiers).unwrap_or(MaskReason::Missing))
        } else {
            None
        };
        PointClass {
            approved: has(APPROVED),
            estimated: has(ESTIMATED),
            mask,
        }
    }

    pub fn is_masked(&self) -> bool {
        self.mask.is_some()
    }
}
