use crate::domain::model::{Adjuster, PrefValue, ValueKind};
use crate::utils::error::{FixerError, Result};

pub const DOUBLE_EPSILON: f64 = 0.000_000_1;
pub const FLOAT_EPSILON: f32 = 0.000_000_1;

/// How far a stored value may stray from its target before it counts as drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tolerance {
    Int(i64),
    Double(f64),
    Float(f32),
    Exact,
}

impl Tolerance {
    pub fn for_kind(kind: ValueKind, allowed_error: Option<f64>) -> Self {
        match kind {
            ValueKind::Int => Tolerance::Int(allowed_error.map(|e| e as i64).unwrap_or(0)),
            ValueKind::Double => Tolerance::Double(allowed_error.unwrap_or(DOUBLE_EPSILON)),
            ValueKind::Float => {
                Tolerance::Float(allowed_error.map(|e| e as f32).unwrap_or(FLOAT_EPSILON))
            }
            ValueKind::Boolean | ValueKind::String => Tolerance::Exact,
        }
    }
}

/// An adjuster with its values resolved to one concrete type.
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub id: String,
    pub target: PrefValue,
    pub default: PrefValue,
    pub tolerance: Tolerance,
}

impl Check {
    /// `Ok(None)` when the adjustment type is not one the store understands.
    pub fn prepare(adjuster: &Adjuster) -> Result<Option<Self>> {
        let Some(kind) = ValueKind::from_wire(&adjuster.adjustment.kind) else {
            tracing::warn!(
                "⚠️ Skipping '{}': unsupported type '{}'",
                adjuster.id,
                adjuster.adjustment.kind
            );
            return Ok(None);
        };

        let target = coerce(&adjuster.id, kind, &adjuster.adjustment.value)?;
        // defaultValue 的 type 不參與判斷，只取 value
        let default = match &adjuster.default_value {
            Some(raw) => coerce(&adjuster.id, kind, &raw.value)?,
            None => kind.zero(),
        };

        Ok(Some(Self {
            id: adjuster.id.clone(),
            target,
            default,
            tolerance: Tolerance::for_kind(kind, adjuster.allowed_error),
        }))
    }

    pub fn drifts(&self, current: &PrefValue) -> bool {
        drifts(current, &self.target, self.tolerance)
    }
}

fn coerce(id: &str, kind: ValueKind, value: &serde_json::Value) -> Result<PrefValue> {
    PrefValue::coerce(kind, value).ok_or_else(|| FixerError::InvalidValueError {
        id: id.to_string(),
        kind: kind.to_string(),
        value: value.to_string(),
    })
}

/// `true` when `current` is outside `tolerance` of `target`.
///
/// A NaN on either side never counts as drift.
pub fn drifts(current: &PrefValue, target: &PrefValue, tolerance: Tolerance) -> bool {
    match (current, target) {
        (PrefValue::Int(a), PrefValue::Int(b)) => {
            let limit = match tolerance {
                Tolerance::Int(limit) => limit,
                _ => 0,
            };
            (i64::from(*a) - i64::from(*b)).abs() > limit
        }
        (PrefValue::Double(a), PrefValue::Double(b)) => {
            let limit = match tolerance {
                Tolerance::Double(limit) => limit,
                _ => DOUBLE_EPSILON,
            };
            outside_f64(*a, *b, limit)
        }
        (PrefValue::Float(a), PrefValue::Float(b)) => {
            let limit = match tolerance {
                Tolerance::Float(limit) => limit,
                _ => FLOAT_EPSILON,
            };
            outside_f32(*a, *b, limit)
        }
        (PrefValue::Boolean(a), PrefValue::Boolean(b)) => a != b,
        (PrefValue::String(a), PrefValue::String(b)) => a != b,
        _ => true,
    }
}

fn outside_f64(a: f64, b: f64, limit: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        tracing::warn!("⚠️ NaN preference value ({} vs {}), leaving as is", a, b);
        return false;
    }
    (a - b).abs() > limit
}

fn outside_f32(a: f32, b: f32, limit: f32) -> bool {
    if a.is_nan() || b.is_nan() {
        tracing::warn!("⚠️ NaN preference value ({} vs {}), leaving as is", a, b);
        return false;
    }
    (a - b).abs() > limit
}
