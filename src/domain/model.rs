use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Value types understood by the preferences store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Int,
    Double,
    Float,
    Boolean,
    String,
}

impl ValueKind {
    /// Wire names are case-sensitive; anything else is unsupported.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "int" => Some(ValueKind::Int),
            "double" => Some(ValueKind::Double),
            "float" => Some(ValueKind::Float),
            "boolean" => Some(ValueKind::Boolean),
            "string" => Some(ValueKind::String),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Int => "int",
            ValueKind::Double => "double",
            ValueKind::Float => "float",
            ValueKind::Boolean => "boolean",
            ValueKind::String => "string",
        }
    }

    /// 沒有 defaultValue 時使用的預設值
    pub fn zero(&self) -> PrefValue {
        match self {
            ValueKind::Int => PrefValue::Int(0),
            ValueKind::Double => PrefValue::Double(0.0),
            ValueKind::Float => PrefValue::Float(0.0),
            ValueKind::Boolean => PrefValue::Boolean(false),
            ValueKind::String => PrefValue::String(String::new()),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed preference value, serialized as `{"type": "...", "value": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PrefValue {
    Int(i32),
    Double(f64),
    Float(f32),
    Boolean(bool),
    String(String),
}

impl PrefValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            PrefValue::Int(_) => ValueKind::Int,
            PrefValue::Double(_) => ValueKind::Double,
            PrefValue::Float(_) => ValueKind::Float,
            PrefValue::Boolean(_) => ValueKind::Boolean,
            PrefValue::String(_) => ValueKind::String,
        }
    }

    /// Reads a loosely typed JSON value as `kind`.
    ///
    /// Numbers may arrive as strings and vice versa; `null`, arrays and
    /// objects never coerce.
    pub fn coerce(kind: ValueKind, value: &Value) -> Option<PrefValue> {
        match value {
            Value::Null | Value::Array(_) | Value::Object(_) => return None,
            _ => {}
        }

        match kind {
            ValueKind::Int => match value {
                Value::Number(n) => {
                    if let Some(i) = n.as_i64() {
                        Some(PrefValue::Int(i as i32))
                    } else {
                        n.as_f64().map(|f| PrefValue::Int(f as i32))
                    }
                }
                Value::String(s) => s.parse::<i32>().ok().map(PrefValue::Int),
                _ => None,
            },
            ValueKind::Double => as_f64(value).map(PrefValue::Double),
            ValueKind::Float => as_f64(value).map(|f| PrefValue::Float(f as f32)),
            ValueKind::Boolean => match value {
                Value::Bool(b) => Some(PrefValue::Boolean(*b)),
                Value::String(s) => Some(PrefValue::Boolean(s.eq_ignore_ascii_case("true"))),
                _ => Some(PrefValue::Boolean(false)),
            },
            ValueKind::String => match value {
                Value::String(s) => Some(PrefValue::String(s.clone())),
                other => Some(PrefValue::String(other.to_string())),
            },
        }
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// `{"type": ..., "value": ...}` exactly as the caller sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawValue {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub value: Value,
}

impl RawValue {
    pub fn new(kind: impl Into<String>, value: Value) -> Self {
        Self {
            kind: kind.into(),
            value,
        }
    }
}

/// One desired preference value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjuster {
    pub id: String,
    pub adjustment: RawValue,
    #[serde(default)]
    pub default_value: Option<RawValue>,
    #[serde(default)]
    pub allowed_error: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Adjustments {
    #[serde(default)]
    pub breaking: Vec<Adjuster>,
    #[serde(default)]
    pub recommend: Vec<Adjuster>,
}

impl Adjustments {
    pub fn from_json(content: &str) -> crate::utils::error::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// A preference whose current value differs from its adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drift {
    pub id: String,
    pub old_value: PrefValue,
    pub new_value: PrefValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub breaking: Vec<Drift>,
    pub recommend: Vec<Drift>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.breaking.is_empty() && self.recommend.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Action {
    /// Report drifting preferences as JSON
    Get,
    /// Apply the breaking adjustments
    FixBreaking,
    /// Apply breaking and recommended adjustments
    FixAll,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Get => "get",
            Action::FixBreaking => "fix-breaking",
            Action::FixAll => "fix-all",
        })
    }
}

/// Parses the optional `[FIXES]` argument: a JSON array of preference ids.
pub fn parse_fix_filter(content: &str) -> crate::utils::error::Result<Vec<String>> {
    Ok(serde_json::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_adjustments_with_missing_fields() {
        let adjustments = Adjustments::from_json(
            r#"{"breaking":[{"id":"sigma","adjustment":{"type":"double","value":0.1}}]}"#,
        )
        .unwrap();

        assert_eq!(adjustments.breaking.len(), 1);
        assert!(adjustments.recommend.is_empty());
        let adjuster = &adjustments.breaking[0];
        assert_eq!(adjuster.adjustment.kind, "double");
        assert!(adjuster.default_value.is_none());
        assert!(adjuster.allowed_error.is_none());
    }

    #[test]
    fn test_pref_value_serializes_as_type_and_value() {
        let drift = Drift {
            id: "hotkey".to_string(),
            old_value: PrefValue::Int(3),
            new_value: PrefValue::Float(0.1),
        };
        let json = serde_json::to_string(&drift).unwrap();
        assert_eq!(
            json,
            r#"{"id":"hotkey","oldValue":{"type":"int","value":3},"newValue":{"type":"float","value":0.1}}"#
        );
    }

    #[test]
    fn test_coerce_is_lenient_like_json_primitives() {
        assert_eq!(
            PrefValue::coerce(ValueKind::Int, &json!("42")),
            Some(PrefValue::Int(42))
        );
        assert_eq!(
            PrefValue::coerce(ValueKind::Int, &json!(2.9)),
            Some(PrefValue::Int(2))
        );
        assert_eq!(
            PrefValue::coerce(ValueKind::Double, &json!("0.5")),
            Some(PrefValue::Double(0.5))
        );
        assert_eq!(
            PrefValue::coerce(ValueKind::Boolean, &json!("TRUE")),
            Some(PrefValue::Boolean(true))
        );
        assert_eq!(
            PrefValue::coerce(ValueKind::String, &json!(7)),
            Some(PrefValue::String("7".to_string()))
        );
        assert_eq!(PrefValue::coerce(ValueKind::Int, &json!("seven")), None);
        assert_eq!(PrefValue::coerce(ValueKind::String, &Value::Null), None);
    }

    #[test]
    fn test_unknown_kind_is_unsupported() {
        assert_eq!(ValueKind::from_wire("long"), None);
        assert_eq!(ValueKind::from_wire("Int"), None);
        assert_eq!(ValueKind::from_wire("boolean"), Some(ValueKind::Boolean));
    }

    #[test]
    fn test_parse_fix_filter() {
        assert_eq!(
            parse_fix_filter(r#"["a","b"]"#).unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(parse_fix_filter("a,b").is_err());
    }
}
