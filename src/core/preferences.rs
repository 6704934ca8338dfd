use crate::domain::model::PrefValue;
use crate::domain::ports::PrefEntries;
use std::fmt;
use std::str::FromStr;

/// In-memory view of a preferences node with Java-compatible typed accessors.
///
/// Everything is stored as text. Typed getters fall back to the supplied
/// default when the key is missing or its text does not parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceNode {
    entries: PrefEntries,
    dirty: bool,
}

impl PreferenceNode {
    pub fn new(entries: PrefEntries) -> Self {
        Self {
            entries,
            dirty: false,
        }
    }

    pub fn entries(&self) -> &PrefEntries {
        &self.entries
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn get(&self, key: &str, default: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        self.entries
            .get(key)
            .and_then(|v| v.parse::<i32>().ok())
            .unwrap_or(default)
    }

    pub fn get_double(&self, key: &str, default: f64) -> f64 {
        self.entries
            .get(key)
            .and_then(|v| parse_java_floating(v))
            .unwrap_or(default)
    }

    pub fn get_float(&self, key: &str, default: f32) -> f32 {
        self.entries
            .get(key)
            .and_then(|v| parse_java_floating(v))
            .unwrap_or(default)
    }

    pub fn get_boolean(&self, key: &str, default: bool) -> bool {
        match self.entries.get(key) {
            Some(v) if v.eq_ignore_ascii_case("true") => true,
            Some(v) if v.eq_ignore_ascii_case("false") => false,
            _ => default,
        }
    }

    pub fn put(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if self.entries.get(key) != Some(&value) {
            self.entries.insert(key.to_string(), value);
            self.dirty = true;
        }
    }

    pub fn put_int(&mut self, key: &str, value: i32) {
        self.put(key, value.to_string());
    }

    pub fn put_double(&mut self, key: &str, value: f64) {
        self.put(key, java_double_string(value));
    }

    pub fn put_float(&mut self, key: &str, value: f32) {
        self.put(key, java_float_string(value));
    }

    pub fn put_boolean(&mut self, key: &str, value: bool) {
        self.put(key, if value { "true" } else { "false" });
    }

    /// Reads `key` with the type of `default`.
    pub fn read(&self, key: &str, default: &PrefValue) -> PrefValue {
        match default {
            PrefValue::Int(d) => PrefValue::Int(self.get_int(key, *d)),
            PrefValue::Double(d) => PrefValue::Double(self.get_double(key, *d)),
            PrefValue::Float(d) => PrefValue::Float(self.get_float(key, *d)),
            PrefValue::Boolean(d) => PrefValue::Boolean(self.get_boolean(key, *d)),
            PrefValue::String(d) => PrefValue::String(self.get(key, d)),
        }
    }

    pub fn write(&mut self, key: &str, value: &PrefValue) {
        match value {
            PrefValue::Int(v) => self.put_int(key, *v),
            PrefValue::Double(v) => self.put_double(key, *v),
            PrefValue::Float(v) => self.put_float(key, *v),
            PrefValue::Boolean(v) => self.put_boolean(key, *v),
            PrefValue::String(v) => self.put(key, v.as_str()),
        }
    }
}

/// Accepts the textual forms Java writes (`1.0E10`, `NaN`, `Infinity`)
/// plus an optional `d`/`f` suffix.
fn parse_java_floating<T: FromStr>(text: &str) -> Option<T> {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_suffix(['d', 'D', 'f', 'F'])
        .unwrap_or(trimmed);
    trimmed.parse::<T>().ok()
}

/// Formats like `Double.toString`: `1.0`, `0.001`, `1.0E7`, `1.5E-4`.
pub fn java_double_string(value: f64) -> String {
    java_floating(value, value.abs(), value.is_nan(), value.is_infinite())
}

/// Formats like `Float.toString`, using the shortest f32 digits.
pub fn java_float_string(value: f32) -> String {
    java_floating(
        value,
        f64::from(value.abs()),
        value.is_nan(),
        value.is_infinite(),
    )
}

fn java_floating<T>(value: T, magnitude: f64, nan: bool, infinite: bool) -> String
where
    T: fmt::Display + fmt::LowerExp + PartialOrd + Default,
{
    if nan {
        return "NaN".to_string();
    }
    if infinite {
        return if value > T::default() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }

    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        let plain = value.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{}.0", plain)
        }
    } else {
        let sci = format!("{:e}", value);
        match sci.split_once('e') {
            Some((mantissa, exponent)) if mantissa.contains('.') => {
                format!("{}E{}", mantissa, exponent)
            }
            Some((mantissa, exponent)) => format!("{}.0E{}", mantissa, exponent),
            None => sci,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(pairs: &[(&str, &str)]) -> PreferenceNode {
        PreferenceNode::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_typed_getters_fall_back_to_default() {
        let prefs = node(&[
            ("count", "12"),
            ("broken", "twelve"),
            ("sigma", "0.1"),
            ("flag", "TRUE"),
            ("maybe", "yes"),
        ]);

        assert_eq!(prefs.get_int("count", 0), 12);
        assert_eq!(prefs.get_int("broken", 5), 5);
        assert_eq!(prefs.get_int("missing", 7), 7);
        assert_eq!(prefs.get_double("sigma", 0.0), 0.1);
        assert_eq!(prefs.get_float("sigma", 0.0), 0.1f32);
        assert!(prefs.get_boolean("flag", false));
        assert!(!prefs.get_boolean("maybe", false));
        assert_eq!(prefs.get("missing", "x"), "x");
    }

    #[test]
    fn test_java_number_formatting() {
        assert_eq!(java_double_string(1.0), "1.0");
        assert_eq!(java_double_string(0.1), "0.1");
        assert_eq!(java_double_string(-2.5), "-2.5");
        assert_eq!(java_double_string(0.001), "0.001");
        assert_eq!(java_double_string(1e7), "1.0E7");
        assert_eq!(java_double_string(1.5e-4), "1.5E-4");
        assert_eq!(java_double_string(0.0), "0.0");
        assert_eq!(java_double_string(f64::NAN), "NaN");
        assert_eq!(java_double_string(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(java_float_string(0.1), "0.1");
        assert_eq!(java_float_string(3.0), "3.0");
    }

    #[test]
    fn test_written_values_read_back() {
        let mut prefs = PreferenceNode::default();
        prefs.put_double("big", 1.0e10);
        prefs.put_float("small", 2.5e-5);
        prefs.put_boolean("flag", true);

        assert_eq!(prefs.entries()["big"], "1.0E10");
        assert_eq!(prefs.get_double("big", 0.0), 1.0e10);
        assert_eq!(prefs.get_float("small", 0.0), 2.5e-5);
        assert!(prefs.get_boolean("flag", false));
    }

    #[test]
    fn test_dirty_only_on_change() {
        let mut prefs = node(&[("count", "3")]);
        prefs.put_int("count", 3);
        assert!(!prefs.is_dirty());
        prefs.put_int("count", 4);
        assert!(prefs.is_dirty());
    }
}
