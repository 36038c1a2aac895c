//! CSS length values: a number plus a unit.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Units accepted by dimension-style fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CssUnit {
    Px,
    Em,
    Rem,
    #[serde(rename = "%")]
    Percent,
    Vw,
    Vh,
}

impl CssUnit {
    pub const ALL: [CssUnit; 6] = [
        CssUnit::Px,
        CssUnit::Em,
        CssUnit::Rem,
        CssUnit::Percent,
        CssUnit::Vw,
        CssUnit::Vh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CssUnit::Px => "px",
            CssUnit::Em => "em",
            CssUnit::Rem => "rem",
            CssUnit::Percent => "%",
            CssUnit::Vw => "vw",
            CssUnit::Vh => "vh",
        }
    }

    pub fn parse(s: &str) -> Option<CssUnit> {
        match s {
            "px" => Some(CssUnit::Px),
            "em" => Some(CssUnit::Em),
            "rem" => Some(CssUnit::Rem),
            "%" => Some(CssUnit::Percent),
            "vw" => Some(CssUnit::Vw),
            "vh" => Some(CssUnit::Vh),
            _ => None,
        }
    }
}

impl fmt::Display for CssUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A CSS length: `{value, unit}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CssLength {
    pub value: f64,
    pub unit: CssUnit,
}

impl CssLength {
    pub fn px(value: f64) -> Self {
        Self {
            value,
            unit: CssUnit::Px,
        }
    }

    pub fn new(value: f64, unit: CssUnit) -> Self {
        Self { value, unit }
    }

    /// Parse a token like `"10px"`, `"1.5em"`, `"50%"`. A bare number is
    /// treated as pixels (the legacy wire emits `"0"` for zero lengths).
    pub fn parse(token: &str) -> Option<CssLength> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }

        let split = token
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit() && *c != '.' && *c != '-' && *c != '+')
            .map(|(i, _)| i)
            .unwrap_or(token.len());

        let (number, unit) = token.split_at(split);
        let value: f64 = number.parse().ok()?;

        if unit.is_empty() {
            return Some(CssLength::px(value));
        }

        CssUnit::parse(unit).map(|unit| CssLength { value, unit })
    }

    /// Read from a JSON value: either a `{value, unit}` object, a string
    /// token, or a bare number (pixels)
    pub fn from_value(value: &Value) -> Option<CssLength> {
        match value {
            Value::String(s) => CssLength::parse(s),
            Value::Number(n) => n.as_f64().map(CssLength::px),
            Value::Object(map) => {
                let number = map.get("value")?.as_f64().or_else(|| {
                    map.get("value")
                        .and_then(Value::as_str)
                        .and_then(|s| s.parse().ok())
                })?;
                let unit = map
                    .get("unit")
                    .and_then(Value::as_str)
                    .and_then(CssUnit::parse)
                    .unwrap_or(CssUnit::Px);
                Some(CssLength::new(number, unit))
            }
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({ "value": self.value, "unit": self.unit.as_str() })
    }
}

impl fmt::Display for CssLength {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Integral values print without a fractional part: "10px" not "10.0px"
        if self.value.fract() == 0.0 {
            write!(f, "{}{}", self.value as i64, self.unit)
        } else {
            write!(f, "{}{}", self.value, self.unit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_tokens() {
        assert_eq!(CssLength::parse("10px"), Some(CssLength::px(10.0)));
        assert_eq!(
            CssLength::parse("1.5em"),
            Some(CssLength::new(1.5, CssUnit::Em))
        );
        assert_eq!(
            CssLength::parse("50%"),
            Some(CssLength::new(50.0, CssUnit::Percent))
        );
        assert_eq!(
            CssLength::parse("-4px"),
            Some(CssLength::new(-4.0, CssUnit::Px))
        );
        assert_eq!(CssLength::parse("0"), Some(CssLength::px(0.0)));
        assert_eq!(CssLength::parse("10pt"), None);
        assert_eq!(CssLength::parse(""), None);
    }

    #[test]
    fn test_display_drops_trailing_zero() {
        assert_eq!(CssLength::px(10.0).to_string(), "10px");
        assert_eq!(CssLength::new(1.5, CssUnit::Rem).to_string(), "1.5rem");
        assert_eq!(CssLength::new(50.0, CssUnit::Percent).to_string(), "50%");
    }

    #[test]
    fn test_from_value_shapes() {
        assert_eq!(
            CssLength::from_value(&json!("12px")),
            Some(CssLength::px(12.0))
        );
        assert_eq!(CssLength::from_value(&json!(7)), Some(CssLength::px(7.0)));
        assert_eq!(
            CssLength::from_value(&json!({"value": 2, "unit": "em"})),
            Some(CssLength::new(2.0, CssUnit::Em))
        );
        assert_eq!(CssLength::from_value(&json!(true)), None);
    }
}
