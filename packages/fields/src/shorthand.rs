//! CSS box-shorthand parsing for spacing values (padding/margin).
//!
//! A spacing value may arrive as a 1-, 2-, 3- or 4-part space-separated
//! shorthand string and expands to `{top, right, bottom, left}` following
//! the standard CSS rules:
//!
//! - 1 part  → all four sides
//! - 2 parts → vertical / horizontal
//! - 3 parts → top / horizontal / bottom
//! - 4 parts → top / right / bottom / left
//!
//! Formatting collapses back to the shortest equivalent form, so
//! `format_spacing(parse_spacing(s))` is the canonical spelling of `s`.

use crate::units::CssLength;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-side spacing values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    pub top: CssLength,
    pub right: CssLength,
    pub bottom: CssLength,
    pub left: CssLength,
}

impl Spacing {
    pub fn uniform(length: CssLength) -> Self {
        Self {
            top: length,
            right: length,
            bottom: length,
            left: length,
        }
    }

    pub fn zero() -> Self {
        Self::uniform(CssLength::px(0.0))
    }

    /// Read from a JSON value: a shorthand string or a per-side object
    pub fn from_value(value: &Value) -> Option<Spacing> {
        match value {
            Value::String(s) => parse_spacing(s),
            Value::Object(map) => {
                let side = |name: &str| map.get(name).and_then(CssLength::from_value);
                Some(Spacing {
                    top: side("top")?,
                    right: side("right")?,
                    bottom: side("bottom")?,
                    left: side("left")?,
                })
            }
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "top": self.top.to_value(),
            "right": self.right.to_value(),
            "bottom": self.bottom.to_value(),
            "left": self.left.to_value(),
        })
    }
}

/// Expand a CSS shorthand string into per-side values
pub fn parse_spacing(input: &str) -> Option<Spacing> {
    let parts: Vec<CssLength> = input
        .split_whitespace()
        .map(CssLength::parse)
        .collect::<Option<Vec<_>>>()?;

    match parts.as_slice() {
        [all] => Some(Spacing::uniform(*all)),
        [vertical, horizontal] => Some(Spacing {
            top: *vertical,
            right: *horizontal,
            bottom: *vertical,
            left: *horizontal,
        }),
        [top, horizontal, bottom] => Some(Spacing {
            top: *top,
            right: *horizontal,
            bottom: *bottom,
            left: *horizontal,
        }),
        [top, right, bottom, left] => Some(Spacing {
            top: *top,
            right: *right,
            bottom: *bottom,
            left: *left,
        }),
        _ => None,
    }
}

/// Collapse per-side values to the shortest equivalent shorthand
pub fn format_spacing(spacing: &Spacing) -> String {
    let Spacing {
        top,
        right,
        bottom,
        left,
    } = spacing;

    if top == right && top == bottom && top == left {
        top.to_string()
    } else if top == bottom && right == left {
        format!("{} {}", top, right)
    } else if right == left {
        format!("{} {} {}", top, right, bottom)
    } else {
        format!("{} {} {} {}", top, right, bottom, left)
    }
}
