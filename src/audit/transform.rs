use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

pub type TransformFn = fn(&Value) -> Value;

/// Display transforms a type can declare for an attribute. Applied to the
/// raw audited value when a column-means path ends on that attribute.
#[derive(Clone)]
pub enum DisplayTransform {
    Uppercase,
    Lowercase,
    TitleCase,
    /// Truthy values render as `yes`, falsy ones as `no`.
    YesNo { yes: String, no: String },
    /// Maps stored codes to labels; unknown codes pass through.
    Lookup(HashMap<String, String>),
    /// `chrono` format string for RFC 3339 timestamps and `YYYY-MM-DD` dates.
    DateTime(String),
    Custom(TransformFn),
}

impl std::fmt::Debug for DisplayTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayTransform::Uppercase => write!(f, "Uppercase"),
            DisplayTransform::Lowercase => write!(f, "Lowercase"),
            DisplayTransform::TitleCase => write!(f, "TitleCase"),
            DisplayTransform::YesNo { yes, no } => write!(f, "YesNo({yes}/{no})"),
            DisplayTransform::Lookup(map) => write!(f, "Lookup({} entries)", map.len()),
            DisplayTransform::DateTime(format) => write!(f, "DateTime({format})"),
            DisplayTransform::Custom(_) => write!(f, "Custom"),
        }
    }
}

impl DisplayTransform {
    pub fn lookup<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        DisplayTransform::Lookup(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn yes_no(yes: impl Into<String>, no: impl Into<String>) -> Self {
        DisplayTransform::YesNo {
            yes: yes.into(),
            no: no.into(),
        }
    }

    /// Never fails: values the transform does not understand are returned as-is.
    pub fn apply(&self, raw: &Value) -> Value {
        match self {
            DisplayTransform::Uppercase => map_str(raw, |s| s.to_uppercase()),
            DisplayTransform::Lowercase => map_str(raw, |s| s.to_lowercase()),
            DisplayTransform::TitleCase => map_str(raw, title_case),
            DisplayTransform::YesNo { yes, no } => match truthy(raw) {
                Some(true) => Value::String(yes.clone()),
                Some(false) => Value::String(no.clone()),
                None => raw.clone(),
            },
            DisplayTransform::Lookup(labels) => {
                let code = match raw {
                    Value::String(s) => s.clone(),
                    Value::Null => return Value::Null,
                    other => other.to_string(),
                };
                labels
                    .get(&code)
                    .map(|label| Value::String(label.clone()))
                    .unwrap_or_else(|| raw.clone())
            }
            DisplayTransform::DateTime(format) => match raw.as_str().and_then(parse_datetime) {
                Some(dt) => Value::String(dt.format(format).to_string()),
                None => raw.clone(),
            },
            DisplayTransform::Custom(f) => f(raw),
        }
    }
}

fn map_str(raw: &Value, f: impl Fn(&str) -> String) -> Value {
    match raw {
        Value::String(s) => Value::String(f(s)),
        other => other.clone(),
    }
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn truthy(raw: &Value) -> Option<bool> {
    match raw {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
