//! `{{path.to.value}}` interpolation over a JSON context.
//!
//! Tokens whose path does not resolve are left in place verbatim; a miss is
//! never an error.

use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").expect("token pattern is valid")
});

/// Result of walking a dotted path through the context.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    Resolved(&'a Value),
    Unresolved(String),
}

/// Interpolated text plus the paths that did not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolated {
    pub text: String,
    pub unresolved: Vec<String>,
}

/// Walk `path` (dot separated) through `ctx`.
///
/// Object segments are keys; array segments are decimal indices.
pub fn resolve_path<'a>(ctx: &'a Value, path: &str) -> Resolution<'a> {
    let mut current = ctx;
    for segment in path.split('.') {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return Resolution::Unresolved(path.to_string()),
        }
    }
    Resolution::Resolved(current)
}

/// Render a resolved value into template text.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Replace every resolvable token in `template`.
pub fn interpolate(template: &str, ctx: &Value) -> String {
    interpolate_report(template, ctx).text
}

/// Like [`interpolate`], also reporting the unresolved paths in order.
pub fn interpolate_report(template: &str, ctx: &Value) -> Interpolated {
    let mut unresolved = Vec::new();
    let text = TOKEN
        .replace_all(template, |caps: &Captures<'_>| {
            match resolve_path(ctx, &caps[1]) {
                Resolution::Resolved(value) => stringify(value),
                Resolution::Unresolved(path) => {
                    unresolved.push(path);
                    caps[0].to_string()
                }
            }
        })
        .into_owned();

    Interpolated { text, unresolved }
}

/// Interpolate a JSON scalar: strings are rendered, anything else passes
/// through unchanged.
pub fn interpolate_json_scalar(value: &Value, ctx: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(interpolate(s, ctx)),
        other => other.clone(),
    }
}

/// Deep-interpolate a composite payload.
///
/// Strings are interpolated, arrays and objects are walked element-wise
/// (keys are not interpolated), other values are returned unchanged.
pub fn interpolate_value(value: &Value, ctx: &Value) -> Value {
    match value {
        Value::String(_) => interpolate_json_scalar(value, ctx),
        Value::Array(items) => Value::Array(items.iter().map(|v| interpolate_value(v, ctx)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), interpolate_value(v, ctx)))
                .collect(),
        ),
        other => other.clone(),
    }
}
