//! Variable interpolation for `{{namespace.field}}` placeholders.
//!
//! Substitution walks the keys of the variable map, not the placeholders of the
//! template: a placeholder whose key is missing from the map stays in the output
//! verbatim.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::{NoExpand, Regex};

use super::types::{TemplateError, TemplateResult};

/// Flat dotted key to display value.
pub type Variables = BTreeMap<String, String>;

lazy_static! {
    static ref PLACEHOLDER_RE: Regex =
        Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").expect("valid placeholder pattern");
}

/// Pattern matching `{{ key }}` with optional inner whitespace.
fn key_pattern(key: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"\{{\{{\s*{}\s*\}}\}}", regex::escape(key)))
}

/// Replace every `{{key}}` whose key is present in `variables`.
pub fn interpolate(template: &str, variables: &Variables) -> String {
    let mut result = template.to_string();

    for (key, value) in variables {
        if !result.contains("{{") {
            break;
        }
        match key_pattern(key) {
            Ok(pattern) => {
                result = pattern.replace_all(&result, NoExpand(value)).into_owned();
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Skipping variable with unusable key");
            }
        }
    }

    result
}

/// Build a variable map from a JSON object of dotted keys.
///
/// Strings are used verbatim, numbers and booleans through their display form,
/// `null` becomes empty, arrays and objects their compact JSON.
pub fn variables_from_json(value: &serde_json::Value) -> TemplateResult<Variables> {
    let map = match value {
        serde_json::Value::Object(map) => map,
        _ => {
            return Err(TemplateError::SubstitutionFailed(
                "Variables must be an object".to_string(),
            ))
        }
    };

    Ok(map
        .iter()
        .map(|(key, value)| (key.clone(), value_to_string(value)))
        .collect())
}

fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => String::new(),
        _ => value.to_string(),
    }
}

/// Distinct placeholder keys referenced by `template`, in order of first use.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for captures in PLACEHOLDER_RE.captures_iter(template) {
        let key = captures[1].to_string();
        if !seen.contains(&key) {
            seen.push(key);
        }
    }
    seen
}

/// Placeholders of `template` that `known` cannot fill.
pub fn unknown_placeholders<'a, I>(template: &str, known: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    placeholders(template)
        .into_iter()
        .filter(|key| !known.clone().into_iter().any(|k| k == key))
        .collect()
}
