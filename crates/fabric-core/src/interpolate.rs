//! Environment variable interpolation for configuration values.
//!
//! Supported placeholder syntax inside any string value:
//! - `${VAR_NAME}` - replaced with the variable's value, kept verbatim if unset
//! - `${VAR_NAME:-default}` - replaced with the variable's value, or `default` if unset
//!
//! A variable that is set to the empty string counts as set. Placeholders that
//! do not match the syntax (unclosed brace, empty name) are left as literal text.
//!
//! ```
//! use std::collections::HashMap;
//! use fabric_core::interpolate_env_vars;
//! use serde_json::json;
//!
//! let env: HashMap<String, String> = [("API_KEY".to_string(), "secret123".to_string())].into();
//! let config = json!({"key": "${API_KEY}", "other": "${MISSING:-default}"});
//!
//! assert_eq!(
//!     interpolate_env_vars(&config, &env),
//!     json!({"key": "secret123", "other": "default"})
//! );
//! ```

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::env::EnvLookup;

/// Group 1 is the variable name, group 2 the optional default after `:-`.
const PLACEHOLDER_PATTERN: &str = r"\$\{([^}:]+)(?::-(.*?))?\}";

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(PLACEHOLDER_PATTERN).expect("placeholder pattern compiles"))
}

/// Recursively interpolate environment variables in a configuration value.
///
/// Strings are interpolated, arrays and objects are walked (object keys are
/// left alone) and every other value is returned unchanged. Never fails.
pub fn interpolate_env_vars<E>(config: &Value, env: &E) -> Value
where
    E: EnvLookup + ?Sized,
{
    match config {
        Value::String(s) => Value::String(interpolate_string(s, env)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| interpolate_env_vars(item, env))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), interpolate_env_vars(v, env)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Interpolate environment variables in a single string.
///
/// Substituted text is not scanned again, so a variable whose value contains
/// `${...}` is inserted literally.
pub fn interpolate_string<E>(value: &str, env: &E) -> String
where
    E: EnvLookup + ?Sized,
{
    placeholder_regex()
        .replace_all(value, |caps: &Captures<'_>| {
            if let Some(env_value) = env.get(&caps[1]) {
                return env_value;
            }
            match caps.get(2) {
                Some(default) => default.as_str().to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
