//! Environment lookup and lenient value parsing.

use std::collections::HashMap;
use std::str::FromStr;

/// Source of named string values, normally the process environment.
pub trait EnvSource {
    /// Raw value for `key`, if set.
    fn var(&self, key: &str) -> Option<String>;

    /// Value for `key`, treating an empty string as unset.
    fn lookup(&self, key: &str) -> Option<String> {
        self.var(key).filter(|value| !value.is_empty())
    }

    /// First non-empty value among `keys`, in order.
    fn first_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.lookup(key))
    }

    fn string_or(&self, key: &str, default: &str) -> String {
        self.lookup(key).unwrap_or_else(|| default.to_string())
    }

    fn bool_or(&self, key: &str, default: bool) -> bool {
        self.lookup(key).map_or(default, |raw| {
            parse_bool(&raw).unwrap_or_else(|| {
                tracing::warn!(key, value = %raw, default, "Unparsable boolean, using default");
                default
            })
        })
    }

    fn parse_or<T>(&self, key: &str, default: T) -> T
    where
        T: FromStr + Copy + std::fmt::Display,
    {
        self.lookup(key).map_or(default, |raw| {
            raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(key, value = %raw, %default, "Unparsable number, using default");
                default
            })
        })
    }

    /// Comma-separated list; blank segments are dropped.
    fn list(&self, key: &str) -> Vec<String> {
        self.lookup(key).map(|raw| split_list(&raw)).unwrap_or_default()
    }
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<E: EnvSource + ?Sized> EnvSource for &E {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}

/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_parse_bool_accepted_spellings() {
        for raw in ["1", "t", "T", "TRUE", "true", "True", " true "] {
            assert_eq!(parse_bool(raw), Some(true), "{raw}");
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(raw), Some(false), "{raw}");
        }
        assert_eq!(parse_bool("yes"), None);
    }

    #[test]
    fn test_empty_value_is_unset() {
        let source = env(&[("A", ""), ("B", "b")]);

        assert_eq!(source.lookup("A"), None);
        assert_eq!(source.first_of(&["A", "B"]).as_deref(), Some("b"));
        assert_eq!(source.string_or("A", "fallback"), "fallback");
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let source = env(&[("FLAG", "maybe"), ("NUM", "twelve"), ("PORT", " 8080 ")]);

        assert!(source.bool_or("FLAG", true));
        assert_eq!(source.parse_or("NUM", 3_i64), 3);
        assert_eq!(source.parse_or("PORT", 0_u16), 8080);
    }

    #[test]
    fn test_list_drops_blank_segments() {
        assert_eq!(split_list("a:1, b:2,,"), vec!["a:1", "b:2"]);
        assert!(split_list("").is_empty());
        assert!(env(&[]).list("MISSING").is_empty());
    }
}
