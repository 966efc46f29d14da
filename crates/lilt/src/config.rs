//! Rule set and gate configuration.
//!
//! A rule set maps guarded action names to rule sources. It is either the
//! built-in set or loaded from a JSON file:
//!
//! ```json
//! {
//!   "rules": [
//!     {
//!       "action": "create-post",
//!       "source": "(and (is-signed-in) (< (profiles-count) 8888))",
//!       "description": "Members may post while the community is small"
//!     }
//!   ]
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Action name guarding post creation
pub const CREATE_POST: &str = "create-post";

/// Signed-in callers may post while there are fewer than 8888 profiles.
pub const DEFAULT_CREATE_POST_RULE: &str = "(and (is-signed-in) (< (profiles-count) 8888))";

const DEFAULT_DEADLINE_MS: u64 = 2000;

/// A rule attached to one guarded action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRule {
    pub action: String,
    pub source: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl NamedRule {
    pub fn new(action: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            source: source.into(),
            description: None,
            enabled: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub rules: Vec<NamedRule>,
}

impl RuleSet {
    /// The rule set used when no file is configured.
    pub fn builtin() -> Self {
        Self {
            rules: vec![NamedRule::new(CREATE_POST, DEFAULT_CREATE_POST_RULE)
                .with_description("Members may post while the community is small")],
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Rules that take part in decisions.
    pub fn enabled(&self) -> impl Iterator<Item = &NamedRule> {
        self.rules.iter().filter(|rule| rule.enabled)
    }
}

/// Gate settings.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Upper bound on a single decision, predicate lookups included
    pub deadline: Duration,
    /// Cache parsed rule trees
    pub cache: bool,
    pub rules: RuleSet,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            deadline: Duration::from_millis(DEFAULT_DEADLINE_MS),
            cache: true,
            rules: RuleSet::builtin(),
        }
    }
}

impl GateConfig {
    /// Load from `LILT_DEADLINE_MS`, `LILT_CACHE` and `LILT_RULES_PATH`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let deadline_ms = match lookup("LILT_DEADLINE_MS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::InvalidVar {
                    name: "LILT_DEADLINE_MS",
                    value,
                })?,
            None => DEFAULT_DEADLINE_MS,
        };

        let cache = match lookup("LILT_CACHE") {
            Some(value) => {
                let normalized = value.trim().to_ascii_lowercase();
                match normalized.as_str() {
                    "1" | "true" | "yes" | "on" => true,
                    "0" | "false" | "no" | "off" => false,
                    _ => {
                        return Err(ConfigError::InvalidVar {
                            name: "LILT_CACHE",
                            value,
                        });
                    }
                }
            }
            None => true,
        };

        let rules = match lookup("LILT_RULES_PATH").filter(|path| !path.trim().is_empty()) {
            Some(path) => RuleSet::load(path.trim())?,
            None => RuleSet::builtin(),
        };

        Ok(Self {
            deadline: Duration::from_millis(deadline_ms),
            cache,
            rules,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_rule_set_json() {
        let json = r#"{
            "rules": [
                { "action": "create-post", "source": "(is-signed-in)" },
                { "action": "delete-post", "source": "false", "description": "Nobody", "enabled": false }
            ]
        }"#;
        let set = RuleSet::from_json(json).unwrap();

        assert_eq!(set.rules.len(), 2);
        assert_eq!(set.rules[0], NamedRule::new("create-post", "(is-signed-in)"));
        assert_eq!(set.rules[1].description.as_deref(), Some("Nobody"));

        let enabled: Vec<&str> = set.enabled().map(|r| r.action.as_str()).collect();
        assert_eq!(enabled, vec!["create-post"]);
    }

    #[test]
    fn test_rule_set_json_errors() {
        assert!(matches!(
            RuleSet::from_json("{\"rules\": [{\"action\": \"x\"}]}"),
            Err(ConfigError::Json(_))
        ));
        assert_eq!(RuleSet::from_json("{}").unwrap(), RuleSet::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = RuleSet::load("/nonexistent/lilt-rules.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, r#"{"rules":[{"action":"a","source":"true"}]}"#).unwrap();

        let set = RuleSet::load(&path).unwrap();
        assert_eq!(set.rules, vec![NamedRule::new("a", "true")]);
    }

    #[test]
    fn test_defaults() {
        let config = GateConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.deadline, Duration::from_millis(2000));
        assert!(config.cache);
        assert_eq!(config.rules, RuleSet::builtin());
        assert_eq!(config.rules.rules[0].source, DEFAULT_CREATE_POST_RULE);
    }

    #[test]
    fn test_overrides() {
        let config = GateConfig::from_lookup(lookup(&[
            ("LILT_DEADLINE_MS", "250"),
            ("LILT_CACHE", "off"),
            ("LILT_RULES_PATH", "  "),
        ]))
        .unwrap();
        assert_eq!(config.deadline, Duration::from_millis(250));
        assert!(!config.cache);
        assert_eq!(config.rules, RuleSet::builtin());
    }

    #[test]
    fn test_invalid_values() {
        let err = GateConfig::from_lookup(lookup(&[("LILT_DEADLINE_MS", "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { name: "LILT_DEADLINE_MS", .. }));

        let err = GateConfig::from_lookup(lookup(&[("LILT_DEADLINE_MS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { .. }));

        let err = GateConfig::from_lookup(lookup(&[("LILT_CACHE", "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { name: "LILT_CACHE", .. }));
    }
}
