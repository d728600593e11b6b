//! Declarative feature→action rule table
//!
//! A table maps each feature kind to the actions that annotate it, e.g.:
//!
//! ```json
//! {
//!   "PEAK": {
//!     "actions": [
//!       { "action": "DOT", "color": "#FF0000" },
//!       { "action": "TEXT", "message": "{name} peaked at {value}" }
//!     ],
//!     "pause": true
//!   }
//! }
//! ```
//!
//! The `action` tag deserializes into a closed enum, so a table naming an
//! unknown action kind fails at load time — before any timeline is built
//! and long before playback.

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};
use storyline_core::FeatureKind;

use crate::actions::{ActionKind, CircleProps, ConnectorProps, DotProps, TextProps};
use crate::{template, Error, Result};

/// Declarative description of one action instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "UPPERCASE")]
pub enum ActionSpec {
    Dot(DotProps),
    Circle(CircleProps),
    Connector(ConnectorProps),
    Text(TextProps),
}

impl ActionSpec {
    /// The variant this spec instantiates
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Dot(_) => ActionKind::Dot,
            Self::Circle(_) => ActionKind::Circle,
            Self::Connector(_) => ActionKind::Connector,
            Self::Text(_) => ActionKind::Text,
        }
    }
}

/// The actions bound to one feature kind. More than one spec produces a
/// group that shows and hides as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEntry {
    pub actions: Vec<ActionSpec>,
    /// Pause playback after this feature's actions are shown
    #[serde(default)]
    pub pause: bool,
}

impl RuleEntry {
    /// Creates an entry from action specs
    pub fn new(actions: Vec<ActionSpec>) -> Self {
        Self {
            actions,
            pause: false,
        }
    }

    /// Marks the entry as pausing playback
    pub fn with_pause(mut self) -> Self {
        self.pause = true;
        self
    }
}

/// Mapping from feature kind to rule entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable(BTreeMap<FeatureKind, RuleEntry>);

impl RuleTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule, replacing any existing rule for the same kind
    pub fn with_rule(mut self, kind: FeatureKind, entry: RuleEntry) -> Self {
        self.0.insert(kind, entry);
        self
    }

    /// The rule for a feature kind, if any
    pub fn get(&self, kind: FeatureKind) -> Option<&RuleEntry> {
        self.0.get(&kind)
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the table has no rules
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses a table from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        table.validate()?;
        Ok(table)
    }

    /// Parses a table from a JSON reader
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let table: Self =
            serde_json::from_reader(reader).map_err(|e| Error::Config(e.to_string()))?;
        table.validate()?;
        Ok(table)
    }

    /// Checks the table's internal consistency: every rule must carry at
    /// least one action, and every text template may only reference known
    /// variables. Fatal configuration errors surface here, never during
    /// playback.
    pub fn validate(&self) -> Result<()> {
        for (kind, entry) in &self.0 {
            if entry.actions.is_empty() {
                return Err(Error::Config(format!("rule for {kind} has no actions")));
            }
            for spec in &entry.actions {
                if let ActionSpec::Text(props) = spec {
                    template::validate(&props.message)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_table_json() {
        let json = r##"{
            "PEAK": {
                "actions": [
                    { "action": "DOT", "color": "#FF0000" },
                    { "action": "TEXT", "message": "peak of {value}" }
                ],
                "pause": true
            },
            "CURRENT": {
                "actions": [ { "action": "CIRCLE", "size": 12.0 } ]
            }
        }"##;

        let table = RuleTable::from_json_str(json).unwrap();
        assert_eq!(table.len(), 2);

        let peak = table.get(FeatureKind::Peak).unwrap();
        assert!(peak.pause);
        assert_eq!(peak.actions.len(), 2);
        assert_eq!(peak.actions[0].kind(), ActionKind::Dot);
        assert!(matches!(
            &peak.actions[0],
            ActionSpec::Dot(props) if props.color == "#FF0000"
        ));

        let current = table.get(FeatureKind::Current).unwrap();
        assert!(!current.pause);
        assert_eq!(current.actions[0].kind(), ActionKind::Circle);
    }

    #[test]
    fn test_unknown_action_kind_fails_at_load() {
        let json = r#"{ "PEAK": { "actions": [ { "action": "SPARKLE" } ] } }"#;
        let err = RuleTable::from_json_str(json).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unknown_feature_kind_fails_at_load() {
        let json = r#"{ "WIGGLE": { "actions": [ { "action": "DOT" } ] } }"#;
        assert!(RuleTable::from_json_str(json).is_err());
    }

    #[test]
    fn test_empty_rule_fails_validation() {
        let json = r#"{ "PEAK": { "actions": [] } }"#;
        let err = RuleTable::from_json_str(json).unwrap_err();
        assert!(matches!(err, Error::Config(message) if message.contains("no actions")));
    }

    #[test]
    fn test_bad_template_fails_validation() {
        let json = r#"{ "PEAK": { "actions": [ { "action": "TEXT", "message": "{bogus}" } ] } }"#;
        let err = RuleTable::from_json_str(json).unwrap_err();
        assert!(matches!(err, Error::UnknownPlaceholder(token) if token == "bogus"));
    }

    #[test]
    fn test_defaults_fill_missing_props() {
        let json = r#"{ "PEAK": { "actions": [ { "action": "DOT" } ] } }"#;
        let table = RuleTable::from_json_str(json).unwrap();
        let ActionSpec::Dot(props) = &table.get(FeatureKind::Peak).unwrap().actions[0] else {
            panic!("expected a dot spec");
        };
        assert_eq!(props.size, 5.0);
        assert_eq!(props.color, "#000000");
    }
}
