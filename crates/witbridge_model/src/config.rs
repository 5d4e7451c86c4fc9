//! In-memory model of the declarative mapping configuration.
//!
//! Loading and validating the configuration file is the pipeline's job; this
//! module only defines the shape the engine consumes. Both maps are ordered
//! and resolved first-match-wins, so configuration order is meaningful.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Maps one source work-item type to a destination work-item type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMapEntry {
    pub source: String,
    pub target: String,
}

/// One source-literal to target-literal substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueMapping {
    pub source: String,
    pub target: String,
}

/// Which target work-item types a field rule applies to.
///
/// Serialized either as the literal string `"All"` or as a list of type
/// names, matching the configuration file format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleScope {
    /// The rule applies to every target type.
    All,
    /// The rule applies only to the listed target types.
    Types(Vec<String>),
}

impl RuleScope {
    /// Whether a resolved target type falls inside this scope.
    ///
    /// `All` admits everything, including a revision whose source type has
    /// no entry in the type map; `Types` requires a resolved, listed type.
    pub fn applies_to(&self, target_type: Option<&str>) -> bool {
        match self {
            RuleScope::All => true,
            RuleScope::Types(types) => {
                target_type.is_some_and(|t| types.iter().any(|candidate| candidate == t))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RuleScopeRepr {
    Keyword(String),
    Types(Vec<String>),
}

impl Serialize for RuleScope {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            RuleScope::All => serializer.serialize_str("All"),
            RuleScope::Types(types) => types.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for RuleScope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RuleScopeRepr::deserialize(deserializer)? {
            RuleScopeRepr::Keyword(word) if word == "All" => Ok(RuleScope::All),
            RuleScopeRepr::Keyword(word) => Err(de::Error::custom(format!(
                "unknown scope keyword `{word}`, expected \"All\" or a list of type names"
            ))),
            RuleScopeRepr::Types(types) => Ok(RuleScope::Types(types)),
        }
    }
}

/// One configured directive describing how a source field's value becomes a
/// target field's value, optionally restricted by target work-item type and
/// optionally substituting literal values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Source field name, matched case-sensitively.
    pub source: String,
    /// Target field name.
    pub target: String,
    /// Target types the rule applies to (`"All"` or an explicit list).
    #[serde(rename = "for", default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<RuleScope>,
    /// Target types the rule applies to everything except.
    #[serde(rename = "not-for", default, skip_serializing_if = "Vec::is_empty")]
    pub not_for: Vec<String>,
    /// Ordered source-literal to target-literal substitutions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mapping: Vec<ValueMapping>,
}

impl FieldRule {
    /// Create a rule with no scope restriction and no substitution table.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            scope: None,
            not_for: Vec::new(),
            mapping: Vec::new(),
        }
    }

    /// Restrict the rule to a scope.
    pub fn with_scope(mut self, scope: RuleScope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Exclude target types from the rule.
    pub fn with_not_for<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.not_for = types.into_iter().map(Into::into).collect();
        self
    }

    /// Append one substitution entry.
    pub fn with_mapping(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.mapping.push(ValueMapping {
            source: source.into(),
            target: target.into(),
        });
        self
    }
}

/// Declarative mapping configuration, consumed read-only by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Ordered (source type, target type) pairs; first match wins.
    #[serde(default)]
    pub type_map: Vec<TypeMapEntry>,
    /// Ordered field-mapping rules; the resolver accepts the first match.
    #[serde(default)]
    pub field_map: Vec<FieldRule>,
}

impl MappingConfig {
    /// Resolve the destination work-item type for a source type.
    ///
    /// Returns `None` when the type map has no entry for the source type.
    pub fn target_type(&self, source_type: &str) -> Option<&str> {
        self.type_map
            .iter()
            .find(|entry| entry.source == source_type)
            .map(|entry| entry.target.as_str())
    }

    /// Append a type-map entry.
    pub fn with_type(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.type_map.push(TypeMapEntry {
            source: source.into(),
            target: target.into(),
        });
        self
    }

    /// Append a field rule.
    pub fn with_rule(mut self, rule: FieldRule) -> Self {
        self.field_map.push(rule);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_type_takes_first_match() {
        let config = MappingConfig::default()
            .with_type("Story", "User Story")
            .with_type("Story", "Feature")
            .with_type("Bug", "Bug");

        assert_eq!(config.target_type("Story"), Some("User Story"));
        assert_eq!(config.target_type("Epic"), None);
    }

    #[test]
    fn scope_applies_to_resolved_types_only() {
        let all = RuleScope::All;
        assert!(all.applies_to(Some("Bug")));
        assert!(all.applies_to(None));

        let listed = RuleScope::Types(vec!["Bug".to_string(), "Task".to_string()]);
        assert!(listed.applies_to(Some("Bug")));
        assert!(!listed.applies_to(Some("Epic")));
        assert!(!listed.applies_to(None));
    }

    #[test]
    fn scope_serde_round_trips_both_forms() {
        let all: RuleScope = serde_json::from_str("\"All\"").unwrap();
        assert_eq!(all, RuleScope::All);
        assert_eq!(serde_json::to_string(&all).unwrap(), "\"All\"");

        let listed: RuleScope = serde_json::from_str("[\"Task\",\"Bug\"]").unwrap();
        assert_eq!(
            listed,
            RuleScope::Types(vec!["Task".to_string(), "Bug".to_string()])
        );
        assert_eq!(
            serde_json::to_string(&listed).unwrap(),
            "[\"Task\",\"Bug\"]"
        );

        let err = serde_json::from_str::<RuleScope>("\"None\"");
        assert!(err.is_err());
    }

    #[test]
    fn field_rule_deserializes_from_config_json() {
        let rule: FieldRule = serde_json::from_str(
            r#"{
                "source": "priority",
                "target": "Microsoft.VSTS.Common.Priority",
                "for": "All",
                "mapping": [
                    { "source": "Highest", "target": "1" },
                    { "source": "Lowest", "target": "4" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(rule.scope, Some(RuleScope::All));
        assert!(rule.not_for.is_empty());
        assert_eq!(rule.mapping.len(), 2);
    }
}
