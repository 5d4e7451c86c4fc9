//! First-match resolution of field-mapping rules.

use tracing::warn;
use witbridge_model::FieldRule;

/// Find the rule governing one (source field, target type) resolution.
///
/// Rules are scanned in configured order and the first match is used, even
/// when its substitution table turns out not to contain the needed literal.
/// A rule matches when its source field matches and either
///
/// - the declared target field matches (when one is required) and the scope
///   admits the resolved target type, or
/// - the rule carries a `not-for` exclusion list that does not name the
///   resolved target type. Target-field equality is not required on this
///   branch, which lets one rule cover a field across every target field
///   declaration for the non-excluded types.
///
/// Rules with an empty substitution table never match; without a match the
/// caller passes the raw value through verbatim.
///
/// `target_field` is `None` on the rendered-field path, where only the
/// source field and the applicability condition are checked.
pub fn resolve<'a>(
    rules: &'a [FieldRule],
    source_field: &str,
    target_field: Option<&str>,
    target_type: Option<&str>,
) -> Option<&'a FieldRule> {
    rules.iter().find(|rule| {
        if rule.source != source_field || rule.mapping.is_empty() {
            return false;
        }

        let in_scope = target_field.map_or(true, |wanted| rule.target == wanted)
            && rule
                .scope
                .as_ref()
                .is_some_and(|scope| scope.applies_to(target_type));

        let not_excluded = !rule.not_for.is_empty()
            && !target_type.is_some_and(|t| rule.not_for.iter().any(|excluded| excluded == t));

        in_scope || not_excluded
    })
}

/// Apply a rule's substitution table to one raw value rendering.
///
/// The lookup is an exact string match on the source literal; the first
/// entry wins. A missing entry, or one whose target literal is empty, yields
/// the empty string and a warning. The mapping still counts as found either
/// way; the returned flag reports whether the warning fired so callers can
/// audit without capturing log output.
pub fn apply_substitution(
    rule: &FieldRule,
    raw_text: &str,
    field_name: &str,
    item_type: &str,
) -> (String, bool) {
    let mapped = rule
        .mapping
        .iter()
        .find(|entry| entry.source == raw_text)
        .map(|entry| entry.target.clone())
        .unwrap_or_default();

    if mapped.is_empty() {
        warn!(
            "missing mapping value '{}' for field '{}' for item type '{}'",
            raw_text, field_name, item_type
        );
        return (mapped, true);
    }

    (mapped, false)
}
