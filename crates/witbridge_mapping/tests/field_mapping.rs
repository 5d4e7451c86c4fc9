//! End-to-end tests for the field mapping engine.
//!
//! Walks realistic revisions through the full facade with a configuration
//! deserialized from JSON, the way the pipeline hands it over.

use rust_decimal::Decimal;
use std::str::FromStr;
use witbridge_mapping::{FieldMapper, HtmlSanitizer, RANK_MAX};
use witbridge_model::{AttachmentChange, MappingConfig, Revision};

fn config() -> MappingConfig {
    serde_json::from_str(
        r#"{
            "type_map": [
                { "source": "Story", "target": "User Story" },
                { "source": "Bug", "target": "Bug" }
            ],
            "field_map": [
                {
                    "source": "priority",
                    "target": "Priority",
                    "for": "All",
                    "mapping": [
                        { "source": "Highest", "target": "1" },
                        { "source": "High", "target": "2" },
                        { "source": "Low", "target": "3" },
                        { "source": "Lowest", "target": "4" }
                    ]
                },
                {
                    "source": "status",
                    "target": "State",
                    "for": ["Bug"],
                    "mapping": [
                        { "source": "Done", "target": "Resolved" }
                    ]
                },
                {
                    "source": "status",
                    "target": "State",
                    "not-for": ["Bug"],
                    "mapping": [
                        { "source": "Done", "target": "Closed" }
                    ]
                }
            ]
        }"#,
    )
    .expect("mapping config")
}

fn sanitizer() -> impl HtmlSanitizer {
    |html: &str| html.replace("<font>", "").replace("</font>", "")
}

fn story(id: &str) -> Revision {
    Revision::new(id, "Story", "PROJ-42")
        .with_field("summary", "Ship the importer")
        .with_field("priority", "Highest")
        .with_field("status", "Done")
        .with_field("labels", "backend importer q3")
        .with_field("components", "api,worker")
        .with_field("sprints", "Sprint 1, Sprint 2, Sprint 3")
        .with_field("description$Rendered", "<p>as a <font>user</font></p>")
}

// =============================================================================
// SCALAR MAPPERS
// =============================================================================

#[test]
fn titles_and_scalars_map_end_to_end() {
    let mapper = FieldMapper::new(sanitizer());
    let revision = story("ISSUE-7/2");

    assert_eq!(
        mapper.map_title(&revision).as_deref(),
        Some("[PROJ-42] Ship the importer")
    );
    assert_eq!(
        mapper.map_tags(Some("backend importer q3")).unwrap(),
        "backend;importer;q3"
    );
    assert_eq!(
        mapper.map_array(Some("api,worker")).unwrap().as_deref(),
        Some("api;worker")
    );
    assert_eq!(
        mapper.map_sprint(Some("Sprint 1, Sprint 2, Sprint 3")).as_deref(),
        Some("Sprint 3")
    );
    assert_eq!(mapper.map_remaining_work(Some("5400")).unwrap(), 1.5);
}

// =============================================================================
// RULE RESOLUTION ACROSS TARGET TYPES
// =============================================================================

#[test]
fn all_scoped_rule_applies_to_every_target_type() {
    let mapper = FieldMapper::new(sanitizer());
    let config = config();

    let story = story("ISSUE-7/2");
    let bug = Revision::new("ISSUE-8/1", "Bug", "PROJ-42").with_field("priority", "Lowest");
    let unmapped = Revision::new("ISSUE-9/1", "Epic", "PROJ-42").with_field("priority", "High");

    assert_eq!(
        mapper.map_value(&story, "priority", "Priority", &config),
        Some("1".to_string())
    );
    assert_eq!(
        mapper.map_value(&bug, "priority", "Priority", &config),
        Some("4".to_string())
    );
    // "Epic" has no type-map entry; the All scope still applies.
    assert_eq!(
        mapper.map_value(&unmapped, "priority", "Priority", &config),
        Some("2".to_string())
    );
}

#[test]
fn scoped_and_negated_rules_split_by_target_type() {
    let mapper = FieldMapper::new(sanitizer());
    let config = config();

    // Bug resolves through the ["Bug"]-scoped rule.
    let bug = Revision::new("ISSUE-8/1", "Bug", "PROJ-42").with_field("status", "Done");
    assert_eq!(
        mapper.map_value(&bug, "status", "State", &config),
        Some("Resolved".to_string())
    );

    // Story is excluded from the first rule and caught by the not-for rule.
    let story = story("ISSUE-7/2");
    assert_eq!(
        mapper.map_value(&story, "status", "State", &config),
        Some("Closed".to_string())
    );
}

#[test]
fn missing_substitution_literal_still_counts_as_found() {
    let mapper = FieldMapper::new(sanitizer());
    let config = config();

    let revision = Revision::new("ISSUE-7/3", "Story", "PROJ-42")
        .with_field("priority", "Blocker");

    // The rule matches but its table has no entry for "Blocker".
    assert_eq!(
        mapper.map_value(&revision, "priority", "Priority", &config),
        Some(String::new())
    );
}

#[test]
fn unruled_fields_pass_through_verbatim() {
    let mapper = FieldMapper::new(sanitizer());
    let config = config();

    let revision = Revision::new("ISSUE-7/4", "Story", "PROJ-42")
        .with_field("reporter", "j.doe");

    assert_eq!(
        mapper.map_value(&revision, "reporter", "Created By", &config),
        Some("j.doe".to_string())
    );
}

// =============================================================================
// RENDERED FIELDS
// =============================================================================

#[test]
fn rendered_field_is_sanitized_and_styled() {
    let mapper = FieldMapper::new(sanitizer());
    let config = config();
    let revision = story("ISSUE-7/2");

    let out = mapper
        .map_rendered_value(&revision, "description", false, "", &config)
        .expect("rendered value");

    assert!(out.starts_with("<style>"));
    assert!(out.contains("<p>as a user</p>"));
    assert!(!out.contains("<font>"));
}

#[test]
fn rendered_field_keeps_added_attachment_references() {
    let mapper = FieldMapper::new(sanitizer());
    let config = config();

    let url = "https://tracker.example/secure/attachment/10020/trace.log";
    let revision = Revision::new("ISSUE-7/5", "Story", "PROJ-42")
        .with_field(
            "description$Rendered",
            format!("<p>log: <a href=\"{url}\">trace</a></p>"),
        )
        .with_attachment(AttachmentChange::Added, url);

    let out = mapper
        .map_rendered_value(&revision, "description", false, "", &config)
        .expect("rendered value");
    assert!(out.contains(url));
}

#[test]
fn absent_rendered_variant_is_skipped() {
    let mapper = FieldMapper::new(sanitizer());
    let config = config();

    let revision = Revision::new("ISSUE-7/6", "Story", "PROJ-42").with_field("description", "x");
    assert_eq!(
        mapper.map_rendered_value(&revision, "description", false, "", &config),
        None
    );
}

// =============================================================================
// RANK DECODING ACROSS A RUN
// =============================================================================

#[test]
fn ranks_order_items_within_one_run() {
    let mapper = FieldMapper::new(sanitizer());

    let first = mapper.map_lexo_rank(Some("0|hzzzzz:"));
    let second = mapper.map_lexo_rank(Some("0|i0000f:"));
    let third = mapper.map_lexo_rank(Some("0|i0000f:0004"));
    let unranked = mapper.map_lexo_rank(Some("not a rank"));

    assert!(first < second);
    assert!(second < third);
    assert!(third < unranked);
    assert_eq!(unranked, RANK_MAX);

    // Deterministic across repeated decodes of the same string.
    assert_eq!(mapper.map_lexo_rank(Some("0|hzzzzz:")), first);
}

#[test]
fn rank_decodes_to_the_documented_formula() {
    let mapper = FieldMapper::new(sanitizer());

    // base36("abc") = 13368, base36("def") = 17367, combined as decimal
    // digits around the point. The bucket digit is not part of the value.
    assert_eq!(
        mapper.map_lexo_rank(Some("0|abc:def")),
        Decimal::from_str("13368.17367").unwrap()
    );
    assert_eq!(
        mapper.map_lexo_rank(Some("1|abc:def")),
        Decimal::from_str("13368.17367").unwrap()
    );
}
