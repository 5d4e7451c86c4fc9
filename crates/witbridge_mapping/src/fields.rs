//! Facade over the mapping engine for the field kinds the pipeline emits.

use crate::error::MapError;
use crate::html::{HtmlFieldRewriter, HtmlSanitizer};
use crate::rank::RankCodec;
use crate::rules;
use rust_decimal::Decimal;
use witbridge_model::{MappingConfig, Revision};

/// Suffix the source tracker appends to the pre-rendered variant of a field.
pub const RENDERED_SUFFIX: &str = "$Rendered";

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Maps one revision's raw field values to normalized destination values.
///
/// One mapper lives for one migration run: it owns the rank cache for that
/// run and the rewriter for rendered fields. All other state is passed in
/// per call.
///
/// Presence is encoded with `Option`: `None` means the source field was
/// absent and the caller should not emit the destination field at all, while
/// `Some` with an empty value means "emit an empty value".
pub struct FieldMapper<S> {
    rank_codec: RankCodec,
    html: HtmlFieldRewriter<S>,
}

impl<S: HtmlSanitizer> FieldMapper<S> {
    pub fn new(sanitizer: S) -> Self {
        Self {
            rank_codec: RankCodec::new(),
            html: HtmlFieldRewriter::new(sanitizer),
        }
    }

    /// Destination title: the parent item's key prefixed onto the summary.
    pub fn map_title(&self, revision: &Revision) -> Option<String> {
        revision
            .field_text("summary")
            .map(|summary| format!("[{}] {}", revision.parent_key, summary))
    }

    /// Destination title without the parent-key prefix.
    pub fn map_title_without_key(&self, revision: &Revision) -> Option<String> {
        revision.field_text("summary")
    }

    /// Remaining work, converted from seconds to fractional hours.
    pub fn map_remaining_work(&self, seconds: Option<&str>) -> Result<f64, MapError> {
        let seconds = seconds.ok_or(MapError::MissingArgument("seconds"))?;
        let secs: f64 = seconds
            .trim()
            .parse()
            .map_err(|source| MapError::InvalidNumber {
                input: seconds.to_string(),
                source,
            })?;
        Ok(secs / SECONDS_PER_HOUR)
    }

    /// Map one plain field through the configured rules.
    ///
    /// The revision's type is resolved through the type map first; an absent
    /// source field skips the destination field. With a matching rule the
    /// substitution table decides the value (possibly empty, see
    /// [`rules::apply_substitution`]); without one the raw rendering passes
    /// through verbatim.
    pub fn map_value(
        &self,
        revision: &Revision,
        source_field: &str,
        target_field: &str,
        config: &MappingConfig,
    ) -> Option<String> {
        let target_type = config.target_type(&revision.item_type);
        let raw = revision.field_text(source_field)?;

        match rules::resolve(
            &config.field_map,
            source_field,
            Some(target_field),
            target_type,
        ) {
            Some(rule) => {
                let (mapped, _) =
                    rules::apply_substitution(rule, &raw, source_field, &revision.item_type);
                Some(mapped)
            }
            None => Some(raw),
        }
    }

    /// Map the pre-rendered (rich text) variant of a field.
    ///
    /// Custom fields carry their values under the configured custom name;
    /// either way the value lives under the `$Rendered`-suffixed key. Rule
    /// resolution on this path matches on the source field and applicability
    /// only. When no rule claims the field, the raw markup is rewritten for
    /// the destination instead of passing through untouched.
    pub fn map_rendered_value(
        &self,
        revision: &Revision,
        source_field: &str,
        is_custom: bool,
        custom_name: &str,
        config: &MappingConfig,
    ) -> Option<String> {
        let effective = if is_custom { custom_name } else { source_field };
        let field_name = format!("{effective}{RENDERED_SUFFIX}");

        let target_type = config.target_type(&revision.item_type);
        let raw = revision.field_text(&field_name)?;

        match rules::resolve(&config.field_map, &field_name, None, target_type) {
            Some(rule) => {
                let (mapped, _) =
                    rules::apply_substitution(rule, &raw, &field_name, &revision.item_type);
                Some(mapped)
            }
            None => Some(self.html.rewrite(&raw, revision)),
        }
    }

    /// Space-separated source labels to `;`-separated destination tags.
    pub fn map_tags(&self, labels: Option<&str>) -> Result<String, MapError> {
        let labels = labels.ok_or(MapError::MissingArgument("labels"))?;
        if labels.trim().is_empty() {
            return Ok(String::new());
        }
        Ok(labels.split(' ').collect::<Vec<_>>().join(";"))
    }

    /// Comma-separated source values to `;`-separated destination values.
    ///
    /// A blank input maps to "no value" rather than an empty value, so the
    /// caller drops the destination field instead of emitting an empty one.
    pub fn map_array(&self, field: Option<&str>) -> Result<Option<String>, MapError> {
        let field = field.ok_or(MapError::MissingArgument("field"))?;
        if field.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(field.split(',').collect::<Vec<_>>().join(";")))
    }

    /// Pick the destination iteration path from a comma-separated list.
    ///
    /// The last entry wins: a work item sits in exactly one sprint on the
    /// destination, and the source lists them oldest first.
    pub fn map_sprint(&self, iteration_paths: Option<&str>) -> Option<String> {
        let paths = iteration_paths?;
        if paths.trim().is_empty() {
            return None;
        }
        paths.split(',').map(str::trim).last().map(str::to_string)
    }

    /// Decode a lexicographic rank into the destination ordering key.
    ///
    /// A missing or undecodable rank yields [`crate::rank::RANK_MAX`], so
    /// unranked items sort last.
    pub fn map_lexo_rank(&self, rank: Option<&str>) -> Decimal {
        self.rank_codec.decode(rank.unwrap_or_default())
    }
}
