//! Field-value mapping and normalization engine for work-item migration.
//!
//! Given one source [`Revision`](witbridge_model::Revision) and a declarative
//! [`MappingConfig`](witbridge_model::MappingConfig), the engine produces
//! normalized values for the destination system's fields. It is invoked once
//! per (revision, field) pair by the surrounding pipeline and neither fetches
//! nor persists anything.
//!
//! # Modules
//!
//! - [`rules`]: first-match resolution of configured field rules and literal
//!   value substitution
//! - [`rank`]: lexicographic rank decoding with duplicate and collision
//!   tracking across one migration run
//! - [`html`]: rendered-field rewriting (attachment URLs, sanitizer seam,
//!   bundled stylesheet)
//! - [`fields`]: the per-run [`FieldMapper`] facade the pipeline calls
//!
//! Hard failures are limited to caller-contract violations ([`MapError`]).
//! Data-quality problems are logged as warnings and the affected mapping
//! degrades to a defined output, so one malformed field never aborts a run.

pub mod error;
pub mod fields;
pub mod html;
pub mod rank;
pub mod rules;

pub use error::MapError;
pub use fields::{FieldMapper, RENDERED_SUFFIX};
pub use html::{HtmlFieldRewriter, HtmlSanitizer};
pub use rank::{RankCodec, RANK_MAX};
