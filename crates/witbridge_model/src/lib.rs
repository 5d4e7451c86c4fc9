//! Revision and mapping-configuration model for the witbridge migration core.
//!
//! The migration pipeline fetches revisions from the source tracker and loads
//! the declarative mapping configuration; this crate defines the in-memory
//! shapes both are handed over in. The mapping engine consumes everything
//! here read-only.
//!
//! # Modules
//!
//! - [`value`]: the [`FieldValue`] variant type and its stringification
//!   contract
//! - [`revision`]: one historical snapshot of a source work item
//! - [`config`]: type map, field rules, and value-substitution tables

pub mod config;
pub mod revision;
pub mod value;

pub use config::{FieldRule, MappingConfig, RuleScope, TypeMapEntry, ValueMapping};
pub use revision::{AttachmentAction, AttachmentChange, Revision};
pub use value::FieldValue;
