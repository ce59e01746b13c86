//! Validation and normalisation of knowledge-base API payloads.
//!
//! Every inbound payload is checked against a declared schema before it
//! reaches business logic. A payload either becomes a fully typed,
//! canonical record or is rejected with the complete list of violations,
//! each naming the offending field by its dotted path.
//!
//! # Overview
//!
//! - [`validate`] reads a JSON value as a typed record from [`schemas`].
//! - [`validate_named`] does the same for a schema known only by its
//!   [`SchemaName`], returning the normalised record as JSON.
//! - [`canonical`] holds the value transforms applied on success.
//! - [`rules`] holds the field rules records are declared with.
//!
//! # Example
//!
//! ```
//! use kb_schemas::{ViolationKind, schemas::ServiceCreate, validate};
//! use serde_json::json;
//!
//! let err = validate::<ServiceCreate>(&json!({
//!     "name": "Pets",
//!     "trainable": false,
//!     "max_trainable_score": 0.4,
//! }))
//! .expect_err("score without training");
//!
//! let violation = err.find("max_trainable_score").expect("score violation");
//! assert_eq!(violation.kind(), ViolationKind::CrossFieldViolation);
//! ```

pub mod canonical;
mod config;
mod error;
mod path;
mod record;
mod registry;
pub mod rules;
pub mod schemas;
mod wire_enum;

pub use config::ValidateSettings;
pub use error::{RegistryError, ValidationErrors, Violation, ViolationKind};
pub use pagination::{PageWindow, ParamSource, SortOrder};
pub use path::FieldPath;
pub use record::{RecordReader, RecordRules, Schema, validate};
pub use registry::{SchemaName, validate_named};
pub use wire_enum::WireEnum;
