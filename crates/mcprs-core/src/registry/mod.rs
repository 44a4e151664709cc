//! Resource template registry.
//!
//! Matches concrete `resources/read` URIs against registered
//! [`ResourceTemplate`](crate::types::resources::ResourceTemplate)s.

pub mod uri_template;

pub use uri_template::{match_resource_template, match_template};
