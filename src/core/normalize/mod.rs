//! Field normalization used by the export engine
//!
//! - [`sanitize`] - filesystem-safe, length-bounded path segments
//! - [`phone`] - comma-split phone lists with canonical national variants
//! - [`organization`] - display names pulled out of legal-entity names

pub mod organization;
pub mod phone;
pub mod sanitize;

pub use organization::{extract_org_name, NO_ORGANIZATION};
pub use phone::{canonical_phone, normalize_phones, PhoneNumbers, NO_DATA};
pub use sanitize::{sanitize_name, sanitize_opt, MAX_SEGMENT_CHARS, UNKNOWN};
