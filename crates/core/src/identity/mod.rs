//! Identity mapping from GitHub logins (and `org/team` slugs) to Chatwork
//! addresses such as `[To:123]@mechiru`.
//!
//! Two sources are merged:
//! 1. Inline mapping from the action input (highest priority)
//! 2. Mapping file on disk (JSON, or TOML by extension)

pub mod mapper;
pub mod mapping_file;

pub use mapper::{merge_mapping, resolve_addresses, IdentityMapping, Resolution};
pub use mapping_file::MappingFile;
