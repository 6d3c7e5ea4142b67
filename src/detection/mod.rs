//! Detection implementation submodule.
//!
//! This module contains the internal implementation details for probing
//! tools on the system. It provides:
//!
//! - `find_executable`: search-path lookup with fallback directories
//! - `find_executable_excluding`: the same lookup, skipping given trees
//! - `query_version`: runs a tool's version query and captures the output
//! - `parse_version`: regex-based version extraction from CLI output

mod parser;
mod path_finder;
mod version;

pub(crate) use parser::parse_version;
pub(crate) use path_finder::{find_executable, find_executable_excluding};
pub(crate) use version::query_version;
