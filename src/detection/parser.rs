//! Version output parsing with regex extraction.

use regex::Regex;
use semver::Version;
use std::sync::OnceLock;

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // major.minor.patch, anywhere in the output
    RE.get_or_init(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").expect("Invalid regex pattern"))
}

/// Parse a semantic version from CLI output.
///
/// This function extracts a semantic version (major.minor.patch) from
/// arbitrary CLI output text. It handles the formats of the managed tools:
///
/// - `v22.11.0` -> 22.11.0
/// - `uvx 0.5.4` -> 0.5.4
/// - `codex-cli 0.87.0` -> 0.87.0
///
/// Returns `None` if no version pattern matches.
pub(crate) fn parse_version(output: &str) -> Option<Version> {
    let caps = version_regex().captures(output)?;
    Version::parse(caps.get(0)?.as_str()).ok()
}
