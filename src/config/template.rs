//! Template fetching and placeholder substitution.

use super::MaterializeError;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Url;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Replace every declared placeholder token in `template`.
///
/// Replacement is a single left-to-right pass over exact tokens: values are
/// never re-scanned, and text that merely resembles a token is left alone.
///
/// # Example
///
/// ```rust
/// use agent_bootstrap::substitute;
/// use std::collections::BTreeMap;
///
/// let values = BTreeMap::from([("__DIR__".to_string(), "/work".to_string())]);
/// assert_eq!(substitute("root = \"__DIR__\" # __DIR", &values), "root = \"/work\" # __DIR");
/// ```
pub fn substitute(template: &str, values: &BTreeMap<String, String>) -> String {
    if values.is_empty() {
        return template.to_string();
    }

    // Longest first so a token that prefixes another cannot win the alternation.
    let mut tokens: Vec<&String> = values.keys().filter(|t| !t.is_empty()).collect();
    tokens.sort_by(|a, b| b.len().cmp(&a.len()));
    let pattern = tokens
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");

    match Regex::new(&pattern) {
        Ok(re) => re
            .replace_all(template, |caps: &regex::Captures<'_>| {
                values.get(&caps[0]).cloned().unwrap_or_default()
            })
            .into_owned(),
        // Escaped literals always compile; keep the template intact regardless.
        Err(_) => template.to_string(),
    }
}

/// Fetches template bytes from a URL.
#[async_trait]
pub trait TemplateFetcher: Send + Sync {
    /// Fetch the body at `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, MaterializeError>;
}

/// [`TemplateFetcher`] over HTTPS.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with a default client.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Validates that a template URL is safe to fetch.
fn validate_url(url: &str) -> Result<Url, MaterializeError> {
    let parsed = Url::parse(url).map_err(|e| MaterializeError::InsecureUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    if parsed.scheme() != "https" {
        return Err(MaterializeError::InsecureUrl {
            url: url.to_string(),
            reason: "only https is allowed".to_string(),
        });
    }
    Ok(parsed)
}

#[async_trait]
impl TemplateFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, MaterializeError> {
        let parsed = validate_url(url)?;
        let failed = |message: String| MaterializeError::FetchFailed {
            url: url.to_string(),
            message,
        };

        tracing::debug!("fetching template {url}");
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;
        if !response.status().is_success() {
            return Err(failed(format!("HTTP {}", response.status())));
        }
        let bytes = response.bytes().await.map_err(|e| failed(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Remote templates downloaded into a temporary directory.
///
/// The directory and everything in it is removed when the stage is dropped,
/// on success and error paths alike.
#[derive(Debug)]
pub struct TemplateStage {
    dir: TempDir,
    files: HashMap<String, PathBuf>,
}

impl TemplateStage {
    /// Fetch every URL; fails as a whole if any single fetch fails.
    pub async fn fetch_all(
        fetcher: &dyn TemplateFetcher,
        urls: &[String],
    ) -> Result<Self, MaterializeError> {
        let dir = tempfile::Builder::new()
            .prefix("agent-bootstrap-templates.")
            .tempdir()
            .map_err(|e| MaterializeError::io("creating staging directory in", std::env::temp_dir(), e))?;

        let mut files = HashMap::new();
        for (index, url) in urls.iter().enumerate() {
            let bytes = fetcher.fetch(url).await?;
            let path = dir.path().join(format!("{index}-{}", file_name(url)));
            std::fs::write(&path, bytes).map_err(|e| MaterializeError::io("staging", &path, e))?;
            files.insert(url.clone(), path);
        }

        Ok(Self { dir, files })
    }

    /// Local path of a fetched URL.
    pub fn path_for(&self, url: &str) -> Option<&Path> {
        self.files.get(url).map(PathBuf::as_path)
    }

    /// The staging directory.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

fn file_name(url: &str) -> String {
    url.rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("template")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect()
}
