//! Consumer credentials seeded from a JSON file at start-up.
//!
//! ```json
//! { "github": { "key": "...", "secret": "..." }, "auth0": { "key": "...", "secret": "...", "domain": "https://tenant.auth0.com" } }
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

/// Client credentials of one provider as written in the consumers file.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ConsumerCredentials {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub domain: Option<String>,
}

/// Read a consumers file, keyed by provider id.
pub fn load(path: &Path) -> io::Result<BTreeMap<String, ConsumerCredentials>> {
    let content = fs::read_to_string(path)?;
    parse(&content)
}

/// Parse the content of a consumers file.
pub fn parse(content: &str) -> io::Result<BTreeMap<String, ConsumerCredentials>> {
    Ok(serde_json::from_str(content)?)
}
