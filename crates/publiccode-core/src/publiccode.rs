//! Decoded publiccode.yml document
//!
//! A [`PublicCode`] is an immutable view over the mapping the engine
//! produced for a manifest that passed validation. The named accessors
//! cover the well-known fields; [`PublicCode::get`] is the
//! forward-compatible escape hatch for everything else.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A successfully parsed publiccode.yml manifest.
///
/// Immutable after construction and owned solely by the caller; it
/// holds no reference to the session or to any native memory.
#[derive(Debug, Clone, Serialize)]
pub struct PublicCode {
    #[serde(flatten)]
    data: Map<String, Value>,
    #[serde(skip)]
    warnings: Vec<String>,
}

impl PublicCode {
    /// Wraps an already-decoded manifest mapping.
    pub fn new(data: Map<String, Value>) -> Self {
        Self {
            data,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn with_warnings(data: Map<String, Value>, warnings: Vec<String>) -> Self {
        Self { data, warnings }
    }

    /// Mandatory field: the publiccode.yml format version.
    ///
    /// # Panics
    ///
    /// Panics if the field is missing or not a string. The engine
    /// guarantees it for validated documents, so absence is a data
    /// error, surfaced loudly rather than defaulted.
    pub fn publiccode_yml_version(&self) -> &str {
        self.required_str("publiccodeYmlVersion")
    }

    /// Mandatory field: the software name.
    ///
    /// # Panics
    ///
    /// Panics if the field is missing or not a string.
    pub fn name(&self) -> &str {
        self.required_str("name")
    }

    /// Mandatory field: the repository URL.
    ///
    /// # Panics
    ///
    /// Panics if the field is missing or not a string.
    pub fn url(&self) -> &str {
        self.required_str("url")
    }

    pub fn application_suite(&self) -> Option<&str> {
        self.optional_str("applicationSuite")
    }

    pub fn landing_url(&self) -> Option<&str> {
        self.optional_str("landingURL")
    }

    pub fn software_version(&self) -> Option<&str> {
        self.optional_str("softwareVersion")
    }

    pub fn logo(&self) -> Option<&str> {
        self.optional_str("logo")
    }

    pub fn roadmap(&self) -> Option<&str> {
        self.optional_str("roadmap")
    }

    /// The `isBasedOn` field normalized to a list: absent or null is
    /// empty, a lone string becomes a one-element list, a sequence is
    /// returned as-is.
    pub fn is_based_on(&self) -> Vec<String> {
        match self.data.get("isBasedOn") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(s)) => vec![s.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
            Some(_) => Vec::new(),
        }
    }

    /// Short description for `language` (an ISO tag such as `en` or
    /// `en_GB`); `None` when the language or sub-field is missing.
    pub fn description(&self, language: &str) -> Option<&str> {
        self.localized(language, "shortDescription")?.as_str()
    }

    /// Long description for `language`; `None` when missing.
    pub fn long_description(&self, language: &str) -> Option<&str> {
        self.localized(language, "longDescription")?.as_str()
    }

    /// Feature list for `language`; empty when the language or the
    /// sub-field is missing.
    pub fn features(&self, language: &str) -> Vec<String> {
        match self.localized(language, "features") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// The whole localized description block, keyed by language tag.
    pub fn descriptions(&self) -> Option<&Map<String, Value>> {
        self.data.get("description")?.as_object()
    }

    /// The maintenance mapping. Index it like
    /// `doc.maintenance()["type"]`; absent keys yield `Value::Null`.
    pub fn maintenance(&self) -> &Value {
        self.data.get("maintenance").unwrap_or(&Value::Null)
    }

    pub fn license(&self) -> Option<&str> {
        self.data.get("legal")?.get("license")?.as_str()
    }

    pub fn repo_owner(&self) -> Option<&str> {
        self.data.get("legal")?.get("repoOwner")?.as_str()
    }

    pub fn categories(&self) -> Vec<String> {
        self.string_list("categories")
    }

    pub fn platforms(&self) -> Vec<String> {
        self.string_list("platforms")
    }

    /// The release date, parsed from its ISO `YYYY-MM-DD` form on each
    /// access. Absence is `Ok(None)`; a malformed value is a data
    /// error reported at access time, not at decode time.
    pub fn release_date(&self) -> Result<Option<NaiveDate>> {
        match self.data.get("releaseDate") {
            None | Some(Value::Null) => Ok(None),
            Some(value) => {
                let text = value.as_str().ok_or_else(|| {
                    Error::internal(format!("releaseDate is not a string: {value}"))
                })?;
                let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| {
                    Error::internal(format!("invalid releaseDate {text:?}: {e}"))
                })?;
                Ok(Some(date))
            }
        }
    }

    /// Mandatory field: the development status (`stable`, `beta`, ...).
    ///
    /// # Panics
    ///
    /// Panics if the field is missing or not a string.
    pub fn development_status(&self) -> &str {
        self.required_str("developmentStatus")
    }

    /// Mandatory field: the software type.
    ///
    /// # Panics
    ///
    /// Panics if the field is missing or not a string.
    pub fn software_type(&self) -> &str {
        self.required_str("softwareType")
    }

    /// Generic lookup for fields without a named accessor.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Non-fatal messages the engine emitted alongside a successful
    /// parse, in emission order.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// The underlying decoded mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Canonical JSON encoding of the decoded mapping.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.data)
            .map_err(|e| Error::internal(format!("failed to encode document as JSON: {e}")))
    }

    fn required_str(&self, key: &str) -> &str {
        match self.data.get(key).and_then(Value::as_str) {
            Some(value) => value,
            None => panic!("publiccode.yml field `{key}` is missing or not a string"),
        }
    }

    fn optional_str(&self, key: &str) -> Option<&str> {
        self.data.get(key)?.as_str()
    }

    fn localized(&self, language: &str, field: &str) -> Option<&Value> {
        self.data.get("description")?.get(language)?.get(field)
    }

    fn string_list(&self, key: &str) -> Vec<String> {
        match self.data.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
            _ => Vec::new(),
        }
    }
}
