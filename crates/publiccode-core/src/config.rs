//! Parser session configuration
//!
//! A `ParserConfig` is built up with the fluent setters and handed to
//! [`Parser::new`](crate::Parser::new); it is never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Configuration for one parser session.
///
/// Network access is disabled by default: checks that need it (URL
/// reachability, logo fetching, and similar) are skipped unless
/// explicitly enabled with [`ParserConfig::with_network`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    disable_network: bool,
    disable_external_checks: bool,
    branch: String,
    base_url: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            disable_network: true,
            disable_external_checks: false,
            branch: String::new(),
            base_url: String::new(),
        }
    }
}

impl ParserConfig {
    /// Default configuration: network disabled, no branch or base URL
    /// override.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable network-dependent checks.
    pub fn with_network(mut self, enabled: bool) -> Self {
        self.disable_network = !enabled;
        self
    }

    /// Enable or disable checks that consult resources outside the
    /// manifest itself.
    ///
    /// Carried for forward compatibility: the current native call
    /// surface has no parameter for it, so the value is observable on
    /// the config but not yet transmitted to the engine.
    pub fn with_external_checks(mut self, enabled: bool) -> Self {
        self.disable_external_checks = !enabled;
        self
    }

    /// Repository branch the engine should resolve relative URLs
    /// against. Empty means the engine's default branch.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Base URL used to resolve relative references in the manifest.
    /// Empty means no override.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn is_network_disabled(&self) -> bool {
        self.disable_network
    }

    pub fn are_external_checks_disabled(&self) -> bool {
        self.disable_external_checks
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
