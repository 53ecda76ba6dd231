//! publiccode-core - Safe bindings to the publiccode-parser engine
//!
//! This crate wraps the native publiccode-parser shared library (a Go
//! cdylib) behind a typed, memory-safe Rust surface for parsing and
//! validating publiccode.yml manifests. The engine does the heavy
//! lifting: YAML decoding, schema validation, network-dependent
//! checks, line/column diagnostics. This crate owns the boundary: it
//! locates and binds the library, manages session and result
//! lifetimes, and turns the engine's tagged-union output into either a
//! decoded [`PublicCode`] document or a typed [`Error`].
//!
//! # Main Components
//!
//! - **Configuration**: [`ParserConfig`] for per-session settings
//!   (network toggle, branch and base-URL overrides)
//! - **Sessions**: [`Parser`] owns one native session and releases it
//!   exactly once
//! - **Documents**: [`PublicCode`], an immutable facade with typed
//!   accessors over the decoded manifest
//! - **Error Handling**: the three-kind taxonomy in [`error`]
//!
//! # Example
//!
//! ```no_run
//! use publiccode_core::{Parser, ParserConfig, Result};
//!
//! fn example() -> Result<()> {
//!     let parser = Parser::new(ParserConfig::default())?;
//!     let doc = parser.parse_file("publiccode.yml")?;
//!     println!("{} at {}", doc.name(), doc.url());
//!     Ok(())
//! }
//! ```

pub mod config;
mod decode;
mod engine;
pub mod error;
pub mod parser;
pub mod publiccode;

pub use config::ParserConfig;
pub use error::{Error, Result};
pub use parser::Parser;
pub use publiccode::PublicCode;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_error_kinds_are_distinct() {
        let init = Error::Init {
            message: "failed to create parser".to_string(),
            source: None,
        };
        let validation = Error::Validation {
            message: String::new(),
            errors: Vec::new(),
        };
        assert!(!init.is_validation());
        assert!(validation.is_validation());
    }
}
