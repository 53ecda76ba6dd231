//! Parser session lifecycle
//!
//! A [`Parser`] owns exactly one native engine session. The session
//! moves through `Unopened -> Open -> Closed` and `Closed` is
//! terminal: the handle is freed once, either by an explicit
//! [`Parser::close`] or by `Drop`, and never used again.

use std::cell::Cell;
use std::ffi::CString;
use std::marker::PhantomData;
use std::path::Path;

use crate::config::ParserConfig;
use crate::decode::RawOutcome;
use crate::engine::{engine, RawHandle, Symbols};
use crate::error::{Error, Result};
use crate::publiccode::PublicCode;

/// One open engine session.
///
/// Not `Sync`: a session backs one logical caller at a time. Parsing
/// from several threads needs one `Parser` each (the underlying
/// library binding is shared process-wide and safe to reuse).
#[derive(Debug)]
pub struct Parser {
    symbols: Symbols,
    /// `0` once closed; every native call asserts it is still live.
    handle: RawHandle,
    /// Keeps the type `!Sync`; a handle is single-caller by contract.
    _not_sync: PhantomData<Cell<()>>,
}

impl Parser {
    /// Opens a session with the given configuration, binding the
    /// native library first if this is the first session in the
    /// process.
    pub fn new(config: ParserConfig) -> Result<Self> {
        Self::open(engine()?.symbols(), &config)
    }

    pub(crate) fn open(symbols: Symbols, config: &ParserConfig) -> Result<Self> {
        let branch = c_string(config.branch(), "branch")?;
        let base_url = c_string(config.base_url(), "base URL")?;

        let handle = symbols.new_parser(
            config.is_network_disabled(),
            branch.as_ptr(),
            base_url.as_ptr(),
        );
        if handle == 0 {
            return Err(Error::init("failed to create parser"));
        }

        tracing::debug!(
            handle,
            network_disabled = config.is_network_disabled(),
            "opened parser session"
        );

        Ok(Self {
            symbols,
            handle,
            _not_sync: PhantomData,
        })
    }

    /// Parses and validates publiccode.yml content.
    ///
    /// Returns the decoded document, [`Error::Validation`] when the
    /// manifest fails the engine's rules, [`Error::Init`] when the
    /// parse call itself could not run, and [`Error::Internal`] when
    /// the engine's payload cannot be decoded.
    ///
    /// # Panics
    ///
    /// Panics if the session has been closed.
    pub fn parse(&self, content: &str) -> Result<PublicCode> {
        assert!(self.handle != 0, "parser session is closed");

        let content = c_string(content, "content")?;

        let raw = self.symbols.parse_string(self.handle, content.as_ptr());
        if raw.is_null() {
            return Err(Error::init("failed to parse publiccode.yml content"));
        }

        tracing::debug!(handle = self.handle, "parsed content");

        // From here the raw result is ours; `take` copies it out and
        // frees it exactly once before classification.
        let outcome = unsafe { RawOutcome::take(raw, self.symbols.free_result_fn()) };
        outcome.into_document()
    }

    /// Parses and validates a publiccode.yml file.
    ///
    /// A missing or unreadable file is an [`Error::Init`]; everything
    /// else behaves as [`Parser::parse`].
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<PublicCode> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::init_with(format!("cannot read file: {}", path.display()), e))?;

        self.parse(&content)
    }

    /// True iff `path` parses and validates, with every failure kind
    /// collapsed to `false`. Programming errors (a closed session)
    /// still panic.
    pub fn is_valid(&self, path: impl AsRef<Path>) -> bool {
        self.parse_file(path).is_ok()
    }

    /// Releases the native session. Idempotent: closing an
    /// already-closed session is a no-op.
    pub fn close(&mut self) {
        if self.handle != 0 {
            tracing::debug!(handle = self.handle, "closing parser session");
            self.symbols.free_parser(self.handle);
            self.handle = 0;
        }
    }
}

impl Drop for Parser {
    fn drop(&mut self) {
        self.close();
    }
}

fn c_string(value: &str, what: &str) -> Result<CString> {
    CString::new(value)
        .map_err(|e| Error::init_with(format!("{what} contains an interior NUL byte"), e))
}
