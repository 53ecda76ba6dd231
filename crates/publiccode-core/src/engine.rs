//! Native engine binding
//!
//! Locates the publiccode-parser shared library on disk, loads it, and
//! resolves the four boundary symbols. The binding is process-wide
//! state: it is initialized lazily on the first session open, exactly
//! once, and never torn down (process exit reclaims it).
//!
//! The raw types in this module mirror the engine's C layout exactly
//! and never leak outside the crate.

use std::os::raw::{c_char, c_int};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use libloading::Library;

use crate::error::{Error, Result};

/// Per-call result, allocated by the engine and released through the
/// `FreeResult` symbol exactly once.
#[repr(C)]
pub(crate) struct RawParseResult {
    pub data: *mut c_char,
    pub error: *mut c_char,
    pub error_count: c_int,
    pub errors: *mut *mut c_char,
    pub warning_count: c_int,
    pub warnings: *mut *mut c_char,
}

/// Opaque session handle; `0` means the call failed.
pub(crate) type RawHandle = usize;

pub(crate) type NewParserFn =
    unsafe extern "C" fn(bool, *const c_char, *const c_char) -> RawHandle;
pub(crate) type ParseStringFn =
    unsafe extern "C" fn(RawHandle, *const c_char) -> *mut RawParseResult;
pub(crate) type FreeResultFn = unsafe extern "C" fn(*mut RawParseResult);
pub(crate) type FreeParserFn = unsafe extern "C" fn(RawHandle);

#[cfg(target_os = "macos")]
const LIBRARY_FILE: &str = "libpubliccode-parser.dylib";
#[cfg(target_os = "windows")]
const LIBRARY_FILE: &str = "publiccode-parser.dll";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const LIBRARY_FILE: &str = "libpubliccode-parser.so";

/// Candidate directories, searched in order.
fn search_dirs() -> Vec<PathBuf> {
    vec![
        PathBuf::from("."),
        PathBuf::from("./lib"),
        PathBuf::from("/usr/local/lib"),
        PathBuf::from("/usr/lib"),
    ]
}

/// Returns the first candidate directory containing the library file.
/// Existence checks only; nothing is loaded here.
fn locate_in(dirs: &[PathBuf]) -> Result<PathBuf> {
    for dir in dirs {
        let candidate = dir.join(LIBRARY_FILE);
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    let searched: Vec<String> = dirs.iter().map(|d| d.display().to_string()).collect();
    Err(Error::init(format!(
        "{LIBRARY_FILE} not found (searched: {})",
        searched.join(", ")
    )))
}

/// The four boundary calls as plain function pointers.
///
/// Sessions hold a copy of this table instead of the engine itself, so
/// the lifecycle can also be driven by stand-in functions in tests.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Symbols {
    new_parser: NewParserFn,
    parse_string: ParseStringFn,
    free_result: FreeResultFn,
    free_parser: FreeParserFn,
}

impl Symbols {
    pub(crate) fn new(
        new_parser: NewParserFn,
        parse_string: ParseStringFn,
        free_result: FreeResultFn,
        free_parser: FreeParserFn,
    ) -> Self {
        Self {
            new_parser,
            parse_string,
            free_result,
            free_parser,
        }
    }

    pub(crate) fn new_parser(
        &self,
        disable_network: bool,
        branch: *const c_char,
        base_url: *const c_char,
    ) -> RawHandle {
        unsafe { (self.new_parser)(disable_network, branch, base_url) }
    }

    pub(crate) fn parse_string(
        &self,
        handle: RawHandle,
        content: *const c_char,
    ) -> *mut RawParseResult {
        unsafe { (self.parse_string)(handle, content) }
    }

    pub(crate) fn free_result_fn(&self) -> FreeResultFn {
        self.free_result
    }

    pub(crate) fn free_parser(&self, handle: RawHandle) {
        unsafe { (self.free_parser)(handle) }
    }
}

/// The loaded engine: the library handle plus its resolved symbols.
///
/// The function pointers are copied out of their `Symbol` wrappers;
/// `_library` keeps the mapping alive for the life of the process.
pub(crate) struct Engine {
    _library: Library,
    symbols: Symbols,
}

impl Engine {
    fn load_from(path: &Path) -> Result<Engine> {
        tracing::debug!(path = %path.display(), "loading publiccode-parser library");

        let library = unsafe { Library::new(path) }.map_err(|e| {
            Error::init_with(
                format!("failed to load publiccode-parser library {}", path.display()),
                e,
            )
        })?;

        unsafe {
            let new_parser = *library
                .get::<NewParserFn>(b"NewParser")
                .map_err(|e| Error::init_with("missing symbol NewParser", e))?;
            let parse_string = *library
                .get::<ParseStringFn>(b"ParseString")
                .map_err(|e| Error::init_with("missing symbol ParseString", e))?;
            let free_result = *library
                .get::<FreeResultFn>(b"FreeResult")
                .map_err(|e| Error::init_with("missing symbol FreeResult", e))?;
            let free_parser = *library
                .get::<FreeParserFn>(b"FreeParser")
                .map_err(|e| Error::init_with("missing symbol FreeParser", e))?;

            Ok(Engine {
                _library: library,
                symbols: Symbols::new(new_parser, parse_string, free_result, free_parser),
            })
        }
    }

    pub(crate) fn symbols(&self) -> Symbols {
        self.symbols
    }
}

static ENGINE: OnceLock<Engine> = OnceLock::new();
static ENGINE_INIT: Mutex<()> = Mutex::new(());

/// The process-wide engine binding, loading it on first use.
///
/// First use is serialized by a mutex so concurrent callers do not
/// both load the library; once set, the binding is never replaced.
pub(crate) fn engine() -> Result<&'static Engine> {
    if let Some(engine) = ENGINE.get() {
        return Ok(engine);
    }

    let _guard = ENGINE_INIT
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(engine) = ENGINE.get() {
        return Ok(engine);
    }

    let path = locate_in(&search_dirs())?;
    let loaded = Engine::load_from(&path)?;
    Ok(ENGINE.get_or_init(|| loaded))
}
