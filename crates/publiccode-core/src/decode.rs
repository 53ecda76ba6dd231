//! Boundary result decoding
//!
//! Decoding happens in two stages so ownership and classification stay
//! separate. [`RawOutcome::take`] copies every field of the native
//! result into owned Rust data and releases the native allocation
//! exactly once; nothing downstream can alias freed memory.
//! [`RawOutcome::into_document`] then classifies the copied outcome
//! and is a pure function, testable without the engine.

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};

use crate::engine::{FreeResultFn, RawParseResult};
use crate::error::{Error, Result};
use crate::publiccode::PublicCode;

/// An owned copy of one engine result.
pub(crate) struct RawOutcome {
    pub(crate) data: Option<String>,
    pub(crate) error: Option<String>,
    /// The count the engine reported, which classification keys off.
    /// A null error list with a positive count collects as empty
    /// rather than crashing.
    pub(crate) error_count: usize,
    pub(crate) errors: Vec<String>,
    pub(crate) warnings: Vec<String>,
}

impl RawOutcome {
    /// Copies all fields out of `raw` and frees it with `free_result`.
    ///
    /// # Safety
    ///
    /// `raw` must be a non-null pointer returned by the engine's parse
    /// call, not freed before, and not used again afterwards.
    pub(crate) unsafe fn take(raw: *mut RawParseResult, free_result: FreeResultFn) -> RawOutcome {
        let result = &*raw;

        let outcome = RawOutcome {
            data: copy_string(result.data),
            error: copy_string(result.error),
            error_count: result.error_count.max(0) as usize,
            errors: copy_string_list(result.errors, result.error_count),
            warnings: copy_string_list(result.warnings, result.warning_count),
        };

        free_result(raw);

        outcome
    }

    /// Classifies the outcome. First match wins:
    ///
    /// 1. reported validation errors become [`Error::Validation`]; the
    ///    engine may populate a fatal message alongside them, and the
    ///    validation outcome is the more specific one;
    /// 2. a fatal error message becomes [`Error::Internal`];
    /// 3. a missing data payload becomes [`Error::Internal`];
    /// 4. otherwise the payload is decoded as a JSON object and
    ///    wrapped, together with any warnings, in a [`PublicCode`].
    pub(crate) fn into_document(self) -> Result<PublicCode> {
        if self.error_count > 0 {
            let message = self.errors.join("\n");
            return Err(Error::Validation {
                message,
                errors: self.errors,
            });
        }

        if let Some(message) = self.error {
            return Err(Error::internal(message));
        }

        let Some(data) = self.data else {
            return Err(Error::internal("no data returned from parser"));
        };

        let value: serde_json::Value = serde_json::from_str(&data)
            .map_err(|e| Error::internal(format!("failed to decode parser output: {e}")))?;

        match value {
            serde_json::Value::Object(fields) => {
                Ok(PublicCode::with_warnings(fields, self.warnings))
            }
            _ => Err(Error::internal("parser output is not a JSON object")),
        }
    }
}

unsafe fn copy_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
    }
}

unsafe fn copy_string_list(list: *const *mut c_char, count: c_int) -> Vec<String> {
    if list.is_null() || count <= 0 {
        return Vec::new();
    }

    (0..count as usize)
        .filter_map(|i| copy_string(*list.add(i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::os::raw::c_int;
    use std::cell::Cell;
    use std::ptr;

    // Per-thread so parallel tests do not see each other's frees.
    thread_local! {
        static FREED: Cell<usize> = const { Cell::new(0) };
    }

    fn c_string(s: &str) -> *mut c_char {
        CString::new(s).unwrap().into_raw()
    }

    fn c_string_list(items: &[&str]) -> *mut *mut c_char {
        if items.is_empty() {
            return ptr::null_mut();
        }
        let boxed: Box<[*mut c_char]> = items.iter().map(|s| c_string(s)).collect();
        Box::into_raw(boxed) as *mut *mut c_char
    }

    fn raw_result(
        data: Option<&str>,
        error: Option<&str>,
        errors: &[&str],
        warnings: &[&str],
    ) -> *mut RawParseResult {
        Box::into_raw(Box::new(RawParseResult {
            data: data.map_or(ptr::null_mut(), c_string),
            error: error.map_or(ptr::null_mut(), c_string),
            error_count: errors.len() as c_int,
            errors: c_string_list(errors),
            warning_count: warnings.len() as c_int,
            warnings: c_string_list(warnings),
        }))
    }

    unsafe fn reclaim_list(list: *mut *mut c_char, count: c_int) {
        if list.is_null() || count <= 0 {
            return;
        }
        for i in 0..count as usize {
            let item = *list.add(i);
            if !item.is_null() {
                drop(CString::from_raw(item));
            }
        }
        drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(
            list,
            count as usize,
        )));
    }

    /// Stand-in for the engine's FreeResult: counts calls and reclaims
    /// the allocations made by `raw_result`.
    unsafe extern "C" fn counting_free(raw: *mut RawParseResult) {
        FREED.with(|freed| freed.set(freed.get() + 1));
        let result = Box::from_raw(raw);
        if !result.data.is_null() {
            drop(CString::from_raw(result.data));
        }
        if !result.error.is_null() {
            drop(CString::from_raw(result.error));
        }
        reclaim_list(result.errors, result.error_count);
        reclaim_list(result.warnings, result.warning_count);
    }

    fn take(raw: *mut RawParseResult) -> RawOutcome {
        unsafe { RawOutcome::take(raw, counting_free) }
    }

    #[test]
    fn test_validation_errors_preserved_in_emission_order() {
        let raw = raw_result(
            None,
            None,
            &[
                "publiccode.yml:4:1: error: url: required",
                "publiccode.yml:1:1: error: name: required",
            ],
            &[],
        );
        let err = take(raw).into_document().unwrap_err();

        match err {
            Error::Validation { message, errors } => {
                assert_eq!(
                    errors,
                    vec![
                        "publiccode.yml:4:1: error: url: required",
                        "publiccode.yml:1:1: error: name: required",
                    ]
                );
                assert_eq!(
                    message,
                    "publiccode.yml:4:1: error: url: required\npubliccode.yml:1:1: error: name: required"
                );
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_takes_priority_over_fatal_error() {
        let raw = raw_result(
            None,
            Some("everything is on fire"),
            &["publiccode.yml:1:1: error: name: required"],
            &[],
        );
        let err = take(raw).into_document().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_null_error_list_with_positive_count_is_not_a_crash() {
        let raw = raw_result(None, None, &[], &[]);
        unsafe {
            (*raw).error_count = 3;
        }
        let outcome = take(raw);
        assert_eq!(outcome.error_count, 3);
        assert!(outcome.errors.is_empty());

        let err = outcome.into_document().unwrap_err();
        match err {
            Error::Validation { errors, .. } => assert!(errors.is_empty()),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_fatal_error_becomes_internal() {
        let raw = raw_result(None, Some("Failed create a Parser: nil handle"), &[], &[]);
        let err = take(raw).into_document().unwrap_err();
        match err {
            Error::Internal { message } => {
                assert_eq!(message, "Failed create a Parser: nil handle")
            }
            other => panic!("expected internal failure, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_data_becomes_internal() {
        let raw = raw_result(None, None, &[], &[]);
        let err = take(raw).into_document().unwrap_err();
        match err {
            Error::Internal { message } => assert_eq!(message, "no data returned from parser"),
            other => panic!("expected internal failure, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_payload_becomes_internal() {
        let raw = raw_result(Some("{not json"), None, &[], &[]);
        let err = take(raw).into_document().unwrap_err();
        match err {
            Error::Internal { message } => {
                assert!(message.starts_with("failed to decode parser output"))
            }
            other => panic!("expected internal failure, got {other:?}"),
        }
    }

    #[test]
    fn test_non_object_payload_becomes_internal() {
        let raw = raw_result(Some("[1, 2, 3]"), None, &[], &[]);
        let err = take(raw).into_document().unwrap_err();
        match err {
            Error::Internal { message } => {
                assert_eq!(message, "parser output is not a JSON object")
            }
            other => panic!("expected internal failure, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_payload_becomes_document_with_warnings() {
        let raw = raw_result(
            Some(r#"{"name": "Medusa", "url": "https://example.org"}"#),
            None,
            &[],
            &["publiccode.yml:2:1: warning: logo: deprecated"],
        );
        let doc = take(raw).into_document().unwrap();
        assert_eq!(doc.name(), "Medusa");
        assert_eq!(
            doc.warnings(),
            ["publiccode.yml:2:1: warning: logo: deprecated"]
        );
    }

    #[test]
    fn test_every_path_frees_exactly_once() {
        let before = FREED.with(Cell::get);

        let _ = take(raw_result(Some("{}"), None, &[], &[])).into_document();
        let _ = take(raw_result(None, Some("boom"), &[], &[])).into_document();
        let _ = take(raw_result(None, None, &["e"], &[])).into_document();
        let _ = take(raw_result(None, None, &[], &[])).into_document();
        let _ = take(raw_result(Some("{oops"), None, &[], &[])).into_document();

        assert_eq!(FREED.with(Cell::get) - before, 5);
    }
}
