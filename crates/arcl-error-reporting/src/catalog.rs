/*
 * catalog.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error code catalog and lookup.
//!
//! Maps error codes (like "A-3-1") to their metadata. The catalog is embedded
//! at compile time from `error_catalog.json`.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata for an error code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorCodeInfo {
    /// Subsystem name (e.g., "scanner", "parser", "reference")
    pub subsystem: String,

    /// Short title for the error
    pub title: String,

    /// Default explanation of the error
    pub message_template: String,

    /// When this error was introduced (version)
    pub since_version: String,
}

/// Global error catalog, parsed on first use.
///
/// # Panics
///
/// Panics if the embedded JSON is invalid, which can only happen when the
/// catalog file itself is edited incorrectly.
pub static ERROR_CATALOG: Lazy<HashMap<String, ErrorCodeInfo>> = Lazy::new(|| {
    let json_data = include_str!("../error_catalog.json");
    serde_json::from_str(json_data).expect("Invalid error catalog JSON - this is a bug in ARCL")
});

/// Look up error code information.
///
/// ```
/// use arcl_error_reporting::catalog::get_error_info;
///
/// let info = get_error_info("A-5-1").unwrap();
/// assert_eq!(info.title, "No Such Template");
/// ```
pub fn get_error_info(code: &str) -> Option<&ErrorCodeInfo> {
    ERROR_CATALOG.get(code)
}
