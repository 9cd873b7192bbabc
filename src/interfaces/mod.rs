//! Adapters between the engine and the outside world: config files, product
//! CSVs and the console.

use std::io::{self, BufRead};

pub mod config;
pub mod console;
pub mod csv;

/// Splits `source` into lines, replacing bytes that are not valid UTF-8.
///
/// Only a failing read is an error; odd bytes just become `U+FFFD`.
pub(crate) fn lossy_lines<R: BufRead>(source: R) -> impl Iterator<Item = io::Result<String>> {
    source.split(b'\n').map(|line| {
        line.map(|bytes| {
            let text = String::from_utf8_lossy(&bytes);
            text.strip_suffix('\r').unwrap_or(&text).to_string()
        })
    })
}
