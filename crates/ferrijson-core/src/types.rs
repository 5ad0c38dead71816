//! Core types: store configuration and on-disk format constants.

/// Number of spaces used to indent the persisted document.
pub const INDENT_WIDTH: usize = 2;

/// Settings applied when a store persists its records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Pretty-print the document with [`INDENT_WIDTH`]-space indentation.
    /// When `false` the array is written on a single line.
    pub pretty: bool,
    /// Create missing parent directories before writing the document.
    pub create_dirs: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            create_dirs: false,
        }
    }
}
