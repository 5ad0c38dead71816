//! Storage: whole-document load and persist of the backing JSON file.

pub mod document;
