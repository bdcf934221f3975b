//! Import orchestration for inkport.
//!
//! Ties the export reader, HTML conversion, and frontmatter rendering into
//! one end-to-end run (`run_import`).

pub mod columns;
pub mod document;
pub mod fields;
pub mod frontmatter;
pub mod pipeline;
