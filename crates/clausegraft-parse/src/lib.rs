//! Structure parser: paragraph stream → clause tree.
//!
//! The tree is derived, never stored. [`build_tree`] works on any ordered
//! `(stable_id, text, style_name)` stream; [`extract`] dispatches on file
//! type and returns flat text plus a tree when the format has one.

pub mod builder;
pub mod classify;
pub mod config;
pub mod extract;

pub use builder::{ParagraphInput, Parsed, build_tree};
pub use classify::clause_type;
pub use config::ParserConfig;
pub use extract::{ExtractError, Extracted, extract, parse_docx};
