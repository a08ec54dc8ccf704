//! Word package skeleton: the ordered paragraph stream addressed by stable id.
//!
//! Ingestion runs [`normalize`] once so every body paragraph carries a
//! `w:paraId`. Write paths then load a [`Composer`], which owns one
//! in-memory document plus its [`IdentityMap`], applies an edit batch in
//! order, and serializes once at the end.

pub mod composer;
pub mod corpus;
pub mod document;
mod error;
pub mod ids;
pub mod locator;
pub mod normalizer;
pub mod package;
pub mod paragraph;
pub mod skeleton;
pub mod styles;
pub mod xml;

pub use composer::{BatchReport, Composer, SkippedOp};
pub use document::{DocxDocument, ParaKey};
pub use error::DocxError;
pub use ids::{IdSource, UuidSource};
pub use normalizer::{normalize, normalize_with};
pub use paragraph::{FormattingProfile, Paragraph};
pub use skeleton::IdentityMap;
