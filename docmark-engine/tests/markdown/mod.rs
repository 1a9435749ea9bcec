//! Markdown format tests
//!
//! Tests for Markdown → document rendering and document → Markdown export.

mod export;
mod frontmatter;
mod import;
mod roundtrip;
mod table;
