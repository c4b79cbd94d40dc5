//! Core markup parsing primitives
//!
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Tokenizer: lenient pull tokenizer with byte spans
//! - Attributes: attribute parsing from tag content

pub mod attributes;
pub mod scanner;
pub mod tokenizer;
