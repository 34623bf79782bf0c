//! Entity request handlers.
//!
//! Each handler follows the same sequence: auth gate (as an extractor) →
//! storage call → not-found mapping → cache invalidation on writes →
//! response shaping. The cache-aside policy is applied inline per handler
//! rather than centrally; the rules are small and local.

pub mod authors;
pub mod books;
