//! Store-agnostic building blocks for dynarepo.
//!
//! This crate holds the pure half of the workspace: the entity and key model,
//! index descriptors, condition expressions and the generic repository trait.
//! Nothing here performs I/O; the DynamoDB client and the repositories that
//! delegate to it live in the `dynarepo` crate.

pub mod entity;
pub mod expression;
pub mod storage;
