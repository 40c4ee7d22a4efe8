//! Condition expressions.
//!
//! Key conditions and filters are plain [`Condition`] values. They are pure
//! data: [`ExpressionContext`] renders them into the placeholder syntax the
//! store expects, [`Condition::matches`] evaluates them in process, and the
//! validation functions check the shape the store accepts for key conditions.

mod condition;
mod eval;
mod render;
mod validate;

pub use condition::{CompareOp, Condition};
pub use render::{render, ExpressionContext, RenderedExpression};
pub use validate::{validate_composite_key_condition, validate_filter, validate_key_condition};
