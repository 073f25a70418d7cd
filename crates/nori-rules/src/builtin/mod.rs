//! Built-in analyzers

pub mod constant_condition;
pub mod expression_body;

pub use constant_condition::{ConditionIsAlwaysFalse, ConditionIsAlwaysTrue};
pub use expression_body::SimplifyExpressionBodiedMember;
