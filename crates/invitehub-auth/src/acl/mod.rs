//! Membership registry and the access decisions made from it.

pub mod evaluator;
pub mod registry;

pub use evaluator::AccessEvaluator;
pub use registry::MembershipRegistry;
