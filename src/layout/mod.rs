//! Layout planning for generated aggregates.
//!
//! The planner turns a parsed descriptor list into a [`ClassPlan`]: one
//! [`SlotRange`] per field over a flat sequence of 32-bit storage units.
//! Narrow primitives and reference handles take one unit, wide primitives take
//! two, and flattened value types expand to the recursive sum of their own
//! field widths with their slot lists spliced inline.
//!
//! # Key Components
//!
//! - [`ClassPlan`]: The immutable layout of one aggregate
//! - [`PlannedField`] / [`ResolvedStorage`] / [`SlotRange`]: Per-field records
//! - [`LayoutPlanner`]: The single-pass offset assignment algorithm
//!
//! Planning is deterministic given the same descriptor sequence and resolver
//! outcomes, and fails atomically: the first resolution or admissibility error
//! aborts the whole plan.

mod plan;
mod planner;

pub use plan::{ClassPlan, PlannedField, ResolvedStorage, SlotRange};
pub use planner::LayoutPlanner;
