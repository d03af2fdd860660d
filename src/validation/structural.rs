//! Structural admissibility checks applied at generation time.
//!
//! A structural failure must prevent a generated type from ever coming into
//! existence: duplicate field names, flattening a non-value type, flatten
//! cycles, and overlapping slot assignments all abort planning with the
//! reported error kind.

use std::collections::HashSet;

use crate::{
    descriptor::FieldSpec,
    layout::{PlannedField, ResolvedStorage},
    synth::GeneratedType,
    typesystem::AggregateKind,
    Error::{DuplicateField, IncompatibleLayout},
    Result,
};

/// Stateless validator for the structural rules of layout planning.
///
/// All methods are pure functions and safe for concurrent use.
pub struct StructuralValidator;

impl StructuralValidator {
    /// Reject descriptor lists that declare the same field name twice.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DuplicateField`] naming the first repeated field.
    pub fn check_unique_field_names(fields: &[FieldSpec]) -> Result<()> {
        let mut seen = HashSet::with_capacity(fields.len());
        for field in fields {
            if !seen.insert(field.name.as_str()) {
                return Err(DuplicateField(field.name.clone()));
            }
        }
        Ok(())
    }

    /// Reject flattening of a type that is not a value aggregate.
    ///
    /// The universal "any object" type and every other reference aggregate have
    /// identity, so inlining their storage would be observable.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IncompatibleLayout`] for a reference-kind target.
    pub fn check_flatten_kind(name: &str, kind: AggregateKind) -> Result<()> {
        if kind != AggregateKind::Value {
            return Err(IncompatibleLayout(format!(
                "cannot flatten '{name}' - not a value type"
            )));
        }
        Ok(())
    }

    /// Reject flatten cycles: a flattened field cannot, directly or
    /// transitively, contain the aggregate being planned.
    ///
    /// Nested plans are walked depth-first through their flattened fields. The
    /// declaring type has no plan yet, so a back edge can only point at its
    /// name.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IncompatibleLayout`] when `declaring` appears in
    /// the nested flatten chain.
    pub fn check_flatten_cycle(declaring: &str, nested: &GeneratedType) -> Result<()> {
        if nested.name() == declaring {
            return Err(IncompatibleLayout(format!(
                "flattening '{declaring}' into itself creates a cycle"
            )));
        }
        for field in nested.plan().fields() {
            if let ResolvedStorage::Flattened(inner) = &field.storage {
                Self::check_flatten_cycle(declaring, inner)?;
            }
        }
        Ok(())
    }

    /// Verify the disjoint/contiguous slot invariant of a finished plan.
    ///
    /// The single-pass planner establishes this by construction; the check
    /// exists so tests and future planners can assert it independently.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IncompatibleLayout`] if any field's range does
    /// not start where the previous one ended.
    pub fn check_contiguous_ranges(fields: &[PlannedField]) -> Result<()> {
        let mut expected = 0u32;
        for field in fields {
            if field.range.offset != expected {
                return Err(IncompatibleLayout(format!(
                    "field '{}' starts at slot {} but slot {} was expected",
                    field.spec.name, field.range.offset, expected
                )));
            }
            expected = field.range.end();
        }
        Ok(())
    }
}
