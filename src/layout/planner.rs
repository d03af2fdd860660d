use crate::{
    descriptor::{FieldSpec, StorageRequest, TypeRef},
    layout::{ClassPlan, PlannedField, ResolvedStorage, SlotRange},
    typesystem::{AggregateKind, GeneratedRegistry, TypeResolver},
    validation::StructuralValidator,
    Error::IncompatibleLayout,
    Result,
};

/// Decides storage per field and computes the slot layout of one aggregate.
///
/// The planner resolves each field's type, applies the structural admissibility
/// rules, and assigns disjoint, contiguous slot ranges in a single
/// left-to-right pass. Flattened fields expand recursively to the nested value
/// type's own plan width, splicing its slot list inline. Any resolution or
/// admissibility failure aborts planning with the first error encountered, in
/// field order - callers never see a partial plan.
///
/// # Examples
///
/// ```rust
/// use aggregen::prelude::*;
/// use std::sync::Arc;
///
/// let registry = GeneratedRegistry::new(Arc::new(StaticLoader::new()));
/// let ty = registry.generate_value_class("Point2DComplex", &["d:D", "j:J"])?;
///
/// let plan = ty.plan();
/// assert_eq!(plan.width(), 4);
/// assert_eq!(plan.fields()[1].range.offset, 2);
/// # Ok::<(), aggregen::Error>(())
/// ```
pub struct LayoutPlanner<'a> {
    resolver: TypeResolver<'a>,
}

impl<'a> LayoutPlanner<'a> {
    /// Create a planner resolving names against `registry`.
    #[must_use]
    pub fn new(registry: &'a GeneratedRegistry) -> Self {
        LayoutPlanner {
            resolver: TypeResolver::new(registry),
        }
    }

    /// Plan the layout of `name` from its parsed descriptor list.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DuplicateField`] for repeated field names,
    /// [`crate::Error::ClassNotFound`] for unresolvable named types, and
    /// [`crate::Error::IncompatibleLayout`] for inadmissible flattening
    /// (non-value target, missing layout, or a flatten cycle).
    pub fn plan(
        &mut self,
        name: &str,
        kind: AggregateKind,
        fields: Vec<FieldSpec>,
    ) -> Result<ClassPlan> {
        StructuralValidator::check_unique_field_names(&fields)?;

        let mut planned = Vec::with_capacity(fields.len());
        let mut offset = 0u32;
        for spec in fields {
            let storage = self.resolve_storage(name, &spec)?;
            let width = storage.width();
            planned.push(PlannedField {
                spec,
                storage,
                range: SlotRange { offset, width },
            });
            offset += width;
        }

        debug_assert!(StructuralValidator::check_contiguous_ranges(&planned).is_ok());
        Ok(ClassPlan::new(name.to_string(), kind, planned, offset))
    }

    fn resolve_storage(&mut self, declaring: &str, spec: &FieldSpec) -> Result<ResolvedStorage> {
        match (&spec.type_ref, spec.storage) {
            (TypeRef::Primitive(kind), StorageRequest::Direct) => {
                Ok(ResolvedStorage::Primitive(*kind))
            }
            (TypeRef::Named(name), StorageRequest::Reference) => {
                let resolved = self.resolver.resolve(name)?;
                Ok(ResolvedStorage::Reference {
                    name: name.clone(),
                    kind: resolved.kind,
                    target: resolved.generated,
                })
            }
            (TypeRef::Named(name), StorageRequest::FlattenedValue) => {
                if name == declaring {
                    return Err(IncompatibleLayout(format!(
                        "flattening '{declaring}' into itself creates a cycle"
                    )));
                }
                let resolved = self.resolver.resolve(name)?;
                StructuralValidator::check_flatten_kind(name, resolved.kind)?;
                let Some(nested) = resolved.generated else {
                    return Err(IncompatibleLayout(format!(
                        "cannot flatten '{name}' - no layout is available for it"
                    )));
                };
                StructuralValidator::check_flatten_cycle(declaring, &nested)?;
                Ok(ResolvedStorage::Flattened(nested))
            }
            // Unreachable from the parser, but FieldSpec is freely constructible.
            (type_ref, storage) => Err(IncompatibleLayout(format!(
                "storage request {storage} is not applicable to {type_ref:?}"
            ))),
        }
    }
}
