use std::sync::{Arc, RwLock};

use crate::{
    synth::{GeneratedTypeRc, Slot},
    validation::GeneratorFlags,
};

/// An instance of a generated aggregate, value or reference.
///
/// Value instances are pure data: copying one copies its storage, and equality
/// is structural. Reference instances are shared cells: clones alias the same
/// storage, and equality is pointer identity. Both kinds are handed out and
/// consumed as [`Instance`] so generated operations stay uniform over the two.
#[derive(Debug, Clone)]
pub enum Instance {
    /// Identity-free value aggregate
    Value(ValueInstance),
    /// Identity-bearing reference aggregate
    Ref(RefInstance),
}

impl Instance {
    /// The generated type this instance belongs to.
    #[must_use]
    pub fn generated_type(&self) -> &GeneratedTypeRc {
        match self {
            Instance::Value(instance) => instance.generated_type(),
            Instance::Ref(instance) => instance.generated_type(),
        }
    }

    /// Name of the instance's type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.generated_type().name()
    }

    /// Identity comparison.
    ///
    /// Two reference instances share an identity exactly when they alias the
    /// same cell. A value instance shares an identity with nothing, itself
    /// included, unless the owning registry was configured with
    /// [`GeneratorFlags::STRUCTURAL_VALUE_IDENTITY`], in which case value
    /// identity degrades to structural equality.
    #[must_use]
    pub fn same_identity(&self, other: &Instance) -> bool {
        match (self, other) {
            (Instance::Ref(a), Instance::Ref(b)) => a.same_identity(b),
            _ => {
                if self
                    .generated_type()
                    .flags()
                    .contains(GeneratorFlags::STRUCTURAL_VALUE_IDENTITY)
                {
                    self == other
                } else {
                    false
                }
            }
        }
    }

    /// Copy of the instance's storage at this moment.
    ///
    /// For a reference instance this is an atomic snapshot of the shared cell;
    /// concurrent setters are either fully visible or not at all.
    pub(crate) fn snapshot_slots(&self) -> Vec<Slot> {
        match self {
            Instance::Value(instance) => instance.slots.clone(),
            Instance::Ref(instance) => read_lock!(instance.cells).clone(),
        }
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Instance::Value(a), Instance::Value(b)) => a == b,
            (Instance::Ref(a), Instance::Ref(b)) => a.same_identity(b),
            _ => false,
        }
    }
}

/// An immutable value-aggregate instance.
///
/// Withers never modify one of these; they produce a fresh instance with the
/// updated field. Equality is structural over the slot storage, so two
/// independently built instances with the same field values compare equal.
#[derive(Debug, Clone)]
pub struct ValueInstance {
    ty: GeneratedTypeRc,
    slots: Vec<Slot>,
}

impl ValueInstance {
    pub(crate) fn new(ty: GeneratedTypeRc, slots: Vec<Slot>) -> Self {
        debug_assert_eq!(slots.len(), ty.plan().width() as usize);
        ValueInstance { ty, slots }
    }

    /// The generated type this instance belongs to.
    #[must_use]
    pub fn generated_type(&self) -> &GeneratedTypeRc {
        &self.ty
    }

    pub(crate) fn slots(&self) -> &[Slot] {
        &self.slots
    }
}

impl PartialEq for ValueInstance {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.ty, &other.ty) && self.slots == other.slots
    }
}

/// A mutable reference-aggregate instance with pointer identity.
///
/// The storage lives in a shared cell; clones alias it, and setters mutate it
/// in place under a write lock. Equality between reference instances is
/// aliasing, never field content.
#[derive(Debug, Clone)]
pub struct RefInstance {
    ty: GeneratedTypeRc,
    cells: Arc<RwLock<Vec<Slot>>>,
}

impl RefInstance {
    pub(crate) fn new(ty: GeneratedTypeRc, slots: Vec<Slot>) -> Self {
        debug_assert_eq!(slots.len(), ty.plan().width() as usize);
        RefInstance {
            ty,
            cells: Arc::new(RwLock::new(slots)),
        }
    }

    /// The generated type this instance belongs to.
    #[must_use]
    pub fn generated_type(&self) -> &GeneratedTypeRc {
        &self.ty
    }

    /// `true` when both handles alias the same cell.
    #[must_use]
    pub fn same_identity(&self, other: &RefInstance) -> bool {
        Arc::ptr_eq(&self.cells, &other.cells)
    }

    /// Overwrite one field's slots in place.
    pub(crate) fn store(&self, offset: usize, replacement: Vec<Slot>) {
        let mut cells = write_lock!(self.cells);
        let end = offset + replacement.len();
        cells.splice(offset..end, replacement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        typesystem::{GeneratedRegistry, StaticLoader},
        validation::{GeneratorConfig, GeneratorFlags},
        Value,
    };

    fn registry() -> GeneratedRegistry {
        GeneratedRegistry::new(Arc::new(StaticLoader::new()))
    }

    #[test]
    fn test_value_equality_is_structural() {
        let registry = registry();
        let ty = registry
            .generate_value_class("Point2D", &["x:I", "y:I"])
            .unwrap();

        let a = ty.make_value(&[Value::Int32(1), Value::Int32(2)]).unwrap();
        let b = ty.make_value(&[Value::Int32(1), Value::Int32(2)]).unwrap();
        let c = ty.make_value(&[Value::Int32(1), Value::Int32(3)]).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.same_identity(&b));
        assert!(!a.same_identity(&a));
    }

    #[test]
    fn test_ref_equality_is_identity() {
        let registry = registry();
        let ty = registry
            .generate_ref_class("Counter", &["n:I"])
            .unwrap();

        let a = ty.make_value(&[Value::Int32(5)]).unwrap();
        let b = ty.make_value(&[Value::Int32(5)]).unwrap();
        let alias = a.clone();

        assert_ne!(a, b);
        assert_eq!(a, alias);
        assert!(a.same_identity(&alias));
        assert!(!a.same_identity(&b));
    }

    #[test]
    fn test_value_types_compare_unequal_across_types() {
        let registry = registry();
        let p = registry.generate_value_class("P", &["x:I"]).unwrap();
        let q = registry.generate_value_class("Q", &["x:I"]).unwrap();

        let a = p.make_value(&[Value::Int32(1)]).unwrap();
        let b = q.make_value(&[Value::Int32(1)]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_structural_value_identity_flag() {
        let registry = GeneratedRegistry::with_config(
            Arc::new(StaticLoader::new()),
            GeneratorConfig::new(GeneratorFlags::STRUCTURAL_VALUE_IDENTITY),
        );
        let ty = registry.generate_value_class("P", &["x:I"]).unwrap();

        let a = ty.make_value(&[Value::Int32(1)]).unwrap();
        let b = ty.make_value(&[Value::Int32(1)]).unwrap();
        assert!(a.same_identity(&b));
    }
}
