use std::{
    fmt,
    sync::{Arc, Weak},
};

use crate::{
    layout::{ClassPlan, PlannedField, ResolvedStorage},
    synth::{FieldValue, Instance, RefInstance, Slot, Value, ValueInstance},
    typesystem::{AggregateKind, RegistryInner},
    validation::{BehaviorValidator, GeneratorFlags},
    Error::{ArityMismatch, FieldNotFound, TypeMismatch},
    Result,
};

/// Reference-counted handle to a generated type.
pub type GeneratedTypeRc = Arc<GeneratedType>;

/// A synthesized aggregate type: the finished plan plus its operation surface.
///
/// Generation produces exactly one of these per name, published through the
/// registry. The type is immutable; everything an operation needs was fixed at
/// synthesis time except backing-class resolution, which withers and setters
/// redo on every invocation through a weak registry handle.
///
/// The operation surface is uniform across aggregates: typed and generic
/// factories on the type itself, and per-field accessors reached through
/// [`GeneratedType::field`]. Typed and generic variants of each operation are
/// observably equivalent up to boxing.
///
/// # Examples
///
/// ```rust
/// use aggregen::prelude::*;
/// use std::sync::Arc;
///
/// let registry = GeneratedRegistry::new(Arc::new(StaticLoader::new()));
/// let ty = registry.generate_value_class("Point2D", &["x:I", "y:I"])?;
///
/// let p = ty.make_value(&[Value::Int32(1), Value::Int32(2)])?;
/// let x = ty.field("x")?;
/// assert_eq!(x.get::<i32>(&p)?, 1);
///
/// let moved = x.with(&p, 9i32)?;
/// assert_eq!(x.get::<i32>(&moved)?, 9);
/// assert_eq!(x.get::<i32>(&p)?, 1);
/// # Ok::<(), aggregen::Error>(())
/// ```
pub struct GeneratedType {
    plan: ClassPlan,
    backing: Weak<RegistryInner>,
    flags: GeneratorFlags,
}

impl GeneratedType {
    /// Build the operation surface over a finished plan.
    pub(crate) fn synthesize(
        plan: ClassPlan,
        backing: Weak<RegistryInner>,
        flags: GeneratorFlags,
    ) -> GeneratedTypeRc {
        Arc::new(GeneratedType {
            plan,
            backing,
            flags,
        })
    }

    /// Qualified name of this type.
    #[must_use]
    pub fn name(&self) -> &str {
        self.plan.name()
    }

    /// Value or reference aggregate.
    #[must_use]
    pub fn kind(&self) -> AggregateKind {
        self.plan.kind()
    }

    /// The slot layout this type was generated with.
    #[must_use]
    pub fn plan(&self) -> &ClassPlan {
        &self.plan
    }

    pub(crate) fn flags(&self) -> GeneratorFlags {
        self.flags
    }

    /// Re-resolve this type's backing class against its registry.
    ///
    /// Fails once the name has been unloaded or the registry itself dropped.
    pub(crate) fn is_backing_resolvable(&self) -> bool {
        match self.backing.upgrade() {
            Some(registry) => registry.resolve_name(self.name()).is_some(),
            None => false,
        }
    }

    /// The typed factory: construct an instance from one boxed value per field,
    /// in declaration order.
    ///
    /// Construction is total over admissible arguments and never observes or
    /// mutates other instances. For a value aggregate the result is an
    /// identity-free [`Instance::Value`]; for a reference aggregate a fresh
    /// [`Instance::Ref`] cell.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ArityMismatch`] for a wrong argument count,
    /// [`crate::Error::TypeMismatch`] when an argument does not narrow to its
    /// field exactly, and [`crate::Error::IncompatibleLayout`] when a field of
    /// a reference aggregate requested default-value semantics.
    pub fn make_value(self: &Arc<Self>, args: &[Value]) -> Result<Instance> {
        BehaviorValidator::check_factory_defaults(self)?;
        if args.len() != self.plan.arity() {
            return Err(ArityMismatch {
                expected: self.plan.arity(),
                found: args.len(),
            });
        }

        let mut slots = Vec::with_capacity(self.plan.width() as usize);
        for (field, arg) in self.plan.fields().iter().zip(args) {
            slots.extend(self.narrow_field(field, arg)?);
        }

        Ok(match self.kind() {
            AggregateKind::Value => Instance::Value(ValueInstance::new(self.clone(), slots)),
            AggregateKind::Reference => Instance::Ref(RefInstance::new(self.clone(), slots)),
        })
    }

    /// The generic factory, observably equivalent to [`GeneratedType::make_value`].
    ///
    /// The typed factory already consumes boxed arguments and narrows them
    /// strictly, so this delegates to it; the separate entry point keeps the
    /// factory surface symmetric with the typed/generic accessor pairs.
    ///
    /// # Errors
    ///
    /// Same failure set as [`GeneratedType::make_value`].
    pub fn make_value_generic(self: &Arc<Self>, args: &[Value]) -> Result<Instance> {
        self.make_value(args)
    }

    /// Accessor handle for one field, carrying the getter, wither, and setter
    /// entry points in their typed and generic variants.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::FieldNotFound`] for an unknown field name.
    pub fn field(self: &Arc<Self>, name: &str) -> Result<FieldHandle> {
        match self.plan.field_index(name) {
            Some(index) => Ok(FieldHandle {
                ty: self.clone(),
                index,
            }),
            None => Err(FieldNotFound {
                ty: self.name().to_string(),
                field: name.to_string(),
            }),
        }
    }

    /// Narrow one boxed argument into the slots of its field.
    fn narrow_field(&self, field: &PlannedField, value: &Value) -> Result<Vec<Slot>> {
        match &field.storage {
            ResolvedStorage::Primitive(kind) => value.to_slots(*kind),
            ResolvedStorage::Reference { name, target, .. } => match value {
                Value::Null => Ok(vec![Slot::Handle(None)]),
                Value::Instance(instance) => {
                    // A loader-declared name owns no plan, so any generated
                    // instance is accepted behind it.
                    if let Some(target) = target {
                        if !Arc::ptr_eq(instance.generated_type(), target) {
                            return Err(TypeMismatch {
                                expected: name.clone(),
                                found: instance.type_name().to_string(),
                            });
                        }
                    }
                    Ok(vec![Slot::Handle(Some(instance.clone()))])
                }
                other => Err(TypeMismatch {
                    expected: name.clone(),
                    found: other.type_name().to_string(),
                }),
            },
            ResolvedStorage::Flattened(nested) => match value {
                Value::Instance(Instance::Value(instance))
                    if Arc::ptr_eq(instance.generated_type(), nested) =>
                {
                    Ok(instance.slots().to_vec())
                }
                Value::Instance(instance) => Err(TypeMismatch {
                    expected: nested.name().to_string(),
                    found: instance.type_name().to_string(),
                }),
                other => Err(TypeMismatch {
                    expected: nested.name().to_string(),
                    found: other.type_name().to_string(),
                }),
            },
        }
    }

    /// Read one field out of a slot snapshot as a boxed value.
    fn read_field(&self, field: &PlannedField, slots: &[Slot]) -> Result<Value> {
        let span = &slots[field.range.offset as usize..field.range.end() as usize];
        match &field.storage {
            ResolvedStorage::Primitive(kind) => Value::from_slots(*kind, span),
            ResolvedStorage::Reference { .. } => match &span[0] {
                Slot::Handle(Some(instance)) => Ok(Value::Instance(instance.clone())),
                Slot::Handle(None) => Ok(Value::Null),
                Slot::Unit(_) => Err(TypeMismatch {
                    expected: "handle slot".to_string(),
                    found: "primitive slot".to_string(),
                }),
            },
            // Reading a flattened field materializes a fresh nested value from
            // the container's slots; it never aliases the container.
            ResolvedStorage::Flattened(nested) => Ok(Value::Instance(Instance::Value(
                ValueInstance::new(nested.clone(), span.to_vec()),
            ))),
        }
    }
}

impl fmt::Debug for GeneratedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedType")
            .field("name", &self.plan.name())
            .field("kind", &self.plan.kind())
            .field("width", &self.plan.width())
            .finish()
    }
}

/// The synthesized accessor surface for one field of a generated type.
///
/// A handle stays valid for the lifetime of the type it was obtained from,
/// including across unloading; only backing-sensitive operations (withers and
/// setters) notice unloading, and only when invoked.
pub struct FieldHandle {
    ty: GeneratedTypeRc,
    index: usize,
}

impl FieldHandle {
    /// Name of the field this handle accesses.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.planned().spec.name
    }

    /// The type this handle was obtained from.
    #[must_use]
    pub fn generated_type(&self) -> &GeneratedTypeRc {
        &self.ty
    }

    fn planned(&self) -> &PlannedField {
        &self.ty.plan().fields()[self.index]
    }

    /// Typed getter.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TypeMismatch`] when the receiver belongs to a
    /// different type or the field does not narrow to `T`.
    pub fn get<T: FieldValue>(&self, recv: &Instance) -> Result<T> {
        let boxed = self.get_boxed(recv)?;
        let found = boxed.type_name();
        T::from_value(boxed).ok_or_else(|| TypeMismatch {
            expected: T::type_name().to_string(),
            found: found.to_string(),
        })
    }

    /// Generic getter over a boxed receiver.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NullReceiver`] for a null receiver and
    /// [`crate::Error::TypeMismatch`] for a receiver of the wrong type.
    pub fn get_generic(&self, recv: &Value) -> Result<Value> {
        let instance = BehaviorValidator::check_receiver(recv)?;
        self.get_boxed(instance)
    }

    /// Typed wither: produce a new value instance with this field replaced.
    ///
    /// The receiver is never modified. Two invocation-time rules apply in
    /// order: the backing class must still resolve, and the receiver's type
    /// must be a value aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ClassNotFound`] when the backing class was
    /// unloaded, [`crate::Error::IncompatibleLayout`] against a reference
    /// aggregate, and [`crate::Error::TypeMismatch`] for a foreign receiver or
    /// a value that does not narrow to the field.
    pub fn with<T: FieldValue>(&self, recv: &Instance, value: T) -> Result<Instance> {
        BehaviorValidator::check_backing_resolvable(&self.ty)?;
        self.do_with(recv, &value.into_value())
    }

    /// Generic wither over boxed receiver and value.
    ///
    /// # Errors
    ///
    /// Same failure set as [`FieldHandle::with`], plus
    /// [`crate::Error::NullReceiver`] for a null receiver. Backing resolution
    /// is checked before the receiver, so an unloaded type reports
    /// [`crate::Error::ClassNotFound`] even for a null receiver.
    pub fn with_generic(&self, recv: &Value, value: &Value) -> Result<Value> {
        BehaviorValidator::check_backing_resolvable(&self.ty)?;
        let instance = BehaviorValidator::check_receiver(recv)?;
        Ok(Value::Instance(self.do_with(instance, value)?))
    }

    /// Typed setter: mutate this field of a reference instance in place.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ClassNotFound`] when the backing class was
    /// unloaded, [`crate::Error::IncompatibleLayout`] against a value
    /// aggregate, and [`crate::Error::TypeMismatch`] for a foreign receiver or
    /// a value that does not narrow to the field.
    pub fn set<T: FieldValue>(&self, recv: &Instance, value: T) -> Result<()> {
        BehaviorValidator::check_backing_resolvable(&self.ty)?;
        self.do_set(recv, &value.into_value())
    }

    /// Generic setter over boxed receiver and value.
    ///
    /// # Errors
    ///
    /// Same failure set as [`FieldHandle::set`], plus
    /// [`crate::Error::NullReceiver`] for a null receiver; backing resolution
    /// is checked first, receiver presence second, kind admissibility last.
    pub fn set_generic(&self, recv: &Value, value: &Value) -> Result<()> {
        BehaviorValidator::check_backing_resolvable(&self.ty)?;
        let instance = BehaviorValidator::check_receiver(recv)?;
        self.do_set(instance, value)
    }

    fn get_boxed(&self, recv: &Instance) -> Result<Value> {
        self.check_receiver_type(recv)?;
        let slots = recv.snapshot_slots();
        self.ty.read_field(self.planned(), &slots)
    }

    fn do_with(&self, recv: &Instance, value: &Value) -> Result<Instance> {
        BehaviorValidator::check_wither_admissible(&self.ty)?;
        self.check_receiver_type(recv)?;

        let Instance::Value(instance) = recv else {
            return Err(TypeMismatch {
                expected: "value aggregate receiver".to_string(),
                found: recv.type_name().to_string(),
            });
        };

        let field = self.planned();
        let mut slots = instance.slots().to_vec();
        let replacement = self.ty.narrow_field(field, value)?;
        let start = field.range.offset as usize;
        slots.splice(start..start + replacement.len(), replacement);
        Ok(Instance::Value(ValueInstance::new(self.ty.clone(), slots)))
    }

    fn do_set(&self, recv: &Instance, value: &Value) -> Result<()> {
        BehaviorValidator::check_setter_admissible(&self.ty)?;
        self.check_receiver_type(recv)?;

        let Instance::Ref(instance) = recv else {
            return Err(TypeMismatch {
                expected: "reference aggregate receiver".to_string(),
                found: recv.type_name().to_string(),
            });
        };

        let field = self.planned();
        // Narrow outside the write lock so a bad value never blocks readers.
        let replacement = self.ty.narrow_field(field, value)?;
        instance.store(field.range.offset as usize, replacement);
        Ok(())
    }

    fn check_receiver_type(&self, recv: &Instance) -> Result<()> {
        if !Arc::ptr_eq(recv.generated_type(), &self.ty) {
            return Err(TypeMismatch {
                expected: self.ty.name().to_string(),
                found: recv.type_name().to_string(),
            });
        }
        Ok(())
    }
}
