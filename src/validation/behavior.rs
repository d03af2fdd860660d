//! Behavioral admissibility checks applied at operation-invocation time.
//!
//! These rules are only observable when the corresponding operation actually
//! runs: generation succeeds even though a later invocation may fail. A
//! behavioral failure is terminal for the single invocation that raised it and
//! never corrupts the generated type or any existing instance.
//!
//! The check order for withers and setters is fixed: backing-class resolution,
//! then receiver presence, then aggregate-kind admissibility.

use crate::{
    synth::{GeneratedType, Instance, Value},
    typesystem::AggregateKind,
    Error::{ClassNotFound, IncompatibleLayout, NullReceiver, TypeMismatch},
    Result,
};

/// Stateless validator for invocation-time rules.
pub struct BehaviorValidator;

impl BehaviorValidator {
    /// Re-resolve the generated type's backing class.
    ///
    /// Withers and setters run this on every invocation; a type whose backing
    /// class has been unloaded (or whose registry is gone) is no longer usable
    /// for updates.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ClassNotFound`] when the backing class does not
    /// resolve anymore.
    pub fn check_backing_resolvable(ty: &GeneratedType) -> Result<()> {
        if !ty.is_backing_resolvable() {
            return Err(ClassNotFound(ty.name().to_string()));
        }
        Ok(())
    }

    /// Extract the receiver instance from a boxed receiver value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NullReceiver`] for a null receiver and
    /// [`crate::Error::TypeMismatch`] for a primitive one.
    pub fn check_receiver(recv: &Value) -> Result<&Instance> {
        match recv {
            Value::Null => Err(NullReceiver),
            Value::Instance(instance) => Ok(instance),
            other => Err(TypeMismatch {
                expected: "aggregate receiver".to_string(),
                found: other.type_name().to_string(),
            }),
        }
    }

    /// Withers perform functional update and only exist on value aggregates.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IncompatibleLayout`] when invoked against a
    /// reference aggregate.
    pub fn check_wither_admissible(ty: &GeneratedType) -> Result<()> {
        if ty.kind() != AggregateKind::Value {
            return Err(IncompatibleLayout(format!(
                "wither invoked against reference type '{}'",
                ty.name()
            )));
        }
        Ok(())
    }

    /// Setters mutate in place and only exist on reference aggregates.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IncompatibleLayout`] when invoked against a
    /// value aggregate.
    pub fn check_setter_admissible(ty: &GeneratedType) -> Result<()> {
        if ty.kind() != AggregateKind::Reference {
            return Err(IncompatibleLayout(format!(
                "setter invoked against value type '{}'",
                ty.name()
            )));
        }
        Ok(())
    }

    /// Default-value semantics bind late: the request is recorded at parse time
    /// but only validated when a factory actually runs.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IncompatibleLayout`] when any field of a
    /// reference aggregate requested default-value semantics.
    pub fn check_factory_defaults(ty: &GeneratedType) -> Result<()> {
        if ty.kind() == AggregateKind::Reference {
            if let Some(field) = ty.plan().fields().iter().find(|f| f.spec.default_value) {
                return Err(IncompatibleLayout(format!(
                    "default value requested for field '{}' on reference type '{}'",
                    field.spec.name,
                    ty.name()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::typesystem::{GeneratedRegistry, StaticLoader};

    fn registry() -> GeneratedRegistry {
        GeneratedRegistry::new(Arc::new(StaticLoader::new()))
    }

    #[test]
    fn test_receiver_extraction() {
        assert!(matches!(
            BehaviorValidator::check_receiver(&Value::Null),
            Err(NullReceiver)
        ));
        assert!(BehaviorValidator::check_receiver(&Value::Int32(1)).is_err());

        let registry = registry();
        let ty = registry.generate_value_class("P", &["x:I"]).unwrap();
        let instance = ty.make_value(&[Value::Int32(1)]).unwrap();
        assert!(BehaviorValidator::check_receiver(&Value::Instance(instance)).is_ok());
    }

    #[test]
    fn test_kind_admissibility() {
        let registry = registry();
        let value_ty = registry.generate_value_class("V", &["x:I"]).unwrap();
        let ref_ty = registry.generate_ref_class("R", &["x:I"]).unwrap();

        assert!(BehaviorValidator::check_wither_admissible(&value_ty).is_ok());
        assert!(BehaviorValidator::check_wither_admissible(&ref_ty).is_err());
        assert!(BehaviorValidator::check_setter_admissible(&ref_ty).is_ok());
        assert!(BehaviorValidator::check_setter_admissible(&value_ty).is_err());
    }

    #[test]
    fn test_backing_resolution() {
        let registry = registry();
        let ty = registry.generate_value_class("V", &["x:I"]).unwrap();
        assert!(BehaviorValidator::check_backing_resolvable(&ty).is_ok());

        registry.unload("V");
        let result = BehaviorValidator::check_backing_resolvable(&ty);
        assert!(matches!(result, Err(ClassNotFound(name)) if name == "V"));
    }

    #[test]
    fn test_factory_defaults() {
        let registry = registry();
        let value_ty = registry
            .generate_value_class("V", &["x:I:value"])
            .unwrap();
        assert!(BehaviorValidator::check_factory_defaults(&value_ty).is_ok());

        let loader = StaticLoader::new();
        loader.register("java/lang/Object", AggregateKind::Reference);
        let registry = GeneratedRegistry::new(Arc::new(loader));
        let ref_ty = registry
            .generate_ref_class("R", &["f1:Ljava/lang/Object;:value"])
            .unwrap();
        let result = BehaviorValidator::check_factory_defaults(&ref_ty);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("default value"));
    }
}
