use std::sync::{Arc, Mutex};

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;

use crate::{
    descriptor::parse_field_descriptors,
    layout::LayoutPlanner,
    synth::{GeneratedType, GeneratedTypeRc},
    typesystem::{AggregateKind, ClassLoader},
    validation::{GeneratorConfig, GeneratorFlags},
    Error::DuplicateType,
    Result,
};

/// Shared registry state behind the [`GeneratedRegistry`] handle.
///
/// Generated types hold a weak reference to this struct so that withers and
/// setters can re-resolve their backing class at invocation time without keeping
/// the registry alive.
pub(crate) struct RegistryInner {
    /// External resolution capability for names the registry does not own
    loader: Arc<dyn ClassLoader>,
    /// Primary name index, lock-free for concurrent lookup
    types: SkipMap<String, GeneratedTypeRc>,
    /// Insertion-order list of generated types
    order: boxcar::Vec<GeneratedTypeRc>,
    /// Per-name generation critical sections
    locks: DashMap<String, Arc<Mutex<()>>>,
    /// Policy knobs for regeneration and identity semantics
    config: GeneratorConfig,
}

impl RegistryInner {
    /// Resolve a name against generated types first, then the external loader.
    pub(crate) fn resolve_name(&self, name: &str) -> Option<AggregateKind> {
        if let Some(entry) = self.types.get(name) {
            return Some(entry.value().kind());
        }
        self.loader.resolve(name)
    }
}

/// Central registry of generated aggregate types.
///
/// The registry is the single entry point for generation: it parses the
/// descriptor list, plans the layout, synthesizes the operation surface, and
/// publishes the resulting [`GeneratedType`] under its name. Generation is a
/// one-time, serialized operation per distinct name - concurrent requests for
/// the same name are coordinated so at most one synthesis proceeds, and all
/// callers observe the same generated type or the same terminal error.
/// Requests for distinct names proceed independently.
///
/// A generated type is immutable and its name is never silently rebound; see
/// [`GeneratorFlags::IDEMPOTENT_REGENERATION`] for the regeneration policy.
///
/// # Examples
///
/// ```rust
/// use aggregen::prelude::*;
/// use std::sync::Arc;
///
/// let registry = GeneratedRegistry::new(Arc::new(StaticLoader::new()));
///
/// let point = registry.generate_value_class("Point2D", &["x:I", "y:I"])?;
/// let line = registry.generate_value_class("Line2D", &["st:QPoint2D;:value", "en:QPoint2D;:value"])?;
///
/// assert_eq!(registry.len(), 2);
/// assert!(registry.get("Point2D").is_some());
/// assert_eq!(line.plan().width(), 2 * point.plan().width());
/// # Ok::<(), aggregen::Error>(())
/// ```
#[derive(Clone)]
pub struct GeneratedRegistry {
    inner: Arc<RegistryInner>,
}

impl GeneratedRegistry {
    /// Create a registry with the default configuration.
    #[must_use]
    pub fn new(loader: Arc<dyn ClassLoader>) -> Self {
        GeneratedRegistry::with_config(loader, GeneratorConfig::default())
    }

    /// Create a registry with an explicit configuration.
    #[must_use]
    pub fn with_config(loader: Arc<dyn ClassLoader>, config: GeneratorConfig) -> Self {
        GeneratedRegistry {
            inner: Arc::new(RegistryInner {
                loader,
                types: SkipMap::new(),
                order: boxcar::Vec::new(),
                locks: DashMap::new(),
                config,
            }),
        }
    }

    /// The configuration this registry was created with.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.inner.config
    }

    /// The external loader capability backing named resolution.
    #[must_use]
    pub fn loader(&self) -> &Arc<dyn ClassLoader> {
        &self.inner.loader
    }

    /// Generate an identity-free value aggregate from a descriptor list.
    ///
    /// Runs the full `parse -> resolve -> plan -> synthesize` pipeline. The
    /// resulting type exposes typed and generic factories, getters, and withers.
    ///
    /// # Errors
    ///
    /// Structural failures abort generation without publishing a type:
    /// [`crate::Error::Parse`], [`crate::Error::DuplicateField`],
    /// [`crate::Error::ClassNotFound`], [`crate::Error::IncompatibleLayout`],
    /// and [`crate::Error::DuplicateType`] for an already-generated name.
    pub fn generate_value_class(&self, name: &str, fields: &[&str]) -> Result<GeneratedTypeRc> {
        self.generate(name, AggregateKind::Value, fields)
    }

    /// Generate an identity-bearing reference aggregate from a descriptor list.
    ///
    /// The resulting type exposes typed and generic factories, getters, and
    /// setters; wither-shaped invocations against it fail with
    /// [`crate::Error::IncompatibleLayout`] at invocation time.
    ///
    /// # Errors
    ///
    /// Same structural failure set as [`GeneratedRegistry::generate_value_class`].
    pub fn generate_ref_class(&self, name: &str, fields: &[&str]) -> Result<GeneratedTypeRc> {
        self.generate(name, AggregateKind::Reference, fields)
    }

    fn generate(&self, name: &str, kind: AggregateKind, fields: &[&str]) -> Result<GeneratedTypeRc> {
        let name_lock = {
            let entry = self.inner.locks.entry(name.to_string()).or_default();
            entry.value().clone()
        };

        let result = {
            let _guard = lock!(name_lock);
            self.generate_locked(name, kind, fields)
        };

        // Reclaim the lock entry unless another caller still holds a clone
        // (map reference + ours = 2). The shard lock serializes this count
        // against concurrent `entry()` clones, so a waiter never loses its
        // critical section.
        self.inner
            .locks
            .remove_if(name, |_, lock| Arc::strong_count(lock) == 2);

        result
    }

    fn generate_locked(
        &self,
        name: &str,
        kind: AggregateKind,
        fields: &[&str],
    ) -> Result<GeneratedTypeRc> {
        if let Some(existing) = self.get(name) {
            if self
                .inner
                .config
                .flags
                .contains(GeneratorFlags::IDEMPOTENT_REGENERATION)
            {
                return Ok(existing);
            }
            return Err(DuplicateType(name.to_string()));
        }

        let specs = parse_field_descriptors(fields)?;
        let plan = LayoutPlanner::new(self).plan(name, kind, specs)?;
        let generated =
            GeneratedType::synthesize(plan, Arc::downgrade(&self.inner), self.inner.config.flags);

        self.inner.types.insert(name.to_string(), generated.clone());
        self.inner.order.push(generated.clone());
        Ok(generated)
    }

    /// Look up a generated type by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<GeneratedTypeRc> {
        self.inner.types.get(name).map(|entry| entry.value().clone())
    }

    /// `true` if a type with this name has been generated.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.types.contains_key(name)
    }

    /// Number of generated types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.types.len()
    }

    /// `true` if nothing has been generated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.types.is_empty()
    }

    /// Iterate over generated types in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = GeneratedTypeRc> + '_ {
        self.inner.order.iter().map(|(_, ty)| ty.clone())
    }

    /// Remove a generated type from the registry, making its name unresolvable.
    ///
    /// Existing instances and operation handles keep working for reads, but
    /// withers and setters re-resolve their backing class on every invocation
    /// and will report [`crate::Error::ClassNotFound`] afterwards. This mirrors
    /// class unloading in the runtime the generator models.
    pub fn unload(&self, name: &str) -> bool {
        self.inner.types.remove(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typesystem::StaticLoader;

    fn registry() -> GeneratedRegistry {
        GeneratedRegistry::new(Arc::new(StaticLoader::new()))
    }

    #[test]
    fn test_generate_and_lookup() {
        let registry = registry();
        assert!(registry.is_empty());

        let point = registry
            .generate_value_class("Point2D", &["x:I", "y:I"])
            .unwrap();
        assert_eq!(point.name(), "Point2D");
        assert_eq!(point.kind(), AggregateKind::Value);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("Point2D"));
        assert!(registry.get("Missing").is_none());
    }

    #[test]
    fn test_double_generation_is_rejected() {
        let registry = registry();
        registry
            .generate_value_class("Point2D", &["x:I", "y:I"])
            .unwrap();

        let result = registry.generate_value_class("Point2D", &["x:I", "y:I"]);
        assert!(matches!(result, Err(DuplicateType(_))));
    }

    #[test]
    fn test_idempotent_regeneration_flag() {
        let registry = GeneratedRegistry::with_config(
            Arc::new(StaticLoader::new()),
            GeneratorConfig::new(GeneratorFlags::IDEMPOTENT_REGENERATION),
        );

        let first = registry
            .generate_value_class("Point2D", &["x:I", "y:I"])
            .unwrap();
        let second = registry
            .generate_value_class("Point2D", &["x:I", "y:I"])
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_failed_generation_publishes_nothing() {
        let registry = registry();
        let result = registry.generate_value_class("Bad", &["x:I", "x:I"]);
        assert!(result.is_err());
        assert!(!registry.contains("Bad"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_iteration_order() {
        let registry = registry();
        registry.generate_value_class("A", &["x:I"]).unwrap();
        registry.generate_ref_class("B", &["y:J"]).unwrap();

        let names: Vec<String> = registry.iter().map(|t| t.name().to_string()).collect();
        assert_eq!(names, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_lock_entries_are_reclaimed() {
        let registry = registry();
        registry.generate_value_class("A", &["x:I"]).unwrap();
        assert!(registry.generate_value_class("Bad", &["x:I", "x:I"]).is_err());
        assert!(registry
            .generate_value_class("Missing", &["p:QAbsent;:value"])
            .is_err());

        // Neither published names nor failed ones pin a lock entry.
        assert!(registry.inner.locks.is_empty());

        // Failed names stay available for a corrected retry.
        registry.generate_value_class("Bad", &["x:I"]).unwrap();
        assert!(registry.contains("Bad"));
    }

    #[test]
    fn test_unload() {
        let registry = registry();
        registry.generate_value_class("Point2D", &["x:I"]).unwrap();

        assert!(registry.unload("Point2D"));
        assert!(!registry.unload("Point2D"));
        assert!(registry.get("Point2D").is_none());
    }
}
