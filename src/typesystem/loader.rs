use dashmap::DashMap;

use crate::typesystem::AggregateKind;

/// The class-resolution capability consumed from the external loading collaborator.
///
/// The core asks the loader exactly one question: does a qualified name denote a
/// known aggregate, and if so, of which kind. `Some(kind)` corresponds to a
/// successful resolution, `None` to a missing class. The call is assumed
/// synchronous; the core performs no retries.
pub trait ClassLoader: Send + Sync {
    /// Resolve a qualified class name to its aggregate kind, or `None` if the
    /// name is not loadable.
    fn resolve(&self, name: &str) -> Option<AggregateKind>;
}

/// A concurrent, map-backed [`ClassLoader`] for embedding and tests.
///
/// Classes are declared up front with [`StaticLoader::register`] and can be
/// removed again with [`StaticLoader::unload`], which makes previously
/// resolvable names report as missing - useful for exercising invocation-time
/// re-resolution failures.
///
/// # Examples
///
/// ```rust
/// use aggregen::typesystem::{AggregateKind, ClassLoader, StaticLoader};
///
/// let loader = StaticLoader::new();
/// loader.register("java/lang/Object", AggregateKind::Reference);
/// assert_eq!(loader.resolve("java/lang/Object"), Some(AggregateKind::Reference));
/// assert_eq!(loader.resolve("Missing"), None);
/// ```
pub struct StaticLoader {
    classes: DashMap<String, AggregateKind>,
}

impl StaticLoader {
    /// Create an empty loader.
    #[must_use]
    pub fn new() -> Self {
        StaticLoader {
            classes: DashMap::new(),
        }
    }

    /// Declare `name` as loadable with the given aggregate kind.
    ///
    /// Re-registering a name overwrites the previous kind.
    pub fn register(&self, name: &str, kind: AggregateKind) {
        self.classes.insert(name.to_string(), kind);
    }

    /// Remove a previously registered name. Returns `true` if the name was known.
    pub fn unload(&self, name: &str) -> bool {
        self.classes.remove(name).is_some()
    }
}

impl Default for StaticLoader {
    fn default() -> Self {
        StaticLoader::new()
    }
}

impl ClassLoader for StaticLoader {
    fn resolve(&self, name: &str) -> Option<AggregateKind> {
        self.classes.get(name).map(|entry| *entry.value())
    }
}
