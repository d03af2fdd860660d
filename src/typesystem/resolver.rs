use std::collections::HashMap;

use crate::{
    synth::GeneratedTypeRc,
    typesystem::{AggregateKind, GeneratedRegistry},
    Error::ClassNotFound,
    Result,
};

/// The outcome of resolving a named nested type.
///
/// Resolution consults the generated-type registry first (those names carry a
/// full layout plan) and falls back to the external [`crate::typesystem::ClassLoader`]
/// capability. Loader-declared names resolve to a kind only; they have no layout
/// and therefore cannot be flattened.
#[derive(Clone, Debug)]
pub struct ResolvedType {
    /// The aggregate kind the name resolved to
    pub kind: AggregateKind,
    /// The generated type behind the name, when the registry owns one
    pub generated: Option<GeneratedTypeRc>,
}

/// Resolves named types during a single generation request.
///
/// Resolution is memoized per request: a class is looked up at most once per
/// plan, so the planner observes a consistent view even if the loader changes
/// concurrently. Primitive codes never reach the resolver - their resolution is
/// immediate in the planner.
pub struct TypeResolver<'a> {
    /// Registry whose generated types and loader back the resolution
    registry: &'a GeneratedRegistry,
    /// Per-request memoization of resolution outcomes
    cache: HashMap<String, Option<ResolvedType>>,
}

impl<'a> TypeResolver<'a> {
    /// Create a resolver for one generation request against `registry`.
    #[must_use]
    pub fn new(registry: &'a GeneratedRegistry) -> Self {
        TypeResolver {
            registry,
            cache: HashMap::new(),
        }
    }

    /// Resolve `name`, reporting a missing class as an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ClassNotFound`] if neither the registry nor the
    /// loader knows the name.
    pub fn resolve(&mut self, name: &str) -> Result<ResolvedType> {
        match self.try_resolve(name) {
            Some(resolved) => Ok(resolved),
            None => Err(ClassNotFound(name.to_string())),
        }
    }

    /// Resolve `name`, reporting a missing class as `None`.
    pub fn try_resolve(&mut self, name: &str) -> Option<ResolvedType> {
        if let Some(cached) = self.cache.get(name) {
            return cached.clone();
        }

        let resolved = if let Some(generated) = self.registry.get(name) {
            Some(ResolvedType {
                kind: generated.kind(),
                generated: Some(generated),
            })
        } else {
            self.registry
                .loader()
                .resolve(name)
                .map(|kind| ResolvedType {
                    kind,
                    generated: None,
                })
        };

        self.cache.insert(name.to_string(), resolved.clone());
        resolved
    }
}
