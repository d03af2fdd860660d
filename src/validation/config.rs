use bitflags::bitflags;

bitflags! {
    /// Policy flags for behavior the observed source leaves unspecified.
    ///
    /// Both flags cover semantics that are explicitly open: what happens when
    /// generation is re-requested for an existing name, and how identity
    /// comparison treats value instances. The defaults are the strict choices;
    /// neither flag ever rebinds a generated name.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GeneratorFlags: u32 {
        /// Re-requesting generation for an existing name returns the existing
        /// type instead of failing with [`crate::Error::DuplicateType`].
        const IDEMPOTENT_REGENERATION = 1 << 0;
        /// [`crate::Instance::same_identity`] falls back to structural equality
        /// when a value instance is involved, instead of reporting `false`.
        const STRUCTURAL_VALUE_IDENTITY = 1 << 1;
    }
}

/// Configuration applied to a [`crate::GeneratedRegistry`] at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Policy flags; empty by default
    pub flags: GeneratorFlags,
}

impl GeneratorConfig {
    /// Build a configuration from explicit flags.
    #[must_use]
    pub fn new(flags: GeneratorFlags) -> Self {
        GeneratorConfig { flags }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            flags: GeneratorFlags::empty(),
        }
    }
}
