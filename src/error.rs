use thiserror::Error;

macro_rules! parse_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Parse {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Parse {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers all failure modes of descriptor parsing, type resolution, layout
/// planning, synthesis, and invocation of generated operations. Each variant maps to a
/// specific admissibility rule so callers can distinguish failure kinds precisely.
///
/// # Error Categories
///
/// ## Structural Errors (abort generation, no type is ever created)
/// - [`Error::Parse`] - Malformed field descriptor
/// - [`Error::DuplicateField`] - Field name repeated within one descriptor list
/// - [`Error::DuplicateType`] - Generation re-requested for an existing name
/// - [`Error::ClassNotFound`] - Named nested type unresolvable at planning time
/// - [`Error::IncompatibleLayout`] - Inadmissible layout (e.g. flattening a non-value type)
///
/// ## Behavioral Errors (raised from the specific operation invocation)
/// - [`Error::IncompatibleLayout`] - Wither on a reference aggregate, setter on a value
///   aggregate, or default-value semantics requested on a reference aggregate
/// - [`Error::NullReceiver`] - Wither or setter invoked without a receiver
/// - [`Error::ClassNotFound`] - Backing class no longer resolvable at invocation time
///
/// ## Lookup and Narrowing Errors
/// - [`Error::FieldNotFound`] - Operation lookup for an unknown field name
/// - [`Error::TypeMismatch`] - Dynamic type incompatible with the field's storage type
/// - [`Error::ArityMismatch`] - Factory invoked with the wrong argument count
///
/// # Examples
///
/// ```rust
/// use aggregen::prelude::*;
/// use std::sync::Arc;
///
/// let registry = GeneratedRegistry::new(Arc::new(StaticLoader::new()));
/// match registry.generate_value_class("Broken", &["x:?"]) {
///     Err(Error::Parse { message, .. }) => println!("bad descriptor: {}", message),
///     Err(e) => println!("other error: {}", e),
///     Ok(_) => unreachable!(),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A field descriptor is malformed and could not be parsed.
    ///
    /// The error includes the source location where the malformation was
    /// detected for debugging purposes. Parsing fails fast; this is a local,
    /// synchronous, non-retryable condition.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file in which the error was detected
    /// * `line` - Source line in which the error was detected
    #[error("Parse - {file}:{line}: {message}")]
    Parse {
        /// The message to be printed for the Parse error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A field name appears more than once within a single descriptor list.
    ///
    /// Field names must be unique per aggregate. This is a structural failure
    /// and prevents the type from being generated.
    #[error("Duplicate field name in descriptor list - '{0}'")]
    DuplicateField(String),

    /// Generation was requested for a name that has already been generated.
    ///
    /// A generated type is immutable and its name is never silently rebound.
    /// [`crate::validation::GeneratorFlags::IDEMPOTENT_REGENERATION`] changes this into
    /// returning the existing type instead of an error.
    #[error("A type with this name has already been generated - '{0}'")]
    DuplicateType(String),

    /// A named class could not be resolved.
    ///
    /// At generation time this means a flattened or referenced nested type is
    /// unknown to the class loader. At invocation time it means the generated
    /// type's backing class is no longer resolvable (e.g. it was unloaded).
    #[error("Failed to resolve class - '{0}'")]
    ClassNotFound(String),

    /// The requested layout or operation is not admissible for the aggregate kind.
    ///
    /// Raised at generation time for flattening a non-value type or for cyclic
    /// flattening, and at invocation time for default-value factories on
    /// reference aggregates, withers on reference aggregates, and setters on
    /// value aggregates.
    #[error("Incompatible layout - {0}")]
    IncompatibleLayout(String),

    /// A wither or setter was invoked without a receiver.
    #[error("Operation invoked without a receiver")]
    NullReceiver,

    /// Operation lookup failed because the type has no field with this name.
    #[error("Failed to find field '{field}' on type '{ty}'")]
    FieldNotFound {
        /// Name of the generated type that was searched
        ty: String,
        /// The field name that could not be found
        field: String,
    },

    /// A dynamic value is incompatible with the field's concrete storage type.
    ///
    /// Raised when narrowing boxed arguments in the generic factory or generic
    /// wither/setter, and when a typed accessor requests the wrong concrete type.
    #[error("Type mismatch - expected {expected}, found {found}")]
    TypeMismatch {
        /// Description of the type the operation expected
        expected: String,
        /// Description of the type that was actually supplied
        found: String,
    },

    /// A factory was invoked with the wrong number of arguments.
    #[error("Argument count mismatch - expected {expected}, found {found}")]
    ArityMismatch {
        /// Number of arguments the factory requires
        expected: usize,
        /// Number of arguments that were supplied
        found: usize,
    },
}
