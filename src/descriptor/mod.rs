//! Field descriptor parsing.
//!
//! This module turns textual field descriptors into structured [`FieldSpec`]
//! records. The grammar is consumed at generation time:
//!
//! ```text
//! fieldSpec := name ":" typeCode [ ":" flag ]
//! typeCode  := primitiveCode | marker className ";"
//! marker    := "L" | "Q"          ; L = boxed reference, Q = flattened inline
//! flag      := "value"            ; request default-value semantics
//! ```
//!
//! # Key Components
//!
//! - [`FieldSpec`]: One parsed field description
//! - [`TypeRef`]: Primitive kind or unresolved named aggregate
//! - [`StorageRequest`]: Direct, flattened, or boxed-reference storage
//! - [`PrimitiveKind`]: The fixed primitive enumeration with slot widths
//! - [`parse_field_descriptor`] / [`parse_field_descriptors`]: Entry points
//!
//! Parsing is local and side-effect free: named classes are recorded, never
//! resolved, and malformed input fails fast with [`crate::Error::Parse`].
//!
//! # Examples
//!
//! ```rust
//! use aggregen::descriptor::parse_field_descriptors;
//!
//! let fields = parse_field_descriptors(&["x:I", "y:I"])?;
//! assert_eq!(fields[0].name, "x");
//! # Ok::<(), aggregen::Error>(())
//! ```

mod parser;
mod types;

pub use parser::{parse_field_descriptor, parse_field_descriptors};
pub use types::{FieldSpec, PrimitiveKind, StorageRequest, TypeRef};
