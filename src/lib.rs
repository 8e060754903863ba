//! Tagged-union JSON for closed sets of Rust types, with patch/merge
//! decoding.
//!
//! A polymorphic type is a plain enum with one tuple arm per variant. One
//! macro call gives it a JSON codec:
//!
//! ```ignore
//! #[derive(Debug, Clone, PartialEq)]
//! pub enum Item {
//!     TextItem(TextItem),
//!     ImageItem(polygen::Shared<ImageItem>),
//! }
//!
//! polygen::polymorphic! {
//!     Item {
//!         discriminator: "kind",
//!         default: TextItem,
//!         variants: {
//!             TextItem: value as "text",
//!             ImageItem: reference as "image",
//!         },
//!     }
//! }
//!
//! let mut item = Tagged::<Item>::empty();
//! item.decode_str(r#"{"kind":"image","Width":800}"#)?;
//! item.decode_str(r#"{"Height":600}"#)?; // still an image, Width kept
//! assert_eq!(item.to_json_string()?, r#"{"kind":"image","URL":"","Width":800,"Height":600}"#);
//! ```
//!
//! # Wire format
//!
//! The active variant's own fields are written as a flat JSON object with
//! the discriminator spliced in as the **first** key. The discriminator field
//! is `"type"` unless configured, and its value is the variant's name: the
//! kebab-case form of the identity (`TextItem` → `text-item`) unless an
//! explicit name is given. An empty container is `null`; a variant without
//! fields is exactly `{"type":"<name>"}`.
//!
//! When decoding, the discriminator may appear anywhere in the object.
//!
//! # Decoding is a patch
//!
//! [`Tagged::decode`] applies the payload to the container's current state
//! instead of replacing it:
//!
//! - **Same variant** (the payload names the active variant, or omits the
//!   discriminator while something is active): fields present in the payload
//!   are updated, absent fields keep their values. Nested structs are patched
//!   the same way at every depth. Maps gain or update the keys the payload
//!   names, but each named entry's value is replaced whole. Arrays, scalars
//!   and `serde_json::Value` fields are replaced.
//! - **Different variant**: decoding starts from the variant's `Default`, so
//!   nothing leaks over from the previous one.
//! - **No discriminator, nothing active**: the type's default variant, if
//!   one is configured; otherwise [`PolygenError::MissingDiscriminator`].
//!
//! An explicit empty discriminator (`"type": ""`) is always an error.
//!
//! A failed decode leaves the container exactly as it was.
//!
//! # Value and reference variants
//!
//! A value-kind arm holds `T`: a merge produces a new `T` seeded from the old
//! one. A reference-kind arm holds [`Shared<T>`], a cloneable handle to shared
//! storage: a merge writes through the handle, so every clone of it observes
//! the update. Which kind an arm is follows from its type, and the macro
//! declaration must agree or the crate does not compile.
//!
//! # Strict mode
//!
//! With `strict: true` (or a per-call [`DecodeContext`]), a field the target
//! variant does not declare fails the decode with
//! [`PolygenError::StrictFieldRejection`], naming the field by its dotted
//! path (`Style.Bogus`). Lenient decoding drops such fields and logs them at
//! `debug`.
//!
//! # Serde integration
//!
//! [`Tagged<V>`] implements `Serialize` and `Deserialize`, so it can be a
//! field of any serde struct. `Deserialize` has no previous state to patch,
//! so it always decodes fresh. [`decode_stream`] reads a sequence of
//! concatenated JSON values.
//!
//! # Code generation
//!
//! The `polygen` binary (behind the `clap` feature, on by default) reads a
//! `.polygen.json` file and writes the enum and macro invocation for every
//! configured type. See the [`config`] module for the file format and
//! [`emit`] for the output. To use only the codec:
//!
//! ```toml
//! polygen = { version = "...", default-features = false }
//! ```
//!
//! # Error handling
//!
//! All fallible operations return [`PolygenError`]. With the `rich-errors`
//! feature it also implements `miette::Diagnostic`.

pub mod config;
pub mod container;
pub mod decode;
pub mod emit;
pub mod encode;
pub mod error;
pub mod naming;
pub mod ops;
pub mod types;

#[cfg(feature = "clap")]
pub mod cli;
mod merge;
mod registry;
mod resolve;
mod schema;
mod shared;
mod validate;
mod variant;

#[cfg(test)]
mod fixtures;

pub use container::{Tagged, decode_stream};
pub use error::PolygenError;
pub use registry::{Registry, VariantDescriptor};
pub use schema::{Schema, SchemaBuilder};
pub use shared::Shared;
pub use types::{Action, DEFAULT_DISCRIMINATOR, DecodeContext, VariantKind};
pub use variant::VariantSet;

#[doc(hidden)]
pub mod __private {
    pub use crate::encode::to_wire_value;
    pub use serde_json::{Error, Map, Value};
}
