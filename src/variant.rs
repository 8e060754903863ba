//! The closed set of variants behind a polymorphic type.
//!
//! A polymorphic type is a plain Rust enum with one tuple arm per variant.
//! Value-kind arms hold the variant type directly, reference-kind arms hold a
//! [`Shared`](crate::Shared) handle to it. [`VariantSet`] ties that enum to its
//! [`Schema`]; the [`polymorphic!`](crate::polymorphic) macro writes the impl.

use serde_json::{Map, Value};

use crate::error::PolygenError;
use crate::schema::Schema;

/// Implemented by exactly one enum per polymorphic type.
///
/// The enum's arms and the schema's registry must describe the same variants;
/// [`polymorphic!`](crate::polymorphic) generates both from one list.
pub trait VariantSet: Sized {
    /// The type's schema, built once on first use.
    fn schema() -> &'static Schema;

    /// Identity token of the active arm, e.g. `"Circle"`.
    fn identity(&self) -> &'static str;

    /// Structural encoding of the active instance, without the discriminator.
    fn encode_fields(&self) -> Result<Value, serde_json::Error>;

    /// Decode `payload` (discriminator already removed) as variant `identity`.
    ///
    /// `current` is the active instance when it is the same variant (merge
    /// decode), otherwise `None` (fresh decode).
    fn decode_fields(
        identity: &str,
        current: Option<&Self>,
        payload: Map<String, Value>,
        strict: bool,
    ) -> Result<Self, PolygenError>;
}

/// Implement [`VariantSet`] for an enum.
///
/// Keys must appear in this order; all but `variants` are optional:
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// pub enum Shape {
///     Circle(Circle),
///     Group(polygen::Shared<Group>),
/// }
///
/// polygen::polymorphic! {
///     Shape {
///         discriminator: "type",
///         strict: false,
///         default: Circle,
///         variants: {
///             Circle: value,
///             Group: reference as "group",
///         },
///     }
/// }
/// ```
///
/// Without `as "name"` the discriminator is the kebab-case identity.
///
/// # Limits
///
/// Decoding rebuilds each variant from its serialized fields. A field the
/// variant's `Serialize` impl leaves out, such as one marked
/// `#[serde(skip)]`, is not carried across a merge: it comes back as the
/// value its `Deserialize` impl fills in, usually `Default::default()`. For
/// reference-kind variants this holds for the shared storage as well.
///
/// Encoding fails with [`PolygenError::EncodeFailure`](crate::PolygenError)
/// when a field holds a NaN or infinite float.
///
/// # Panics
///
/// The schema is validated on first use; duplicate discriminator names or an
/// unknown `default` panic there with the underlying [`PolygenError`].
#[macro_export]
macro_rules! polymorphic {
    (
        $ty:ident {
            $(discriminator: $field:literal,)?
            $(strict: $strict:literal,)?
            $(default: $default:ident,)?
            variants: {
                $($variant:ident: $kind:ident $(as $name:literal)?),+ $(,)?
            } $(,)?
        }
    ) => {
        impl $crate::VariantSet for $ty {
            fn schema() -> &'static $crate::Schema {
                static SCHEMA: ::std::sync::OnceLock<$crate::Schema> = ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $crate::Schema::builder(stringify!($ty))
                        $(.discriminator($field))?
                        $(.strict($strict))?
                        $(.default_variant(stringify!($default)))?
                        $(.variant(
                            $crate::VariantDescriptor::new(
                                stringify!($variant),
                                $crate::__polygen_kind!($kind),
                            )
                            $(.with_name($name))?
                        ))+
                        .build()
                        .unwrap_or_else(|err| {
                            panic!("polygen: invalid schema for {}: {err}", stringify!($ty))
                        })
                })
            }

            fn identity(&self) -> &'static str {
                match self {
                    $(Self::$variant(..) => stringify!($variant),)+
                }
            }

            fn encode_fields(
                &self,
            ) -> ::std::result::Result<$crate::__private::Value, $crate::__private::Error> {
                match self {
                    $(Self::$variant(inner) => $crate::__private::to_wire_value(inner),)+
                }
            }

            fn decode_fields(
                identity: &str,
                current: ::std::option::Option<&Self>,
                payload: $crate::__private::Map<::std::string::String, $crate::__private::Value>,
                strict: bool,
            ) -> ::std::result::Result<Self, $crate::PolygenError> {
                $(
                    if identity == stringify!($variant) {
                        let current = match current {
                            ::std::option::Option::Some(Self::$variant(inner)) => {
                                ::std::option::Option::Some(inner)
                            }
                            _ => ::std::option::Option::None,
                        };
                        return $crate::__polygen_decode!(
                            $kind,
                            stringify!($variant),
                            current,
                            payload,
                            strict
                        )
                        .map(Self::$variant);
                    }
                )+
                ::std::result::Result::Err($crate::PolygenError::UnknownIdentity(
                    identity.to_string(),
                ))
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __polygen_kind {
    (value) => {
        $crate::VariantKind::Value
    };
    (reference) => {
        $crate::VariantKind::Reference
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __polygen_decode {
    (value, $($arg:expr),+) => {
        $crate::decode::decode_value_variant($($arg),+)
    };
    (reference, $($arg:expr),+) => {
        $crate::decode::decode_shared_variant($($arg),+)
    };
}
