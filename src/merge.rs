//! Patch deserialization: a payload layered over the encoded previous value.
//!
//! [`Layered`] is a `serde` deserializer over two JSON values, the encoded
//! base and an optional overlay. The target type decides how they combine:
//!
//! - a **struct** (`deserialize_struct`) merges field by field, recursing, so
//!   fields the overlay omits keep their base value;
//! - a **map** (`deserialize_map`) keeps base keys and adds overlay keys; an
//!   overlay entry replaces the base entry's value as a whole;
//! - `Option<T>` with a non-null overlay layers into `T`; a null overlay is
//!   `None`;
//! - everything else (scalars, sequences, enums, `serde_json::Value`) takes
//!   the overlay when present and the base otherwise.

use serde::Deserializer;
use serde::de::{self, DeserializeSeed, MapAccess, Visitor};
use serde_json::{Error, Map, Value};

pub struct Layered {
    base: Value,
    overlay: Option<Value>,
}

impl Layered {
    pub fn new(base: Value, overlay: Value) -> Self {
        Self {
            base,
            overlay: Some(overlay),
        }
    }

    /// The value that wins when no merge applies.
    fn top(self) -> Value {
        self.overlay.unwrap_or(self.base)
    }
}

macro_rules! forward_to_top {
    ($($method:ident)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
                self.top().$method(visitor)
            }
        )*
    };
}

impl<'de> Deserializer<'de> for Layered {
    type Error = Error;

    forward_to_top! {
        deserialize_any deserialize_bool
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64 deserialize_i128
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64 deserialize_u128
        deserialize_f32 deserialize_f64 deserialize_char deserialize_str deserialize_string
        deserialize_bytes deserialize_byte_buf deserialize_unit deserialize_seq
        deserialize_identifier deserialize_ignored_any
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.overlay {
            None => self.base.deserialize_option(visitor),
            Some(Value::Null) => visitor.visit_none(),
            Some(_) => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        match (self.base, self.overlay) {
            (Value::Object(base), Some(Value::Object(overlay))) => {
                visitor.visit_map(LayeredFields::new(base, overlay))
            }
            (base, overlay) => overlay
                .unwrap_or(base)
                .deserialize_struct(name, fields, visitor),
        }
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match (self.base, self.overlay) {
            (Value::Object(mut base), Some(Value::Object(overlay))) => {
                for (key, value) in overlay {
                    base.insert(key, value);
                }
                Value::Object(base).deserialize_map(visitor)
            }
            (base, overlay) => overlay.unwrap_or(base).deserialize_map(visitor),
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.top().deserialize_unit_struct(name, visitor)
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value, Error> {
        self.top().deserialize_tuple(len, visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.top().deserialize_tuple_struct(name, len, visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.top().deserialize_enum(name, variants, visitor)
    }
}

/// Struct fields of both layers: base keys first, then keys only the overlay has.
struct LayeredFields {
    entries: std::vec::IntoIter<(String, Layered)>,
    pending: Option<Layered>,
}

impl LayeredFields {
    fn new(base: Map<String, Value>, mut overlay: Map<String, Value>) -> Self {
        let mut entries = Vec::with_capacity(base.len() + overlay.len());
        for (key, base_value) in base {
            let overlay_value = overlay.remove(&key);
            entries.push((
                key,
                Layered {
                    base: base_value,
                    overlay: overlay_value,
                },
            ));
        }
        for (key, overlay_value) in overlay {
            entries.push((key, Layered::new(Value::Null, overlay_value)));
        }
        Self {
            entries: entries.into_iter(),
            pending: None,
        }
    }
}

impl<'de> MapAccess<'de> for LayeredFields {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, Error> {
        match self.entries.next() {
            Some((key, value)) => {
                self.pending = Some(value);
                seed.deserialize(Value::String(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, Error> {
        match self.pending.take() {
            Some(value) => seed.deserialize(value),
            None => Err(de::Error::custom("field value requested before its key")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}
