//! The polymorphic container.
//!
//! [`Tagged<V>`] holds at most one active variant of the closed set `V`. It is
//! the single generic container shared by every polymorphic type: encoding and
//! decoding are driven by `V`'s [`Schema`](crate::Schema), so no per-type
//! container code exists.
//!
//! Decoding through `&mut self` applies merge semantics against the current
//! state and commits only on success. The `serde` impls make a `Tagged<V>`
//! usable as a field of any serde struct; `Deserialize` has no prior state to
//! merge into, so it always decodes fresh.

use std::io::Read;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::decode;
use crate::encode;
use crate::error::PolygenError;
use crate::types::DecodeContext;
use crate::variant::VariantSet;

#[derive(Debug, Clone, PartialEq)]
pub struct Tagged<V> {
    active: Option<V>,
}

impl<V> Tagged<V> {
    pub const fn empty() -> Self {
        Self { active: None }
    }

    pub fn new(active: V) -> Self {
        Self {
            active: Some(active),
        }
    }

    pub fn active(&self) -> Option<&V> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut V> {
        self.active.as_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_none()
    }

    /// Remove the active instance, leaving the container empty.
    pub fn take(&mut self) -> Option<V> {
        self.active.take()
    }

    pub fn into_inner(self) -> Option<V> {
        self.active
    }
}

impl<V: VariantSet> Tagged<V> {
    /// Discriminator string of the active variant.
    pub fn discriminator(&self) -> Result<Option<&'static str>, PolygenError> {
        self.active
            .as_ref()
            .map(|active| {
                V::schema()
                    .registry()
                    .resolve_by_identity(active.identity())
                    .map(|desc| desc.name.as_str())
            })
            .transpose()
    }

    pub fn encode(&self) -> Result<Value, PolygenError> {
        encode::encode(self.active.as_ref())
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, PolygenError> {
        let value = self.encode()?;
        serde_json::to_vec(&value).map_err(|source| self.encode_failure(source))
    }

    pub fn to_json_string(&self) -> Result<String, PolygenError> {
        let value = self.encode()?;
        serde_json::to_string(&value).map_err(|source| self.encode_failure(source))
    }

    pub fn to_json_string_pretty(&self) -> Result<String, PolygenError> {
        let value = self.encode()?;
        serde_json::to_string_pretty(&value).map_err(|source| self.encode_failure(source))
    }

    /// Decode JSON bytes into this container with the type's own context.
    pub fn decode(&mut self, bytes: &[u8]) -> Result<(), PolygenError> {
        let raw = parse_slice(bytes)?;
        self.decode_value(raw)
    }

    pub fn decode_str(&mut self, json: &str) -> Result<(), PolygenError> {
        self.decode(json.as_bytes())
    }

    pub fn decode_value(&mut self, raw: Value) -> Result<(), PolygenError> {
        self.decode_with(raw, V::schema().context())
    }

    /// Decode with an explicit context, e.g. a strict pass over a lenient type.
    ///
    /// The container is replaced only if the decode succeeds.
    pub fn decode_with(&mut self, raw: Value, ctx: &DecodeContext) -> Result<(), PolygenError> {
        self.active = decode::decode(raw, self.active.as_ref(), ctx)?;
        Ok(())
    }

    /// A fresh container decoded from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PolygenError> {
        let mut tagged = Self::empty();
        tagged.decode(bytes)?;
        Ok(tagged)
    }

    fn encode_failure(&self, source: serde_json::Error) -> PolygenError {
        PolygenError::EncodeFailure {
            variant: self
                .active
                .as_ref()
                .map_or("<empty>", |active| active.identity())
                .to_string(),
            source,
        }
    }
}

impl<V> Default for Tagged<V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<V> From<V> for Tagged<V> {
    fn from(active: V) -> Self {
        Self::new(active)
    }
}

impl<V: VariantSet> Serialize for Tagged<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.encode()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de, V: VariantSet> Deserialize<'de> for Tagged<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let active =
            decode::decode(raw, None, V::schema().context()).map_err(serde::de::Error::custom)?;
        Ok(Self { active })
    }
}

/// Decode back-to-back JSON values from `reader`, each into a fresh container.
///
/// Values are decoded independently and in order; an error is yielded in
/// place and iteration continues with the next value when the input allows.
pub fn decode_stream<V, R>(reader: R) -> impl Iterator<Item = Result<Tagged<V>, PolygenError>>
where
    V: VariantSet,
    R: Read,
{
    serde_json::Deserializer::from_reader(reader)
        .into_iter::<Value>()
        .map(|raw| -> Result<Tagged<V>, PolygenError> {
            let raw = raw.map_err(|e| PolygenError::MalformedInput(e.to_string()))?;
            let mut tagged = Tagged::empty();
            tagged.decode_value(raw)?;
            Ok(tagged)
        })
}

fn parse_slice(bytes: &[u8]) -> Result<Value, PolygenError> {
    serde_json::from_slice(bytes).map_err(|e| PolygenError::MalformedInput(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{
        Circle, Empty, Group, ImageItem, Item, Point, Polygon, Rectangle, Shape, StrictShape,
        TextItem,
    };
    use crate::shared::Shared;
    use serde_json::json;

    fn circle(radius: f64) -> Tagged<Shape> {
        Tagged::new(Shape::Circle(Circle { radius }))
    }

    #[test]
    fn empty_round_trip() {
        let empty = Tagged::<Shape>::empty();
        assert_eq!(empty.to_vec().unwrap(), b"null");
        assert_eq!(Tagged::<Shape>::from_slice(b"null").unwrap(), empty);
    }

    #[test]
    fn decoding_null_empties_the_container() {
        let mut shape = circle(2.0);
        shape.decode(b"null").unwrap();
        assert!(shape.is_empty());
    }

    #[test]
    fn fieldless_variant_round_trips() {
        let shape = Tagged::new(Shape::Empty(Empty {}));
        let bytes = shape.to_vec().unwrap();
        assert_eq!(bytes, br#"{"type":"empty"}"#);
        assert_eq!(Tagged::<Shape>::from_slice(&bytes).unwrap(), shape);
    }

    #[test]
    fn partial_update_keeps_variant() {
        let mut shape = circle(5.0);
        shape.decode_str(r#"{"Radius":10}"#).unwrap();
        assert_eq!(shape, circle(10.0));
        assert_eq!(shape.discriminator().unwrap(), Some("circle"));
    }

    #[test]
    fn type_switch_clears_stale_data() {
        let mut shape = circle(5.0);
        shape.decode_str(r#"{"type":"rectangle"}"#).unwrap();
        assert_eq!(shape, Tagged::new(Shape::Rectangle(Rectangle::default())));
    }

    #[test]
    fn group_attributes_are_upserted() {
        let mut shape = Tagged::<Shape>::empty();
        shape
            .decode_str(r#"{"type":"group","Attributes":{"active":true}}"#)
            .unwrap();
        shape
            .decode_str(r#"{"Attributes":{"status":"ready"}}"#)
            .unwrap();
        match shape.active() {
            Some(Shape::Group(group)) => {
                let attributes = serde_json::to_value(&group.read().attributes).unwrap();
                assert_eq!(attributes, json!({"active": true, "status": "ready"}));
            }
            other => panic!("Expected Group, got: {other:?}"),
        }
    }

    #[test]
    fn group_attribute_values_are_replaced() {
        let mut shape = Tagged::<Shape>::empty();
        shape
            .decode_str(r#"{"type":"group","Attributes":{"a":{"x":1}}}"#)
            .unwrap();
        shape.decode_str(r#"{"Attributes":{"a":{"y":2}}}"#).unwrap();
        assert_eq!(
            shape.to_json_string().unwrap(),
            r#"{"type":"group","Name":"","Attributes":{"a":{"y":2}}}"#
        );
    }

    #[test]
    fn failures_leave_the_container_unchanged() {
        let payloads: [&[u8]; 6] = [
            b"{",
            br#"{"type":"unknown"}"#,
            br#"{"type":""}"#,
            br#"{"type":5}"#,
            br#"{"Radius":"wide"}"#,
            b"[]",
        ];
        for payload in payloads {
            let mut shape = circle(5.0);
            assert!(shape.decode(payload).is_err());
            assert_eq!(shape, circle(5.0));
        }

        let mut group = Tagged::new(Shape::Group(Shared::new(Group {
            name: "g".into(),
            ..Group::default()
        })));
        let before = group.to_json_string().unwrap();
        assert!(group.decode_str(r#"{"Name":["not","a","string"]}"#).is_err());
        assert_eq!(group.to_json_string().unwrap(), before);
    }

    #[test]
    fn strict_type_rejects_extra_fields() {
        let mut shape = Tagged::<StrictShape>::empty();
        let err = shape
            .decode_str(r#"{"type":"circle","Radius":5,"extra":"field"}"#)
            .unwrap_err();
        assert!(err.is_unknown_field());
        assert!(shape.is_empty());

        let mut lenient = Tagged::<Shape>::empty();
        lenient
            .decode_str(r#"{"type":"circle","Radius":5,"extra":"field"}"#)
            .unwrap();
        assert_eq!(lenient, circle(5.0));
    }

    #[test]
    fn strict_decode_with_explicit_context() {
        let mut shape = circle(1.0);
        let strict = Shape::schema().context().clone().strict(true);
        let err = shape.decode_with(json!({"Diameter": 2}), &strict).unwrap_err();
        assert!(err.is_unknown_field());
        assert_eq!(shape, circle(1.0));
    }

    #[test]
    fn default_variant_fallback() {
        let item = Tagged::<Item>::from_slice(b"{}").unwrap();
        assert_eq!(item, Tagged::new(Item::TextItem(TextItem::default())));

        let err = Tagged::<Shape>::from_slice(b"{}").unwrap_err();
        assert!(matches!(err, PolygenError::MissingDiscriminator { .. }));
    }

    #[test]
    fn item_walkthrough() {
        let mut item = Tagged::<Item>::empty();
        item.decode_str(r#"{"kind":"image","Width":800}"#).unwrap();
        item.decode_str(r#"{"kind":"text","Content":"hello"}"#).unwrap();
        item.decode_str(r#"{"Content":"updated"}"#).unwrap();
        assert_eq!(
            item,
            Tagged::new(Item::TextItem(TextItem {
                content: "updated".into()
            }))
        );

        item.decode_str(r#"{"kind":"image","Width":800}"#).unwrap();
        item.decode_str(r#"{"Height":900}"#).unwrap();
        let expected = Item::ImageItem(Shared::new(ImageItem {
            url: String::new(),
            width: 800,
            height: 900,
        }));
        assert_eq!(item, Tagged::new(expected));
    }

    #[test]
    fn pretty_output() {
        let shape = Tagged::new(Shape::Polygon(Shared::new(Polygon {
            points: vec![Point { x: 0.0, y: 0.0 }, Point { x: 1.0, y: 1.0 }],
            labels: vec!["A".into(), "B".into()],
        })));
        let want = r#"{
  "type": "polygon",
  "Points": [
    {
      "X": 0.0,
      "Y": 0.0
    },
    {
      "X": 1.0,
      "Y": 1.0
    }
  ],
  "Labels": [
    "A",
    "B"
  ]
}"#;
        assert_eq!(shape.to_json_string_pretty().unwrap(), want);
    }

    #[test]
    fn nests_inside_serde_structs() {
        #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        struct Canvas {
            title: String,
            shapes: Vec<Tagged<Shape>>,
        }

        let canvas = Canvas {
            title: "c".into(),
            shapes: vec![circle(1.0), Tagged::empty()],
        };
        let json = serde_json::to_string(&canvas).unwrap();
        assert_eq!(
            json,
            r#"{"title":"c","shapes":[{"type":"circle","Radius":1.0},null]}"#
        );
        let back: Canvas = serde_json::from_str(&json).unwrap();
        assert_eq!(back, canvas);
    }

    #[test]
    fn serde_deserialize_reports_codec_errors() {
        let err = serde_json::from_str::<Tagged<Shape>>(r#"{"type":"hexagon"}"#).unwrap_err();
        assert!(err.to_string().contains("hexagon"));
    }

    #[test]
    fn stream_decodes_in_order() {
        let input = [
            r#"{"type":"circle","Radius":1}"#,
            r#"{"type":"rectangle","Width":2,"Height":3}"#,
            r#"{"type":"polygon","Points":[{"X":0,"Y":0}]}"#,
            r#"{"type":"group","Name":"test"}"#,
        ]
        .join("\n");

        let decoded: Vec<Tagged<Shape>> = decode_stream(input.as_bytes())
            .collect::<Result<_, _>>()
            .unwrap();

        let expected = vec![
            circle(1.0),
            Tagged::new(Shape::Rectangle(Rectangle {
                width: 2.0,
                height: 3.0,
                ..Rectangle::default()
            })),
            Tagged::new(Shape::Polygon(Shared::new(Polygon {
                points: vec![Point { x: 0.0, y: 0.0 }],
                labels: vec![],
            }))),
            Tagged::new(Shape::Group(Shared::new(Group {
                name: "test".into(),
                ..Group::default()
            }))),
        ];
        assert_eq!(decoded, expected);
    }

    #[test]
    fn stream_reports_bad_values() {
        let input = r#"{"type":"circle","Radius":1} {"type":"nope"}"#;
        let results: Vec<_> = decode_stream::<Shape, _>(input.as_bytes()).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(PolygenError::UnknownVariant(_))));
    }
}
