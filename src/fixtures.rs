#[cfg(test)]
pub mod test {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Serialize};
    use serde_json::Value;

    use crate::shared::Shared;

    // -- Shape fixtures: one of each field flavor -------------------------------

    #[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    pub struct Circle {
        pub radius: f64,
    }

    #[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    pub struct Style {
        pub color: String,
        pub fill: bool,
    }

    #[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    pub struct Rectangle {
        pub width: f64,
        pub height: f64,
        pub style: Style,
    }

    #[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    pub struct Point {
        pub x: f64,
        pub y: f64,
    }

    #[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    pub struct Polygon {
        pub points: Vec<Point>,
        pub labels: Vec<String>,
    }

    #[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    pub struct Group {
        pub name: String,
        pub attributes: BTreeMap<String, Value>,
    }

    #[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
    pub struct Empty {}

    #[derive(Debug, Clone, PartialEq)]
    pub enum Shape {
        Circle(Circle),
        Rectangle(Rectangle),
        Polygon(Shared<Polygon>),
        Group(Shared<Group>),
        Empty(Empty),
    }

    crate::polymorphic! {
        Shape {
            variants: {
                Circle: value,
                Rectangle: value,
                Polygon: reference,
                Group: reference,
                Empty: value,
            },
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum StrictShape {
        Circle(Circle),
        Rectangle(Rectangle),
        Polygon(Shared<Polygon>),
        Group(Shared<Group>),
        Empty(Empty),
    }

    crate::polymorphic! {
        StrictShape {
            strict: true,
            variants: {
                Circle: value,
                Rectangle: value,
                Polygon: reference,
                Group: reference,
                Empty: value,
            },
        }
    }

    // -- Item fixtures: custom discriminator, names and default -----------------

    #[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    pub struct TextItem {
        pub content: String,
    }

    #[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    pub struct ImageItem {
        #[serde(rename = "URL")]
        pub url: String,
        pub width: u32,
        pub height: u32,
    }

    #[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
    pub struct Divider;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Item {
        TextItem(TextItem),
        ImageItem(Shared<ImageItem>),
        Divider(Divider),
    }

    crate::polymorphic! {
        Item {
            discriminator: "kind",
            default: TextItem,
            variants: {
                TextItem: value as "text",
                ImageItem: reference as "image",
                Divider: value,
            },
        }
    }
}
