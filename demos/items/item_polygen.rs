// Code generated by polygen. DO NOT EDIT.

use super::{ImageItem, TextItem};

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    ImageItem(polygen::Shared<ImageItem>),
    TextItem(TextItem),
}

polygen::polymorphic! {
    Item {
        discriminator: "kind",
        strict: false,
        default: TextItem,
        variants: {
            ImageItem: reference as "image",
            TextItem: value as "text",
        },
    }
}
