//! # polygen demo
//!
//! Walks an `Item` container through type switches and partial updates, then
//! encodes and decodes a few values. `item_polygen.rs` is the output of
//! running the generator on this directory:
//!
//! ```sh
//! cargo run -- --config demos/items/.polygen.json
//! cargo run --example items
//! ```

mod item_polygen;

use serde::{Deserialize, Serialize};

use polygen::{PolygenError, Shared, Tagged};

use item_polygen::Item;

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

fn show(label: &str, item: &Tagged<Item>) -> Result<(), PolygenError> {
    println!("{label:<28} {}", item.to_json_string()?);
    Ok(())
}

fn main() -> Result<(), PolygenError> {
    let mut item = Tagged::<Item>::empty();

    let steps = [
        (r#"{"kind": "image", "Width": 800}"#, "switch to image"),
        (r#"{"kind": "text", "Content": "hello"}"#, "switch to text"),
        (r#"{"Content": "updated"}"#, "patch content"),
        (r#"{"kind": "image", "Width": 800}"#, "switch back, fresh image"),
        (r#"{"Width": 900}"#, "patch width"),
    ];
    for (payload, label) in steps {
        item.decode_str(payload)?;
        show(label, &item)?;
    }

    // A reference-kind merge is visible through every clone of the handle.
    let alias = match item.active() {
        Some(Item::ImageItem(handle)) => Some(handle.clone()),
        _ => None,
    };
    if let Some(alias) = alias {
        item.decode_str(r#"{"URL": "https://example.com/pic.jpg"}"#)?;
        println!("{:<28} {}", "alias sees", alias.read().url);
    }

    let items = [
        Tagged::new(Item::TextItem(TextItem {
            content: "Hello, World!".into(),
        })),
        Tagged::new(Item::ImageItem(Shared::new(ImageItem {
            url: "https://example.com/image.jpg".into(),
            width: 800,
            height: 600,
        }))),
    ];
    for item in &items {
        println!("Encoded item:\n{}\n", item.to_json_string_pretty()?);
    }

    let inputs = [
        r#"{"kind": "text", "Content": "Hello from JSON!"}"#,
        r#"{"kind": "image", "URL": "https://example.com/pic.jpg", "Width": 1024, "Height": 768}"#,
        r#"{"Content": "no discriminator, default variant"}"#,
    ];
    for input in inputs {
        let item = Tagged::<Item>::from_slice(input.as_bytes())?;
        match item.active() {
            Some(Item::TextItem(text)) => println!("Got text item: {}", text.content),
            Some(Item::ImageItem(image)) => {
                let image = image.read();
                println!("Got image item: {}x{} at {}", image.width, image.height, image.url);
            }
            None => println!("Got nothing"),
        }
    }

    Ok(())
}
