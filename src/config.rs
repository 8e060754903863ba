//! Generator configuration: the `.polygen.json` file.
//!
//! A configuration file lists polymorphic types and their variants. Loading
//! turns each entry into a [`TypeSpec`], the codec-level description the
//! [`emit`](crate::emit) module renders into Rust source.
//!
//! ```json
//! {
//!   "defaultDescriptor": "kind",
//!   "types": [
//!     {
//!       "type": "Item",
//!       "directory": "src/items",
//!       "default": "TextItem",
//!       "subtypes": {
//!         "TextItem": { "name": "text" },
//!         "ImageItem": { "reference": true }
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! JSON is the default format; a `.toml` extension selects TOML with the same
//! keys. Unknown keys are rejected with every offending path listed, the same
//! way strict decoding rejects undeclared fields.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PolygenError;
use crate::registry::VariantDescriptor;
use crate::schema::Schema;
use crate::types::{DEFAULT_DISCRIMINATOR, VariantKind};

/// Configuration file name looked up when none is given.
pub const DEFAULT_CONFIG_FILE: &str = ".polygen.json";

const DEFAULT_DERIVES: [&str; 3] = ["Debug", "Clone", "PartialEq"];

/// The configuration file as written on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    /// Editor hint pointing at the file's JSON Schema; ignored.
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default)]
    pub strict_by_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_descriptor: Option<String>,
    pub types: Vec<TypeConfig>,
}

/// One polymorphic type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeConfig {
    /// Name of the generated enum.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Discriminator field; falls back to `defaultDescriptor`, then `"type"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<String>,
    /// Output directory, relative to the configuration file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    /// Output file name, `<snake_case(type)>_polygen.rs` by default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Falls back to `strictByDefault`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    /// Identity of the variant used when a payload has no discriminator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derive: Option<Vec<String>>,
    /// Variant identity → options. Sorted, so generated output is stable.
    pub subtypes: BTreeMap<String, SubtypeConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubtypeConfig {
    /// Discriminator string; the kebab-case identity when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Hold instances through a `Shared` handle.
    #[serde(default, alias = "pointer")]
    pub reference: bool,
}

/// Loader output for one polymorphic type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub type_name: String,
    pub discriminator: String,
    pub strict: bool,
    pub default_variant: Option<String>,
    pub variants: Vec<VariantDescriptor>,
    pub derives: Vec<String>,
}

impl TypeSpec {
    /// Build the codec schema this type would get at run time.
    pub fn schema(&self) -> Result<Schema, PolygenError> {
        let mut builder = Schema::builder(&self.type_name)
            .discriminator(&self.discriminator)
            .strict(self.strict);
        if let Some(default) = &self.default_variant {
            builder = builder.default_variant(default);
        }
        for variant in &self.variants {
            builder = builder.variant(variant.clone());
        }
        builder.build()
    }
}

/// A loaded configuration file. `types[i]` is built from `file.types[i]`.
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory output paths are relative to.
    pub config_dir: PathBuf,
    pub file: FileConfig,
    pub types: Vec<TypeSpec>,
}

impl Project {
    /// Pairs of (file entry, validated spec), in file order.
    pub fn entries(&self) -> impl Iterator<Item = (&TypeConfig, &TypeSpec)> {
        self.file.types.iter().zip(&self.types)
    }
}

/// Read, parse and validate a configuration file.
pub fn load(path: &Path) -> Result<Project, PolygenError> {
    let content = std::fs::read_to_string(path).map_err(|source| PolygenError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded configuration file");

    let file = parse_str(&content, path)?;
    let types = resolve_types(&file)?;
    let config_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    Ok(Project {
        config_dir,
        file,
        types,
    })
}

/// Parse configuration text. `path` selects the format and labels errors.
pub fn parse_str(content: &str, path: &Path) -> Result<FileConfig, PolygenError> {
    let mut unknown_keys: Vec<String> = Vec::new();
    let on_ignored = |ignored_path: serde_ignored::Path<'_>| {
        unknown_keys.push(ignored_path.to_string());
    };

    let parsed: Result<FileConfig, String> = if is_toml(path) {
        let deserializer = toml::Deserializer::new(content);
        serde_ignored::deserialize(deserializer, on_ignored).map_err(|e| e.to_string())
    } else {
        let mut deserializer = serde_json::Deserializer::from_str(content);
        serde_ignored::deserialize(&mut deserializer, on_ignored)
            .and_then(|file| deserializer.end().map(|()| file))
            .map_err(|e| e.to_string())
    };

    let file = parsed.map_err(|reason| PolygenError::ParseError {
        path: path.to_path_buf(),
        reason,
    })?;

    if unknown_keys.is_empty() {
        return Ok(file);
    }

    let errors = unknown_keys
        .into_iter()
        .map(|key| PolygenError::UnknownKey {
            key,
            path: path.to_path_buf(),
        })
        .collect();
    Err(PolygenError::UnknownKeys(errors))
}

/// Convert every file entry into a validated [`TypeSpec`].
pub fn resolve_types(file: &FileConfig) -> Result<Vec<TypeSpec>, PolygenError> {
    if file.types.is_empty() {
        return Err(PolygenError::InvalidConfig {
            type_name: "<config>".into(),
            reason: "no types configured".into(),
        });
    }
    file.types
        .iter()
        .map(|type_config| type_spec(type_config, file))
        .collect()
}

/// Resolve fallbacks for one type and validate it by building its schema.
pub fn type_spec(type_config: &TypeConfig, file: &FileConfig) -> Result<TypeSpec, PolygenError> {
    let type_name = &type_config.type_name;
    let invalid = |reason: String| PolygenError::InvalidConfig {
        type_name: type_name.clone(),
        reason,
    };

    if !is_identifier(type_name) {
        return Err(invalid(format!("'{type_name}' is not a Rust identifier")));
    }
    if type_config.subtypes.is_empty() {
        return Err(invalid("at least one subtype is required".into()));
    }
    if let Some(bad) = type_config.subtypes.keys().find(|id| !is_identifier(id)) {
        return Err(invalid(format!("subtype '{bad}' is not a Rust identifier")));
    }
    if let Some(default) = &type_config.default
        && !is_identifier(default)
    {
        return Err(invalid(format!("default '{default}' is not a Rust identifier")));
    }

    let derives: Vec<String> = match &type_config.derive {
        Some(derives) => derives.clone(),
        None => DEFAULT_DERIVES.iter().map(|d| d.to_string()).collect(),
    };
    if let Some(bad) = derives.iter().find(|d| !is_path(d)) {
        return Err(invalid(format!("derive '{bad}' is not a Rust path")));
    }

    let discriminator = type_config
        .descriptor
        .clone()
        .or_else(|| file.default_descriptor.clone())
        .unwrap_or_else(|| DEFAULT_DISCRIMINATOR.to_string());

    let variants = type_config
        .subtypes
        .iter()
        .map(|(identity, subtype)| {
            let kind = if subtype.reference {
                VariantKind::Reference
            } else {
                VariantKind::Value
            };
            let descriptor = VariantDescriptor::new(identity, kind);
            match &subtype.name {
                Some(name) => descriptor.with_name(name),
                None => descriptor,
            }
        })
        .collect();

    let spec = TypeSpec {
        type_name: type_name.clone(),
        discriminator,
        strict: type_config.strict.unwrap_or(file.strict_by_default),
        default_variant: type_config.default.clone(),
        variants,
        derives,
    };
    spec.schema()?;
    Ok(spec)
}

/// JSON Schema of the configuration file format.
pub fn json_schema() -> &'static str {
    include_str!("polygen.schema.json")
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

/// Strict and reserved keywords of the 2024 edition.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that may lead a path, as in `crate::Trait` or `super::Trait`.
const PATH_ROOTS: &[&str] = &["crate", "self", "super"];

fn is_identifier(s: &str) -> bool {
    is_word(s) && !KEYWORDS.contains(&s)
}

fn is_word(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    s != "_" && chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn is_path(s: &str) -> bool {
    let segments: Vec<&str> = s.split("::").collect();
    let last = segments.len() - 1;
    segments.iter().enumerate().all(|(i, segment)| {
        is_identifier(segment) || (i == 0 && i < last && PATH_ROOTS.contains(segment))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPES: &str = r#"{
        "strictByDefault": true,
        "defaultDescriptor": "kind",
        "types": [
            {
                "type": "Shape",
                "descriptor": "shape",
                "strict": false,
                "default": "Rectangle",
                "subtypes": {
                    "Rectangle": {},
                    "Circle": { "name": "round" },
                    "Group": { "reference": true }
                }
            },
            {
                "type": "Item",
                "subtypes": { "TextItem": { "pointer": true } }
            }
        ]
    }"#;

    fn parse_json(content: &str) -> Result<FileConfig, PolygenError> {
        parse_str(content, Path::new(".polygen.json"))
    }

    #[test]
    fn parses_all_keys() {
        let file = parse_json(SHAPES).unwrap();
        assert!(file.strict_by_default);
        assert_eq!(file.default_descriptor.as_deref(), Some("kind"));
        assert_eq!(file.types.len(), 2);
        let shape = &file.types[0];
        assert_eq!(shape.type_name, "Shape");
        assert_eq!(shape.default.as_deref(), Some("Rectangle"));
        assert_eq!(shape.subtypes["Circle"].name.as_deref(), Some("round"));
        assert!(shape.subtypes["Group"].reference);
    }

    #[test]
    fn pointer_is_an_alias_of_reference() {
        let file = parse_json(SHAPES).unwrap();
        assert!(file.types[1].subtypes["TextItem"].reference);
    }

    #[test]
    fn schema_key_is_accepted() {
        let file = parse_json(
            r#"{"$schema": "./polygen.schema.json", "types": [{"type": "A", "subtypes": {"B": {}}}]}"#,
        )
        .unwrap();
        assert_eq!(file.schema.as_deref(), Some("./polygen.schema.json"));
    }

    #[test]
    fn unknown_keys_are_all_reported() {
        let err = parse_json(
            r#"{"types": [{"type": "A", "interface": "I", "subtypes": {"B": {"ptr": true}}}], "package": "p"}"#,
        )
        .unwrap_err();
        match err {
            PolygenError::UnknownKeys(errors) => {
                let keys: Vec<String> = errors
                    .iter()
                    .map(|e| match e {
                        PolygenError::UnknownKey { key, .. } => key.clone(),
                        other => panic!("Expected UnknownKey, got: {other:?}"),
                    })
                    .collect();
                assert_eq!(keys.len(), 3);
                assert!(keys.iter().any(|k| k.ends_with("interface")));
                assert!(keys.iter().any(|k| k.ends_with("ptr")));
                assert!(keys.contains(&"package".to_string()));
            }
            other => panic!("Expected UnknownKeys, got: {other:?}"),
        }
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = parse_json(r#"{"types": ["#).unwrap_err();
        assert!(matches!(err, PolygenError::ParseError { .. }));
    }

    #[test]
    fn fallbacks_are_resolved() {
        let file = parse_json(SHAPES).unwrap();
        let types = resolve_types(&file).unwrap();

        let shape = &types[0];
        assert_eq!(shape.discriminator, "shape");
        assert!(!shape.strict);
        assert_eq!(shape.derives, ["Debug", "Clone", "PartialEq"]);

        let item = &types[1];
        assert_eq!(item.discriminator, "kind");
        assert!(item.strict);
        assert_eq!(item.default_variant, None);
    }

    #[test]
    fn discriminator_defaults_to_type() {
        let file = parse_json(r#"{"types": [{"type": "A", "subtypes": {"B": {}}}]}"#).unwrap();
        let types = resolve_types(&file).unwrap();
        assert_eq!(types[0].discriminator, "type");
        assert!(!types[0].strict);
    }

    #[test]
    fn subtypes_are_sorted_and_named() {
        let file = parse_json(SHAPES).unwrap();
        let types = resolve_types(&file).unwrap();
        let variants: Vec<(&str, &str, VariantKind)> = types[0]
            .variants
            .iter()
            .map(|v| (v.identity.as_str(), v.name.as_str(), v.kind))
            .collect();
        assert_eq!(
            variants,
            [
                ("Circle", "round", VariantKind::Value),
                ("Group", "group", VariantKind::Reference),
                ("Rectangle", "rectangle", VariantKind::Value),
            ]
        );
    }

    #[test]
    fn duplicate_names_fail_validation() {
        let file = parse_json(
            r#"{"types": [{"type": "A", "subtypes": {"B": {"name": "x"}, "C": {"name": "x"}}}]}"#,
        )
        .unwrap();
        let err = resolve_types(&file).unwrap_err();
        assert!(matches!(err, PolygenError::DuplicateDiscriminator { .. }));
    }

    #[test]
    fn unknown_default_fails_validation() {
        let file = parse_json(
            r#"{"types": [{"type": "A", "default": "Z", "subtypes": {"B": {}}}]}"#,
        )
        .unwrap();
        let err = resolve_types(&file).unwrap_err();
        assert!(matches!(err, PolygenError::UnknownDefaultVariant { .. }));
    }

    #[test]
    fn identifiers_are_checked() {
        let cases = [
            r#"{"types": [{"type": "my-type", "subtypes": {"B": {}}}]}"#,
            r#"{"types": [{"type": "A", "subtypes": {"*B": {}}}]}"#,
            r#"{"types": [{"type": "A", "derive": ["Debug", "serde::"], "subtypes": {"B": {}}}]}"#,
            r#"{"types": [{"type": "A", "subtypes": {}}]}"#,
            r#"{"types": []}"#,
            r#"{"types": [{"type": "match", "subtypes": {"B": {}}}]}"#,
            r#"{"types": [{"type": "A", "subtypes": {"Self": {}}}]}"#,
            r#"{"types": [{"type": "A", "default": "async", "subtypes": {"B": {}}}]}"#,
            r#"{"types": [{"type": "A", "derive": ["fn"], "subtypes": {"B": {}}}]}"#,
            r#"{"types": [{"type": "A", "derive": ["crate"], "subtypes": {"B": {}}}]}"#,
        ];
        for case in cases {
            let file = parse_json(case).unwrap();
            let err = resolve_types(&file).unwrap_err();
            assert!(
                matches!(err, PolygenError::InvalidConfig { .. }),
                "{case}: {err:?}"
            );
        }
    }

    #[test]
    fn derive_paths_are_allowed() {
        let file = parse_json(
            r#"{"types": [{"type": "A", "derive": ["Debug", "serde::Serialize", "crate::Marker"], "subtypes": {"B": {}}}]}"#,
        )
        .unwrap();
        let types = resolve_types(&file).unwrap();
        assert_eq!(types[0].derives, ["Debug", "serde::Serialize", "crate::Marker"]);
    }

    #[test]
    fn toml_uses_the_same_keys() {
        let content = r#"
defaultDescriptor = "kind"

[[types]]
type = "Item"
default = "TextItem"

[types.subtypes.TextItem]
name = "text"

[types.subtypes.ImageItem]
reference = true
"#;
        let file = parse_str(content, Path::new("polygen.toml")).unwrap();
        let types = resolve_types(&file).unwrap();
        assert_eq!(types[0].discriminator, "kind");
        assert_eq!(types[0].default_variant.as_deref(), Some("TextItem"));
        assert_eq!(types[0].variants.len(), 2);
    }

    #[test]
    fn toml_unknown_keys() {
        let content = "[[types]]\ntype = \"A\"\npackage = \"p\"\n[types.subtypes.B]\n";
        let err = parse_str(content, Path::new("polygen.toml")).unwrap_err();
        assert!(matches!(err, PolygenError::UnknownKeys(_)));
    }

    #[test]
    fn load_reads_file_and_records_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, SHAPES).unwrap();

        let project = load(&path).unwrap();
        assert_eq!(project.config_dir, dir.path());
        assert_eq!(project.types.len(), 2);
        let names: Vec<&str> = project
            .entries()
            .map(|(config, spec)| {
                assert_eq!(config.type_name, spec.type_name);
                spec.type_name.as_str()
            })
            .collect();
        assert_eq!(names, ["Shape", "Item"]);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, PolygenError::IoError { .. }));
    }

    #[test]
    fn json_schema_is_valid_json() {
        let schema: serde_json::Value = serde_json::from_str(json_schema()).unwrap();
        assert_eq!(schema["required"], serde_json::json!(["types"]));
        assert!(schema["properties"]["types"]["items"]["properties"]["subtypes"].is_object());
    }
}
