use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum PolygenError {
    #[error("Malformed input: {0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(polygen::malformed_input)))]
    MalformedInput(String),

    #[error("Missing discriminator field '{field}'")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(polygen::missing_discriminator),
            help("add the discriminator field, or configure a default variant")
        )
    )]
    MissingDiscriminator { field: String },

    #[error("Unknown variant '{0}'")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(polygen::unknown_variant)))]
    UnknownVariant(String),

    #[error("Unknown field '{field}' for variant {variant}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(polygen::unknown_field),
            help("strict mode is on; remove the field or disable strict decoding")
        )
    )]
    StrictFieldRejection { variant: String, field: String },

    #[error("Cannot decode variant {variant}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(polygen::variant_decode)))]
    VariantDecodeFailure {
        variant: String,
        source: serde_json::Error,
    },

    #[error("Cannot encode variant {variant}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(polygen::encode)))]
    EncodeFailure {
        variant: String,
        source: serde_json::Error,
    },

    #[error("Variant identity '{0}' is not registered")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(polygen::unknown_identity)))]
    UnknownIdentity(String),

    #[error("Discriminator '{name}' is used by both {first} and {second}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(polygen::duplicate_discriminator)))]
    DuplicateDiscriminator {
        name: String,
        first: String,
        second: String,
    },

    #[error("Variant {0} is registered more than once")]
    DuplicateIdentity(String),

    #[error("Variant {0} has an empty discriminator name")]
    EmptyDiscriminator(String),

    #[error("Polymorphic type {0} has no variants")]
    NoVariants(String),

    #[error("Default variant '{variant}' is not a variant of {type_name}")]
    UnknownDefaultVariant { type_name: String, variant: String },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Unknown key '{key}' in {path}")]
    UnknownKey { key: String, path: PathBuf },

    #[error("Unknown keys in config file")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(help("run `polygen schema` to see the accepted keys"))
    )]
    UnknownKeys(#[cfg_attr(feature = "rich-errors", related)] Vec<PolygenError>),

    #[error("Invalid configuration for {type_name}: {reason}")]
    InvalidConfig { type_name: String, reason: String },
}

impl PolygenError {
    /// True for the strict-mode "unknown field" rejection.
    pub fn is_unknown_field(&self) -> bool {
        matches!(self, PolygenError::StrictFieldRejection { .. })
    }
}
