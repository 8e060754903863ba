use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Discriminator field used when none is configured.
pub const DEFAULT_DISCRIMINATOR: &str = "type";

/// How instances of a variant are held by a container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    /// Owned snapshot. Merge-decode produces a new value seeded from the old one.
    #[default]
    Value,
    /// Shared, mutable handle ([`Shared`](crate::Shared)). Merge-decode writes
    /// through the existing handle.
    Reference,
}

/// Per-type decode configuration. Not state: the same context is used for
/// every decode of a polymorphic type unless overridden per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeContext {
    /// JSON key carrying the discriminator.
    pub discriminator: String,
    /// Reject fields the target variant does not declare.
    pub strict: bool,
    /// Identity of the variant to use when the payload has no discriminator
    /// and the container is empty.
    pub default_variant: Option<String>,
}

impl DecodeContext {
    pub fn new(discriminator: &str) -> Self {
        Self {
            discriminator: discriminator.to_string(),
            ..Self::default()
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn default_variant(mut self, identity: &str) -> Self {
        self.default_variant = Some(identity.to_string());
        self
    }
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self {
            discriminator: DEFAULT_DISCRIMINATOR.to_string(),
            strict: false,
            default_variant: None,
        }
    }
}

/// A generator operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Render every configured type. Writes files unless `stdout` is set.
    Generate { config: PathBuf, stdout: bool },
    /// Load and validate the configuration without writing anything.
    Check { config: PathBuf },
    /// Print the JSON Schema of the configuration file format.
    Schema,
}
