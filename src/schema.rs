use crate::error::PolygenError;
use crate::registry::{Registry, VariantDescriptor};
use crate::types::{DEFAULT_DISCRIMINATOR, DecodeContext};

/// Everything the codec knows about one polymorphic type: its variant
/// registry and its decode context. Built once, immutable afterwards.
#[derive(Debug, Clone)]
pub struct Schema {
    type_name: String,
    registry: Registry,
    context: DecodeContext,
}

impl Schema {
    pub fn builder(type_name: &str) -> SchemaBuilder {
        SchemaBuilder::new(type_name)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn context(&self) -> &DecodeContext {
        &self.context
    }

    /// The JSON key carrying the discriminator.
    pub fn discriminator(&self) -> &str {
        &self.context.discriminator
    }
}

/// Builder for a [`Schema`]. Validation happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    type_name: String,
    discriminator: String,
    strict: bool,
    default_variant: Option<String>,
    variants: Vec<VariantDescriptor>,
}

impl SchemaBuilder {
    fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            discriminator: DEFAULT_DISCRIMINATOR.to_string(),
            strict: false,
            default_variant: None,
            variants: Vec::new(),
        }
    }

    /// Override the discriminator field (default: `"type"`).
    pub fn discriminator(mut self, field: &str) -> Self {
        self.discriminator = field.to_string();
        self
    }

    /// Enable or disable strict decoding (default: `false`).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Variant (by identity) selected when a payload has no discriminator and
    /// the container is empty.
    pub fn default_variant(mut self, identity: &str) -> Self {
        self.default_variant = Some(identity.to_string());
        self
    }

    /// Append a variant. Registration order is preserved.
    pub fn variant(mut self, descriptor: VariantDescriptor) -> Self {
        self.variants.push(descriptor);
        self
    }

    pub fn build(self) -> Result<Schema, PolygenError> {
        if self.discriminator.is_empty() {
            return Err(PolygenError::InvalidConfig {
                type_name: self.type_name,
                reason: "discriminator field name must not be empty".into(),
            });
        }

        let registry = Registry::build(&self.type_name, self.variants)?;

        if let Some(default) = &self.default_variant
            && registry.resolve_by_identity(default).is_err()
        {
            return Err(PolygenError::UnknownDefaultVariant {
                type_name: self.type_name,
                variant: default.clone(),
            });
        }

        Ok(Schema {
            type_name: self.type_name,
            registry,
            context: DecodeContext {
                discriminator: self.discriminator,
                strict: self.strict,
                default_variant: self.default_variant,
            },
        })
    }
}
