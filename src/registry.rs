//! Variant registry: the bidirectional identity ⇄ discriminator mapping of one
//! polymorphic type.
//!
//! Built once from an ordered descriptor list and never mutated. Both
//! directions are injective; duplicates are rejected by [`Registry::build`],
//! so a decode never has to choose between two candidates.

use std::collections::HashMap;

use crate::error::PolygenError;
use crate::naming::to_kebab_case;
use crate::types::VariantKind;

/// One alternative shape of a polymorphic type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDescriptor {
    /// Rust identifier of the variant (the enum arm), e.g. `"TextItem"`.
    pub identity: String,
    /// Discriminator string written to and read from JSON.
    pub name: String,
    pub kind: VariantKind,
}

impl VariantDescriptor {
    /// Descriptor whose name is derived from the identity: `TextItem` → `text-item`.
    pub fn new(identity: &str, kind: VariantKind) -> Self {
        Self {
            identity: identity.to_string(),
            name: to_kebab_case(identity),
            kind,
        }
    }

    /// Override the derived discriminator name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn is_reference(&self) -> bool {
        self.kind == VariantKind::Reference
    }
}

#[derive(Debug, Clone)]
pub struct Registry {
    descriptors: Vec<VariantDescriptor>,
    by_identity: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl Registry {
    /// Build the registry, enforcing uniqueness of identities and names.
    ///
    /// `type_name` only labels errors.
    pub fn build(
        type_name: &str,
        descriptors: Vec<VariantDescriptor>,
    ) -> Result<Self, PolygenError> {
        if descriptors.is_empty() {
            return Err(PolygenError::NoVariants(type_name.to_string()));
        }

        let mut by_identity = HashMap::with_capacity(descriptors.len());
        let mut by_name: HashMap<String, usize> = HashMap::with_capacity(descriptors.len());

        for (idx, desc) in descriptors.iter().enumerate() {
            if desc.name.is_empty() {
                return Err(PolygenError::EmptyDiscriminator(desc.identity.clone()));
            }
            if by_identity.insert(desc.identity.clone(), idx).is_some() {
                return Err(PolygenError::DuplicateIdentity(desc.identity.clone()));
            }
            if let Some(&first) = by_name.get(&desc.name) {
                return Err(PolygenError::DuplicateDiscriminator {
                    name: desc.name.clone(),
                    first: descriptors[first].identity.clone(),
                    second: desc.identity.clone(),
                });
            }
            by_name.insert(desc.name.clone(), idx);
        }

        Ok(Self {
            descriptors,
            by_identity,
            by_name,
        })
    }

    /// Look up the descriptor of an active instance's identity.
    pub fn resolve_by_identity(&self, identity: &str) -> Result<&VariantDescriptor, PolygenError> {
        self.by_identity
            .get(identity)
            .map(|&idx| &self.descriptors[idx])
            .ok_or_else(|| PolygenError::UnknownIdentity(identity.to_string()))
    }

    /// Look up the descriptor named by a discriminator string.
    pub fn resolve_by_discriminator(&self, name: &str) -> Result<&VariantDescriptor, PolygenError> {
        self.by_name
            .get(name)
            .map(|&idx| &self.descriptors[idx])
            .ok_or_else(|| PolygenError::UnknownVariant(name.to_string()))
    }

    /// Descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &VariantDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
