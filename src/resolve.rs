//! Variant resolution: which discriminator applies to one decode call.
//!
//! Pure function of three inputs, checked in order:
//!
//! 1. the discriminator carried by the payload, if any
//! 2. the discriminator of the currently active variant (a partial update)
//! 3. the configured default variant
//!
//! An explicit empty string in the payload is an error, never "keep current".

use std::fmt;

/// No discriminator could be determined for a decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingDiscriminator;

impl fmt::Display for MissingDiscriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("missing discriminator")
    }
}

impl std::error::Error for MissingDiscriminator {}

/// Pick the effective discriminator for a decode.
pub fn resolve_effective<'a>(
    incoming: Option<&'a str>,
    current: Option<&'a str>,
    default: Option<&'a str>,
) -> Result<&'a str, MissingDiscriminator> {
    match incoming {
        Some("") => Err(MissingDiscriminator),
        Some(name) => Ok(name),
        None => current.or(default).ok_or(MissingDiscriminator),
    }
}
