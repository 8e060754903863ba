//! Rust source generation for configured polymorphic types.
//!
//! Each [`TypeSpec`] becomes one file holding the variant enum and the
//! [`polymorphic!`](crate::polymorphic) invocation that gives it the codec.
//! Every discriminator name is spelled out, so the generated code does not
//! depend on the case conversion rules of the version that reads it.
//!
//! The file expects the variant types to be in scope of its parent module:
//! it imports them with `use super::{...}`.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{Project, TypeConfig, TypeSpec};
use crate::error::PolygenError;
use crate::naming::to_snake_case;

const HEADER: &str = "// Code generated by polygen. DO NOT EDIT.";

/// Render the generated source for one type.
pub fn render(spec: &TypeSpec) -> String {
    Generated(spec).to_string()
}

/// Where the file for `type_config` goes: `config_dir/directory/filename`.
pub fn output_path(type_config: &TypeConfig, config_dir: &Path) -> PathBuf {
    let mut path = config_dir.to_path_buf();
    if let Some(directory) = &type_config.directory {
        path.push(directory);
    }
    match &type_config.filename {
        Some(filename) => path.push(filename),
        None => path.push(default_filename(&type_config.type_name)),
    }
    path
}

/// `ItemValue` → `item_value_polygen.rs`.
pub fn default_filename(type_name: &str) -> String {
    format!("{}_polygen.rs", to_snake_case(type_name))
}

/// Render and write every type of `project`, returning the written paths.
pub fn write_generated(project: &Project) -> Result<Vec<PathBuf>, PolygenError> {
    let mut written = Vec::with_capacity(project.types.len());
    for (type_config, spec) in project.entries() {
        let path = output_path(type_config, &project.config_dir);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| PolygenError::IoError {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&path, render(spec)).map_err(|source| PolygenError::IoError {
            path: path.clone(),
            source,
        })?;
        tracing::info!(type_name = %spec.type_name, path = %path.display(), "generated");
        written.push(path);
    }
    Ok(written)
}

struct Generated<'a>(&'a TypeSpec);

impl fmt::Display for Generated<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spec = self.0;

        writeln!(f, "{HEADER}")?;
        writeln!(f)?;

        let imports: Vec<&str> = spec.variants.iter().map(|v| v.identity.as_str()).collect();
        match imports.as_slice() {
            [single] => writeln!(f, "use super::{single};")?,
            all => writeln!(f, "use super::{{{}}};", all.join(", "))?,
        }
        writeln!(f)?;

        if !spec.derives.is_empty() {
            writeln!(f, "#[derive({})]", spec.derives.join(", "))?;
        }
        writeln!(f, "pub enum {} {{", spec.type_name)?;
        for variant in &spec.variants {
            let id = &variant.identity;
            if variant.is_reference() {
                writeln!(f, "    {id}(polygen::Shared<{id}>),")?;
            } else {
                writeln!(f, "    {id}({id}),")?;
            }
        }
        writeln!(f, "}}")?;
        writeln!(f)?;

        writeln!(f, "polygen::polymorphic! {{")?;
        writeln!(f, "    {} {{", spec.type_name)?;
        writeln!(f, "        discriminator: {:?},", spec.discriminator)?;
        writeln!(f, "        strict: {},", spec.strict)?;
        if let Some(default) = &spec.default_variant {
            writeln!(f, "        default: {default},")?;
        }
        writeln!(f, "        variants: {{")?;
        for variant in &spec.variants {
            let kind = if variant.is_reference() {
                "reference"
            } else {
                "value"
            };
            writeln!(
                f,
                "            {}: {kind} as {:?},",
                variant.identity, variant.name
            )?;
        }
        writeln!(f, "        }},")?;
        writeln!(f, "    }}")?;
        writeln!(f, "}}")
    }
}
