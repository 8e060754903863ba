//! Generator operations and their result types.
//!
//! [`run`] executes an [`Action`] and hands back an [`Outcome`] for the caller
//! to display. Nothing here prints or depends on a CLI framework.

use std::fmt;
use std::path::PathBuf;

use crate::config;
use crate::emit;
use crate::error::PolygenError;
use crate::types::Action;

/// Result of an operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Generated files were written.
    Written { paths: Vec<PathBuf> },
    /// Generated source, for `--stdout`.
    Rendered(String),
    /// The configuration is valid; the types it declares.
    Checked { types: Vec<String> },
    /// The configuration file's JSON Schema.
    Schema(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Written { paths } => {
                for (i, path) in paths.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "Generated {}", path.display())?;
                }
                Ok(())
            }
            Outcome::Rendered(source) => write!(f, "{source}"),
            Outcome::Checked { types } => {
                write!(f, "Configuration OK: {}", types.join(", "))
            }
            Outcome::Schema(schema) => write!(f, "{schema}"),
        }
    }
}

pub fn run(action: &Action) -> Result<Outcome, PolygenError> {
    match action {
        Action::Generate { config, stdout } => {
            let project = config::load(config)?;
            if *stdout {
                let rendered: Vec<String> = project.types.iter().map(emit::render).collect();
                Ok(Outcome::Rendered(rendered.join("\n")))
            } else {
                let paths = emit::write_generated(&project)?;
                Ok(Outcome::Written { paths })
            }
        }
        Action::Check { config } => {
            let project = config::load(config)?;
            let types = project
                .types
                .into_iter()
                .map(|spec| spec.type_name)
                .collect();
            Ok(Outcome::Checked { types })
        }
        Action::Schema => Ok(Outcome::Schema(config::json_schema().to_string())),
    }
}
