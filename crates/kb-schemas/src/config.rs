//! `kb-validate` settings loaded via OrthoConfig.
//!
//! Values are layered from CLI flags, `KB_VALIDATE_*` environment variables
//! and an optional configuration file.

use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::error::RegistryError;
use crate::registry::SchemaName;

/// Configuration for one `kb-validate` run.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "KB_VALIDATE")]
pub struct ValidateSettings {
    /// Name of the schema the input is validated against.
    pub schema: Option<String>,
    /// JSON document to read. Standard input is used when absent.
    pub input: Option<PathBuf>,
    /// Pretty-print the normalised record.
    #[ortho_config(default = false)]
    pub pretty: bool,
    /// Emit logs as JSON lines.
    #[ortho_config(default = false)]
    pub json_logs: bool,
    /// Print the registered schema names and exit.
    #[ortho_config(default = false)]
    pub list: bool,
}

impl ValidateSettings {
    /// Resolve the configured schema name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownSchema`] when no name was given or
    /// the name is not registered.
    pub fn schema_name(&self) -> Result<SchemaName, RegistryError> {
        self.schema
            .as_deref()
            .unwrap_or_default()
            .parse::<SchemaName>()
    }

    /// Input path, or `None` to read standard input.
    #[must_use]
    pub fn input_path(&self) -> Option<&Path> {
        self.input.as_deref()
    }
}
