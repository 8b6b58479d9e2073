//! TOML persistence for [`TaxTables`].

use std::path::{Path, PathBuf};

use tax_core::{TaxTables, TaxTablesError};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when reading or writing a tables file.
#[derive(Debug, Error)]
pub enum TablesLoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid tax tables: {0}")]
    Invalid(#[from] TaxTablesError),
}

/// Reads and writes [`TaxTables`] in TOML form.
///
/// Decimal values are written as quoted strings so that no amount passes
/// through binary floating point on the way in or out.
pub struct TaxTablesLoader;

impl TaxTablesLoader {
    /// Parse tables from TOML text and validate them.
    pub fn from_toml_str(contents: &str) -> Result<TaxTables, TablesLoadError> {
        let tables: TaxTables = toml::from_str(contents)?;
        tables.validate()?;
        debug!(tax_year = tables.tax_year, "parsed tax tables");

        Ok(tables)
    }

    /// Read a tables file from disk and delegate to [`Self::from_toml_str`].
    pub fn from_path(path: &Path) -> Result<TaxTables, TablesLoadError> {
        let contents = std::fs::read_to_string(path).map_err(|source| TablesLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tables = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), tax_year = tables.tax_year, "loaded tax tables");

        Ok(tables)
    }

    pub fn to_toml_string(tables: &TaxTables) -> Result<String, TablesLoadError> {
        Ok(toml::to_string_pretty(tables)?)
    }
}
