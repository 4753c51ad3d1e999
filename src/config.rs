//! Runtime settings: which file holds the phonebook and how many records a page shows.
//!
//! Precedence, highest first: command-line flags, the `PHONEBOOK_FILE`
//! environment variable (data file only), built-in defaults.

use anyhow::{Result, anyhow};
use std::env;
use std::path::PathBuf;

/// File used when neither a flag nor the environment names one.
pub const DEFAULT_DATA_FILE: &str = "phonebook.json";

/// Records per page when `--page-size` is not given.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Environment variable consulted for the data file.
pub const DATA_FILE_VAR: &str = "PHONEBOOK_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Path of the JSON file holding all records.
    pub data_file: PathBuf,
    /// Records shown per page by the display command.
    pub page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Settings {
    /// Combine flag values with the process environment.
    pub fn from_env(file: Option<PathBuf>, page_size: Option<usize>) -> Result<Self> {
        Self::resolve(file, page_size, env::var(DATA_FILE_VAR).ok())
    }

    /// Combine flag values with an explicit environment value.
    ///
    /// An empty environment value counts as unset.
    pub fn resolve(
        file: Option<PathBuf>,
        page_size: Option<usize>,
        env_file: Option<String>,
    ) -> Result<Self> {
        let defaults = Self::default();
        let data_file = file
            .or_else(|| env_file.filter(|v| !v.is_empty()).map(PathBuf::from))
            .unwrap_or(defaults.data_file);
        let settings = Self {
            data_file,
            page_size: page_size.unwrap_or(defaults.page_size),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(anyhow!("page size must be > 0"));
        }
        if self.data_file.as_os_str().is_empty() {
            return Err(anyhow!("data file path must not be empty"));
        }
        Ok(())
    }
}
