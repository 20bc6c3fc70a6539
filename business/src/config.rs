use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use anyhow::bail;
use serde::Deserialize;

/// Records requested per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: NonZeroU32 = match NonZeroU32::new(50) {
    Some(size) => size,
    None => unreachable!(),
};

/// File name the exported spreadsheet is saved under.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "selected_users.xlsx";

const DEFAULT_API_BASE_URL: &str = "https://backend-eta-one-56.vercel.app";

#[derive(Debug, Clone)]
pub struct BusinessConfig {
    pub api_base_url: String,
    /// `limit` sent with every page request.
    pub page_size: NonZeroU32,
    /// Directory downloaded exports are written into.
    pub download_dir: PathBuf,
    pub export_file_name: String,
}

/// Environment variables as read by `serde-env`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    roster_api_base_url: Option<String>,
    roster_page_size: Option<u32>,
    roster_download_dir: Option<PathBuf>,
    roster_export_file_name: Option<String>,
}

impl BusinessConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Builds the configuration from `ROSTER_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I, S>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let raw: RawConfig = serde_env::from_iter(vars)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> anyhow::Result<Self> {
        let RawConfig {
            roster_api_base_url,
            roster_page_size,
            roster_download_dir,
            roster_export_file_name,
        } = raw;

        let defaults = Self::default();

        let page_size = match roster_page_size {
            None => defaults.page_size,
            Some(size) => match NonZeroU32::new(size) {
                Some(size) => size,
                None => bail!("ROSTER_PAGE_SIZE must be greater than zero"),
            },
        };

        let config = Self {
            api_base_url: roster_api_base_url.unwrap_or(defaults.api_base_url),
            page_size,
            download_dir: roster_download_dir.unwrap_or(defaults.download_dir),
            export_file_name: roster_export_file_name.unwrap_or(defaults.export_file_name),
        };
        log::info!(
            "Loaded config: api_base_url={}, page_size={}",
            config.api_base_url,
            config.page_size
        );
        Ok(config)
    }

    /// Base URL with any trailing slash removed.
    pub fn api_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Full path an export is delivered to.
    pub fn export_path(&self) -> PathBuf {
        self.download_dir.join(&self.export_file_name)
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            download_dir: PathBuf::from("."),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }
}
