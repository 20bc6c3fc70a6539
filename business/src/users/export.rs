//! Spreadsheet export: request the file from the server and save it locally.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::users::api::{UsersApi, UsersApiError};
use crate::users::types::ExportSelection;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export request failed: {0}")]
    Api(#[from] UsersApiError),
    #[error("failed to write export to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Downloads `selection` and writes it to `dir/file_name`.
///
/// Nothing is written unless the server answers with a 2xx.
pub async fn export_users(
    api: &UsersApi,
    selection: &ExportSelection,
    dir: &Path,
    file_name: &str,
) -> Result<PathBuf, ExportError> {
    let bytes = api.download_users(selection).await?;
    deliver(&bytes, dir, file_name)
}

/// Saves an export payload, creating `dir` if needed and replacing any
/// previous file of the same name.
pub fn deliver(bytes: &[u8], dir: &Path, file_name: &str) -> Result<PathBuf, ExportError> {
    let path = dir.join(file_name);
    let io_err = |source| ExportError::Io {
        path: path.clone(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(io_err)?;
    std::fs::write(&path, bytes).map_err(io_err)?;

    log::info!("Saved export ({} bytes) to {}", bytes.len(), path.display());
    Ok(path)
}
