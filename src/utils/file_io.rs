use std::fs::{create_dir_all, File, OpenOptions};
use std::path::Path;

use tracing::debug;

use crate::Result;

/// Creates the parent directory of `path` when it does not exist yet.
pub fn create_parent_dir_if_not_exist(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            create_dir_all(parent)?;
            debug!("created directory: {:?}", parent);
        }
    }
    Ok(())
}

pub fn open_file_for_append(path: &Path) -> Result<File> {
    create_parent_dir_if_not_exist(path)?;
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    Ok(file)
}

/// Replaces the content of `path` with `buf`, creating parent directories.
pub(crate) async fn write_into_file(
    path: &Path,
    buf: Vec<u8>,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, buf).await?;
    debug!("wrote {:?}", path);
    Ok(())
}
