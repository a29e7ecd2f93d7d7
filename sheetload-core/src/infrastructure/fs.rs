use crate::infrastructure::error::InfrastructureError;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Creates the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> Result<(), InfrastructureError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Replace `path` atomically: `fill` writes into a temporary file created next
/// to the target, which is then renamed over it. Readers see either the old
/// file or the complete new one; a failure leaves the old file untouched.
pub fn atomic_replace_with<F>(path: &Path, fill: F) -> Result<(), InfrastructureError>
where
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    ensure_parent_dir(path)?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    // Same directory so the rename never crosses filesystems
    let temp_file = tempfile::NamedTempFile::new_in(parent)?;

    let mut writer = BufWriter::new(temp_file);
    fill(&mut writer)?;
    writer.flush()?;
    let temp_file = writer.into_inner().map_err(|e| e.into_error())?;
    temp_file.as_file().sync_all()?;

    temp_file.persist(path).map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Byte-content shortcut for [`atomic_replace_with`].
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    atomic_replace_with(path.as_ref(), |w| w.write_all(content.as_ref()))
}
