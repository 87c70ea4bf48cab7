use log::info;
use std::path::Path;
use std::{fs, io};

/// Creates `path` (and any missing parents) if it does not exist.
///
/// Fails with `AlreadyExists` when the path exists but is not a directory.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    match fs::metadata(path) {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("path exists but is not a directory: {}", path.display()),
                ));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating output directory: {}", path.display());
            fs::create_dir_all(path)
        }
        Err(e) => Err(e),
    }
}
