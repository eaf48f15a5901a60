use crate::error::VpError;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Write `bytes` to `path`, creating or truncating the file.
///
/// The file handle is closed before this returns, whether or not the write succeeded.
pub fn write_file(bytes: &[u8], path: impl AsRef<Path>) -> Result<(), VpError> {
    let path = path.as_ref();
    let io_error = |source| VpError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).map_err(io_error)?;
    file.write_all(bytes).map_err(io_error)?;
    file.flush().map_err(io_error)?;

    debug!(path = %path.display(), bytes = bytes.len(), "wrote MIDI file");
    Ok(())
}
