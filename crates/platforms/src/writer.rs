//! Encoding of single named payloads into a build-context archive

use ccbuild_errors::{Error, PlatformError};

use crate::platform::ContextArchive;

/// Mode recorded for every injected file (regular file, rw-r--r--)
pub const ENTRY_MODE: u32 = 0o100_644;

/// Strategy for writing one named payload as one archive entry
pub trait PackageWriter: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the entry cannot be written to `archive`.
    fn write(
        &self,
        name: &str,
        payload: &[u8],
        archive: &mut ContextArchive<'_>,
    ) -> Result<(), Error>;
}

/// Default writer: one regular-file entry with normalized metadata, so the
/// same payload always yields the same header bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TarPackageWriter;

impl PackageWriter for TarPackageWriter {
    fn write(
        &self,
        name: &str,
        payload: &[u8],
        archive: &mut ContextArchive<'_>,
    ) -> Result<(), Error> {
        let stream_error = |e: std::io::Error| PlatformError::StreamWriteError {
            context: name.to_string(),
            message: e.to_string(),
        };

        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(payload.len() as u64);
        header.set_mode(ENTRY_MODE);
        header.set_mtime(0);
        header.set_uid(0);
        header.set_gid(0);
        header.set_username("root").map_err(stream_error)?;
        header.set_groupname("root").map_err(stream_error)?;

        archive
            .append_data(&mut header, name, payload)
            .map_err(stream_error)?;
        Ok(())
    }
}
