use crate::error::{Result, ZipflowError};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Write-side handle used by the generator to build one archive.
///
/// Members are Deflate-compressed. The archive is not valid until
/// [`ArchiveWriter::finish`] has run.
pub struct ArchiveWriter {
    path: PathBuf,
    writer: ZipWriter<File>,
    options: SimpleFileOptions,
    members: usize,
}

impl ArchiveWriter {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: ZipWriter::new(file),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            members: 0,
        })
    }

    pub fn add_member(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.writer
            .start_file(name, self.options)
            .map_err(|e| self.write_error(e))?;
        self.writer.write_all(bytes)?;
        self.members += 1;
        Ok(())
    }

    pub fn member_count(&self) -> usize {
        self.members
    }

    pub fn finish(self) -> Result<()> {
        self.writer
            .finish()
            .map_err(|e| ZipflowError::ArchiveUnreadable {
                path: self.path.display().to_string(),
                source: e,
            })?;
        Ok(())
    }

    fn write_error(&self, source: zip::result::ZipError) -> ZipflowError {
        ZipflowError::ArchiveUnreadable {
            path: self.path.display().to_string(),
            source,
        }
    }
}
