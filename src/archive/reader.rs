use crate::error::{Result, ZipflowError};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Read-side handle for one ZIP archive.
///
/// Holds the container open for the duration of a worker's processing of the
/// archive; the handle is released when the reader is dropped.
pub struct ArchiveReader {
    path: PathBuf,
    archive: ZipArchive<File>,
}

impl ArchiveReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path)?;
        let archive = ZipArchive::new(file).map_err(|e| ZipflowError::ArchiveUnreadable {
            path: path.display().to_string(),
            source: e,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// All member names, in stored order.
    pub fn member_names(&mut self) -> Vec<String> {
        (0..self.archive.len())
            .filter_map(|i| {
                self.archive
                    .by_index(i)
                    .ok()
                    .map(|entry| entry.name().to_string())
            })
            .collect()
    }

    pub fn read_member(&mut self, member: &str) -> Result<Vec<u8>> {
        let mut entry = match self.archive.by_name(member) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(ZipflowError::MemberMissing {
                    archive: self.path.display().to_string(),
                    member: member.to_string(),
                })
            }
            Err(e) => {
                return Err(ZipflowError::ArchiveUnreadable {
                    path: self.path.display().to_string(),
                    source: e,
                })
            }
        };

        let mut buffer = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut buffer)?;
        Ok(buffer)
    }
}
