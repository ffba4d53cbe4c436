use crate::error::{Result, ZipflowError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inclusive range of the synthetic `level` field.
pub const LEVEL_RANGE: std::ops::RangeInclusive<u8> = 1..=99;

/// Inclusive range of sub-object counts per document.
pub const OBJECT_COUNT_RANGE: std::ops::RangeInclusive<usize> = 1..=10;

/// One synthetic structured document: an identifier, a numeric level and an
/// ordered list of named sub-objects.
///
/// Documents are constructed during generation, serialized into archive
/// members, and projected into `LevelRecord`/`ObjectRecord` rows during
/// extraction. They are never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub level: u8,
    pub objects: Vec<DocumentObject>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentObject {
    pub name: String,
}

impl Document {
    pub fn new<S: Into<String>>(id: S, level: u8, object_names: Vec<String>) -> Self {
        Self {
            id: id.into(),
            level,
            objects: object_names
                .into_iter()
                .map(|name| DocumentObject { name })
                .collect(),
        }
    }

    /// Create one synthetic document with a UUIDv4 id, a level in
    /// `LEVEL_RANGE` and `OBJECT_COUNT_RANGE` named sub-objects.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let object_count = rng.gen_range(OBJECT_COUNT_RANGE);
        let objects = (0..object_count)
            .map(|_| DocumentObject {
                name: Uuid::new_v4().to_string(),
            })
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            level: rng.gen_range(LEVEL_RANGE),
            objects,
        }
    }

    /// Serialize into the self-describing wire form stored in archive members.
    ///
    /// Inputs are constructed locally and always well-formed, so this has no
    /// error path.
    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("document serialization is infallible")
    }

    /// Canonical reverse of [`Document::to_bytes`].
    ///
    /// Fails with `MalformedDocument` when the id or level field is absent or
    /// the objects container is structurally invalid.
    pub fn from_bytes(member: &str, bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| ZipflowError::MalformedDocument {
            member: member.to_string(),
            message: e.to_string(),
        })
    }

    pub fn object_names(&self) -> impl Iterator<Item = &str> {
        self.objects.iter().map(|o| o.name.as_str())
    }
}
