//! Persistence for data that is derived from a [`HeightField`](crate::HeightField) and expensive to rebuild.
//!
//! An artifact is a stack of 2D grid levels. On disk it is a single LZ4 frame containing:
//!
//! 1. an [`ArtifactHeader`], which identifies the artifact kind and the [`ArtifactKey`] it was built from
//! 2. for each level, a [`LevelHeader`] followed by `rows * cols` raw elements
//!
//! All integers and elements are stored in native byte order.

use crate::Grid2;

use bytemuck::{bytes_of, cast_slice, pod_read_unaligned, Pod, Zeroable};
use lz4_flex::frame::{FrameDecoder, FrameEncoder};
use static_assertions::const_assert_eq;
use std::fs;
use std::io::{self, Read, Write};
use std::mem;
use std::path::Path;

const MAGIC: [u8; 4] = *b"BSLT";
const FORMAT_VERSION: u32 = 1;

/// Something that can be stored as a persisted artifact.
pub trait Artifact: Sized {
    /// Distinguishes artifact types that could otherwise be confused on disk.
    const KIND: u32;

    type Element: Pod;

    fn artifact_levels(&self) -> &[Grid2<Self::Element>];

    /// Reassembles an artifact that was persisted with `key`.
    fn from_artifact_levels(key: ArtifactKey, levels: Vec<Grid2<Self::Element>>) -> Self;
}

/// Identifies the inputs an artifact was built from. A persisted artifact is only reused if its key matches exactly.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ArtifactKey {
    /// Usually [`HeightField::fingerprint`](crate::HeightField::fingerprint).
    pub fingerprint: u64,
    /// Any other build parameter, like the patch size.
    pub parameter: u64,
}

impl ArtifactKey {
    pub fn new(fingerprint: u64, parameter: u64) -> Self {
        Self {
            fingerprint,
            parameter,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(C)]
pub struct ArtifactHeader {
    magic: [u8; 4],
    version: u32,
    kind: u32,
    num_levels: u32,
    fingerprint: u64,
    parameter: u64,
}

unsafe impl Zeroable for ArtifactHeader {}
unsafe impl Pod for ArtifactHeader {}

const_assert_eq!(mem::size_of::<ArtifactHeader>(), 32);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(C)]
pub struct LevelHeader {
    rows: u32,
    cols: u32,
}

unsafe impl Zeroable for LevelHeader {}
unsafe impl Pod for LevelHeader {}

const_assert_eq!(mem::size_of::<LevelHeader>(), 8);

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact I/O failed")]
    Io(#[from] io::Error),
    #[error("artifact compression failed")]
    Compression(#[from] lz4_flex::frame::Error),
    #[error("not an artifact file")]
    BadMagic,
    #[error("unsupported artifact format version {0}")]
    UnsupportedVersion(u32),
    #[error("expected artifact kind {expected}, found {actual}")]
    WrongKind { expected: u32, actual: u32 },
    #[error("artifact ended early")]
    Truncated,
    #[error("{0} trailing bytes after the last artifact level")]
    TrailingBytes(usize),
}

/// What [`load_or_build`] had to do to produce an artifact.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CacheStatus {
    /// Loaded from disk.
    Hit,
    /// Nothing was on disk, so it was built.
    Miss,
    /// The artifact on disk was built from different inputs, so it was rebuilt.
    Stale,
    /// The artifact on disk could not be read, so it was rebuilt.
    Unreadable,
}

pub fn encode<A: Artifact>(artifact: &A, key: ArtifactKey) -> Result<Vec<u8>, ArtifactError> {
    let levels = artifact.artifact_levels();
    let header = ArtifactHeader {
        magic: MAGIC,
        version: FORMAT_VERSION,
        kind: A::KIND,
        num_levels: levels.len() as u32,
        fingerprint: key.fingerprint,
        parameter: key.parameter,
    };

    let mut encoder = FrameEncoder::new(Vec::new());
    encoder.write_all(bytes_of(&header))?;
    for level in levels {
        let level_header = LevelHeader {
            rows: level.rows(),
            cols: level.cols(),
        };
        encoder.write_all(bytes_of(&level_header))?;
        encoder.write_all(cast_slice(level.values()))?;
    }

    Ok(encoder.finish()?)
}

pub fn decode<A: Artifact>(bytes: &[u8]) -> Result<(ArtifactKey, A), ArtifactError> {
    let mut raw = Vec::new();
    FrameDecoder::new(bytes).read_to_end(&mut raw)?;
    let mut reader = PodReader { bytes: &raw };

    let header: ArtifactHeader = reader.read()?;
    if header.magic != MAGIC {
        return Err(ArtifactError::BadMagic);
    }
    if header.version != FORMAT_VERSION {
        return Err(ArtifactError::UnsupportedVersion(header.version));
    }
    if header.kind != A::KIND {
        return Err(ArtifactError::WrongKind {
            expected: A::KIND,
            actual: header.kind,
        });
    }

    let mut levels = Vec::new();
    for _ in 0..header.num_levels {
        let LevelHeader { rows, cols } = reader.read()?;
        let values = reader.read_vec(rows as usize * cols as usize)?;
        levels.push(Grid2::from_values(rows, cols, values).ok_or(ArtifactError::Truncated)?);
    }
    if !reader.bytes.is_empty() {
        return Err(ArtifactError::TrailingBytes(reader.bytes.len()));
    }

    let key = ArtifactKey::new(header.fingerprint, header.parameter);

    let artifact = A::from_artifact_levels(key, levels);

    Ok((key, artifact))
}

pub fn write_artifact<A: Artifact>(
    path: &Path,
    artifact: &A,
    key: ArtifactKey,
) -> Result<(), ArtifactError> {
    let bytes = encode(artifact, key)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;
    Ok(())
}

/// Returns `Ok(None)` if there is no file at `path`.
pub fn read_artifact<A: Artifact>(path: &Path) -> Result<Option<(ArtifactKey, A)>, ArtifactError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    decode(&bytes).map(Some)
}

/// Loads the artifact at `path` if it was built with `key`. Otherwise calls `build` and persists the result.
///
/// A failure to persist is logged but not returned, since the freshly built artifact is still valid.
pub fn load_or_build<A: Artifact>(
    path: &Path,
    key: ArtifactKey,
    build: impl FnOnce() -> A,
) -> (A, CacheStatus) {
    let status = match read_artifact::<A>(path) {
        Ok(Some((stored_key, artifact))) if stored_key == key => {
            log::info!("Loaded cached artifact {}", path.display());
            return (artifact, CacheStatus::Hit);
        }
        Ok(Some((stored_key, _))) => {
            log::warn!(
                "Cached artifact {} was built from different inputs ({:?} != {:?}); rebuilding",
                path.display(),
                stored_key,
                key
            );
            CacheStatus::Stale
        }
        Ok(None) => {
            log::info!("No cached artifact at {}; building", path.display());
            CacheStatus::Miss
        }
        Err(e) => {
            log::warn!("Failed to read cached artifact {}: {}; rebuilding", path.display(), e);
            CacheStatus::Unreadable
        }
    };

    let artifact = build();
    if let Err(e) = write_artifact(path, &artifact, key) {
        log::warn!("Failed to write artifact {}: {}", path.display(), e);
    }

    (artifact, status)
}

struct PodReader<'a> {
    bytes: &'a [u8],
}

impl<'a> PodReader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], ArtifactError> {
        if self.bytes.len() < n {
            return Err(ArtifactError::Truncated);
        }
        let (head, tail) = self.bytes.split_at(n);
        self.bytes = tail;
        Ok(head)
    }

    fn read<T: Pod>(&mut self) -> Result<T, ArtifactError> {
        Ok(pod_read_unaligned(self.take(mem::size_of::<T>())?))
    }

    fn read_vec<T: Pod>(&mut self, count: usize) -> Result<Vec<T>, ArtifactError> {
        let size = mem::size_of::<T>();
        let num_bytes = count.checked_mul(size).ok_or(ArtifactError::Truncated)?;
        let bytes = self.take(num_bytes)?;
        Ok(bytes.chunks_exact(size).map(pod_read_unaligned).collect())
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
