use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use crate::ClassificationError;

/// MIME label as returned by a sniffing backend.
///
/// Some backends (libmagic bindings in particular) hand back raw bytes; the
/// decorator decodes them before use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawMime {
    Text(String),
    Bytes(Vec<u8>),
}

impl From<&str> for RawMime {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawMime {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<u8>> for RawMime {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

/// Port for content-based MIME detection.
///
/// Implementations read from `path` only. They must not look at the file
/// extension.
pub trait MimeSniffer: Send + Sync {
    fn sniff(&self, path: &Path) -> Result<RawMime, ClassificationError>;
}

impl<S: MimeSniffer + ?Sized> MimeSniffer for &S {
    fn sniff(&self, path: &Path) -> Result<RawMime, ClassificationError> {
        (**self).sniff(path)
    }
}

impl<S: MimeSniffer + ?Sized> MimeSniffer for Box<S> {
    fn sniff(&self, path: &Path) -> Result<RawMime, ClassificationError> {
        (**self).sniff(path)
    }
}

/// A caller-owned, readable media file with a resolvable location on disk.
///
/// The decorator only ever asks for the path; it never reads, seeks or closes
/// the underlying handle.
pub trait MediaSource {
    fn path(&self) -> &Path;
}

/// `std::fs::File` paired with the path it was opened from.
#[derive(Debug)]
pub struct MediaFile {
    file: File,
    path: PathBuf,
}

impl MediaFile {
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = File::open(&path)?;
        Ok(Self { file, path })
    }

    /// Wrap an already-open handle.
    pub fn from_parts(file: File, path: impl Into<PathBuf>) -> Self {
        Self {
            file,
            path: path.into(),
        }
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn into_file(self) -> File {
        self.file
    }
}

impl MediaSource for MediaFile {
    fn path(&self) -> &Path {
        &self.path
    }
}

impl MediaSource for Path {
    fn path(&self) -> &Path {
        self
    }
}

impl MediaSource for PathBuf {
    fn path(&self) -> &Path {
        self.as_path()
    }
}
