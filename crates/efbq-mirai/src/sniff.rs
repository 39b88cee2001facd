use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use efbq_core::{
    config::Config,
    ports::{MimeSniffer, RawMime},
    ClassificationError,
};

/// Magic-byte sniffer backed by the `infer` signature tables.
///
/// Only the head of the file is read; the extension is never looked at.
#[derive(Clone, Copy, Debug)]
pub struct InferSniffer {
    max_bytes: usize,
}

impl InferSniffer {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes: max_bytes.max(1),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.sniff_bytes)
    }

    fn read_head(&self, path: &Path) -> Result<Vec<u8>, ClassificationError> {
        let io_err = |source| ClassificationError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_err)?;
        let mut head = Vec::with_capacity(self.max_bytes.min(8192));
        file.take(self.max_bytes as u64)
            .read_to_end(&mut head)
            .map_err(io_err)?;
        Ok(head)
    }
}

impl Default for InferSniffer {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl MimeSniffer for InferSniffer {
    fn sniff(&self, path: &Path) -> Result<RawMime, ClassificationError> {
        let head = self.read_head(path)?;
        let no_match = || ClassificationError::NoMatch {
            path: PathBuf::from(path),
        };

        if head.is_empty() {
            return Err(no_match());
        }

        let kind = infer::get(&head).ok_or_else(no_match)?;
        Ok(RawMime::from(kind.mime_type()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_file(name: &str, bytes: &[u8]) -> PathBuf {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let pid = std::process::id();
        let dir = PathBuf::from(format!("/tmp/efbq-sniff-{pid}-{ts}"));
        std::fs::create_dir_all(&dir).unwrap();
        let p = dir.join(name);
        std::fs::write(&p, bytes).unwrap();
        p
    }

    fn sniff_text(path: &Path) -> String {
        match InferSniffer::default().sniff(path).unwrap() {
            RawMime::Text(s) => s,
            RawMime::Bytes(b) => panic!("unexpected bytes: {b:?}"),
        }
    }

    #[test]
    fn detects_gif_regardless_of_extension() {
        let p = tmp_file("looks_like.png", b"GIF89a\x01\x00\x01\x00\x80\x00\x00");
        assert_eq!(sniff_text(&p), "image/gif");
    }

    #[test]
    fn detects_png_and_jpeg() {
        let png = tmp_file("a", b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR");
        assert_eq!(sniff_text(&png), "image/png");

        let jpg = tmp_file("b.bin", b"\xFF\xD8\xFF\xE0\x00\x10JFIF\x00");
        assert_eq!(sniff_text(&jpg), "image/jpeg");
    }

    #[test]
    fn detects_mp3_by_id3_tag() {
        let p = tmp_file("clip.bin", b"ID3\x03\x00\x00\x00\x00\x00\x00\x00\x00");
        assert_eq!(sniff_text(&p), "audio/mpeg");
    }

    #[test]
    fn unknown_content_is_an_error() {
        let p = tmp_file("notes.gif", b"plain notes, nothing to see here\n");
        let err = InferSniffer::default().sniff(&p).unwrap_err();
        assert!(matches!(err, ClassificationError::NoMatch { .. }));
    }

    #[test]
    fn empty_file_is_an_error() {
        let p = tmp_file("empty", b"");
        let err = InferSniffer::default().sniff(&p).unwrap_err();
        assert!(matches!(err, ClassificationError::NoMatch { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = InferSniffer::default()
            .sniff(Path::new("/nonexistent/efbq/missing.jpg"))
            .unwrap_err();
        assert!(matches!(err, ClassificationError::Io { .. }));
    }

    #[test]
    fn short_head_still_matches() {
        let p = tmp_file("big", &[b"GIF89a".as_slice(), &[0u8; 4096]].concat());
        let sniffer = InferSniffer::new(16);
        assert_eq!(
            sniffer.sniff(&p).unwrap(),
            RawMime::Text("image/gif".to_string())
        );
    }
}
