use std::path::Path;

use efbq_core::{
    config::Config,
    message::{MsgType, OutboundMessage, Substitutions},
    ports::{MediaSource, MimeSniffer, RawMime},
    ClassificationError,
};

use crate::{policy::KindPolicy, sniff::InferSniffer};

/// Plain text message. Emojis are kept as text.
///
/// Empty `substitutions` are dropped so the message carries none at all.
pub fn wrap_text(text: impl Into<String>, substitutions: Option<Substitutions>) -> OutboundMessage {
    let mut msg = OutboundMessage::new(MsgType::Text);
    msg.text = Some(text.into());
    msg.substitutions = substitutions.filter(|s| !s.is_empty());
    msg
}

/// Placeholder for QQ content that has no EFB counterpart.
pub fn wrap_unsupported(text: impl Into<String>) -> OutboundMessage {
    let mut msg = OutboundMessage::new(MsgType::Unsupported);
    msg.text = Some(text.into());
    msg
}

/// Builds [`OutboundMessage`]s from QQ content.
///
/// Holds no per-call state; one instance can serve every chat concurrently.
#[derive(Clone, Debug)]
pub struct MessageDecorator<S = InferSniffer> {
    sniffer: S,
    policy: KindPolicy,
}

impl MessageDecorator<InferSniffer> {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            sniffer: InferSniffer::from_config(cfg),
            policy: KindPolicy::from_config(cfg),
        }
    }
}

impl Default for MessageDecorator<InferSniffer> {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl<S: MimeSniffer> MessageDecorator<S> {
    pub fn new(sniffer: S) -> Self {
        Self {
            sniffer,
            policy: KindPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: KindPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &KindPolicy {
        &self.policy
    }

    /// Detect the MIME type of `file` from its content.
    ///
    /// Reads through the path, so the caller's handle is left untouched.
    pub fn classify<F: MediaSource + ?Sized>(
        &self,
        file: &F,
    ) -> Result<String, ClassificationError> {
        let path = file.path();
        let mime = self
            .sniffer
            .sniff(path)
            .and_then(|raw| normalize_mime(raw, path));

        match &mime {
            Ok(m) => tracing::debug!(path = %path.display(), mime = %m, "classified media file"),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "media classification failed")
            }
        }
        mime
    }

    pub fn wrap_text(
        &self,
        text: impl Into<String>,
        substitutions: Option<Substitutions>,
    ) -> OutboundMessage {
        wrap_text(text, substitutions)
    }

    pub fn wrap_unsupported(&self, text: impl Into<String>) -> OutboundMessage {
        wrap_unsupported(text)
    }

    /// Still image or animation, depending on the detected MIME type.
    ///
    /// Classification always runs, even when `filename` is given, because it
    /// decides the kind.
    pub fn wrap_image<F: MediaSource + ?Sized>(
        &self,
        file: &F,
        filename: Option<&str>,
        caption: Option<&str>,
    ) -> Result<OutboundMessage, ClassificationError> {
        let mime = self.classify(file)?;
        let kind = self.policy.image_kind(&mime);
        build_media(kind, file.path(), mime, filename, caption)
    }

    /// Voice or other audio. The MIME type only feeds the filename.
    pub fn wrap_voice<F: MediaSource + ?Sized>(
        &self,
        file: &F,
        filename: Option<&str>,
        caption: Option<&str>,
    ) -> Result<OutboundMessage, ClassificationError> {
        let mime = self.classify(file)?;
        build_media(MsgType::Audio, file.path(), mime, filename, caption)
    }
}

fn build_media(
    kind: MsgType,
    path: &Path,
    mime: String,
    filename: Option<&str>,
    caption: Option<&str>,
) -> Result<OutboundMessage, ClassificationError> {
    let filename = match filename.filter(|f| !f.is_empty()) {
        Some(f) => f.to_string(),
        None => derive_filename(path, &mime)?,
    };

    tracing::debug!(?kind, %filename, %mime, "wrapped media message");

    let mut msg = OutboundMessage::new(kind);
    msg.text = caption.filter(|c| !c.is_empty()).map(str::to_string);
    msg.filename = Some(filename);
    msg.path = Some(path.to_path_buf());
    msg.mime = Some(mime);
    Ok(msg)
}

/// Decode, trim and lower-case sniffer output.
fn normalize_mime(raw: RawMime, path: &Path) -> Result<String, ClassificationError> {
    let text = match raw {
        RawMime::Text(s) => s,
        RawMime::Bytes(b) => String::from_utf8(b).map_err(|_| ClassificationError::Encoding {
            path: path.to_path_buf(),
        })?,
    };

    let mime = text.trim().to_ascii_lowercase();
    if mime.is_empty() {
        return Err(ClassificationError::NoMatch {
            path: path.to_path_buf(),
        });
    }
    Ok(mime)
}

/// Second segment of `type/subtype`, without parameters.
fn mime_extension(mime: &str) -> Result<&str, ClassificationError> {
    let malformed = || ClassificationError::MalformedMime {
        mime: mime.to_string(),
    };

    let subtype = mime.split('/').nth(1).ok_or_else(malformed)?;
    let ext = subtype.split(';').next().unwrap_or_default().trim();
    if ext.is_empty() {
        return Err(malformed());
    }
    Ok(ext)
}

/// `<base name>.<mime subtype>`, e.g. `photo` + `image/png` gives `photo.png`.
///
/// A base name that is not valid UTF-8 is rejected rather than mangled.
fn derive_filename(path: &Path, mime: &str) -> Result<String, ClassificationError> {
    let ext = mime_extension(mime)?;
    let base = path
        .file_name()
        .unwrap_or(path.as_os_str())
        .to_str()
        .ok_or_else(|| ClassificationError::NonUtf8Name {
            path: path.to_path_buf(),
        })?;
    Ok(format!("{base}.{ext}"))
}
