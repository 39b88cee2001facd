use efbq_core::{config::Config, message::MsgType};

/// Decides whether an image-like file is a still image or an animation.
///
/// Matching is a plain substring test on the detected MIME type, so any label
/// containing a marker (`image/gif`, vendor `*gif*` types) is an animation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KindPolicy {
    animation_markers: Vec<String>,
}

impl KindPolicy {
    pub fn new<I, M>(animation_markers: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        Self {
            animation_markers: animation_markers
                .into_iter()
                .map(|m| m.into().to_ascii_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.animation_markers.iter().cloned())
    }

    pub fn image_kind(&self, mime: &str) -> MsgType {
        if self.is_animation(mime) {
            MsgType::Animation
        } else {
            MsgType::Image
        }
    }

    pub fn is_animation(&self, mime: &str) -> bool {
        self.animation_markers.iter().any(|m| mime.contains(m.as_str()))
    }
}

impl Default for KindPolicy {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
