use std::{ops::Range, path::PathBuf};

use serde::Serialize;

use crate::{chat::SubstitutionTarget, errors::Error, Result};

/// Message kinds produced on the QQ side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MsgType {
    Text,
    Unsupported,
    Image,
    Animation,
    Audio,
}

impl MsgType {
    /// Kinds that must reference a file on disk.
    pub fn is_media(self) -> bool {
        matches!(self, Self::Image | Self::Animation | Self::Audio)
    }
}

/// One `@mention`: a half-open character range over the message text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Substitution {
    pub range: Range<usize>,
    pub target: SubstitutionTarget,
}

/// Mention ranges of a message, kept ordered by range start.
///
/// Ranges are not checked on construction; call [`Substitutions::verify`] when
/// the source of the ranges is not trusted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Substitutions(Vec<Substitution>);

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, range: Range<usize>, target: SubstitutionTarget) {
        let at = self.0.partition_point(|s| s.range.start <= range.start);
        self.0.insert(at, Substitution { range, target });
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Substitution> {
        self.0.iter()
    }

    /// Whether the logged-in account is mentioned.
    pub fn is_mentioned(&self) -> bool {
        self.0.iter().any(|s| s.target.is_self())
    }

    /// Check that every range is non-empty, inside `text` (counted in chars)
    /// and disjoint from its neighbours.
    pub fn verify(&self, text: &str) -> Result<()> {
        let len = text.chars().count();
        let mut prev_end = 0;
        for (idx, sub) in self.0.iter().enumerate() {
            let (start, end) = (sub.range.start, sub.range.end);
            if start >= end {
                return Err(Error::InvalidMessage(format!(
                    "substitution {start}..{end} is empty"
                )));
            }
            if end > len {
                return Err(Error::InvalidMessage(format!(
                    "substitution {start}..{end} is outside text of length {len}"
                )));
            }
            if idx > 0 && start < prev_end {
                return Err(Error::InvalidMessage(format!(
                    "substitution {start}..{end} overlaps a previous range ending at {prev_end}"
                )));
            }
            prev_end = end;
        }
        Ok(())
    }
}

impl FromIterator<((usize, usize), SubstitutionTarget)> for Substitutions {
    fn from_iter<I: IntoIterator<Item = ((usize, usize), SubstitutionTarget)>>(iter: I) -> Self {
        let mut subs = Self::new();
        for ((start, end), target) in iter {
            subs.push(start..end, target);
        }
        subs
    }
}

impl<'a> IntoIterator for &'a Substitutions {
    type Item = &'a Substitution;
    type IntoIter = std::slice::Iter<'a, Substitution>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Platform-agnostic message handed to the forwarding pipeline.
///
/// Media messages carry the path of the caller's file, never the handle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    #[serde(rename = "type")]
    pub kind: MsgType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitutions: Option<Substitutions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
}

impl OutboundMessage {
    pub fn new(kind: MsgType) -> Self {
        Self {
            kind,
            text: None,
            substitutions: None,
            filename: None,
            path: None,
            mime: None,
        }
    }

    /// Structural check before the message leaves the slave channel.
    pub fn verify(&self) -> Result<()> {
        if self.kind.is_media() {
            if self.path.is_none() {
                return Err(Error::InvalidMessage(format!(
                    "{:?} message has no path",
                    self.kind
                )));
            }
            if self.filename.as_deref().map_or(true, str::is_empty) {
                return Err(Error::InvalidMessage(format!(
                    "{:?} message has no filename",
                    self.kind
                )));
            }
            if self.mime.is_none() {
                return Err(Error::InvalidMessage(format!(
                    "{:?} message has no mime type",
                    self.kind
                )));
            }
        } else if self.text.is_none() {
            return Err(Error::InvalidMessage(format!(
                "{:?} message has no text",
                self.kind
            )));
        }

        if let Some(subs) = &self.substitutions {
            subs.verify(self.text.as_deref().unwrap_or_default())?;
        }
        Ok(())
    }
}
