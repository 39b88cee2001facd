//! Message and entity types shared by the QQ (Mirai) slave channel.
//!
//! Holds what the forwarding pipeline sees: message kinds, mention ranges and
//! the chats they point at. File type detection is only described here, as
//! the `MimeSniffer` trait; `efbq-mirai` supplies the detector and the wrappers.

pub mod chat;
pub mod config;
pub mod errors;
pub mod logging;
pub mod message;
pub mod ports;

pub use errors::{ClassificationError, Error, Result};
