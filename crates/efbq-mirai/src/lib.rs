//! Message decorator for the QQ (Mirai) slave channel.
//!
//! Turns plain text and downloaded media files into [`OutboundMessage`]s. Media
//! kinds are decided by sniffing file content, never by file extension.
//!
//! [`OutboundMessage`]: efbq_core::message::OutboundMessage

pub mod decorator;
pub mod policy;
pub mod sniff;

pub use decorator::MessageDecorator;
pub use policy::KindPolicy;
pub use sniff::InferSniffer;
