//! Domain models for channels, messages, accounts and time windows.

pub mod channel;
pub mod message;
pub mod user;
pub mod window;

pub use channel::{Channel, ChannelKind};
pub use message::{
    MessageAttachment, MessageAuthor, MessageReaction, NormalizedMessage, RawMessage,
    DELETED_FLAG,
};
pub use user::{CurrentUser, PartialGuild};
pub use window::TimeWindow;
