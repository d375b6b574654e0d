pub mod channel;
pub mod helpers;
pub mod history;
pub mod message;

pub use channel::{create_category, create_dm_channel, create_text_channel, create_voice_channel};
pub use history::create_history;
pub use message::MessageFactory;
