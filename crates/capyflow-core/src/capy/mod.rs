//! The capybara companion: mood, casting, chat.

mod chat;
mod mood;

pub use chat::{CapyChat, ChatTopic, REPLY_SECS};
pub use mood::{Capy, CapyMood, CAST_SECS, PET_SECS, WAKE_SECS};
