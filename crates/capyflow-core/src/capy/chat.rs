//! Tiny canned-response chat with the capybara.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::TimeoutSlot;
use crate::events::Event;
use crate::random::RandomSource;

/// How long a reply stays on screen.
pub const REPLY_SECS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatTopic {
    Tired,
    Happy,
    Focus,
    Default,
}

impl ChatTopic {
    /// First matching keyword group wins, in tired/happy/focus order.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));
        if has(&["nản", "mệt", "buồn"]) {
            ChatTopic::Tired
        } else if has(&["vui", "yeah", "tốt"]) {
            ChatTopic::Happy
        } else if has(&["focus", "tập trung"]) {
            ChatTopic::Focus
        } else {
            ChatTopic::Default
        }
    }

    pub fn responses(self) -> &'static [&'static str] {
        match self {
            ChatTopic::Tired => &[
                "Đừng lo, cá vẫn đang đợi! 🐟",
                "Nghỉ một chút rồi quay lại nhé 💤",
                "Mình ở đây cùng bạn mà! 🦫",
            ],
            ChatTopic::Happy => &[
                "Tuyệt vời! Tiếp tục nào! 🎉",
                "Woohoo! Bạn đang làm rất tốt! 🌟",
                "Yeah! Mình vui lây nè! 🦫✨",
            ],
            ChatTopic::Focus => &["Hít thở sâu... thở ra... 🧘", "Tập trung đi, mình tin bạn! 💪"],
            ChatTopic::Default => &["Mình nghe bạn nè 👂", "Cùng cố gắng nhé! 🦫"],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapyChat {
    last_message: String,
    last_response: Option<String>,
    #[serde(default)]
    clear_reply: TimeoutSlot,
}

impl CapyChat {
    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    pub fn last_response(&self) -> Option<&str> {
        self.last_response.as_deref()
    }

    pub fn send(&mut self, message: &str, rng: &mut dyn RandomSource, now: DateTime<Utc>) -> Event {
        let topic = ChatTopic::classify(message);
        let pool = topic.responses();
        let response = pool[rng.pick(pool.len())].to_string();
        self.last_message = message.to_string();
        self.last_response = Some(response.clone());
        self.clear_reply.arm(now, Duration::seconds(REPLY_SECS));
        Event::CapyReplied {
            topic,
            message: message.to_string(),
            response,
        }
    }

    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.clear_reply.fire_due(now) {
            return None;
        }
        self.last_response = None;
        Some(Event::CapyReplyCleared { at: now })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::scripted::Scripted;

    #[test]
    fn classifies_by_keyword_priority() {
        assert_eq!(ChatTopic::classify("Mình mệt quá"), ChatTopic::Tired);
        assert_eq!(ChatTopic::classify("YEAH done"), ChatTopic::Happy);
        assert_eq!(ChatTopic::classify("need to FOCUS"), ChatTopic::Focus);
        assert_eq!(ChatTopic::classify("buồn but yeah"), ChatTopic::Tired);
        assert_eq!(ChatTopic::classify("hello"), ChatTopic::Default);
    }

    #[test]
    fn reply_clears_after_five_seconds() {
        let now = Utc::now();
        let mut chat = CapyChat::default();
        let mut rng = Scripted::picks(&[1]);
        match chat.send("vui quá", &mut rng, now) {
            Event::CapyReplied { topic, response, .. } => {
                assert_eq!(topic, ChatTopic::Happy);
                assert_eq!(response, ChatTopic::Happy.responses()[1]);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(chat.poll(now + Duration::seconds(4)).is_none());
        assert!(chat.poll(now + Duration::seconds(5)).is_some());
        assert!(chat.last_response().is_none());
        assert_eq!(chat.last_message(), "vui quá");
    }

    #[test]
    fn newer_message_extends_reply() {
        let now = Utc::now();
        let mut chat = CapyChat::default();
        let mut rng = Scripted::default();
        chat.send("hi", &mut rng, now);
        chat.send("hi again", &mut rng, now + Duration::seconds(4));
        assert!(chat.poll(now + Duration::seconds(6)).is_none());
        assert!(chat.last_response().is_some());
    }
}
