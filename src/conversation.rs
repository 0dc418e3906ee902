// src/conversation.rs

use crate::constants::SEED_GREETING;
use crate::models::Message;

/// Append-only, in-memory history of one chat session.
///
/// Messages are never edited, removed or reordered, so an index into
/// [`Conversation::snapshot`] stays valid for the whole session.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Starts a conversation with the stock bot greeting.
    pub fn new() -> Self {
        Self::with_seed(Message::bot(SEED_GREETING))
    }

    pub fn with_seed(seed: Message) -> Self {
        Self {
            messages: vec![seed],
        }
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Full history in insertion order.
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sender;

    #[test]
    fn starts_with_seed_greeting() {
        let conversation = Conversation::new();
        assert_eq!(conversation.snapshot().len(), 1);
        let seed = &conversation.snapshot()[0];
        assert_eq!(seed.text(), SEED_GREETING);
        assert_eq!(seed.sender(), Sender::Bot);
    }

    #[test]
    fn append_preserves_insertion_order() {
        let mut conversation = Conversation::new();
        for i in 0..5 {
            conversation.append(Message::user(format!("q{i}")));
            conversation.append(Message::bot(format!("a{i}")));
        }

        let texts: Vec<&str> = conversation.snapshot()[1..]
            .iter()
            .map(Message::text)
            .collect();
        assert_eq!(
            texts,
            ["q0", "a0", "q1", "a1", "q2", "a2", "q3", "a3", "q4", "a4"]
        );
        assert_eq!(conversation.last().map(Message::text), Some("a4"));
    }
}
