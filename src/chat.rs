// src/chat.rs

use crate::{
    api::CompletionClient,
    constants::ERROR_REPLY,
    conversation::Conversation,
    errors::ChatResult,
    models::Message,
};

/// Where the session is in a request/reply cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    Sending,
}

/// Why a send did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    /// Pending input is empty or whitespace.
    Blank,
    /// A reply is still outstanding.
    Busy,
}

/// Conversation plus the pending input buffer and the send gate.
#[derive(Debug, Default)]
pub struct ChatSession {
    conversation: Conversation,
    pending_input: String,
    state: SubmitState,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn snapshot(&self) -> &[Message] {
        self.conversation.snapshot()
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    pub fn is_sending(&self) -> bool {
        self.state == SubmitState::Sending
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    pub fn push_input(&mut self, c: char) {
        self.pending_input.push(c);
    }

    pub fn pop_input(&mut self) {
        self.pending_input.pop();
    }

    /// Idle → Sending.
    ///
    /// Appends the pending input as a user message, clears the buffer and
    /// returns the history to send. Blank input and sends while a reply is
    /// outstanding change nothing.
    pub fn begin_submit(&mut self) -> Result<Vec<Message>, SubmitRejection> {
        if self.state == SubmitState::Sending {
            log::debug!("send ignored, a reply is still outstanding");
            return Err(SubmitRejection::Busy);
        }
        if self.pending_input.trim().is_empty() {
            return Err(SubmitRejection::Blank);
        }

        let text = std::mem::take(&mut self.pending_input);
        self.conversation.append(Message::user(text));
        self.state = SubmitState::Sending;
        Ok(self.conversation.snapshot().to_vec())
    }

    /// Sending → Idle, appending the reply or the fixed error message.
    pub fn complete_submit(&mut self, result: ChatResult<String>) {
        if self.state != SubmitState::Sending {
            log::warn!("dropping a completion result that arrived while idle");
            return;
        }

        let reply = match result {
            Ok(text) => text,
            Err(e) => {
                log::error!("Error getting response: {e}");
                ERROR_REPLY.to_string()
            }
        };
        self.conversation.append(Message::bot(reply));
        self.state = SubmitState::Idle;
    }

    /// Runs a whole turn inline. Returns `false` if the send was rejected.
    pub async fn submit<C>(&mut self, client: &C) -> bool
    where
        C: CompletionClient + ?Sized,
    {
        let history = match self.begin_submit() {
            Ok(history) => history,
            Err(_) => return false,
        };
        let result = client.request_completion(&history).await;
        self.complete_submit(result);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SEED_GREETING;
    use crate::errors::ChatError;
    use crate::models::Sender;

    #[test]
    fn blank_input_is_a_no_op() {
        let mut session = ChatSession::new();
        for blank in ["", "   ", "\n\t "] {
            session.set_pending_input(blank);
            assert_eq!(session.begin_submit(), Err(SubmitRejection::Blank));
        }
        assert_eq!(session.snapshot().len(), 1);
        assert_eq!(session.state(), SubmitState::Idle);
    }

    #[test]
    fn begin_submit_appends_user_message_and_clears_input() {
        let mut session = ChatSession::new();
        session.set_pending_input("  what is rust?  ");

        let history = session.begin_submit().unwrap();

        assert_eq!(session.pending_input(), "");
        assert_eq!(session.state(), SubmitState::Sending);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].text(), SEED_GREETING);
        assert_eq!(history[1].text(), "  what is rust?  ");
        assert_eq!(history[1].sender(), Sender::User);
        assert_eq!(session.snapshot(), history.as_slice());
    }

    #[test]
    fn second_send_while_sending_is_rejected() {
        let mut session = ChatSession::new();
        session.set_pending_input("first");
        session.begin_submit().unwrap();

        session.set_pending_input("second");
        assert_eq!(session.begin_submit(), Err(SubmitRejection::Busy));
        assert_eq!(session.pending_input(), "second");
        assert_eq!(session.snapshot().len(), 2);
    }

    #[test]
    fn successful_reply_returns_to_idle() {
        let mut session = ChatSession::new();
        session.set_pending_input("hi");
        session.begin_submit().unwrap();

        session.complete_submit(Ok("hello".to_string()));

        assert_eq!(session.state(), SubmitState::Idle);
        let last = session.conversation().last().unwrap();
        assert_eq!(last.text(), "hello");
        assert_eq!(last.sender(), Sender::Bot);
    }

    #[test]
    fn failure_appends_exactly_one_error_message() {
        let mut session = ChatSession::new();
        session.set_pending_input("hi");
        session.begin_submit().unwrap();
        let before = session.snapshot().len();

        session.complete_submit(Err(ChatError::api_error(500, "boom")));

        assert_eq!(session.snapshot().len(), before + 1);
        assert_eq!(session.conversation().last().unwrap().text(), ERROR_REPLY);
        assert_eq!(session.state(), SubmitState::Idle);
    }

    #[test]
    fn stray_result_while_idle_is_ignored() {
        let mut session = ChatSession::new();
        session.complete_submit(Ok("late".to_string()));
        assert_eq!(session.snapshot().len(), 1);
    }
}
