//! Conversation context threaded explicitly through each turn.
//!
//! Holds the system prompt and the alternating user/assistant history. The
//! chat service is stateless, so the full context is sent on every call.
//! Keeping it a plain value (instead of session-wide mutable state) lets
//! tests run turns independently and in parallel.

use chefbot_types::llm::Message;
use chefbot_types::persona::ChefPersona;
use chefbot_types::turn::Turn;

#[derive(Debug, Clone, Default)]
pub struct ConversationContext {
    system: Vec<Message>,
    history: Vec<Message>,
}

impl ConversationContext {
    pub fn new(system: Vec<Message>) -> Self {
        Self {
            system,
            history: Vec::new(),
        }
    }

    /// Start a conversation with a chef persona's system prompt.
    pub fn for_persona(persona: &ChefPersona) -> Self {
        Self::new(persona.system_messages())
    }

    /// Messages for the next request: system prompt, prior turns, then the
    /// new user prompt.
    pub fn messages_for(&self, prompt: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.system.len() + self.history.len() + 1);
        messages.extend(self.system.iter().cloned());
        messages.extend(self.history.iter().cloned());
        messages.push(Message::user(prompt));
        messages
    }

    /// Append a finished turn to the history.
    ///
    /// Partial answers from interrupted turns are kept, since that is what the
    /// user saw. An empty answer adds only the user message.
    pub fn record_turn(&mut self, turn: &Turn) {
        self.history.push(Message::user(turn.prompt.clone()));
        if !turn.answer.is_empty() {
            self.history.push(Message::assistant(turn.answer.clone()));
        }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }
}
