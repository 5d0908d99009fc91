use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use crate::errors::ApiError;
use crate::models::agent::empty_context;
use crate::models::{AgentRequest, Message, Role};
use crate::services::api::AgentBackend;

#[derive(Debug)]
pub enum TurnOutcome {
    Replied(Message),
    Fallback { message: Message, error: ApiError },
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyInput,
    TurnInFlight,
}

impl TurnOutcome {
    // Undecodable replies get the no-text placeholder; anything else the apology.
    pub fn fallback(error: ApiError) -> Self {
        let message = match error {
            ApiError::Decode(_) => Message::no_text_fallback(),
            _ => Message::connectivity_apology(),
        };
        TurnOutcome::Fallback { message, error }
    }

    pub fn message(&self) -> Option<&Message> {
        match self {
            TurnOutcome::Replied(message) | TurnOutcome::Fallback { message, .. } => Some(message),
            TurnOutcome::Ignored(_) => None,
        }
    }
}

pub struct ChatSession {
    session_id: String,
    role: Role,
    context: Value,
    agent: Arc<dyn AgentBackend>,
    messages: Mutex<Vec<Message>>,
    pending: AtomicBool,
}

/// Clears `pending` when the turn finishes, even if the future is dropped.
struct PendingGuard<'a>(&'a AtomicBool);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ChatSession {
    pub fn new(agent: Arc<dyn AgentBackend>, role: Role) -> Self {
        Self::with_context(agent, role, empty_context())
    }

    pub fn with_context(agent: Arc<dyn AgentBackend>, role: Role, context: Value) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            role,
            context,
            agent,
            messages: Mutex::new(Vec::new()),
            pending: AtomicBool::new(false),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn messages(&self) -> Vec<Message> {
        self.log().clone()
    }

    pub fn last_message(&self) -> Option<Message> {
        self.log().last().cloned()
    }

    pub async fn send(&self, text: &str) -> TurnOutcome {
        if text.trim().is_empty() {
            return TurnOutcome::Ignored(IgnoreReason::EmptyInput);
        }

        if self
            .pending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!(session_id = %self.session_id, "turn in flight, ignoring send");
            return TurnOutcome::Ignored(IgnoreReason::TurnInFlight);
        }
        let _guard = PendingGuard(&self.pending);

        self.append(Message::user(text));

        let request = AgentRequest::query(text, self.role, self.context.clone());
        let outcome = match self.agent.execute(&request).await {
            Ok(reply) => {
                let message = Message::from_reply(&reply);
                tracing::info!(
                    session_id = %self.session_id,
                    agent = reply.agent_used.as_deref().unwrap_or("unknown"),
                    action = message.action.as_ref().map(|a| a.kind()).unwrap_or("none"),
                    "agent replied"
                );
                TurnOutcome::Replied(message)
            }
            Err(e) => {
                tracing::warn!(session_id = %self.session_id, error = %e, "agent turn failed");
                TurnOutcome::fallback(e)
            }
        };

        if let Some(message) = outcome.message() {
            self.append(message.clone());
        }
        outcome
    }

    fn append(&self, message: Message) {
        self.log().push(message);
    }

    fn log(&self) -> std::sync::MutexGuard<'_, Vec<Message>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
