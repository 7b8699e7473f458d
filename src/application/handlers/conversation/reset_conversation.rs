//! ResetConversation command handler.

use std::sync::Arc;

use crate::domain::foundation::{ClassifiedError, SessionId};

use super::session::ConversationSession;

/// Confirmation text returned after a reset.
pub const RESET_CONFIRMATION: &str = "Conversation reset";

/// Result of resetting the conversation.
#[derive(Debug, Clone)]
pub struct ResetConversationResult {
    /// Id of the fresh session.
    pub session_id: SessionId,
    /// Human-readable confirmation.
    pub message: String,
}

/// Handler for ResetConversation commands.
pub struct ResetConversationHandler {
    session: Arc<ConversationSession>,
}

impl ResetConversationHandler {
    pub fn new(session: Arc<ConversationSession>) -> Self {
        Self { session }
    }

    /// Clears the transcript and restores default generation settings.
    ///
    /// Currently infallible: the provider is constructed once at startup.
    pub async fn handle(&self) -> Result<ResetConversationResult, ClassifiedError> {
        let session_id = self.session.reset().await;
        Ok(ResetConversationResult {
            session_id,
            message: RESET_CONFIRMATION.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::domain::conversation::Prompt;

    #[tokio::test]
    async fn reset_clears_prior_exchanges() {
        let session = Arc::new(ConversationSession::new(Arc::new(MockAIProvider::new())));
        session.advance(&Prompt::new("one").unwrap()).await.unwrap();
        session.advance(&Prompt::new("two").unwrap()).await.unwrap();

        let result = ResetConversationHandler::new(session.clone())
            .handle()
            .await
            .unwrap();

        assert_eq!(result.message, RESET_CONFIRMATION);
        assert_eq!(result.session_id, session.id().await);
        assert!(session.is_empty().await);
    }

    #[tokio::test]
    async fn reset_on_fresh_session_is_harmless() {
        let session = Arc::new(ConversationSession::new(Arc::new(MockAIProvider::new())));

        let handler = ResetConversationHandler::new(session.clone());
        handler.handle().await.unwrap();
        handler.handle().await.unwrap();

        assert!(session.is_empty().await);
    }
}
