// One-shot messages carried in the session to the next rendered page

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::AppResult;

const SESSION_MESSAGES_KEY: &str = "_messages";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Info,
    Success,
    Warning,
}

impl Level {
    /// CSS class suffix used by the base template.
    pub fn css_class(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Success => "success",
            Level::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: Level,
    pub text: String,
}

pub async fn push(session: &Session, level: Level, text: impl Into<String>) -> AppResult<()> {
    let mut messages: Vec<Flash> = session.get(SESSION_MESSAGES_KEY).await?.unwrap_or_default();
    messages.push(Flash {
        level,
        text: text.into(),
    });
    session.insert(SESSION_MESSAGES_KEY, messages).await?;
    Ok(())
}

/// Drain pending messages; each one is shown once.
pub async fn take(session: &Session) -> AppResult<Vec<Flash>> {
    let messages: Option<Vec<Flash>> = session.remove(SESSION_MESSAGES_KEY).await?;
    Ok(messages.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    #[tokio::test]
    async fn test_messages_are_taken_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        push(&session, Level::Success, "Comment added").await.unwrap();
        push(&session, Level::Warning, "Careful").await.unwrap();

        let messages = take(&session).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "Comment added");
        assert_eq!(messages[1].level.css_class(), "warning");
        assert!(take(&session).await.unwrap().is_empty());
    }
}
