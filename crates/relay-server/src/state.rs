use crate::config::ServerConfig;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub protocol_version: String,
    pub client_name: Option<String>,
    /// Set once `notifications/initialized` arrives
    pub initialized: bool,
    pub created_at: DateTime<Utc>,
}

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Open a session and return its id.
    ///
    /// Expired sessions are pruned first; if the table is still full the
    /// oldest entry makes room.
    pub async fn open_session(&self, protocol_version: String, client_name: Option<String>) -> String {
        let now = Utc::now();
        let session_id = uuid::Uuid::new_v4().simple().to_string();

        let mut sessions = self.sessions.write().await;
        self.prune(&mut sessions, now);

        sessions.insert(
            session_id.clone(),
            SessionEntry {
                protocol_version,
                client_name,
                initialized: false,
                created_at: now,
            },
        );
        session_id
    }

    fn prune(&self, sessions: &mut HashMap<String, SessionEntry>, now: DateTime<Utc>) {
        let ttl_secs = i64::try_from(self.config.session_ttl_secs).unwrap_or(i64::MAX);
        let before = sessions.len();
        sessions.retain(|_, entry| now.signed_duration_since(entry.created_at).num_seconds() < ttl_secs);

        while !sessions.is_empty() && sessions.len() >= self.config.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.created_at)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                }
                None => break,
            }
        }

        let dropped = before - sessions.len();
        if dropped > 0 {
            tracing::debug!(dropped, remaining = sessions.len(), "pruned sessions");
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_full_table_drops_oldest_session() {
        let state = AppState::new(ServerConfig::default().with_session_limits(2, 3600));

        let first = state.open_session("2025-06-18".to_string(), None).await;
        state
            .sessions
            .write()
            .await
            .entry(first.clone())
            .and_modify(|e| e.created_at -= Duration::seconds(10));
        let second = state.open_session("2025-06-18".to_string(), None).await;
        let third = state.open_session("2025-06-18".to_string(), None).await;

        let sessions = state.sessions.read().await;
        assert_eq!(sessions.len(), 2);
        assert!(!sessions.contains_key(&first));
        assert!(sessions.contains_key(&second));
        assert!(sessions.contains_key(&third));
    }

    #[tokio::test]
    async fn test_expired_sessions_pruned_on_open() {
        let state = AppState::new(ServerConfig::default().with_session_limits(1024, 60));

        let stale = state.open_session("2025-06-18".to_string(), Some("old".to_string())).await;
        state
            .sessions
            .write()
            .await
            .entry(stale.clone())
            .and_modify(|e| e.created_at -= Duration::seconds(120));
        let fresh = state.open_session("2025-06-18".to_string(), None).await;

        let sessions = state.sessions.read().await;
        assert_eq!(sessions.len(), 1);
        assert!(sessions.contains_key(&fresh));
    }

    #[tokio::test]
    async fn test_sessions_within_limits_are_kept() {
        let state = AppState::new(ServerConfig::default());
        for _ in 0..5 {
            state.open_session("2025-06-18".to_string(), None).await;
        }
        assert_eq!(state.session_count().await, 5);
    }
}
