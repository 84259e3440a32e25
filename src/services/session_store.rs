use std::{collections::HashMap, sync::Arc, time::Duration};

use log::{debug, info};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::funnel::Funnel;

pub type SharedFunnel = Arc<Mutex<Funnel>>;

/// Open funnels keyed by session id. Each session owns its own draft.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SharedFunnel>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self, funnel: Funnel) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(funnel)));
        debug!("Opened booking session {}", id);
        id
    }

    pub async fn get(&self, id: &Uuid) -> Option<SharedFunnel> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Discards the session and its draft.
    pub async fn remove(&self, id: &Uuid) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drops a finished session once the confirmation has been on screen for `delay`.
    pub fn schedule_close(self: &Arc<Self>, id: Uuid, delay: Duration) {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if store.remove(&id).await {
                info!("Closed completed booking session {}", id);
            }
        });
    }
}
