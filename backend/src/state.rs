// src/state.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};

use axum::extract::FromRef;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{question::Question, quiz_attempt::QuizAttempt, quiz_session::QuizSession};
use crate::store::kv::{KeyValueStore, ScopedStore};
use crate::store::notifications::NotificationStore;

/// Completed passes kept per user; older ones are dropped first.
pub const MAX_ATTEMPTS_PER_USER: usize = 50;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub quizzes: Arc<QuizRegistry>,
    pub notifications: Arc<NotificationHub>,
}

impl AppState {
    pub fn new(config: Config, medium: Arc<dyn KeyValueStore>) -> Self {
        let idle_ttl = config.idle_ttl;
        Self {
            config,
            quizzes: Arc::new(QuizRegistry::new(idle_ttl)),
            notifications: Arc::new(NotificationHub::new(medium, idle_ttl)),
        }
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<QuizRegistry> {
    fn from_ref(state: &AppState) -> Self {
        state.quizzes.clone()
    }
}

impl FromRef<AppState> for Arc<NotificationHub> {
    fn from_ref(state: &AppState) -> Self {
        state.notifications.clone()
    }
}

struct OwnedSession {
    owner: String,
    session: QuizSession,
    last_touched: Instant,
}

type AttemptLog = Arc<StdMutex<HashMap<String, Vec<QuizAttempt>>>>;

/// Live quiz sessions, each owned by the user who started it, plus the
/// history of completed passes.
///
/// Sessions untouched for longer than the idle TTL are swept on the next
/// access, which covers pages that closed without discarding their session.
pub struct QuizRegistry {
    sessions: Mutex<HashMap<Uuid, OwnedSession>>,
    attempts: AttemptLog,
    idle_ttl: Duration,
}

impl QuizRegistry {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            attempts: AttemptLog::default(),
            idle_ttl,
        }
    }

    /// Starts a session for `owner`. Every completed pass is appended to the
    /// owner's attempt history.
    pub async fn start(&self, owner: &str, questions: Vec<Question>) -> (Uuid, usize) {
        let session_id = Uuid::new_v4();
        let total = questions.len();

        let attempts = self.attempts.clone();
        let user = owner.to_string();
        let session = QuizSession::with_listener(questions, move |result| {
            let Ok(mut log) = attempts.lock() else {
                tracing::error!("Attempt log lock poisoned; dropping attempt {}", session_id);
                return;
            };
            let history = log.entry(user.clone()).or_default();
            history.push(QuizAttempt::record(session_id, result));
            if history.len() > MAX_ATTEMPTS_PER_USER {
                history.remove(0);
            }
        });

        let mut sessions = self.sessions.lock().await;
        self.sweep(&mut sessions);
        sessions.insert(
            session_id,
            OwnedSession {
                owner: owner.to_string(),
                session,
                last_touched: Instant::now(),
            },
        );
        tracing::info!("Quiz session {} started by user {} ({} questions)", session_id, owner, total);

        (session_id, total)
    }

    /// Runs `f` against a session owned by `owner`. Sessions of other users are
    /// reported as missing.
    pub async fn with_session<R>(
        &self,
        owner: &str,
        session_id: Uuid,
        f: impl FnOnce(&mut QuizSession) -> R,
    ) -> Result<R, AppError> {
        let mut sessions = self.sessions.lock().await;
        self.sweep(&mut sessions);

        let entry = sessions
            .get_mut(&session_id)
            .filter(|s| s.owner == owner)
            .ok_or(AppError::NotFound("Quiz session not found".to_string()))?;

        entry.last_touched = Instant::now();
        Ok(f(&mut entry.session))
    }

    /// Drops a session when the hosting page goes away.
    pub async fn discard(&self, owner: &str, session_id: Uuid) -> Result<(), AppError> {
        let mut sessions = self.sessions.lock().await;
        match sessions.get(&session_id) {
            Some(s) if s.owner == owner => {
                sessions.remove(&session_id);
                Ok(())
            }
            _ => Err(AppError::NotFound("Quiz session not found".to_string())),
        }
    }

    /// Number of sessions currently held.
    pub async fn live_sessions(&self) -> usize {
        let mut sessions = self.sessions.lock().await;
        self.sweep(&mut sessions);
        sessions.len()
    }

    /// Completed passes of `owner`, most recent first.
    pub fn attempts(&self, owner: &str) -> Result<Vec<QuizAttempt>, AppError> {
        let log = self
            .attempts
            .lock()
            .map_err(|_| AppError::InternalServerError("Attempt log lock poisoned".to_string()))?;

        let mut attempts = log.get(owner).cloned().unwrap_or_default();
        attempts.reverse();
        Ok(attempts)
    }

    fn sweep(&self, sessions: &mut HashMap<Uuid, OwnedSession>) {
        let before = sessions.len();
        sessions.retain(|_, s| s.last_touched.elapsed() < self.idle_ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!("Evicted {} idle quiz sessions", evicted);
        }
    }
}

struct CachedStore {
    store: Arc<Mutex<NotificationStore>>,
    last_touched: Instant,
}

/// One notification store per user, all over the same medium with per-user
/// key prefixes.
///
/// Each store has its own lock. Idle stores are dropped from the cache (their
/// undo ring goes with them; the log itself stays in the medium).
pub struct NotificationHub {
    medium: Arc<dyn KeyValueStore>,
    stores: Mutex<HashMap<String, CachedStore>>,
    idle_ttl: Duration,
}

impl NotificationHub {
    pub fn new(medium: Arc<dyn KeyValueStore>, idle_ttl: Duration) -> Self {
        Self {
            medium,
            stores: Mutex::new(HashMap::new()),
            idle_ttl,
        }
    }

    /// Runs `f` against the store of `user`, creating it on first use.
    ///
    /// The medium may do blocking I/O, so `f` runs on the blocking pool.
    pub async fn with_store<R, F>(&self, user: &str, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut NotificationStore) -> R + Send + 'static,
        R: Send + 'static,
    {
        let store = self.checkout(user).await;

        tokio::task::spawn_blocking(move || {
            let mut store = store.blocking_lock();
            f(&mut store)
        })
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))
    }

    /// Number of stores currently cached.
    pub async fn cached_stores(&self) -> usize {
        self.stores.lock().await.len()
    }

    async fn checkout(&self, user: &str) -> Arc<Mutex<NotificationStore>> {
        let mut stores = self.stores.lock().await;

        // A store still referenced by an in-flight call is kept regardless of age
        let ttl = self.idle_ttl;
        stores.retain(|_, c| c.last_touched.elapsed() < ttl || Arc::strong_count(&c.store) > 1);

        let cached = stores.entry(user.to_string()).or_insert_with(|| {
            let scoped = ScopedStore::new(self.medium.clone(), &format!("user:{}", user));
            CachedStore {
                store: Arc::new(Mutex::new(NotificationStore::new(Arc::new(scoped)))),
                last_touched: Instant::now(),
            }
        });
        cached.last_touched = Instant::now();
        cached.store.clone()
    }
}
