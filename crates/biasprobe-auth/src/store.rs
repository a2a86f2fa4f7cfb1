//! Account registry and signed-in user.
//!
//! State machine:
//!
//! ```text
//! Loading --restore--> Authenticated | Anonymous
//! Anonymous --register/login--> Authenticated
//! Authenticated --logout--> Anonymous
//! ```
//!
//! Every transition persists first and flips in-memory state only after the
//! write succeeded, so a storage failure leaves the store where it was.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AuthError;
use crate::kv::KeyValueStore;
use crate::password::{PasswordHash, DEFAULT_ITERATIONS};

/// Key holding the signed-in user.
pub const CURRENT_USER_KEY: &str = "user";
/// Key holding the registry of every account.
pub const USERS_KEY: &str = "users";

/// A registered account as seen by the rest of the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
}

/// Registry entry; never leaves this module.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredUser {
    id: String,
    username: String,
    #[serde(flatten)]
    password: PasswordHash,
}

impl StoredUser {
    fn user(&self) -> User {
        User {
            id: self.id.clone(),
            username: self.username.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// The persisted user has not been read yet.
    Loading,
    Anonymous,
    Authenticated(User),
}

pub struct AuthStore {
    kv: Arc<dyn KeyValueStore>,
    state: AuthState,
    iterations: u32,
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("state", &self.state)
            .field("iterations", &self.iterations)
            .finish()
    }
}

impl AuthStore {
    /// Create a store in the `Loading` state.
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            state: AuthState::Loading,
            iterations: DEFAULT_ITERATIONS,
        }
    }

    /// Override the PBKDF2 iteration count used for new accounts.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Create a store and immediately restore the persisted user.
    pub async fn open(kv: Arc<dyn KeyValueStore>, iterations: u32) -> Self {
        let mut store = Self::new(kv).with_iterations(iterations);
        store.restore().await;
        store
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn current_user(&self) -> Option<&User> {
        match &self.state {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == AuthState::Loading
    }

    /// Read the persisted user. Any failure ends in `Anonymous`.
    pub async fn restore(&mut self) {
        self.state = match self.kv.get_item(CURRENT_USER_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    info!(username = %user.username, "restored signed-in user");
                    AuthState::Authenticated(user)
                }
                Err(e) => {
                    warn!(error = %e, "failed to parse stored user");
                    AuthState::Anonymous
                }
            },
            Ok(None) => AuthState::Anonymous,
            Err(e) => {
                warn!(error = %e, "failed to load stored user");
                AuthState::Anonymous
            }
        };
    }

    /// Create an account and sign it in.
    pub async fn register(&mut self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::Validation("Username is required".into()));
        }
        if password.is_empty() {
            return Err(AuthError::Validation("Password is required".into()));
        }

        let previous = self.kv.get_item(USERS_KEY).await?;
        let mut users = parse_registry(previous.as_deref())?;
        if users.iter().any(|u| u.username == username) {
            warn!(username, "registration rejected: username taken");
            return Err(AuthError::UsernameTaken(username.to_string()));
        }

        let stored = StoredUser {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password: PasswordHash::new(password, self.iterations),
        };
        let user = stored.user();
        users.push(stored);

        let registry = serde_json::to_string(&users).map_err(|source| AuthError::Corrupt {
            key: USERS_KEY,
            source,
        })?;
        self.kv.set_item(USERS_KEY, &registry).await?;
        if let Err(e) = self.sign_in(user.clone()).await {
            // Put the registry back so the username stays free for a retry.
            let rollback = match &previous {
                Some(raw) => self.kv.set_item(USERS_KEY, raw).await,
                None => self.kv.remove_item(USERS_KEY).await,
            };
            if let Err(rollback_err) = rollback {
                warn!(error = %rollback_err, "failed to roll back user registry");
            }
            return Err(e);
        }

        info!(username, user_id = %user.id, "registered user");
        Ok(user)
    }

    /// Sign in with an existing account. On failure the state is untouched.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = username.trim();
        let users = self.load_registry().await?;
        let Some(user) = users
            .iter()
            .find(|u| u.username == username && u.password.verify(password))
            .map(StoredUser::user)
        else {
            warn!(username, "login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        self.sign_in(user.clone()).await?;
        info!(username, "logged in");
        Ok(user)
    }

    /// Forget the signed-in user.
    pub async fn logout(&mut self) -> Result<(), AuthError> {
        self.kv.remove_item(CURRENT_USER_KEY).await.map_err(|e| {
            warn!(error = %e, "failed to clear stored user");
            AuthError::from(e)
        })?;
        self.state = AuthState::Anonymous;
        info!("logged out");
        Ok(())
    }

    async fn sign_in(&mut self, user: User) -> Result<(), AuthError> {
        let raw = serde_json::to_string(&user).map_err(|source| AuthError::Corrupt {
            key: CURRENT_USER_KEY,
            source,
        })?;
        self.kv.set_item(CURRENT_USER_KEY, &raw).await.map_err(|e| {
            warn!(error = %e, "failed to persist signed-in user");
            AuthError::from(e)
        })?;
        self.state = AuthState::Authenticated(user);
        Ok(())
    }

    async fn load_registry(&self) -> Result<Vec<StoredUser>, AuthError> {
        let raw = self.kv.get_item(USERS_KEY).await?;
        parse_registry(raw.as_deref())
    }
}

fn parse_registry(raw: Option<&str>) -> Result<Vec<StoredUser>, AuthError> {
    match raw {
        Some(raw) => serde_json::from_str(raw).map_err(|source| AuthError::Corrupt {
            key: USERS_KEY,
            source,
        }),
        None => Ok(Vec::new()),
    }
}
