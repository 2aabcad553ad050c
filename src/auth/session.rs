use std::collections::HashMap;

use rand::rngs::OsRng;
use rand::RngCore;
use tokio::sync::RwLock;
use tracing::error;

use crate::error::{AppError, AuthError};

const TOKEN_BYTES: usize = 32;

/// Generate a session token: 32 bytes from the OS CSPRNG, hex-encoded to
/// 64 lowercase characters. RNG failure fails the request, not the process.
fn generate_token() -> Result<String, AuthError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))?;
    Ok(hex::encode(bytes))
}

/// All live sessions, token -> username. Constructor-built and shared via
/// `AppState` so tests get isolated stores instead of process-wide state.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a session for `username` and return its token.
    pub async fn create(&self, username: &str) -> Result<String, AppError> {
        let token = generate_token()?;

        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&token) {
            // Negligible probability with 256 bits of entropy. If it does
            // happen, overwriting another live session would be worse than
            // failing this login.
            error!("Session token collision detected");
            return Err(AuthError::TokenGeneration("token collision".to_string()).into());
        }
        sessions.insert(token.clone(), username.to_string());
        Ok(token)
    }

    /// Resolve a token to its username. Unknown, empty or malformed tokens
    /// resolve to `None`, never an error.
    pub async fn lookup(&self, token: &str) -> Option<String> {
        self.sessions.read().await.get(token).cloned()
    }

    /// Remove a session. No-op if the token is already absent.
    pub async fn destroy(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
