use std::collections::HashMap;
use std::fmt;

use tracing::warn;

use crate::config::AuthConfig;
use crate::error::AppError;

/// Fixed role set. There is no permission model beyond these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Valet,
    Desk,
    Demo,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Valet => "valet",
            Role::Desk => "desk",
            Role::Demo => "demo",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A statically provisioned principal. Built once at startup, never
/// created or destroyed at runtime.
#[derive(Debug, Clone)]
pub struct Account {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Credential verifier over the fixed account table.
pub struct AuthService {
    accounts: HashMap<String, Account>,
    // Verified against when the username is unknown, so a lookup miss
    // costs the same as a password mismatch and cannot be used to
    // enumerate accounts by timing.
    dummy_hash: String,
}

impl AuthService {
    /// Build the account table from configured secrets, hashing each once.
    /// An empty secret is a startup configuration error, not a panic.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AppError> {
        let provisioned = [
            ("valet", Role::Valet, config.valet_password.as_str()),
            ("desk", Role::Desk, config.desk_password.as_str()),
            ("demo", Role::Demo, config.demo_password.as_str()),
        ];

        let mut accounts = HashMap::new();
        for (username, role, secret) in provisioned {
            if secret.is_empty() {
                return Err(AppError::ConfigError(format!(
                    "no password configured for account '{}'",
                    username
                )));
            }
            accounts.insert(
                username.to_string(),
                Account {
                    username: username.to_string(),
                    password_hash: hash_password(secret)?,
                    role,
                },
            );
        }

        let dummy_hash = hash_password("dummy-comparison-target")?;

        Ok(Self { accounts, dummy_hash })
    }

    /// Pure predicate: `Some(account)` only on an exact credential match.
    /// Unknown usernames still pay for one bcrypt comparison.
    pub fn verify(&self, username: &str, password: &str) -> Option<&Account> {
        match self.accounts.get(username) {
            Some(account) => {
                if check_password(password, &account.password_hash) {
                    Some(account)
                } else {
                    None
                }
            }
            None => {
                let _ = check_password(password, &self.dummy_hash);
                None
            }
        }
    }

    pub fn account(&self, username: &str) -> Option<&Account> {
        self.accounts.get(username)
    }
}

/// Salted, versioned bcrypt digest with the default work factor.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::ConfigError(format!("password hashing failed: {}", e)))
}

/// bcrypt's own comparator; never a byte-wise equality on raw secrets.
pub fn check_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(matched) => matched,
        Err(e) => {
            warn!("Password verification against stored hash failed: {}", e);
            false
        }
    }
}
