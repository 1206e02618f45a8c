use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::error::StoreResult;

/// Username → hex SHA-256 digest, backed by the credential file.
#[derive(Debug)]
pub struct Credentials {
    users: HashMap<String, String>,
    path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    AccountCreated,
    LoggedIn,
    WrongPassword,
    EmptyField,
}

/// Deterministic, unsalted digest. Matches the credential files the system
/// already has on disk; see DESIGN.md for the salting question.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{byte:02x}"));
    }
    hex
}

impl Credentials {
    /// Loads the credential file. Absent or malformed files start an empty
    /// store; the first successful registration writes a fresh one.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let users = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(path = %path.display(), %err, "credential file malformed, starting empty");
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Self { users, path }
    }

    /// Check-or-create: an unseen username registers, a seen one verifies.
    /// The store is only mutated (and persisted) on registration.
    pub fn authenticate(&mut self, username: &str, password: &str) -> StoreResult<AuthOutcome> {
        if username.trim().is_empty() || password.is_empty() {
            return Ok(AuthOutcome::EmptyField);
        }
        let digest = hash_password(password);
        match self.users.get(username) {
            None => {
                self.users.insert(username.to_string(), digest);
                self.save()?;
                info!(user = username, "account created");
                Ok(AuthOutcome::AccountCreated)
            }
            Some(stored) if *stored == digest => {
                info!(user = username, "login succeeded");
                Ok(AuthOutcome::LoggedIn)
            }
            Some(_) => {
                warn!(user = username, "login failed");
                Ok(AuthOutcome::WrongPassword)
            }
        }
    }

    fn save(&self) -> StoreResult<()> {
        fs::write(&self.path, serde_json::to_string_pretty(&self.users)?)?;
        Ok(())
    }

    #[cfg(test)]
    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }
}
