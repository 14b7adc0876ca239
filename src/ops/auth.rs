//! Password gate for edit operations.
//!
//! One shared password, stored only as a SHA-256 hex digest in the durable
//! store. A successful login writes a 24 hour session record into a separate
//! session-scoped store. Mutating store operations take an [`Authorized`]
//! token, which only this module can construct.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::io::kv::{self, KvStore, StorageError};

pub const PASSWORD_HASH_KEY: &str = "auth_password_hash";
pub const SESSION_KEY: &str = "auth_session";

/// SHA-256 of `admin123`
pub const DEFAULT_PASSWORD_HASH: &str =
    "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9";

pub const SESSION_TTL_MS: i64 = 24 * 60 * 60 * 1000;
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("wrong password")]
    WrongPassword,
    #[error("new password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The `auth_session` record, in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub timestamp: i64,
    pub expires: i64,
}

impl Session {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.expires)
    }
}

/// Proof of a live session, required by every gated mutation.
///
/// Obtain it right before mutating; it is not meant to be kept around.
#[derive(Debug)]
pub struct Authorized {
    _private: (),
}

impl Authorized {
    fn grant() -> Self {
        Authorized { _private: () }
    }
}

/// Result of submitting one password attempt.
#[derive(Debug)]
pub enum Challenge {
    Granted(Authorized),
    /// Nothing was entered; the prompt stays open
    Empty,
    /// Wrong password; the input is cleared for another try
    Rejected,
}

impl Challenge {
    /// Error line the prompt shows after this attempt
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Challenge::Granted(_) => None,
            Challenge::Empty => Some("Please enter a password"),
            Challenge::Rejected => Some("Wrong password, try again"),
        }
    }
}

/// Something that can ask the user for a password.
pub trait PasswordPrompt {
    /// Show the prompt, with `error` from the previous attempt if any.
    /// `None` means the user cancelled.
    fn ask(&mut self, error: Option<&str>) -> Option<String>;
}

pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// The gate. `D` is the durable store holding the hash, `S` the
/// session-scoped store holding `auth_session`.
#[derive(Debug)]
pub struct AuthGate<D: KvStore, S: KvStore> {
    durable: D,
    session: S,
}

impl<D: KvStore, S: KvStore> AuthGate<D, S> {
    /// Open the gate, seeding the default hash when none is stored.
    pub fn new(mut durable: D, session: S) -> Result<Self, StorageError> {
        if kv::load::<String>(&durable, PASSWORD_HASH_KEY)?.is_none() {
            kv::save(&mut durable, PASSWORD_HASH_KEY, DEFAULT_PASSWORD_HASH)?;
            log::info!("event=auth_seed status=ok");
        }
        Ok(AuthGate { durable, session })
    }

    fn stored_hash(&self) -> Result<String, StorageError> {
        Ok(kv::load::<String>(&self.durable, PASSWORD_HASH_KEY)?
            .unwrap_or_else(|| DEFAULT_PASSWORD_HASH.to_string()))
    }

    /// Does `password` match the stored hash?
    pub fn verify(&self, password: &str) -> Result<bool, StorageError> {
        Ok(hash_password(password) == self.stored_hash()?)
    }

    pub fn login(&mut self, password: &str) -> Result<(), AuthError> {
        self.login_at(password, Utc::now())
    }

    pub fn login_at(&mut self, password: &str, now: DateTime<Utc>) -> Result<(), AuthError> {
        if !self.verify(password)? {
            log::info!("event=login status=rejected");
            return Err(AuthError::WrongPassword);
        }
        let timestamp = now.timestamp_millis();
        let session = Session {
            timestamp,
            expires: timestamp + SESSION_TTL_MS,
        };
        kv::save(&mut self.session, SESSION_KEY, &session)?;
        log::info!("event=login status=ok");
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.session.remove(SESSION_KEY)?;
        log::info!("event=logout status=ok");
        Ok(())
    }

    /// The current session record, if one parses. Expiry is not checked.
    pub fn session(&self) -> Option<Session> {
        kv::load(&self.session, SESSION_KEY).ok().flatten()
    }

    pub fn is_authenticated(&mut self) -> bool {
        self.is_authenticated_at(Utc::now())
    }

    /// A session is live while `now <= expires`. An expired record is
    /// removed; a missing or corrupt one reads as logged out.
    pub fn is_authenticated_at(&mut self, now: DateTime<Utc>) -> bool {
        let Some(session) = self.session() else {
            return false;
        };
        if now.timestamp_millis() > session.expires {
            log::info!("event=session_expired status=cleared");
            if let Err(e) = self.session.remove(SESSION_KEY) {
                log::warn!("event=session_clear status=failed error={}", e);
            }
            return false;
        }
        true
    }

    /// A token if the session is live, without prompting.
    pub fn authorize(&mut self) -> Option<Authorized> {
        self.authorize_at(Utc::now())
    }

    pub fn authorize_at(&mut self, now: DateTime<Utc>) -> Option<Authorized> {
        self.is_authenticated_at(now).then(Authorized::grant)
    }

    /// Handle one password submission from an interactive prompt.
    pub fn challenge(&mut self, input: &str) -> Result<Challenge, StorageError> {
        if input.is_empty() {
            return Ok(Challenge::Empty);
        }
        match self.login(input) {
            Ok(()) => Ok(Challenge::Granted(Authorized::grant())),
            Err(AuthError::Storage(e)) => Err(e),
            Err(_) => Ok(Challenge::Rejected),
        }
    }

    /// A token for a live session, otherwise ask through `prompt` until
    /// the password is right or the user cancels (`Ok(None)`).
    pub fn require_auth(
        &mut self,
        prompt: &mut impl PasswordPrompt,
    ) -> Result<Option<Authorized>, StorageError> {
        if let Some(token) = self.authorize() {
            return Ok(Some(token));
        }
        let mut error = None;
        while let Some(input) = prompt.ask(error) {
            match self.challenge(&input)? {
                Challenge::Granted(token) => return Ok(Some(token)),
                other => error = other.message(),
            }
        }
        Ok(None)
    }

    /// Replace the password. Works with or without a live session.
    pub fn change_password(&mut self, old: &str, new: &str) -> Result<(), AuthError> {
        if !self.verify(old)? {
            return Err(AuthError::WrongPassword);
        }
        if new.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::PasswordTooShort);
        }
        kv::save(&mut self.durable, PASSWORD_HASH_KEY, &hash_password(new))?;
        log::info!("event=password_change status=ok");
        Ok(())
    }

    /// Restore the default password and end the session.
    pub fn reset_password(&mut self) -> Result<(), StorageError> {
        kv::save(&mut self.durable, PASSWORD_HASH_KEY, DEFAULT_PASSWORD_HASH)?;
        self.logout()?;
        log::info!("event=password_reset status=ok");
        Ok(())
    }
}

/// A gate over two fresh in-memory stores, already logged in.
#[cfg(test)]
pub(crate) fn test_gate() -> AuthGate<kv::MemoryStore, kv::MemoryStore> {
    let mut gate = AuthGate::new(kv::MemoryStore::new(), kv::MemoryStore::new()).unwrap();
    gate.login("admin123").unwrap();
    gate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::kv::MemoryStore;
    use chrono::Duration;

    fn gate() -> (AuthGate<MemoryStore, MemoryStore>, MemoryStore) {
        let session = MemoryStore::new();
        let gate = AuthGate::new(MemoryStore::new(), session.clone()).unwrap();
        (gate, session)
    }

    /// Replays a fixed list of answers; `None` once exhausted.
    struct Scripted {
        answers: Vec<Option<String>>,
        errors_seen: Vec<Option<String>>,
    }

    impl Scripted {
        fn new(answers: &[Option<&str>]) -> Self {
            Scripted {
                answers: answers.iter().rev().map(|a| a.map(String::from)).collect(),
                errors_seen: Vec::new(),
            }
        }
    }

    impl PasswordPrompt for Scripted {
        fn ask(&mut self, error: Option<&str>) -> Option<String> {
            self.errors_seen.push(error.map(String::from));
            self.answers.pop().flatten()
        }
    }

    #[test]
    fn default_hash_is_admin123() {
        assert_eq!(hash_password("admin123"), DEFAULT_PASSWORD_HASH);
        let (gate, _) = gate();
        assert!(gate.verify("admin123").unwrap());
        assert!(!gate.verify("admin1234").unwrap());
    }

    #[test]
    fn login_then_authenticated_until_expiry() {
        let (mut gate, session) = gate();
        let t0 = Utc::now();
        gate.login_at("admin123", t0).unwrap();
        assert!(gate.is_authenticated_at(t0));
        assert!(gate.is_authenticated_at(t0 + Duration::milliseconds(SESSION_TTL_MS)));

        assert!(!gate.is_authenticated_at(t0 + Duration::milliseconds(SESSION_TTL_MS + 1)));
        assert!(!session.contains(SESSION_KEY));
    }

    #[test]
    fn wrong_password_creates_no_session() {
        let (mut gate, session) = gate();
        assert!(matches!(gate.login("nope"), Err(AuthError::WrongPassword)));
        assert!(!session.contains(SESSION_KEY));
        assert!(gate.authorize().is_none());
    }

    #[test]
    fn corrupt_session_reads_as_logged_out() {
        let (mut gate, mut session) = gate();
        session.set_raw(SESSION_KEY, "garbage").unwrap();
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn logout_clears_session() {
        let (mut gate, session) = gate();
        gate.login("admin123").unwrap();
        gate.logout().unwrap();
        assert!(!session.contains(SESSION_KEY));
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn change_password_checks_old_then_length() {
        let (mut gate, _) = gate();
        assert!(matches!(
            gate.change_password("bad", "longenough"),
            Err(AuthError::WrongPassword)
        ));
        assert!(matches!(
            gate.change_password("admin123", "short"),
            Err(AuthError::PasswordTooShort)
        ));
        gate.change_password("admin123", "s3cret!").unwrap();
        assert!(gate.verify("s3cret!").unwrap());
        assert!(!gate.verify("admin123").unwrap());
    }

    #[test]
    fn password_length_counts_characters() {
        let (mut gate, _) = gate();
        // six characters, eighteen bytes
        gate.change_password("admin123", "密码密码密码").unwrap();
        assert!(gate.verify("密码密码密码").unwrap());
    }

    #[test]
    fn reset_restores_default_and_logs_out() {
        let (mut gate, session) = gate();
        gate.change_password("admin123", "another-one").unwrap();
        gate.login("another-one").unwrap();
        gate.reset_password().unwrap();
        assert!(gate.verify("admin123").unwrap());
        assert!(!session.contains(SESSION_KEY));
    }

    #[test]
    fn existing_hash_is_not_reseeded() {
        let mut durable = MemoryStore::new();
        kv::save(&mut durable, PASSWORD_HASH_KEY, &hash_password("kept-pass")).unwrap();
        let gate = AuthGate::new(durable, MemoryStore::new()).unwrap();
        assert!(gate.verify("kept-pass").unwrap());
    }

    #[test]
    fn require_auth_skips_prompt_when_logged_in() {
        let (mut gate, _) = gate();
        gate.login("admin123").unwrap();
        let mut prompt = Scripted::new(&[]);
        assert!(gate.require_auth(&mut prompt).unwrap().is_some());
        assert!(prompt.errors_seen.is_empty());
    }

    #[test]
    fn require_auth_retries_until_correct() {
        let (mut gate, _) = gate();
        let mut prompt = Scripted::new(&[Some(""), Some("wrong"), Some("admin123")]);
        assert!(gate.require_auth(&mut prompt).unwrap().is_some());
        assert_eq!(
            prompt.errors_seen,
            vec![
                None,
                Some("Please enter a password".to_string()),
                Some("Wrong password, try again".to_string()),
            ]
        );
        assert!(gate.is_authenticated());
    }

    #[test]
    fn require_auth_cancel_resolves_none() {
        let (mut gate, _) = gate();
        let mut prompt = Scripted::new(&[Some("wrong"), None]);
        assert!(gate.require_auth(&mut prompt).unwrap().is_none());
        assert!(!gate.is_authenticated());
    }
}
