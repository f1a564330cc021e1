//! Persistent storage for the bearer token.
//!
//! Lookup order is the OS keychain, then `RAGDESK_AUTH__TOKEN`, then
//! `~/.ragdesk/credentials`. Writes go to the keychain when it accepts them
//! and to the credentials file otherwise.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::AuthError;

pub const TOKEN_ENV_VAR: &str = "RAGDESK_AUTH__TOKEN";
/// Overrides the keychain service name; tests use it to stay away from real
/// credentials.
const SERVICE_ENV_VAR: &str = "RAGDESK_KEYRING_SERVICE";
const DEFAULT_SERVICE: &str = "ragdesk";
const ACCOUNT: &str = "bearer-token";

/// Where a resolved token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Keyring,
    Env,
    File,
}

impl TokenSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keyring => "keyring",
            Self::Env => "env",
            Self::File => "file",
        }
    }
}

/// Save a token, preferring the keychain.
///
/// # Errors
///
/// Returns `AuthError::TokenStoreError` when the keychain is unusable and the
/// credentials file cannot be written either.
pub fn store(jwt: &str) -> Result<(), AuthError> {
    if let Some(entry) = keychain_entry() {
        match entry.set_password(jwt) {
            Ok(()) => return Ok(()),
            Err(error) => {
                tracing::warn!(%error, "keychain rejected token; writing credentials file");
            }
        }
    }
    CredentialsFile::locate()?.write(jwt)
}

/// First non-blank token found, with the tier it came from.
#[must_use]
pub fn load() -> Option<(String, TokenSource)> {
    let from_keychain = || keychain_entry()?.get_password().ok().and_then(non_blank);
    let from_env = || std::env::var(TOKEN_ENV_VAR).ok().and_then(non_blank);
    let from_file = || CredentialsFile::locate().ok()?.read();

    from_keychain()
        .map(|token| (token, TokenSource::Keyring))
        .or_else(|| from_env().map(|token| (token, TokenSource::Env)))
        .or_else(|| from_file().map(|token| (token, TokenSource::File)))
}

/// Forget the token in both the keychain and the credentials file. The env
/// tier is left alone.
///
/// # Errors
///
/// Returns `AuthError::TokenStoreError` if the credentials file exists but
/// cannot be removed.
pub fn delete() -> Result<(), AuthError> {
    if let Some(entry) = keychain_entry()
        && let Err(error) = entry.delete_credential()
    {
        tracing::debug!(%error, "no keychain entry removed");
    }
    CredentialsFile::locate()?.remove()
}

fn keychain_entry() -> Option<keyring::Entry> {
    let service = std::env::var(SERVICE_ENV_VAR).unwrap_or_else(|_| DEFAULT_SERVICE.to_string());
    keyring::Entry::new(&service, ACCOUNT)
        .inspect_err(|error| tracing::debug!(%error, "keychain unavailable"))
        .ok()
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Owner-only token file used when the keychain is not available.
struct CredentialsFile {
    path: PathBuf,
}

impl CredentialsFile {
    fn locate() -> Result<Self, AuthError> {
        let home = dirs::home_dir().ok_or_else(|| {
            AuthError::TokenStoreError("home directory not found, cannot store credentials".into())
        })?;
        Ok(Self::at(home.join(".ragdesk").join("credentials")))
    }

    const fn at(path: PathBuf) -> Self {
        Self { path }
    }

    fn read(&self) -> Option<String> {
        fs::read_to_string(&self.path).ok().and_then(non_blank)
    }

    fn write(&self, jwt: &str) -> Result<(), AuthError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| io_failure("create", dir, &e))?;
            if let Err(error) = set_mode(dir, 0o700) {
                tracing::warn!(%error, dir = %dir.display(), "could not restrict credentials dir");
            }
        }
        fs::write(&self.path, jwt).map_err(|e| io_failure("write", &self.path, &e))?;
        set_mode(&self.path, 0o600).map_err(|e| io_failure("chmod", &self.path, &e))
    }

    fn remove(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => {
                Err(io_failure("delete", &self.path, &e))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

fn io_failure(action: &str, path: &Path, error: &io::Error) -> AuthError {
    AuthError::TokenStoreError(format!("failed to {action} {}: {error}", path.display()))
}
