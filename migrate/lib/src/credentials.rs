//! Login credentials for ekorre.
//!
//! The pipelines never prompt directly; they ask a [`CredentialsProvider`],
//! which lets the CLI choose between the environment and an interactive
//! prompt and lets tests hand in fixed values.

use inquire::{Password, PasswordDisplayMode, Text};

use crate::error::CredentialsError;

/// Environment variable holding the ekorre username.
pub const USERNAME_ENV: &str = "EKORRE_USERNAME";
/// Environment variable holding the ekorre password.
pub const PASSWORD_ENV: &str = "EKORRE_PASSWORD";

/// A username/password pair for the `login` mutation.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Source of credentials.
pub trait CredentialsProvider {
    /// Produces the credentials to log in with.
    ///
    /// ## Errors
    ///
    /// Returns an error if the credentials cannot be obtained.
    fn credentials(&self) -> Result<Credentials, CredentialsError>;
}

/// Always returns the same credentials.
#[derive(Debug, Clone)]
pub struct StaticCredentials(pub Credentials);

impl CredentialsProvider for StaticCredentials {
    fn credentials(&self) -> Result<Credentials, CredentialsError> {
        Ok(self.0.clone())
    }
}

/// Reads `EKORRE_USERNAME` and `EKORRE_PASSWORD`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl EnvCredentials {
    /// Whether both variables are present.
    pub fn is_available() -> bool {
        std::env::var_os(USERNAME_ENV).is_some() && std::env::var_os(PASSWORD_ENV).is_some()
    }
}

impl CredentialsProvider for EnvCredentials {
    fn credentials(&self) -> Result<Credentials, CredentialsError> {
        let username =
            std::env::var(USERNAME_ENV).map_err(|_| CredentialsError::MissingEnv(USERNAME_ENV))?;
        let password =
            std::env::var(PASSWORD_ENV).map_err(|_| CredentialsError::MissingEnv(PASSWORD_ENV))?;
        Ok(Credentials { username, password })
    }
}

/// Asks for a username and a masked password on the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptCredentials;

impl CredentialsProvider for PromptCredentials {
    fn credentials(&self) -> Result<Credentials, CredentialsError> {
        let username = Text::new("Username:").prompt()?;
        let password = Password::new("Password:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()?;
        Ok(Credentials { username, password })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    /// Sets or removes an environment variable, restoring the previous value
    /// on drop. Only use from `#[serial_test::serial]` tests.
    struct ScopedEnv {
        key: &'static str,
        original: Option<String>,
    }

    impl ScopedEnv {
        fn set(key: &'static str, value: Option<&str>) -> Self {
            let original = env::var(key).ok();
            match value {
                Some(value) => unsafe { env::set_var(key, value) },
                None => unsafe { env::remove_var(key) },
            }
            Self { key, original }
        }
    }

    impl Drop for ScopedEnv {
        fn drop(&mut self) {
            match &self.original {
                Some(val) => unsafe { env::set_var(self.key, val) },
                None => unsafe { env::remove_var(self.key) },
            }
        }
    }

    #[test]
    #[serial_test::serial]
    fn env_provider_reads_both_variables() {
        let _user = ScopedEnv::set(USERNAME_ENV, Some("aa0000bb-s"));
        let _pass = ScopedEnv::set(PASSWORD_ENV, Some("test"));

        assert!(EnvCredentials::is_available());
        let creds = EnvCredentials.credentials().unwrap();
        assert_eq!(creds, Credentials::new("aa0000bb-s", "test"));
    }

    #[test]
    #[serial_test::serial]
    fn env_provider_reports_missing_password() {
        let _user = ScopedEnv::set(USERNAME_ENV, Some("aa0000bb-s"));
        let _pass = ScopedEnv::set(PASSWORD_ENV, None);

        assert!(!EnvCredentials::is_available());
        let err = EnvCredentials.credentials().unwrap_err();
        assert!(matches!(err, CredentialsError::MissingEnv(PASSWORD_ENV)));
    }

    #[test]
    #[serial_test::serial]
    fn env_provider_reports_missing_username_first() {
        let _user = ScopedEnv::set(USERNAME_ENV, None);
        let _pass = ScopedEnv::set(PASSWORD_ENV, None);

        let err = EnvCredentials.credentials().unwrap_err();
        assert!(matches!(err, CredentialsError::MissingEnv(USERNAME_ENV)));
        assert_eq!(err.to_string(), "environment variable EKORRE_USERNAME is not set");
    }

    #[test]
    fn static_provider_returns_its_credentials() {
        let provider = StaticCredentials(Credentials::new("aa0000bb-s", "test"));
        let creds = provider.credentials().unwrap();
        assert_eq!(creds.username, "aa0000bb-s");
        assert_eq!(creds.password, "test");
    }

    #[test]
    fn debug_output_hides_password() {
        let creds = Credentials::new("aa0000bb-s", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("aa0000bb-s"));
        assert!(!debug.contains("hunter2"));
    }
}
