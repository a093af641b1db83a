//! Base record shared by every user role.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Identity and credentials common to admins, advertisers and clients.
///
/// Credentials are kept in plain text and compared by equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    id: i64,
    cpf: String,
    name: String,
    email: String,
    #[serde(skip_serializing, default)]
    password: String,
    logged_in: bool,
}

impl Account {
    /// Build an account. Use id `0` for a record that has not been stored yet.
    pub fn new(
        id: i64,
        cpf: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id,
            cpf: cpf.into(),
            name: name.into(),
            email: email.into(),
            password: password.into(),
            logged_in: false,
        }
    }

    /// Restore the logged-in flag read from storage.
    pub fn with_logged_in(mut self, logged_in: bool) -> Self {
        self.logged_in = logged_in;
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn cpf(&self) -> &str {
        &self.cpf
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// Rename the account. Blank names are rejected and leave the name unchanged.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::Empty("name".to_string()));
        }
        self.name = name;
        Ok(())
    }

    /// Check credentials and mark the account as logged in on success.
    ///
    /// Other sessions of the same account are not affected.
    pub fn login(&mut self, email: &str, password: &str) -> bool {
        if email == self.email && password == self.password {
            self.logged_in = true;
            return true;
        }
        false
    }

    pub fn logout(&mut self) {
        self.logged_in = false;
    }

    /// Apply `name`, `email` and `password` changes in iteration order.
    ///
    /// Portuguese column names (`nome`, `senha`) are accepted as aliases.
    /// Emails are trimmed before they are checked and stored. The first
    /// invalid entry aborts the call, but entries applied before it stay
    /// applied.
    pub fn update_info<I, K, V>(&mut self, fields: I) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in fields {
            match key.as_ref() {
                "name" | "nome" => self.set_name(value)?,
                "email" => {
                    let value = value.into();
                    let value = value.trim();
                    validate_email(value)?;
                    self.email = value.to_string();
                }
                "password" | "senha" => {
                    let value = value.into();
                    validate_password(&value)?;
                    self.password = value;
                }
                other => return Err(ValidationError::UnknownField(other.to_string())),
            }
        }
        Ok(())
    }
}

/// Validate a password against the minimum length.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let actual = password.chars().count();
    if actual < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
            actual,
        });
    }
    Ok(())
}

/// Validate an email address.
///
/// Checks:
/// - Contains exactly one @
/// - Has at least one character before @
/// - Has a dot after @, not at either end of the domain
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::Empty("email".to_string()));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(invalid_email("must contain exactly one @ symbol"));
    }

    let (local, domain) = (parts[0], parts[1]);

    if local.is_empty() {
        return Err(invalid_email("missing local part (before @)"));
    }

    if !domain.contains('.') {
        return Err(invalid_email("domain must contain at least one dot"));
    }

    if domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid_email("domain cannot start or end with a dot"));
    }

    Ok(())
}

fn invalid_email(reason: &str) -> ValidationError {
    ValidationError::Invalid {
        field: "email".to_string(),
        reason: reason.to_string(),
    }
}
