use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use validator::{ValidationError, ValidationErrors};

lazy_static! {
    static ref ALPHANUMERIC: Regex = Regex::new(r"[A-Za-z0-9]").unwrap();
    static ref UPPERCASE: Regex = Regex::new(r"[A-Z]").unwrap();
    static ref LOWERCASE: Regex = Regex::new(r"[a-z]").unwrap();
    static ref DIGIT: Regex = Regex::new(r"[0-9]").unwrap();
    static ref SPECIAL: Regex = Regex::new(r"[!@#$%^&*()]").unwrap();
}

const MIN_USERNAME_LENGTH: usize = 3;
const MIN_PASSWORD_LENGTH: usize = 8;

/// A username or password that does not meet the signup rules.
///
/// The `Display` output is shown to users verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    UsernameTooShort,
    UsernameWithoutAlphanumeric,
    PasswordTooShort,
    PasswordWithoutUppercase,
    PasswordWithoutLowercase,
    PasswordWithoutDigit,
    PasswordWithoutSpecial,
}

impl CredentialError {
    pub fn code(&self) -> &'static str {
        match self {
            CredentialError::UsernameTooShort => "username_too_short",
            CredentialError::UsernameWithoutAlphanumeric => "username_without_alphanumeric",
            CredentialError::PasswordTooShort => "password_too_short",
            CredentialError::PasswordWithoutUppercase => "password_without_uppercase",
            CredentialError::PasswordWithoutLowercase => "password_without_lowercase",
            CredentialError::PasswordWithoutDigit => "password_without_digit",
            CredentialError::PasswordWithoutSpecial => "password_without_special",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            CredentialError::UsernameTooShort => "Username must be at least 3 characters long",
            CredentialError::UsernameWithoutAlphanumeric => {
                "Username must contain at least one letter or number"
            }
            CredentialError::PasswordTooShort => "Password must be at least 8 characters long",
            CredentialError::PasswordWithoutUppercase => {
                "Password must contain at least one uppercase letter"
            }
            CredentialError::PasswordWithoutLowercase => {
                "Password must contain at least one lowercase letter"
            }
            CredentialError::PasswordWithoutDigit => "Password must contain at least one number",
            CredentialError::PasswordWithoutSpecial => {
                "Password must contain at least one special character"
            }
        }
    }
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl From<CredentialError> for ValidationError {
    fn from(error: CredentialError) -> ValidationError {
        let mut validation_error = ValidationError::new(error.code());
        validation_error.message = Some(Cow::Borrowed(error.message()));
        validation_error
    }
}

/// Checks a username: at least 3 characters, at least one ASCII letter or digit.
///
/// Other characters are allowed anywhere, so `"a!!"` passes.
pub fn validate_username(username: &str) -> Result<(), CredentialError> {
    if username.chars().count() < MIN_USERNAME_LENGTH {
        return Err(CredentialError::UsernameTooShort);
    }
    if !ALPHANUMERIC.is_match(username) {
        return Err(CredentialError::UsernameWithoutAlphanumeric);
    }
    Ok(())
}

/// Checks a password against the rules in priority order; the first failing
/// rule is the one reported.
pub fn validate_password(password: &str) -> Result<(), CredentialError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CredentialError::PasswordTooShort);
    }
    let rules: [(&Regex, CredentialError); 4] = [
        (&*UPPERCASE, CredentialError::PasswordWithoutUppercase),
        (&*LOWERCASE, CredentialError::PasswordWithoutLowercase),
        (&*DIGIT, CredentialError::PasswordWithoutDigit),
        (&*SPECIAL, CredentialError::PasswordWithoutSpecial),
    ];
    for (pattern, error) in rules {
        if !pattern.is_match(password) {
            return Err(error);
        }
    }
    Ok(())
}

/// Adapter for `#[validate(custom = ...)]` on the username field.
pub fn username_rules(username: &str) -> Result<(), ValidationError> {
    validate_username(username).map_err(ValidationError::from)
}

/// Adapter for `#[validate(custom = ...)]` on the password field.
pub fn password_rules(password: &str) -> Result<(), ValidationError> {
    validate_password(password).map_err(ValidationError::from)
}

/// Picks the message to show for a failed signup payload.
///
/// `ValidationErrors` is keyed by a hash map, so field order is fixed here:
/// username problems are reported before password problems.
pub fn first_message(errors: &ValidationErrors) -> Option<String> {
    let fields = errors.field_errors();
    let ordered = ["username", "password"]
        .iter()
        .filter_map(|name| fields.get(name).copied());
    ordered
        .chain(fields.values().copied())
        .flat_map(|field_errors| field_errors.iter())
        .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
}
