//! Field validators shared by the server and its clients.

use regex::Regex;
use std::{
    fmt::{Display, Formatter},
    sync::LazyLock,
};
use thiserror::Error;

pub const NAME_MAX_LEN: usize = 50;
pub const TITLE_MAX_LEN: usize = 200;
pub const BODY_MAX_LEN: usize = 5000;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));
static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]{3,20}$").expect("Invalid username regex"));
static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s\-]{2,50}$").expect("Invalid name regex"));

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Error)]
pub enum Violation {
    #[error(
        "Name must be 2-50 characters long and contain only letters, spaces, and hyphens"
    )]
    Name,
    #[error(
        "Username must be 3-20 characters long and contain only letters, numbers, and underscores"
    )]
    Username,
    #[error("Please enter a valid email address")]
    Email,
    #[error("Title is required and must be less than 200 characters")]
    Title,
    #[error("Content must be less than 5000 characters")]
    Body,
}

/// Every rule a payload violated, in the order the fields were checked.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn check(&mut self, valid: bool, violation: Violation) {
        if !valid {
            self.0.push(violation);
        }
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }

    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            Display::fmt(violation, f)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

#[must_use]
pub fn is_valid_username(username: &str) -> bool {
    USERNAME_REGEX.is_match(username)
}

/// Letters, spaces and hyphens only. Surrounding whitespace is ignored.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    NAME_REGEX.is_match(name.trim())
}

#[must_use]
pub fn is_valid_title(title: &str) -> bool {
    let len = title.trim().chars().count();
    len > 0 && len <= TITLE_MAX_LEN
}

#[must_use]
pub fn is_valid_body(body: &str) -> bool {
    body.chars().count() <= BODY_MAX_LEN
}

pub fn validate_user(name: &str, username: &str, email: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    errors.check(is_valid_name(name), Violation::Name);
    errors.check(is_valid_username(username), Violation::Username);
    errors.check(is_valid_email(email), Violation::Email);
    errors.into_result()
}

pub fn validate_post(title: &str, body: Option<&str>) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    errors.check(is_valid_title(title), Violation::Title);
    if let Some(body) = body {
        errors.check(is_valid_body(body), Violation::Body);
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use crate::validate::{
        BODY_MAX_LEN, NAME_MAX_LEN, TITLE_MAX_LEN, Violation, is_valid_body, is_valid_email,
        is_valid_name, is_valid_title, is_valid_username, validate_post, validate_user,
    };

    #[test]
    fn emails() {
        let legal = ["Sincere@april.biz", "Shanna@melissa.tv", "a@b.c"];
        let illegal = ["", "plain", "a@b", "a b@c.d", "@c.d", "a@@b.c"];

        for email in legal {
            assert!(is_valid_email(email), "{email}");
        }
        for email in illegal {
            assert!(!is_valid_email(email), "{email}");
        }
    }

    #[test]
    fn usernames() {
        let longest = "x".repeat(20);
        let too_long = "x".repeat(21);
        let legal = ["Bret", "Antonette", "abc", "user_01", longest.as_str()];
        let illegal = ["ab", "has space", "dash-ed", too_long.as_str()];

        for username in legal {
            assert!(is_valid_username(username), "{username}");
        }
        for username in illegal {
            assert!(!is_valid_username(username), "{username}");
        }
    }

    #[test]
    fn names() {
        assert!(is_valid_name("Leanne Graham"));
        assert!(is_valid_name("  Jean-Luc  "));
        assert!(is_valid_name(&"a".repeat(NAME_MAX_LEN)));
        assert!(!is_valid_name("J"));
        assert!(!is_valid_name("R2D2"));
        assert!(!is_valid_name(&"a".repeat(NAME_MAX_LEN + 1)));
    }

    #[test]
    fn titles_and_bodies() {
        assert!(is_valid_title("T"));
        assert!(is_valid_title(&"t".repeat(TITLE_MAX_LEN)));
        assert!(!is_valid_title(""));
        assert!(!is_valid_title(" \n "));
        assert!(!is_valid_title(&"t".repeat(TITLE_MAX_LEN + 1)));

        assert!(is_valid_body(""));
        assert!(is_valid_body(&"b".repeat(BODY_MAX_LEN)));
        assert!(!is_valid_body(&"b".repeat(BODY_MAX_LEN + 1)));
    }

    #[test]
    fn collects_every_violation() {
        assert!(validate_user("Leanne Graham", "Bret", "Sincere@april.biz").is_ok());

        let errors = validate_user("L", "B", "nope").unwrap_err();
        assert_eq!(
            errors.violations(),
            [Violation::Name, Violation::Username, Violation::Email]
        );
        assert_eq!(
            errors.to_string(),
            "Name must be 2-50 characters long and contain only letters, spaces, and hyphens; \
            Username must be 3-20 characters long and contain only letters, numbers, and \
            underscores; Please enter a valid email address"
        );

        let long_body = "b".repeat(BODY_MAX_LEN + 1);
        let errors = validate_post("", Some(&long_body)).unwrap_err();
        assert_eq!(errors.violations(), [Violation::Title, Violation::Body]);
        assert!(validate_post("T", None).is_ok());
    }
}
