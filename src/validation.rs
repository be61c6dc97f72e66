//! Pure field validators for user-supplied strings.
//!
//! Each predicate is stateless and side-effect free; callers are
//! responsible for turning a `false` into a field-specific error.
//! Regexes are compiled once via `once_cell`.

use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9]{3,20}$").expect("username regex")
});

/// RFC-lite address check; full RFC 5322 parsing is not the goal here.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}\])|(([a-zA-Z\-\d]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("email regex")
});

static PERSON_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z\s'èéòàù]{3,20}$").expect("person name regex")
});

/// Filesystem-safe folder charset: word chars, parentheses, brackets,
/// hyphen, dot.
static FOLDER_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\w()\[\]\-.]{1,50}$").expect("folder name regex")
});

const PASSWORD_SYMBOLS: &str = "@$!%*#?&";

/// 3–20 ASCII alphanumeric characters.
pub fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

/// RFC-lite format, at most 50 characters.
pub fn is_valid_email(email: &str) -> bool {
    email.chars().count() <= 50 && EMAIL_RE.is_match(email)
}

/// 8–50 characters from letters, digits and `@$!%*#?&.`, containing at
/// least one letter and one digit. When `require_symbol` is set (policy
/// option) at least one of `@$!%*#?&` must also be present.
///
/// The `regex` crate has no lookaheads, so the containment rules are
/// checked directly instead of porting a lookahead pattern.
pub fn is_valid_password(password: &str, require_symbol: bool) -> bool {
    let len = password.chars().count();
    if !(8..=50).contains(&len) {
        return false;
    }
    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(c) || c == '.');
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let symbol_ok = !require_symbol || password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));
    allowed && has_letter && has_digit && symbol_ok
}

/// 3–20 letters, spaces or apostrophes; common accented letters allowed.
pub fn is_valid_name(name: &str) -> bool {
    PERSON_NAME_RE.is_match(name)
}

pub fn is_valid_surname(surname: &str) -> bool {
    PERSON_NAME_RE.is_match(surname)
}

/// Non-empty, at most 50 characters, restricted charset.
pub fn is_valid_folder_name(name: &str) -> bool {
    FOLDER_NAME_RE.is_match(name)
}

/// Non-empty, at most 50 characters.
pub fn is_valid_subfolder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().count() <= 50
}

/// Non-empty, at most 50 characters.
pub fn is_valid_document_name(name: &str) -> bool {
    !name.is_empty() && name.chars().count() <= 50
}

/// Non-empty, at most 10 characters.
pub fn is_valid_format(format: &str) -> bool {
    !format.is_empty() && format.chars().count() <= 10
}

/// Non-empty, at most 200 characters.
pub fn is_valid_summary(summary: &str) -> bool {
    !summary.is_empty() && summary.chars().count() <= 200
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_accepts_alphanumeric_within_bounds() {
        assert!(is_valid_username("abc"));
        assert!(is_valid_username("alice42"));
        assert!(is_valid_username("A1b2C3d4E5f6G7h8I9j0"));
    }

    #[test]
    fn username_rejects_short_long_and_symbols() {
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("a".repeat(21).as_str()));
        assert!(!is_valid_username("al ice"));
        assert!(!is_valid_username("al-ice"));
        assert!(!is_valid_username("alice@"));
    }

    #[test]
    fn email_format_and_length() {
        assert!(is_valid_email("alice@x.com"));
        assert!(is_valid_email("a.b-c@sub.example.org"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("alice@x"));
        let long_local = format!("{}@example.com", "a".repeat(60));
        assert!(!is_valid_email(&long_local));
    }

    #[test]
    fn password_needs_letter_and_digit() {
        assert!(is_valid_password("secret12", false));
        assert!(is_valid_password("S3cret!pass", false));
        assert!(!is_valid_password("short1", false));
        assert!(!is_valid_password("onlyletters", false));
        assert!(!is_valid_password("12345678", false));
        assert!(!is_valid_password("has spaces 1", false));
        assert!(!is_valid_password(&"a1".repeat(26), false));
    }

    #[test]
    fn password_symbol_policy_is_optional() {
        assert!(is_valid_password("secret12", false));
        assert!(!is_valid_password("secret12", true));
        assert!(is_valid_password("secret12!", true));
    }

    #[test]
    fn person_names_allow_spaces_apostrophes_and_accents() {
        assert!(is_valid_name("Alice"));
        assert!(is_valid_name("De Luca"));
        assert!(is_valid_name("D'Angelo"));
        assert!(is_valid_name("Niccolò"));
        assert!(!is_valid_name("Al"));
        assert!(!is_valid_name("Alice42"));
    }

    #[test]
    fn folder_names_are_filesystem_safe() {
        assert!(is_valid_folder_name("Work"));
        assert!(is_valid_folder_name("Invoices-2024"));
        assert!(is_valid_folder_name("reports.(final)[v2]"));
        assert!(!is_valid_folder_name(""));
        assert!(!is_valid_folder_name("a/b"));
        assert!(!is_valid_folder_name(&"x".repeat(51)));
    }

    #[test]
    fn subfolder_and_document_fields_check_length_only() {
        assert!(is_valid_subfolder_name("2024"));
        assert!(is_valid_subfolder_name("any name with spaces"));
        assert!(!is_valid_subfolder_name(""));
        assert!(!is_valid_subfolder_name(&"x".repeat(51)));

        assert!(is_valid_document_name("report"));
        assert!(!is_valid_document_name(""));

        assert!(is_valid_format("pdf"));
        assert!(!is_valid_format(""));
        assert!(!is_valid_format("morethanten!"));

        assert!(is_valid_summary("Q1 report"));
        assert!(!is_valid_summary(""));
        assert!(!is_valid_summary(&"s".repeat(201)));
    }
}
