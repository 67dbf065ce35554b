//! Field sanitizers for untrusted import rows.
//!
//! Each sanitizer is a small pure function over one raw field. Required
//! fields return `Result<T, ValidationError>`; optional metadata fields
//! return `Option<T>` and drop invalid input instead of rejecting the row.
//!
//! The pattern denylist on names is defense-in-depth only. Every query in
//! `langmap_db` binds its parameters.

use std::sync::LazyLock;

use regex::Regex;

// ── Constants ────────────────────────────────────────────────────────

/// Maximum length of a display name, in characters.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of an endonym, in characters.
pub const MAX_ENDONYM_LENGTH: usize = 200;

/// SQL metacharacter sequences rejected in names (matched case-insensitively
/// against the whitespace-collapsed text).
const SUSPICIOUS_NAME_PATTERN: &str = r"(?i)'|;|--|/\*|\*/|xp_|\sor\s|\sand\s";

static SUSPICIOUS_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SUSPICIOUS_NAME_PATTERN).expect("valid regex"));

static ISO_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{3}$").expect("valid regex"));

// ── Errors ───────────────────────────────────────────────────────────

/// Why a required field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name is required")]
    EmptyInput,

    #[error("Name exceeds maximum length of {max} characters")]
    TooLong { max: usize },

    #[error("Name contains invalid characters")]
    SuspiciousPattern,
}

// ── Sanitizers ───────────────────────────────────────────────────────

/// Normalize and validate a display name.
///
/// Trims the input and collapses internal whitespace runs to a single
/// space, then rejects empty, over-long, or suspicious values.
pub fn sanitize_name(raw: Option<&str>) -> Result<String, ValidationError> {
    let raw = raw.ok_or(ValidationError::EmptyInput)?;
    let name = collapse_whitespace(raw);

    if name.is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            max: MAX_NAME_LENGTH,
        });
    }
    if SUSPICIOUS_NAME_RE.is_match(&name) {
        return Err(ValidationError::SuspiciousPattern);
    }

    Ok(name)
}

/// Normalize an ISO 639-3 code. Anything other than exactly three ASCII
/// letters yields `None`.
pub fn sanitize_iso_code(raw: Option<&str>) -> Option<String> {
    let code = raw?.trim().to_lowercase();
    ISO_CODE_RE.is_match(&code).then_some(code)
}

/// Normalize a native-script name. No pattern checks are applied since
/// endonyms routinely use non-Latin scripts and punctuation.
pub fn sanitize_endonym(raw: Option<&str>) -> Option<String> {
    let endonym = collapse_whitespace(raw?);
    if endonym.is_empty() || endonym.chars().count() > MAX_ENDONYM_LENGTH {
        return None;
    }
    Some(endonym)
}

// ── Private helpers ──────────────────────────────────────────────────

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Tests ────────────────────────────────────────────────────────────
