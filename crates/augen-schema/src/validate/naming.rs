use crate::MAX_IDENT_LEN;

// Identifiers that would collide with emitted code or Rust itself.
const RESERVED: &[&str] = &[
    "Self", "crate", "self", "super", "new", "try_new", "validate",
];

/// Ensure an identifier is non-empty, ASCII, within limits, and not
/// reserved.
pub(crate) fn validate_ident(ident: &str) -> Result<(), String> {
    if ident.is_empty() {
        return Err("ident is empty".to_string());
    }

    if ident.len() > MAX_IDENT_LEN {
        return Err(format!("ident '{ident}' exceeds max length {MAX_IDENT_LEN}"));
    }

    if !ident.is_ascii() {
        return Err(format!("ident '{ident}' must be ASCII"));
    }

    is_reserved(ident)?;

    Ok(())
}

fn is_reserved(word: &str) -> Result<(), String> {
    if RESERVED.contains(&word) {
        return Err(format!("the word '{word}' is reserved"));
    }

    Ok(())
}
