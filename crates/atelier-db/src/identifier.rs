//! Identifier validation for table names interpolated into SQL.

use atelier_core::{Error, Result};

/// PostgreSQL truncates identifiers beyond this many bytes.
pub const MAX_IDENTIFIER_LEN: usize = 63;

const RESERVED_KEYWORDS: &[&str] = &[
    "pg_catalog",
    "information_schema",
    "select",
    "insert",
    "update",
    "delete",
    "drop",
    "create",
    "alter",
    "table",
    "grant",
    "revoke",
    "truncate",
    "user",
];

/// Validate an unquoted PostgreSQL identifier.
///
/// Accepts `[A-Za-z_][A-Za-z0-9_]*`, at most 63 bytes, not a reserved word.
///
/// ```
/// use atelier_db::validate_identifier;
///
/// assert!(validate_identifier("schema_migrations").is_ok());
/// assert!(validate_identifier("1st_table").is_err());
/// assert!(validate_identifier("").is_err());
/// ```
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidInput(
            "Identifier cannot be empty".to_string(),
        ));
    }

    if name.len() > MAX_IDENTIFIER_LEN {
        return Err(Error::InvalidInput(format!(
            "Identifier exceeds {} character limit: {} characters",
            MAX_IDENTIFIER_LEN,
            name.len()
        )));
    }

    if let Some(first) = name.chars().next() {
        if !first.is_ascii_alphabetic() && first != '_' {
            return Err(Error::InvalidInput(format!(
                "Identifier must start with a letter or underscore, found: '{}'",
                first
            )));
        }
    }

    if let Some(ch) = name
        .chars()
        .find(|ch| !ch.is_ascii_alphanumeric() && *ch != '_')
    {
        return Err(Error::InvalidInput(format!(
            "Identifier contains invalid character: '{}'",
            ch
        )));
    }

    if RESERVED_KEYWORDS.contains(&name.to_lowercase().as_str()) {
        return Err(Error::InvalidInput(format!(
            "Identifier '{}' is a reserved SQL keyword",
            name
        )));
    }

    Ok(())
}
