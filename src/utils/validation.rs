use crate::utils::error::{Result, SiteError};
use std::collections::HashSet;
use std::net::SocketAddr;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> SiteError {
    SiteError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// A CORS origin: scheme and host (and optional port), nothing else.
/// A single trailing slash is tolerated since browsers never send one.
pub fn validate_origin(field_name: &str, origin: &str) -> Result<()> {
    if origin.is_empty() {
        return Err(invalid(field_name, origin, "Origin cannot be empty"));
    }

    let url = Url::parse(origin)
        .map_err(|e| invalid(field_name, origin, format!("Origin is not a URL: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field_name,
            origin,
            format!("Origin scheme must be http or https, got {}", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(invalid(field_name, origin, "Origin has no host"));
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(
            field_name,
            origin,
            "Origin must not carry a path, query or fragment",
        ));
    }
    Ok(())
}

pub fn validate_socket_addr(field_name: &str, addr: &str) -> Result<SocketAddr> {
    addr.parse::<SocketAddr>()
        .map_err(|e| invalid(field_name, addr, format!("Invalid bind address: {}", e)))
}

/// A libSQL database location: a file path or `:memory:`.
pub fn validate_db_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field_name, path, "Database path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "Database path contains null bytes"));
    }
    if path.ends_with('/') || path.ends_with('\\') {
        return Err(invalid(
            field_name,
            path,
            "Database path names a directory, not a file",
        ));
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| SiteError::MissingConfigError {
        field: field_name.to_string(),
    })
}

/// A name shown next to reviews, e.g. the fallback author.
pub fn validate_display_name(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "Display name cannot be blank"));
    }
    if value.chars().any(char::is_control) {
        return Err(invalid(
            field_name,
            value,
            "Display name cannot contain control characters",
        ));
    }
    Ok(())
}

/// Row limits must be at least one and at most `max`.
pub fn validate_limit(field_name: &str, value: usize, max: usize) -> Result<()> {
    if value == 0 {
        return Err(invalid(field_name, "0", "Limit must be at least 1"));
    }
    if value > max {
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("Limit must not exceed {}", max),
        ));
    }
    Ok(())
}

pub fn validate_unique<'a, I>(field_name: &str, values: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value) {
            return Err(invalid(field_name, value, "Duplicate entry"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_origin() {
        let field = "server.allowed_origins";
        assert!(validate_origin(field, "https://example.com").is_ok());
        assert!(validate_origin(field, "http://localhost:5500").is_ok());
        assert!(validate_origin(field, "http://localhost:5500/").is_ok());
        assert!(validate_origin(field, "").is_err());
        assert!(validate_origin(field, "example.com").is_err());
        assert!(validate_origin(field, "ftp://example.com").is_err());

        let err = validate_origin(field, "https://example.com/pricing").unwrap_err();
        assert!(err.to_string().contains("path, query or fragment"));
    }

    #[test]
    fn test_validate_socket_addr() {
        assert!(validate_socket_addr("server.bind", "0.0.0.0:3001").is_ok());
        assert!(validate_socket_addr("server.bind", "localhost").is_err());
    }

    #[test]
    fn test_validate_db_path() {
        assert!(validate_db_path("storage.path", "site.db").is_ok());
        assert!(validate_db_path("storage.path", ":memory:").is_ok());
        assert!(validate_db_path("storage.path", "  ").is_err());
        assert!(validate_db_path("storage.path", "data/").is_err());
        assert!(validate_db_path("storage.path", "si\0te.db").is_err());
    }

    #[test]
    fn test_validate_display_name() {
        assert!(validate_display_name("reviews.default_author", "Guest").is_ok());
        assert!(validate_display_name("reviews.default_author", " \t").is_err());
        assert!(validate_display_name("reviews.default_author", "Gu\nest").is_err());
    }

    #[test]
    fn test_validate_limit() {
        assert!(validate_limit("reviews.public_limit", 10, 100).is_ok());
        assert!(validate_limit("reviews.public_limit", 100, 100).is_ok());
        assert!(validate_limit("reviews.public_limit", 0, 100).is_err());

        let err = validate_limit("reviews.public_limit", 101, 100).unwrap_err();
        assert!(err.to_string().contains("must not exceed 100"));
    }

    #[test]
    fn test_validate_unique() {
        assert!(validate_unique("catalog.plans", ["Basic", "Pro"]).is_ok());
        let err = validate_unique("catalog.plans", ["Pro", "Basic", "Pro"]).unwrap_err();
        assert!(err.to_string().contains("Duplicate entry"));
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("site.db".to_string());
        assert_eq!(validate_required_field("storage.path", &present).unwrap(), "site.db");

        let missing: Option<String> = None;
        assert!(matches!(
            validate_required_field("storage.path", &missing),
            Err(SiteError::MissingConfigError { .. })
        ));
    }
}
