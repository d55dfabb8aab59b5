//! Input validation functions
//!
//! Struct-level rules live on the request types (`validator` derive);
//! this module holds the standalone checks shared by handlers and services.

/// Largest page size a listing will return
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Canonical form of an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate pagination parameters
pub fn validate_pagination(page: u32, limit: u32) -> Result<(), String> {
    if page == 0 {
        return Err("Page must be at least 1".to_string());
    }
    if limit == 0 {
        return Err("Limit must be at least 1".to_string());
    }
    if limit > MAX_PAGE_LIMIT {
        return Err(format!("Limit must be at most {}", MAX_PAGE_LIMIT));
    }
    Ok(())
}

/// Resolve optional listing parameters into a concrete `(page, limit)`
///
/// Both absent means "no paging". When only one is given the other
/// defaults to page 1 or `MAX_PAGE_LIMIT`; whatever was given is validated.
pub fn resolve_pagination(
    page: Option<u32>,
    limit: Option<u32>,
) -> Result<Option<(u32, u32)>, String> {
    if page.is_none() && limit.is_none() {
        return Ok(None);
    }
    let page = page.unwrap_or(1);
    let limit = limit.unwrap_or(MAX_PAGE_LIMIT);
    validate_pagination(page, limit)?;
    Ok(Some((page, limit)))
}
