use anyhow::{anyhow, Result};
use url::Url;

/// Validate that a string is a valid URL with http or https scheme
pub fn validate_url(url_str: &str) -> Result<Url> {
    let url = Url::parse(url_str)
        .map_err(|e| anyhow!("Invalid URL format: {}", e))?;

    // Only allow http and https schemes
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(anyhow!(
            "URL must use http or https scheme, got: {}",
            url.scheme()
        ));
    }

    // Must have a host
    if url.host_str().is_none() {
        return Err(anyhow!("URL must have a host"));
    }

    Ok(url)
}

/// Validate an API base URL and drop any trailing slash.
/// The path is kept so GitHub Enterprise style `/api` prefixes still work.
pub fn validate_api_base_url(url_str: &str) -> Result<String> {
    let url = validate_url(url_str.trim())?;

    if url.query().is_some() || url.fragment().is_some() {
        return Err(anyhow!("API base URL must not carry a query or fragment"));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Validate a browser origin for CORS and return it as `scheme://host[:port]`
pub fn validate_origin(url_str: &str) -> Result<String> {
    let url = validate_url(url_str.trim())?;

    if url.path() != "/" {
        return Err(anyhow!("Origin must not carry a path, got: {}", url.path()));
    }

    Ok(url.origin().ascii_serialization())
}

/// Validate username (alphanumeric, hyphens, underscores, 1-39 chars for GitHub compatibility)
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() || username.len() > 39 {
        return Err(anyhow!(
            "Username must be between 1 and 39 characters"
        ));
    }

    // Allow alphanumeric, hyphens, and underscores
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(anyhow!(
            "Username can only contain alphanumeric characters, hyphens, and underscores"
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://api.github.com").is_ok());
        assert!(validate_url("http://localhost:3000").is_ok());
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("not-a-url").is_err());
    }

    #[test]
    fn test_validate_api_base_url() {
        assert_eq!(
            validate_api_base_url("https://api.github.com/").unwrap(),
            "https://api.github.com"
        );
        assert_eq!(
            validate_api_base_url("https://ghe.example.com/api/").unwrap(),
            "https://ghe.example.com/api"
        );
        assert_eq!(
            validate_api_base_url("http://127.0.0.1:8081").unwrap(),
            "http://127.0.0.1:8081"
        );
        assert!(validate_api_base_url("https://api.github.com/?x=1").is_err());
    }

    #[test]
    fn test_validate_origin() {
        assert_eq!(
            validate_origin("https://folio.example.com/").unwrap(),
            "https://folio.example.com"
        );
        assert_eq!(
            validate_origin("http://localhost:3000").unwrap(),
            "http://localhost:3000"
        );
        assert!(validate_origin("https://folio.example.com/app").is_err());
        assert!(validate_origin("folio.example.com").is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("octocat").is_ok());
        assert!(validate_username("my-user_123").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username(&"a".repeat(40)).is_err());
        assert!(validate_username("user@example").is_err());
    }
}
