/// Path segments that can never be short codes
///
/// Shared by create, update and redirect so the three checks cannot drift.
pub const RESERVED_CODES: [&str; 4] = ["admin", "api", "new", "favicon.ico"];

/// Browser favicon request; answered with "no content" instead of a lookup
pub const FAVICON_PATH: &str = "favicon.ico";

/// Placeholder some clients send when the code variable was never filled in
pub const NULL_SENTINEL: &str = "null";

/// 大小写不敏感地匹配保留字
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
}

pub fn is_favicon_request(code: &str) -> bool {
    code.eq_ignore_ascii_case(FAVICON_PATH)
}

/// Join the public base URL and a code, tolerating a missing trailing slash
pub fn build_short_url(base_url: &str, code: &str) -> String {
    if base_url.ends_with('/') {
        format!("{}{}", base_url, code)
    } else {
        format!("{}/{}", base_url, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_codes_case_insensitive() {
        assert!(is_reserved_code("admin"));
        assert!(is_reserved_code("ADMIN"));
        assert!(is_reserved_code("Api"));
        assert!(is_reserved_code("new"));
        assert!(is_reserved_code("Favicon.ICO"));
        assert!(!is_reserved_code("administrator"));
        assert!(!is_reserved_code("MYLINK"));
    }

    #[test]
    fn test_favicon_request() {
        assert!(is_favicon_request("favicon.ico"));
        assert!(!is_favicon_request("favicon"));
    }

    #[test]
    fn test_build_short_url() {
        assert_eq!(
            build_short_url("https://example.com/", "ABC"),
            "https://example.com/ABC"
        );
        assert_eq!(
            build_short_url("https://example.com", "ABC"),
            "https://example.com/ABC"
        );
    }
}
