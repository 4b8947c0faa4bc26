//! Joining the service base URL with its answer endpoint.

/// Strip trailing slashes so endpoint joins never produce `//`.
///
/// ```
/// use ponder::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://127.0.0.1:8000/"), "http://127.0.0.1:8000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Build the full answer URL from a base URL and endpoint path.
///
/// ```
/// use ponder::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://127.0.0.1:8000/", "/answer_question"),
///     "http://127.0.0.1:8000/answer_question"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://localhost:8000"),
            "http://localhost:8000"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8000///"),
            "http://localhost:8000"
        );
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn test_construct_api_url() {
        assert_eq!(
            construct_api_url("http://localhost:8000", "answer_question"),
            "http://localhost:8000/answer_question"
        );
        assert_eq!(
            construct_api_url("http://localhost:8000/api/", "//answer_question_sse"),
            "http://localhost:8000/api/answer_question_sse"
        );
    }
}
