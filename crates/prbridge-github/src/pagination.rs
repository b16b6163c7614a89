//! `Link` header walking for paginated GitHub list endpoints.

use reqwest::header::HeaderMap;

/// Extract the `rel="next"` target from a response's `Link` header, if any.
///
/// GitHub's format is a comma-separated list of
/// `<https://api.github.com/...?page=2>; rel="next"` segments.
pub fn next_page(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(reqwest::header::LINK)?.to_str().ok()?;

    for segment in link.split(',') {
        let mut parts = segment.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|p| p.trim() == "rel=\"next\"");
        if is_next && target.starts_with('<') && target.ends_with('>') {
            return Some(target[1..target.len() - 1].to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue, LINK};

    fn headers_with_link(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(LINK, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn finds_next_among_multiple_rels() {
        let headers = headers_with_link(
            "<https://api.github.com/orgs/acme/repos?page=2>; rel=\"next\", \
             <https://api.github.com/orgs/acme/repos?page=5>; rel=\"last\"",
        );
        assert_eq!(
            next_page(&headers).as_deref(),
            Some("https://api.github.com/orgs/acme/repos?page=2")
        );
    }

    #[test]
    fn no_next_on_last_page() {
        let headers = headers_with_link(
            "<https://api.github.com/orgs/acme/repos?page=4>; rel=\"prev\", \
             <https://api.github.com/orgs/acme/repos?page=1>; rel=\"first\"",
        );
        assert_eq!(next_page(&headers), None);
    }

    #[test]
    fn absent_header_means_single_page() {
        assert_eq!(next_page(&HeaderMap::new()), None);
    }
}
