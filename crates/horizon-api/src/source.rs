//! # Request Source
//!
//! The read-only view of one request that parameter extraction works
//! against: route-template path parameters, the decoded query string, and
//! the request headers.
//!
//! A [`RequestSource`] is built explicitly, either from Axum request parts
//! or piece by piece for non-Axum hosts and tests. Nothing is looked up from
//! ambient or thread-local state.

use std::collections::HashMap;

use axum::http::header::HeaderName;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};

/// Path parameters, query string, and headers of a single request.
#[derive(Debug, Clone, Default)]
pub struct RequestSource {
    path: HashMap<String, String>,
    query: Vec<(String, String)>,
    headers: HeaderMap,
}

impl RequestSource {
    /// Assemble a source from its three parts.
    ///
    /// If `path` yields the same name more than once, the first value wins.
    /// `query` order is preserved so that [`query_first`](Self::query_first)
    /// sees values in the order the client sent them.
    pub fn new<P, K, V>(path: P, query: Vec<(String, String)>, headers: HeaderMap) -> Self
    where
        P: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut source = Self {
            path: HashMap::new(),
            query,
            headers,
        };
        for (name, value) in path {
            source = source.with_path_param(name, value);
        }
        source
    }

    /// Build a source from Axum request parts plus the matched path
    /// parameters.
    ///
    /// The query string is decoded as `application/x-www-form-urlencoded`
    /// (`+` is a space, percent escapes are decoded). Pairs with malformed
    /// escapes are skipped.
    pub fn from_parts<P, K, V>(parts: &Parts, path: P) -> Self
    where
        P: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let query = parts.uri.query().map(parse_query).unwrap_or_default();
        Self::new(path, query, parts.headers.clone())
    }

    /// Add a path parameter. Ignored if the name is already present.
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path.entry(name.into()).or_insert_with(|| value.into());
        self
    }

    /// Replace the query parameters with those decoded from `query`
    /// (without the leading `?`). Pairs with malformed percent escapes are
    /// skipped.
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = parse_query(query);
        self
    }

    /// Append a header value.
    ///
    /// Names or values that are not valid HTTP tokens are dropped.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            _ => tracing::debug!(header = name, "dropping invalid header"),
        }
        self
    }

    /// Look up a path parameter by exact name.
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path.get(name).map(String::as_str)
    }

    /// The first query value for `name`, if any.
    pub fn query_first(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// A header value by case-insensitive name.
    ///
    /// Values containing non-visible-ASCII bytes are treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Pairs containing a malformed percent escape (`%` not followed by two hex
/// digits) are dropped rather than kept verbatim.
fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| has_valid_escapes(pair))
        .flat_map(|pair| url::form_urlencoded::parse(pair.as_bytes()).into_owned())
        .collect()
}

fn has_valid_escapes(pair: &str) -> bool {
    let bytes = pair.as_bytes();
    let mut from = 0;
    while let Some(offset) = bytes[from..].iter().position(|&b| b == b'%') {
        let at = from + offset;
        match bytes.get(at + 1..at + 3) {
            Some(hex) if hex.iter().all(u8::is_ascii_hexdigit) => from = at + 3,
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(uri: &str) -> Parts {
        Request::builder()
            .uri(uri)
            .header("Last-Event-ID", "42")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[test]
    fn from_parts_decodes_query() {
        let source = RequestSource::from_parts(
            &parts("/?name=hello+world&sym=%24USD"),
            Vec::<(String, String)>::new(),
        );
        assert_eq!(source.query_first("name"), Some("hello world"));
        assert_eq!(source.query_first("sym"), Some("$USD"));
        assert_eq!(source.query_first("missing"), None);
    }

    #[test]
    fn first_query_value_wins() {
        let source = RequestSource::default().with_query("a=1&a=2&b=");
        assert_eq!(source.query_first("a"), Some("1"));
        assert_eq!(source.query_first("b"), Some(""));
    }

    #[test]
    fn malformed_escape_drops_only_that_pair() {
        let source = RequestSource::default().with_query("a=%zz&b=ok&c=100%&d=%4");
        assert_eq!(source.query_first("a"), None);
        assert_eq!(source.query_first("b"), Some("ok"));
        assert_eq!(source.query_first("c"), None);
        assert_eq!(source.query_first("d"), None);
    }

    #[test]
    fn malformed_first_value_falls_through_to_next() {
        let source = RequestSource::default().with_query("cursor=%G1&cursor=7");
        assert_eq!(source.query_first("cursor"), Some("7"));
    }

    #[test]
    fn first_path_definition_wins() {
        let source = RequestSource::new(
            [("id", "first"), ("id", "second")],
            Vec::new(),
            HeaderMap::new(),
        );
        assert_eq!(source.path_param("id"), Some("first"));
    }

    #[test]
    fn path_lookup_is_exact() {
        let source = RequestSource::default().with_path_param("Id", "x");
        assert_eq!(source.path_param("id"), None);
        assert_eq!(source.path_param("Id"), Some("x"));
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let source = RequestSource::from_parts(&parts("/"), [("id", "1")]);
        assert_eq!(source.header("last-event-id"), Some("42"));
        assert_eq!(source.header("LAST-EVENT-ID"), Some("42"));
    }

    #[test]
    fn invalid_header_is_dropped() {
        let source = RequestSource::default().with_header("bad header", "x");
        assert_eq!(source.header("bad header"), None);
    }

    #[test]
    fn no_query_string_is_empty() {
        let source = RequestSource::from_parts(&parts("/accounts"), Vec::<(String, String)>::new());
        assert_eq!(source.query_first("cursor"), None);
    }
}
