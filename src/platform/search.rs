//! Search result scraping
//!
//! The results page embeds its data as one large JSON document whose layout
//! changes often. Instead of following a fixed path, the document is walked
//! depth-first for the first container holding a `videoRenderer` card.

use crate::core::retry::RetryExecutor;
use crate::core::stream::{ContentId, SearchHit};
use crate::error::TubeError;
use crate::platform::client::VideoClient;
use crate::utils::token::extract_search_data;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::Method;
use serde_json::{Map, Value};
use tracing::{debug, info};
use url::form_urlencoded;

/// Consent cookie the results page requires before it serves any results
pub const CONSENT_COOKIE: &str = "CONSENT=YES+cb.20211001-17-p0.en+FX+789";

/// Field marking a playable search result card
pub const RENDERER_KEY: &str = "videoRenderer";

/// One node of a JSON document, as seen by the container walk
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Mapping(&'a Map<String, Value>),
    Sequence(&'a [Value]),
    Scalar,
}

impl<'a> From<&'a Value> for Node<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => Node::Mapping(map),
            Value::Array(items) => Node::Sequence(items),
            _ => Node::Scalar,
        }
    }
}

/// A mapping or sequence whose children are scanned in order
#[derive(Debug, Clone, Copy)]
pub enum Container<'a> {
    Mapping(&'a Map<String, Value>),
    Sequence(&'a [Value]),
}

impl<'a> Container<'a> {
    /// Children in document order (mapping values or sequence elements)
    pub fn entries(self) -> impl Iterator<Item = &'a Value> {
        let (map, items) = match self {
            Container::Mapping(map) => (Some(map), None),
            Container::Sequence(items) => (None, Some(items)),
        };
        map.into_iter()
            .flat_map(|map| map.values())
            .chain(items.into_iter().flat_map(|items| items.iter()))
    }

    pub fn len(self) -> usize {
        match self {
            Container::Mapping(map) => map.len(),
            Container::Sequence(items) => items.len(),
        }
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// Find the first container whose scan reaches a mapping carrying `key`.
///
/// The container being scanned when the mapping is met is returned, not the
/// mapping itself. A root that carries `key` yields an empty container.
pub fn find_renderer_container<'a>(root: &'a Value, key: &str) -> Option<Container<'a>> {
    walk(root, Container::Sequence(&[]), key)
}

fn walk<'a>(node: &'a Value, parent: Container<'a>, key: &str) -> Option<Container<'a>> {
    let container = match Node::from(node) {
        Node::Mapping(map) if map.contains_key(key) => return Some(parent),
        Node::Mapping(map) => Container::Mapping(map),
        Node::Sequence(items) => Container::Sequence(items),
        Node::Scalar => return None,
    };

    container
        .entries()
        .find_map(|child| walk(child, container, key))
}

/// Turn a parsed search document into hits.
///
/// A literal `"0"` result estimate means no hits. Otherwise the renderer
/// container must exist; entries without a renderer card (shelves, ads) are
/// dropped and order is kept.
pub fn parse_hits(data: &Value) -> Result<Vec<SearchHit>, TubeError> {
    if data.get("estimatedResults").and_then(Value::as_str) == Some("0") {
        debug!("Provider estimates zero results");
        return Ok(Vec::new());
    }

    let contents = data.get("contents").ok_or(TubeError::NotFound)?;
    let container = find_renderer_container(contents, RENDERER_KEY).ok_or(TubeError::NotFound)?;
    debug!("Renderer container holds {} entries", container.len());

    Ok(container.entries().filter_map(hit_from_entry).collect())
}

fn hit_from_entry(entry: &Value) -> Option<SearchHit> {
    let renderer = entry.as_object()?.get(RENDERER_KEY)?;
    let id = renderer.get("videoId")?.as_str()?;

    Some(SearchHit {
        id: ContentId::from(id),
        title: first_run_text(renderer.get("title")),
        author: first_run_text(renderer.get("ownerText")),
    })
}

fn first_run_text(value: Option<&Value>) -> String {
    value
        .and_then(|v| v.pointer("/runs/0/text"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Cookie-negotiating search client
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: VideoClient,
    retry: RetryExecutor,
}

impl SearchClient {
    /// Create a search client sharing the given HTTP client
    pub fn new(client: VideoClient) -> Self {
        Self {
            client,
            retry: RetryExecutor::default(),
        }
    }

    /// Build the results page URL for a query
    pub fn search_url(&self, query: &str) -> String {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .append_pair("search_query", query)
            .finish();
        format!("{}/results?{}", self.client.base_url(), encoded)
    }

    /// Search for `query` and return hits in provider order
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, TubeError> {
        info!("Searching for '{}'", query);
        let url = self.search_url(query);
        let url = url.as_str();

        let data = self
            .retry
            .execute(move || self.fetch_result_json(url))
            .await
            .map_err(|e| TubeError::SearchFailed(e.to_string()))?;

        parse_hits(&data)
    }

    async fn fetch_result_json(&self, url: &str) -> Result<Value, TubeError> {
        let referer = format!("{}/", self.client.base_url());

        // The first response only hands out session cookies.
        let initial = self
            .client
            .create_request(Method::GET, url, &referer)
            .send()
            .await?
            .error_for_status()?;
        let cookie = build_cookie_header(
            initial
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok()),
        );
        debug!("Search cookie header: {}", cookie);

        let body = self
            .client
            .create_request(Method::GET, url, &referer)
            .header(COOKIE, cookie)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let raw = extract_search_data(&body)?;
        Ok(serde_json::from_str(raw)?)
    }
}

/// Join the name=value part of each `Set-Cookie` header with the consent cookie
pub fn build_cookie_header<'a>(set_cookies: impl Iterator<Item = &'a str>) -> String {
    set_cookies
        .filter_map(|header| header.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .chain(std::iter::once(CONSENT_COOKIE))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::client::HttpClientConfig;
    use mockito::Matcher;
    use serde_json::json;

    fn video(id: &str, title: &str, author: &str) -> Value {
        json!({
            "videoRenderer": {
                "videoId": id,
                "title": {"runs": [{"text": title}]},
                "ownerText": {"runs": [{"text": author}]}
            }
        })
    }

    fn search_document(items: Vec<Value>) -> Value {
        json!({
            "estimatedResults": "1234",
            "contents": {
                "twoColumnSearchResultsRenderer": {
                    "primaryContents": {
                        "sectionListRenderer": {
                            "contents": [
                                {"itemSectionRenderer": {"contents": items}},
                                {"continuationItemRenderer": {"token": "x"}}
                            ]
                        }
                    }
                }
            }
        })
    }

    fn results_page(data: &Value) -> String {
        format!(
            "<html><script>var a = 1;</script><script>var ytInitialData = {};</script></html>",
            data
        )
    }

    fn search_client(base_url: String) -> SearchClient {
        let config = HttpClientConfig {
            base_url,
            ..Default::default()
        };
        SearchClient::new(VideoClient::with_config(config).unwrap())
    }

    #[test]
    fn test_shelf_entries_are_dropped() {
        let data = search_document(vec![
            json!({"shelfRenderer": {"title": {"simpleText": "Related"}}}),
            video("abc", "A video", "A channel"),
        ]);
        let hits = parse_hits(&data).unwrap();
        assert_eq!(
            hits,
            vec![SearchHit {
                id: ContentId::from("abc"),
                title: "A video".to_string(),
                author: "A channel".to_string(),
            }]
        );
    }

    #[test]
    fn test_zero_estimate_skips_tree_search() {
        let data = json!({"estimatedResults": "0"});
        assert!(parse_hits(&data).unwrap().is_empty());
    }

    #[test]
    fn test_missing_renderer_is_not_found() {
        let data = search_document(vec![json!({"shelfRenderer": {}})]);
        assert!(matches!(parse_hits(&data), Err(TubeError::NotFound)));
        assert!(matches!(
            parse_hits(&json!({"estimatedResults": "5"})),
            Err(TubeError::NotFound)
        ));
    }

    #[test]
    fn test_duplicates_and_order_are_kept() {
        let data = search_document(vec![
            video("b", "Second", "X"),
            video("a", "First", "Y"),
            video("b", "Second", "X"),
        ]);
        let ids: Vec<String> = parse_hits(&data)
            .unwrap()
            .into_iter()
            .map(|hit| hit.id.to_string())
            .collect();
        assert_eq!(ids, vec!["b", "a", "b"]);
    }

    #[test]
    fn test_entries_without_id_are_skipped_and_text_defaults() {
        let data = search_document(vec![
            json!({"videoRenderer": {"title": {"runs": [{"text": "no id"}]}}}),
            json!({"videoRenderer": {"videoId": "bare"}}),
        ]);
        let hits = parse_hits(&data).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "bare");
        assert_eq!(hits[0].title, "");
        assert_eq!(hits[0].author, "");
    }

    #[test]
    fn test_walk_returns_parent_mapping() {
        let doc = json!({
            "outer": {
                "inner": {
                    "first": {"videoRenderer": {"videoId": "1"}},
                    "second": {"videoRenderer": {"videoId": "2"}}
                }
            }
        });
        match find_renderer_container(&doc, RENDERER_KEY) {
            Some(Container::Mapping(map)) => {
                assert!(map.contains_key("first"));
                assert!(map.contains_key("second"));
            }
            other => panic!("unexpected container: {:?}", other),
        }
    }

    #[test]
    fn test_walk_is_depth_first_first_match() {
        let doc = json!([
            [1, "x", {"deep": [{"videoRenderer": {"videoId": "deep"}}]}],
            [{"videoRenderer": {"videoId": "shallow"}}]
        ]);
        let container = find_renderer_container(&doc, RENDERER_KEY).unwrap();
        let ids: Vec<&str> = container
            .entries()
            .filter_map(|entry| entry.pointer("/videoRenderer/videoId"))
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(ids, vec!["deep"]);
    }

    #[test]
    fn test_walk_root_with_sentinel_is_empty() {
        let doc = json!({"videoRenderer": {"videoId": "root"}});
        let container = find_renderer_container(&doc, RENDERER_KEY).unwrap();
        assert!(container.is_empty());
    }

    #[test]
    fn test_walk_scalars_are_dead_ends() {
        assert!(find_renderer_container(&json!("videoRenderer"), RENDERER_KEY).is_none());
        assert!(find_renderer_container(&json!([1, 2, null, true]), RENDERER_KEY).is_none());
    }

    #[test]
    fn test_build_cookie_header() {
        let headers = ["YSC=abc; Domain=.x.test; Path=/", "VISITOR=xyz; Secure"];
        assert_eq!(
            build_cookie_header(headers.into_iter()),
            format!("YSC=abc; VISITOR=xyz; {}", CONSENT_COOKIE)
        );
        assert_eq!(build_cookie_header(std::iter::empty()), CONSENT_COOKIE);
    }

    #[test]
    fn test_search_url_encodes_query() {
        let client = search_client("https://www.youtube.com".to_string());
        assert_eq!(
            client.search_url("lo fi & beats"),
            "https://www.youtube.com/results?search_query=lo+fi+%26+beats"
        );
    }

    #[tokio::test]
    async fn test_search_negotiates_cookies() {
        let mut server = mockito::Server::new_async().await;
        let query = Matcher::UrlEncoded("search_query".to_string(), "doom metal".to_string());

        let handshake = server
            .mock("GET", "/results")
            .match_query(query.clone())
            .match_header("cookie", Matcher::Missing)
            .with_status(200)
            .with_header("set-cookie", "YSC=abc; path=/")
            .with_header("set-cookie", "VISITOR_INFO1_LIVE=xyz; path=/; secure")
            .with_body("<html>consent</html>")
            .expect(1)
            .create_async()
            .await;

        let data = search_document(vec![
            json!({"shelfRenderer": {}}),
            video("v1", "Riff", "Band"),
        ]);
        let results = server
            .mock("GET", "/results")
            .match_query(query)
            .match_header(
                "cookie",
                format!("YSC=abc; VISITOR_INFO1_LIVE=xyz; {}", CONSENT_COOKIE).as_str(),
            )
            .match_header("referer", format!("{}/", server.url()).as_str())
            .with_status(200)
            .with_body(results_page(&data))
            .expect(1)
            .create_async()
            .await;

        let hits = search_client(server.url())
            .search("doom metal")
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].label(), "Band: Riff");

        handshake.assert_async().await;
        results.assert_async().await;
    }

    #[tokio::test]
    async fn test_unparseable_payload_is_retried_once() {
        let mut server = mockito::Server::new_async().await;

        let handshake = server
            .mock("GET", "/results")
            .match_query(Matcher::Any)
            .match_header("cookie", Matcher::Missing)
            .with_status(200)
            .expect(2)
            .create_async()
            .await;
        let results = server
            .mock("GET", "/results")
            .match_query(Matcher::Any)
            .match_header("cookie", Matcher::Regex("CONSENT=".to_string()))
            .with_status(200)
            .with_body("<script>var ytInitialData = {not json};</script>")
            .expect(2)
            .create_async()
            .await;

        let result = search_client(server.url()).search("anything").await;
        assert!(matches!(result, Err(TubeError::SearchFailed(_))));

        handshake.assert_async().await;
        results.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_failure_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/results")
            .match_query(Matcher::Any)
            .with_status(503)
            .expect(1)
            .create_async()
            .await;

        let result = search_client(server.url()).search("anything").await;
        assert!(matches!(result, Err(TubeError::SearchFailed(_))));
        mock.assert_async().await;
    }
}
