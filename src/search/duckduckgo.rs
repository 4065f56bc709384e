// search/duckduckgo.rs
//
// DuckDuckGo Instant Answer API (no key required).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use strum::Display;

use super::{SearchResult, SearchStrategy};
use crate::error::SearchError;

const ENDPOINT: &str = "https://api.duckduckgo.com/";
const USER_AGENT: &str = concat!("persona_chat/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SafeSearch {
    Strict,
    Moderate,
    Off,
}

impl SafeSearch {
    // Value of the `kp` query parameter.
    fn kp(self) -> &'static str {
        match self {
            SafeSearch::Strict => "1",
            SafeSearch::Moderate => "-1",
            SafeSearch::Off => "-2",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InstantAnswer {
    #[serde(rename = "Heading")]
    pub heading: String,
    #[serde(rename = "AbstractText")]
    pub abstract_text: String,
    #[serde(rename = "AbstractURL")]
    pub abstract_url: String,
    #[serde(rename = "Results")]
    pub results: Vec<Topic>,
    #[serde(rename = "RelatedTopics")]
    pub related_topics: Vec<Topic>,
}

// Either a single result or a named group of nested results.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Topic {
    #[serde(rename = "FirstURL")]
    pub first_url: Option<String>,
    #[serde(rename = "Text")]
    pub text: Option<String>,
    #[serde(rename = "Topics")]
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone)]
pub struct DuckDuckGo {
    client: Client,
    endpoint: String,
    region: Option<String>,
    safesearch: SafeSearch,
}

impl DuckDuckGo {
    pub fn new(client: Client, region: Option<String>, safesearch: SafeSearch) -> Self {
        Self {
            client,
            endpoint: ENDPOINT.to_string(),
            region,
            safesearch,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn request_url(&self, query: &str) -> String {
        let mut url = format!(
            "{}?q={}&format=json&no_redirect=1&no_html=1&skip_disambig=1&kp={}",
            self.endpoint,
            urlencoding::encode(query),
            self.safesearch.kp()
        );
        if let Some(region) = &self.region {
            url.push_str("&kl=");
            url.push_str(&urlencoding::encode(region));
        }
        url
    }
}

#[async_trait]
impl SearchStrategy for DuckDuckGo {
    fn name(&self) -> String {
        format!(
            "duckduckgo region={} safesearch={}",
            self.region.as_deref().unwrap_or("none"),
            self.safesearch
        )
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let response = self
            .client
            .get(self.request_url(query))
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        // The endpoint sometimes answers with a non-JSON content type, so decode by hand.
        let body = response.text().await?;
        let answer: InstantAnswer = serde_json::from_str(&body)?;
        Ok(parse_instant_answer(&answer, max_results))
    }
}

/// Flattens an instant answer into at most `max_results` normalized results.
/// The abstract comes first, then direct results, then related topics.
pub fn parse_instant_answer(answer: &InstantAnswer, max_results: usize) -> Vec<SearchResult> {
    let mut results = Vec::new();

    if !answer.abstract_text.is_empty() {
        results.push(SearchResult::new(
            answer.heading.clone(),
            answer.abstract_text.clone(),
            answer.abstract_url.clone(),
        ));
    }

    let mut topics = Vec::new();
    flatten_topics(&answer.results, &mut topics);
    flatten_topics(&answer.related_topics, &mut topics);

    for topic in topics {
        let text = topic.text.clone().unwrap_or_default();
        let url = topic.first_url.clone().unwrap_or_default();
        if text.is_empty() && url.is_empty() {
            continue;
        }
        let title = text
            .split_once(" - ")
            .map(|(title, _)| title.to_string())
            .unwrap_or_else(|| text.clone());
        results.push(SearchResult::new(title, text, url));
    }

    results.truncate(max_results);
    results
}

fn flatten_topics<'a>(topics: &'a [Topic], out: &mut Vec<&'a Topic>) {
    for topic in topics {
        if topic.topics.is_empty() {
            out.push(topic);
        } else {
            flatten_topics(&topic.topics, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_encodes_query_and_region() {
        let ddg = DuckDuckGo::new(Client::new(), Some("cn-zh".into()), SafeSearch::Off);
        let url = ddg.request_url("Reichenbach Falls & Holmes");
        assert!(url.contains("q=Reichenbach%20Falls%20%26%20Holmes"));
        assert!(url.contains("kp=-2"));
        assert!(url.ends_with("&kl=cn-zh"));
    }

    #[test]
    fn no_region_omits_kl() {
        let ddg = DuckDuckGo::new(Client::new(), None, SafeSearch::Moderate);
        assert!(!ddg.request_url("x").contains("kl="));
        assert_eq!(ddg.name(), "duckduckgo region=none safesearch=moderate");
    }
}
