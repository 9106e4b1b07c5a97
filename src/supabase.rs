//! Thin authenticated client for the two Supabase REST surfaces the gallery
//! talks to: Storage (`/storage/v1`) and PostgREST (`/rest/v1`).

use http::{HeaderMap, HeaderValue, header};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use url::Url;

#[derive(Clone, Debug)]
pub struct SupabaseClient {
    http: Client,
    base_url: Url,
}

#[derive(Debug, thiserror::Error)]
pub enum SupabaseClientError {
    #[error("invalid Supabase URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Supabase URL cannot be used as a base: {0}")]
    NotABase(String),
    #[error("invalid Supabase key")]
    InvalidKey(#[from] http::header::InvalidHeaderValue),
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

impl SupabaseClient {
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self, SupabaseClientError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(SupabaseClientError::NotABase(base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        let mut api_key = HeaderValue::from_str(anon_key)?;
        api_key.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {anon_key}"))?;
        bearer.set_sensitive(true);
        headers.insert("apikey", api_key);
        headers.insert(header::AUTHORIZATION, bearer);

        let http = Client::builder().default_headers(headers).build()?;
        Ok(Self { http, base_url })
    }

    /// Joins `segments` onto the project URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn get(&self, url: Url) -> RequestBuilder {
        self.http.get(url)
    }

    pub fn post(&self, url: Url) -> RequestBuilder {
        self.http.post(url)
    }
}

/// Splits a finished response into success or the status and body text of a
/// rejection.
pub async fn check_status(response: Response) -> Result<Response, (StatusCode, String)> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err((status, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_encodes_segments() {
        let client = SupabaseClient::new("https://abc.supabase.co", "key").unwrap();
        let url = client.endpoint(&["storage", "v1", "object", "gallery", "1-my cat.jpg"]);
        assert_eq!(
            url.as_str(),
            "https://abc.supabase.co/storage/v1/object/gallery/1-my%20cat.jpg"
        );
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let client = SupabaseClient::new("http://localhost:54321/", "key").unwrap();
        let url = client.endpoint(&["rest", "v1", "gallery"]);
        assert_eq!(url.as_str(), "http://localhost:54321/rest/v1/gallery");
    }

    #[test]
    fn rejects_garbage_url() {
        assert!(matches!(
            SupabaseClient::new("not a url", "key"),
            Err(SupabaseClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            SupabaseClient::new("mailto:me@example.com", "key"),
            Err(SupabaseClientError::NotABase(_))
        ));
    }
}
