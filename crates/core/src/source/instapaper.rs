//! Instapaper Full API client.
//!
//! Logs in through xAuth (username and password exchanged for an access
//! token) and signs every call with OAuth 1.0a. All endpoints are `POST` with
//! form-encoded parameters.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::BookmarkSource;
use super::oauth::{Signer, Token};
use crate::bookmark::{Bookmark, Folder, Highlight};
use crate::config::ExportConfig;
use crate::parse::Document;
use crate::{FolioError, Result};

/// Selector for the source/byline block in scraped article markup.
const ORIGIN_SELECTOR: &str = "#origin_line, .origin_line";

/// Consumer and account credentials.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    pub login: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}

impl From<&ExportConfig> for Credentials {
    fn from(config: &ExportConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            login: config.login.clone(),
            password: config.password.clone(),
        }
    }
}

/// Error entry in an API error response.
#[derive(Debug, Deserialize)]
struct ApiErrorEntry {
    error_code: u32,
    message: String,
}

/// Body of `/api/1.1/bookmarks/list`.
#[derive(Debug, Deserialize)]
struct BookmarkList {
    #[serde(default)]
    bookmarks: Vec<Bookmark>,
}

/// An authenticated Instapaper session.
#[derive(Debug, Clone)]
pub struct InstapaperClient {
    client: Client,
    base_url: Url,
    signer: Signer,
    timeout: u64,
}

impl InstapaperClient {
    /// Logs in against `base_url`, normally [`DEFAULT_API_URL`].
    ///
    /// [`DEFAULT_API_URL`]: crate::config::DEFAULT_API_URL
    pub async fn login_at(base_url: &str, credentials: &Credentials, timeout: u64) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| FolioError::InvalidUrl(e.to_string()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(FolioError::HttpError)?;

        let mut session = Self {
            client,
            base_url,
            signer: Signer::new(&credentials.api_key, &credentials.api_secret),
            timeout,
        };

        let body = session
            .post_text(
                "/api/1/oauth/access_token",
                &[
                    ("x_auth_username", credentials.login.as_str()),
                    ("x_auth_password", credentials.password.as_str()),
                    ("x_auth_mode", "client_auth"),
                ],
            )
            .await?;
        let token = parse_token(&body)?;

        tracing::info!(login = %credentials.login, "logged in to Instapaper");
        session.signer = session.signer.with_token(token);
        Ok(session)
    }

    pub fn token(&self) -> Option<&Token> {
        self.signer.token()
    }

    async fn post(&self, path: &str, params: &[(&str, &str)]) -> Result<Response> {
        let url = self.base_url.join(path).map_err(|e| FolioError::InvalidUrl(e.to_string()))?;
        let owned: Vec<(String, String)> = params.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        let authorization = self.signer.authorization("POST", url.as_str(), &owned)?;

        tracing::debug!(%url, "POST");
        let response = self
            .client
            .post(url)
            .header("Authorization", authorization)
            .form(&owned)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FolioError::Timeout { timeout: self.timeout }
                } else {
                    FolioError::HttpError(e)
                }
            })?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(api_error(status, &body))
        }
    }

    async fn post_text(&self, path: &str, params: &[(&str, &str)]) -> Result<String> {
        Ok(self.post(path, params).await?.text().await?)
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let body = self.post_text(path, params).await?;
        if let Some(err) = embedded_error(&body) {
            return Err(err);
        }
        serde_json::from_str(&body).map_err(|e| FolioError::Api { code: 0, message: format!("unexpected response: {}", e) })
    }
}

impl BookmarkSource for InstapaperClient {
    async fn folders(&self) -> Result<Vec<Folder>> {
        self.post_json("/api/1.1/folders/list", &[]).await
    }

    async fn bookmarks(&self, folder_id: &str, limit: u32) -> Result<Vec<Bookmark>> {
        let limit = limit.to_string();
        let list: BookmarkList = self
            .post_json("/api/1.1/bookmarks/list", &[("folder_id", folder_id), ("limit", limit.as_str())])
            .await?;
        tracing::debug!(folder_id, count = list.bookmarks.len(), "listed bookmarks");
        Ok(list.bookmarks)
    }

    async fn scrape(&self, bookmark: &mut Bookmark) -> Result<()> {
        let id = bookmark.id.to_string();
        let text = self.post_text("/api/1/bookmarks/get_text", &[("bookmark_id", id.as_str())]).await?;
        bookmark.origin = origin_line(&text)?;
        bookmark.text = Some(text);
        Ok(())
    }

    async fn highlights(&self, bookmark: &Bookmark) -> Result<Vec<Highlight>> {
        let path = format!("/api/1.1/bookmarks/{}/highlights", bookmark.id);
        self.post_json(&path, &[]).await
    }

    async fn archive(&self, bookmark: &Bookmark) -> Result<()> {
        let id = bookmark.id.to_string();
        self.post("/api/1/bookmarks/archive", &[("bookmark_id", id.as_str())]).await?;
        Ok(())
    }
}

/// Parses `oauth_token=...&oauth_token_secret=...`.
fn parse_token(body: &str) -> Result<Token> {
    let mut key = None;
    let mut secret = None;
    for (k, v) in url::form_urlencoded::parse(body.trim().as_bytes()) {
        match k.as_ref() {
            "oauth_token" => key = Some(v.into_owned()),
            "oauth_token_secret" => secret = Some(v.into_owned()),
            _ => {}
        }
    }

    match (key, secret) {
        (Some(key), Some(secret)) => Ok(Token { key, secret }),
        _ => Err(FolioError::Api { code: 0, message: "access token response lacks oauth_token".to_string() }),
    }
}

/// Error for a non-2xx response, using the API's own code when present.
fn api_error(status: u16, body: &str) -> FolioError {
    embedded_error(body).unwrap_or_else(|| FolioError::Api { code: u32::from(status), message: body.trim().to_string() })
}

/// `[{"type":"error","error_code":1240,"message":"..."}]`
fn embedded_error(body: &str) -> Option<FolioError> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(body).ok()?;
    let entry = entries
        .into_iter()
        .find(|v| v.get("type").and_then(|t| t.as_str()) == Some("error"))?;
    let entry: ApiErrorEntry = serde_json::from_value(entry).ok()?;
    Some(FolioError::Api { code: entry.error_code, message: entry.message })
}

/// Outer markup of the origin block, or empty when the article has none.
fn origin_line(text: &str) -> Result<String> {
    let doc = Document::parse(text)?;
    Ok(doc
        .select(ORIGIN_SELECTOR)?
        .first()
        .map(|el| el.outer_html())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token() {
        let token = parse_token("oauth_token_secret=s3cr%3Dt&oauth_token=abc\n").unwrap();
        assert_eq!(token, Token { key: "abc".to_string(), secret: "s3cr=t".to_string() });
        assert!(parse_token("nope=1").is_err());
    }

    #[test]
    fn test_api_error_uses_embedded_code() {
        let err = api_error(400, r#"[{"type":"error","error_code":1241,"message":"Invalid or missing bookmark_id"}]"#);
        assert!(matches!(err, FolioError::Api { code: 1241, .. }));

        let err = api_error(503, "Service Unavailable");
        assert!(matches!(err, FolioError::Api { code: 503, ref message } if message == "Service Unavailable"));
    }

    #[test]
    fn test_origin_line() {
        let html = r#"<html><body><div class="origin_line"><a href="https://example.com">example.com</a></div><p>x</p></body></html>"#;
        assert_eq!(
            origin_line(html).unwrap(),
            r#"<div class="origin_line"><a href="https://example.com">example.com</a></div>"#
        );
        assert_eq!(origin_line("<p>no origin</p>").unwrap(), "");
    }

    #[test]
    fn test_credentials_debug_hides_secrets() {
        let credentials = Credentials {
            api_key: "k".into(),
            api_secret: "consumer-secret".into(),
            login: "me".into(),
            password: "hunter2".into(),
        };
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("consumer-secret"));
        assert!(!debug.contains("hunter2"));
    }
}
