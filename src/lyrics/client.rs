//! Media backend lyrics client
//!
//! The backend serves lyric files by name:
//! GET /api/get_lrc/{name}.lrc -> {"lyrics": "<raw lrc text>"}
//! A missing file comes back as an empty string, not a 404.

use anyhow::Context;
use serde::Deserialize;

/// `get_lrc` response body
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LrcResponse {
    #[serde(default)]
    pub lyrics: String,
}

#[derive(Debug, Clone)]
pub struct LyricsClient {
    client: reqwest::Client,
    base_url: String,
}

impl LyricsClient {
    const USER_AGENT: &'static str = concat!("lyricview/", env!("CARGO_PKG_VERSION"));

    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Stream URL for a media file on the backend
    pub fn media_url(&self, file_name: &str) -> String {
        format!(
            "{}/api/get_mp3/{}",
            self.base_url,
            urlencoding::encode(file_name)
        )
    }

    fn lrc_url(&self, lrc_name: &str) -> String {
        format!(
            "{}/api/get_lrc/{}",
            self.base_url,
            urlencoding::encode(lrc_name)
        )
    }

    /// Raw lyric text for a lyric file name. Empty when the backend has none.
    pub async fn get_lrc(&self, lrc_name: &str) -> anyhow::Result<String> {
        let url = self.lrc_url(lrc_name);
        tracing::debug!(%url, "fetching lyrics");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(String::new());
        }
        if !response.status().is_success() {
            anyhow::bail!("lyrics backend error: {}", response.status());
        }

        let body: LrcResponse = response.json().await.context("decode get_lrc response")?;
        Ok(body.lyrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_are_encoded() {
        let client = LyricsClient::new("http://localhost:41004/").unwrap();
        assert_eq!(
            client.lrc_url("Song - Artist.lrc"),
            "http://localhost:41004/api/get_lrc/Song%20-%20Artist.lrc"
        );
        assert_eq!(
            client.media_url("a#b.mp3"),
            "http://localhost:41004/api/get_mp3/a%23b.mp3"
        );
    }

    #[test]
    fn test_decode_response() {
        let body: LrcResponse =
            serde_json::from_str(r#"{"lyrics":"[00:01]hi"}"#).unwrap();
        assert_eq!(body.lyrics, "[00:01]hi");

        let body: LrcResponse = serde_json::from_str("{}").unwrap();
        assert!(body.lyrics.is_empty());
    }
}
