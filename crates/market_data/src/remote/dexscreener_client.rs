use async_trait::async_trait;
use common::{config::FetchConfig, models::PairRecord};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, error};

use crate::{remote::pairs_response::PairsResponse, traits::PairSource};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),
    #[error("failed to parse pairs response: {0}")]
    Decode(#[source] serde_json::Error),
}

#[derive(Clone)]
pub struct DexScreenerClient {
    client: Client,
    pairs_url: String,
}

impl DexScreenerClient {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent("dex_signal_bot/0.1.0")
            .timeout(config.timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            pairs_url: config.pairs_url.clone(),
        })
    }

    /// Uses a caller-built client, e.g. one with custom proxy settings.
    pub fn with_client(client: Client, pairs_url: impl Into<String>) -> Self {
        Self {
            client,
            pairs_url: pairs_url.into(),
        }
    }

    pub fn pairs_url(&self) -> &str {
        &self.pairs_url
    }

    pub async fn try_fetch_pairs(&self) -> Result<Vec<PairRecord>, FetchError> {
        let response = self
            .client
            .get(&self.pairs_url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await.map_err(FetchError::Transport)?;
        let data: PairsResponse = serde_json::from_slice(&body).map_err(FetchError::Decode)?;

        let pairs = data.into_records();
        debug!("Fetched {} pairs from {}", pairs.len(), self.pairs_url);
        Ok(pairs)
    }
}

#[async_trait]
impl PairSource for DexScreenerClient {
    async fn fetch_pairs(&self) -> Vec<PairRecord> {
        match self.try_fetch_pairs().await {
            Ok(pairs) => pairs,
            Err(e) => {
                error!("Failed to fetch pairs: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;

    /// Serves exactly one canned HTTP response and returns its URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{}/latest/dex/pairs/polygon", addr)
    }

    fn client_for(url: String) -> DexScreenerClient {
        let client = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        DexScreenerClient::with_client(client, url)
    }

    #[test]
    fn test_new_uses_configured_url() {
        let client = DexScreenerClient::new(&FetchConfig::default()).unwrap();

        assert_eq!(
            client.pairs_url(),
            "https://api.dexscreener.com/latest/dex/pairs/polygon"
        );
    }

    #[tokio::test]
    async fn test_returns_pairs_in_order() {
        let url = serve_once(
            "200 OK",
            r#"{"schemaVersion":"1.0.0","pairs":[
                {"dexId":"quickswap","baseToken":{"symbol":"WMATIC"},"quoteToken":{"symbol":"USDT"},"priceUsd":"0.5","priceChange":{"m5":-1.5}},
                {"dexId":"sushiswap","baseToken":{"symbol":"WETH"},"quoteToken":{"symbol":"USDC"},"priceUsd":"3000","priceChange":{"m5":0.1}}
            ]}"#,
        )
        .await;

        let pairs = client_for(url).fetch_pairs().await;

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].base_symbol(), Some("WMATIC"));
        assert_eq!(pairs[1].base_symbol(), Some("WETH"));
    }

    #[tokio::test]
    async fn test_missing_pairs_key_is_empty() {
        let url = serve_once("200 OK", r#"{"schemaVersion":"1.0.0"}"#).await;

        let pairs = client_for(url).try_fetch_pairs().await.unwrap();

        assert!(pairs.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_empty() {
        let url = serve_once("200 OK", "<html>gateway</html>").await;
        let client = client_for(url);

        assert!(client.fetch_pairs().await.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_rejected() {
        let url = serve_once("503 Service Unavailable", r#"{"pairs":[]}"#).await;
        let client = client_for(url);

        assert!(matches!(
            client.try_fetch_pairs().await,
            Err(FetchError::Status(status)) if status == StatusCode::SERVICE_UNAVAILABLE
        ));
    }

    #[tokio::test]
    async fn test_network_failure_is_empty() {
        // Bind then drop so the port is closed when we connect.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{}/pairs", addr));

        assert!(client.fetch_pairs().await.is_empty());
    }
}
