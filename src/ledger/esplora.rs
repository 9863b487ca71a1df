//! Esplora HTTP client (`GET /api/address/{address}`)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{address::Address, error::LookupError};

use super::BalanceLookup;

pub const BLOCKSTREAM_URL: &str = "https://blockstream.info";

/// Response body of the address endpoint
#[derive(Debug, Deserialize)]
pub struct AddressStats {
    pub chain_stats: TxoStats,
    #[serde(default)]
    pub mempool_stats: Option<TxoStats>,
}

#[derive(Debug, Deserialize)]
pub struct TxoStats {
    /// Total satoshis ever received
    pub funded_txo_sum: u64,
    #[serde(default)]
    pub spent_txo_sum: u64,
    #[serde(default)]
    pub tx_count: u64,
}

#[derive(Debug, Clone)]
pub struct EsploraClient {
    http: Client,
    base_url: String,
}

impl EsploraClient {
    /// Create a client for the given base URL with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch and parse the stats for one address
    pub async fn address_stats(&self, address: &Address) -> Result<AddressStats, LookupError> {
        let url = format!("{}/api/address/{}", self.base_url, address);
        let resp = self.http.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        let body = resp.text().await?;
        tracing::debug!(address = %address, status = status.as_u16(), body = %body, "Ledger response");

        serde_json::from_str(&body).map_err(|e| LookupError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl BalanceLookup for EsploraClient {
    async fn lookup(&self, address: &Address) -> Result<u64, LookupError> {
        let stats = self.address_stats(address).await?;

        if let Some(mempool) = &stats.mempool_stats {
            tracing::debug!(
                address = %address,
                mempool_funded = mempool.funded_txo_sum,
                "Unconfirmed funding ignored"
            );
        }

        Ok(stats.chain_stats.funded_txo_sum)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ledger::Funding;
    use axum::{extract::Path, http::StatusCode, routing::get, Router};
    use tokio::net::TcpListener;

    pub(crate) fn address(pubkey_hex: &str) -> Address {
        Address::from_pubkey_bytes(&hex::decode(pubkey_hex).unwrap()).unwrap()
    }

    fn empty() -> Address {
        address("0204664c60ceabd82967055ccbd0f56a1585dfbd42032656efa501c463b16fbdfe")
    }

    fn funded() -> Address {
        address("03aaeb52dd7494c361049de67cc680e83ebcbbbdbeb13637d92cd845f70308af5e")
    }

    fn broken() -> Address {
        address("02dfcaec532010d704860e20ad6aff8cf3477164ffb02f93d45c552dadc70ed24f")
    }

    fn garbage() -> Address {
        address("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
    }

    async fn stub_ledger() -> String {
        let (e, f, b, g) = (empty(), funded(), broken(), garbage());
        let app = Router::new().route(
            "/api/address/:address",
            get(move |Path(requested): Path<String>| {
                let (e, f, b, g) = (e.clone(), f.clone(), b.clone(), g.clone());
                async move {
                    if requested == e.as_str() {
                        (StatusCode::OK, r#"{"address":"x","chain_stats":{"funded_txo_sum":0,"spent_txo_sum":0,"tx_count":0},"mempool_stats":{"funded_txo_sum":0}}"#.to_string())
                    } else if requested == f.as_str() {
                        (StatusCode::OK, r#"{"chain_stats":{"funded_txo_sum":125000,"spent_txo_sum":125000,"tx_count":2}}"#.to_string())
                    } else if requested == b.as_str() {
                        (StatusCode::INTERNAL_SERVER_ERROR, "upstream down".to_string())
                    } else if requested == g.as_str() {
                        (StatusCode::OK, "<html>rate limited</html>".to_string())
                    } else {
                        (StatusCode::BAD_REQUEST, "Invalid Bitcoin address".to_string())
                    }
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let local = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", local)
    }

    #[tokio::test]
    async fn zero_funded_is_empty() {
        let client = EsploraClient::new(stub_ledger().await, Duration::from_secs(5)).unwrap();
        assert_eq!(Funding::from(client.lookup(&empty()).await), Funding::Empty);
    }

    #[tokio::test]
    async fn funded_total_ignores_spends() {
        let client = EsploraClient::new(stub_ledger().await, Duration::from_secs(5)).unwrap();
        assert_eq!(client.lookup(&funded()).await, Ok(125000));
    }

    #[tokio::test]
    async fn server_error_is_status() {
        let client = EsploraClient::new(stub_ledger().await, Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.lookup(&broken()).await,
            Err(LookupError::Status { status: 500, body: "upstream down".to_string() })
        );
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let client = EsploraClient::new(stub_ledger().await, Duration::from_secs(5)).unwrap();
        assert!(matches!(client.lookup(&garbage()).await, Err(LookupError::Malformed(_))));
    }

    #[tokio::test]
    async fn closed_port_is_transport_error_and_unknown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let local = listener.local_addr().unwrap();
        drop(listener);

        let client = EsploraClient::new(format!("http://{}/", local), Duration::from_secs(2)).unwrap();
        let result = client.lookup(&empty()).await;
        assert!(matches!(result, Err(LookupError::Transport(_))));

        let funding = Funding::from(result);
        assert!(matches!(funding, Funding::Unknown(_)));
        assert_ne!(funding, Funding::Empty);
    }

    #[test]
    fn trims_trailing_slash() {
        let client = EsploraClient::new("http://localhost:3000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
    }
}
