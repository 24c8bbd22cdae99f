//! Remote selector resolution via the 4byte.directory API

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::ResolverConfig;
use crate::domain::abi::{sort_candidates, CandidateSignature};
use crate::domain::calldata::FunctionSelector;

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("directory returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One page of `GET /api/v1/signatures/`
#[derive(Debug, Deserialize)]
struct SignaturePage {
    #[serde(default)]
    results: Vec<CandidateSignature>,
}

/// Looks up the text signatures registered for a selector.
///
/// Implementations return candidates sorted ascending by id. An empty list
/// means the selector is unknown, which is not an error.
#[async_trait]
pub trait SignatureResolver: Send + Sync {
    async fn lookup(
        &self,
        selector: &FunctionSelector,
    ) -> Result<Vec<CandidateSignature>, ResolverError>;
}

/// Parse a signature page body into sorted candidates
pub fn parse_results(body: &str) -> Result<Vec<CandidateSignature>, ResolverError> {
    let page: SignaturePage = serde_json::from_str(body)?;
    let mut results = page.results;
    sort_candidates(&mut results);
    Ok(results)
}

/// HTTP client for 4byte.directory. No caching, no retries.
#[derive(Debug, Clone)]
pub struct FourByteClient {
    http: reqwest::Client,
    api_url: String,
}

impl FourByteClient {
    pub fn new(config: &ResolverConfig) -> Result<Self, ResolverError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_url: config.api_url.clone(),
        })
    }

    pub fn lookup_url(&self, selector: &FunctionSelector) -> String {
        format!("{}?hex_signature={}", self.api_url, selector.to_lookup_hex())
    }
}

#[async_trait]
impl SignatureResolver for FourByteClient {
    async fn lookup(
        &self,
        selector: &FunctionSelector,
    ) -> Result<Vec<CandidateSignature>, ResolverError> {
        let url = self.lookup_url(selector);
        tracing::info!(selector = %selector, "looking up selector");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(selector = %selector, %status, "signature directory error");
            return Err(ResolverError::Status(status));
        }

        let body = response.text().await?;
        let results = parse_results(&body)?;
        tracing::info!(selector = %selector, candidates = results.len(), "lookup finished");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calldata::split;

    fn selector(hex: &str) -> FunctionSelector {
        split(hex, true).unwrap().selector.unwrap()
    }

    #[test]
    fn test_parse_results_sorted() {
        let body = r#"{
            "count": 2,
            "next": null,
            "previous": null,
            "results": [
                {"id": 161159, "created_at": "2019-09-24T11:36:57.296021Z",
                 "text_signature": "many_msg_babbage(bytes1)", "hex_signature": "0xa9059cbb",
                 "bytes_signature": "©\u0005\u009c»"},
                {"id": 145, "created_at": "2016-07-09T03:58:28.234977Z",
                 "text_signature": "transfer(address,uint256)", "hex_signature": "0xa9059cbb",
                 "bytes_signature": "©\u0005\u009c»"}
            ]
        }"#;
        let results = parse_results(body).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], CandidateSignature::new(145, "transfer(address,uint256)"));
        assert_eq!(results[1].id, 161159);
    }

    #[test]
    fn test_parse_results_empty_or_missing() {
        assert!(parse_results(r#"{"count":0,"results":[]}"#).unwrap().is_empty());
        assert!(parse_results(r#"{"detail":"nothing"}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_results_garbage() {
        let err = parse_results("<html>502</html>").unwrap_err();
        assert!(matches!(err, ResolverError::Parse(_)));
    }

    #[test]
    fn test_lookup_url() {
        let client = FourByteClient::new(&ResolverConfig::default()).unwrap();
        assert_eq!(
            client.lookup_url(&selector("0xA9059CBB")),
            "https://www.4byte.directory/api/v1/signatures/?hex_signature=0xa9059cbb"
        );
    }

    #[tokio::test]
    #[ignore] // hits the live directory
    async fn test_lookup_transfer_selector() {
        let client = FourByteClient::new(&ResolverConfig::default()).unwrap();
        let results = client.lookup(&selector("0xa9059cbb")).await.unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].text, "transfer(address,uint256)");
    }
}
