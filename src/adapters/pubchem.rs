use crate::domain::model::{CompoundProperties, LookupNamespace};
use crate::domain::ports::{RegistryClient, ResponseCache};
use crate::utils::error::{ProxyError, Result};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Deserialize)]
struct IdentifierListResponse {
    #[serde(rename = "IdentifierList")]
    identifier_list: Option<IdentifierList>,
}

#[derive(Debug, Deserialize)]
struct IdentifierList {
    #[serde(rename = "CID", default)]
    cid: Vec<u64>,
}

#[derive(Debug, Deserialize)]
struct PropertyTableResponse {
    #[serde(rename = "PropertyTable")]
    property_table: PropertyTable,
}

#[derive(Debug, Deserialize)]
struct PropertyTable {
    #[serde(rename = "Properties", default)]
    properties: Vec<CompoundProperties>,
}

/// PubChem PUG REST 用戶端
pub struct PubChemClient {
    client: Client,
    base_url: Url,
    cache: Option<Arc<dyn ResponseCache>>,
}

impl PubChemClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        validate_url("base_url", &base_url)?;
        let parsed = Url::parse(&base_url).map_err(|e| ProxyError::InvalidConfigValueError {
            field: "base_url".to_string(),
            value: base_url.clone(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: parsed,
            cache: None,
        })
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// 以 base_url 加上逐段編碼的路徑組出完整 URL
    fn build_url(&self, segments: &[&str]) -> Result<String> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProxyError::InvalidConfigValueError {
                field: "base_url".to_string(),
                value: self.base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(url) {
                tracing::debug!("💾 Cache hit: {}", url);
                return Ok(cached);
            }
        }

        tracing::debug!("📡 Making API request to: {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(ProxyError::UpstreamStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let json: Value = response.json().await?;
        if let Some(cache) = &self.cache {
            cache.insert(url.to_string(), json.clone());
        }
        Ok(json)
    }
}

#[async_trait]
impl RegistryClient for PubChemClient {
    async fn lookup_identifier(&self, name: &str) -> Result<Vec<u64>> {
        let url = self.build_url(&["compound", "name", name, "cids", "JSON"])?;
        let json = self.get_json(&url).await?;
        let parsed: IdentifierListResponse = serde_json::from_value(json)?;
        Ok(parsed
            .identifier_list
            .map(|list| list.cid)
            .unwrap_or_default())
    }

    async fn fetch_properties(
        &self,
        cid: u64,
        property_names: &[&str],
    ) -> Result<CompoundProperties> {
        let cid_str = cid.to_string();
        let properties = property_names.join(",");
        let url =
            self.build_url(&["compound", "cid", &cid_str, "property", &properties, "JSON"])?;
        let json = self.get_json(&url).await?;
        let parsed: PropertyTableResponse = serde_json::from_value(json)?;

        parsed
            .property_table
            .properties
            .into_iter()
            .next()
            .ok_or_else(|| ProxyError::PropertyFetch {
                cid,
                reason: "empty property table".to_string(),
            })
    }

    async fn fetch_record(&self, namespace: LookupNamespace, identifier: &str) -> Result<Value> {
        let url = self.build_url(&["compound", namespace.as_str(), identifier, "JSON"])?;
        self.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::LruResponseCache;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> PubChemClient {
        PubChemClient::new(server.base_url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_build_url_encodes_segments() {
        let client =
            PubChemClient::new("https://pubchem.example.org/rest/pug/", Duration::from_secs(5))
                .unwrap();

        assert_eq!(
            client.build_url(&["compound", "name", "50-00-0", "cids", "JSON"]).unwrap(),
            "https://pubchem.example.org/rest/pug/compound/name/50-00-0/cids/JSON"
        );
        assert_eq!(
            client.build_url(&["compound", "name", "acetic acid", "JSON"]).unwrap(),
            "https://pubchem.example.org/rest/pug/compound/name/acetic%20acid/JSON"
        );
        assert_eq!(
            client.build_url(&["compound", "smiles", "a/b?c#d", "JSON"]).unwrap(),
            "https://pubchem.example.org/rest/pug/compound/smiles/a%2Fb%3Fc%23d/JSON"
        );
        assert_eq!(
            client.build_url(&["property", "TPSA,XLogP"]).unwrap(),
            "https://pubchem.example.org/rest/pug/property/TPSA,XLogP"
        );
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let err = PubChemClient::new("not a url", Duration::from_secs(5)).err().unwrap();
        assert!(matches!(err, ProxyError::InvalidConfigValueError { .. }));
    }

    #[tokio::test]
    async fn test_lookup_identifier_reads_cid_list() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/compound/name/50-00-0/cids/JSON");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"IdentifierList": {"CID": [712, 713]}}));
        });

        let cids = client_for(&server).lookup_identifier("50-00-0").await.unwrap();

        mock.assert();
        assert_eq!(cids, vec![712, 713]);
    }

    #[tokio::test]
    async fn test_lookup_identifier_not_found_is_status_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/compound/name/0-00-0/cids/JSON");
            then.status(404).json_body(serde_json::json!({
                "Fault": {"Code": "PUGREST.NotFound", "Message": "No CID found"}
            }));
        });

        let err = client_for(&server)
            .lookup_identifier("0-00-0")
            .await
            .unwrap_err();
        assert!(matches!(err, ProxyError::UpstreamStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_properties_requests_property_list() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/compound/cid/702/property/MolecularWeight,XLogP/JSON");
            then.status(200).json_body(serde_json::json!({
                "PropertyTable": {"Properties": [
                    {"CID": 702, "MolecularWeight": "46.07", "XLogP": -0.1}
                ]}
            }));
        });

        let props = client_for(&server)
            .fetch_properties(702, &["MolecularWeight", "XLogP"])
            .await
            .unwrap();

        mock.assert();
        assert_eq!(props.molecular_weight, Some(46.07));
        assert_eq!(props.xlogp, Some(-0.1));
    }

    #[tokio::test]
    async fn test_fetch_properties_empty_table_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/compound/cid/1/property/TPSA/JSON");
            then.status(200)
                .json_body(serde_json::json!({"PropertyTable": {"Properties": []}}));
        });

        let err = client_for(&server)
            .fetch_properties(1, &["TPSA"])
            .await
            .unwrap_err();
        assert!(matches!(err, ProxyError::PropertyFetch { cid: 1, .. }));
    }

    #[tokio::test]
    async fn test_cached_response_skips_second_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/compound/cid/712/JSON");
            then.status(200)
                .json_body(serde_json::json!({"PC_Compounds": [{"id": {"id": {"cid": 712}}}]}));
        });

        let cache = Arc::new(LruResponseCache::new(10));
        let client = client_for(&server).with_cache(cache.clone());

        let first = client.fetch_record(LookupNamespace::Cid, "712").await.unwrap();
        let second = client.fetch_record(LookupNamespace::Cid, "712").await.unwrap();

        mock.assert_hits(1);
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }
}
