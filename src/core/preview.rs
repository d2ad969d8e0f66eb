use crate::domain::model::DocumentPreview;
use crate::utils::error::{ProxyError, Result};
use crate::utils::validation::validate_url;
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;

pub const PREVIEW_ITEMS: usize = 5;

/// 抓取任意外部 JSON 文件並產生摘要（項目數 + 前五筆）
pub struct DocumentPreviewer {
    client: Client,
}

impl DocumentPreviewer {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
        })
    }

    pub async fn preview(&self, url: &str) -> Result<DocumentPreview> {
        validate_url("url", url).map_err(|e| ProxyError::invalid_input(e.to_string()))?;

        tracing::debug!("📡 Fetching document for preview: {}", url);
        let document = self.fetch(url).await.map_err(|e| {
            // 細節只記在日誌，不回給呼叫端
            tracing::error!("❌ Preview fetch failed for {}: {}", url, e);
            ProxyError::UpstreamUnavailable {
                message: format!("failed to fetch {}", url),
            }
        })?;

        Ok(summarize(url, document))
    }

    async fn fetch(&self, url: &str) -> Result<Value> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::UpstreamStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.json().await?)
    }
}

pub fn summarize(source: &str, document: Value) -> DocumentPreview {
    let (item_count, items) = match document {
        Value::Array(items) => {
            let count = items.len();
            (count, items.into_iter().take(PREVIEW_ITEMS).collect())
        }
        Value::Object(map) => {
            let count = map.len();
            let items = map
                .into_iter()
                .take(PREVIEW_ITEMS)
                .map(|(key, value)| {
                    let mut entry = Map::new();
                    entry.insert(key, value);
                    Value::Object(entry)
                })
                .collect();
            (count, items)
        }
        other => (1, vec![other]),
    };

    DocumentPreview {
        source: source.to_string(),
        item_count,
        items,
    }
}
