use crate::domain::model::{CompoundProperties, LookupNamespace};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// 外部化合物登錄服務（PubChem）的唯一入口
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// 名稱（例如 CAS 號）轉 CID 清單
    async fn lookup_identifier(&self, name: &str) -> Result<Vec<u64>>;

    async fn fetch_properties(&self, cid: u64, property_names: &[&str])
        -> Result<CompoundProperties>;

    /// 完整紀錄，原樣回傳上游 JSON
    async fn fetch_record(&self, namespace: LookupNamespace, identifier: &str) -> Result<Value>;
}

/// 以請求 URL 為鍵的回應快取
pub trait ResponseCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn insert(&self, key: String, value: Value);
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait ConfigProvider: Send + Sync {
    fn bind_addr(&self) -> &str;
    fn base_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn cache_capacity(&self) -> usize;
    fn concurrent_requests(&self) -> usize;
}
