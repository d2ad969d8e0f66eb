use crate::domain::model::{CompoundInput, CompoundProperties, CompoundRecord, PROPERTY_NAMES};
use crate::domain::ports::RegistryClient;
use crate::utils::error::{ProxyError, Result};
use futures::stream::{self, StreamExt};
use std::sync::Arc;

pub const DEFAULT_CONCURRENT_REQUESTS: usize = 5;

/// 單筆輸入的處理結果
enum ItemOutcome {
    Augmented(CompoundRecord),
    Skipped { transport: bool },
}

/// 濃度正規化 + CAS→CID 解析 + 屬性查詢
pub struct CompoundAugmentor {
    client: Arc<dyn RegistryClient>,
    concurrent_requests: usize,
}

impl CompoundAugmentor {
    pub fn new(client: Arc<dyn RegistryClient>) -> Self {
        Self {
            client,
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
        }
    }

    pub fn with_concurrency(mut self, concurrent_requests: usize) -> Self {
        self.concurrent_requests = concurrent_requests.max(1);
        self
    }

    /// 先以全部輸入正規化，再逐筆查詢；查不到的輸入直接略過，輸出保持輸入順序。
    pub async fn augment(&self, inputs: &[CompoundInput]) -> Result<Vec<CompoundRecord>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let normalized = normalize_quantities(inputs)?;
        tracing::info!("🧪 Augmenting {} compounds", inputs.len());

        // 項目以擁有所有權的形式進入 stream，handler 的 future 需要 Send
        let outcomes: Vec<ItemOutcome> = stream::iter(inputs.iter().cloned().zip(normalized))
            .map(|(input, quantity)| async move { self.augment_one(&input, quantity).await })
            .buffered(self.concurrent_requests)
            .collect()
            .await;

        // 全部都是連線層失敗，代表上游整個不可用
        if outcomes
            .iter()
            .all(|o| matches!(o, ItemOutcome::Skipped { transport: true }))
        {
            return Err(ProxyError::UpstreamUnavailable {
                message: format!("all {} registry lookups failed to connect", inputs.len()),
            });
        }

        let records: Vec<CompoundRecord> = outcomes
            .into_iter()
            .filter_map(|o| match o {
                ItemOutcome::Augmented(record) => Some(record),
                ItemOutcome::Skipped { .. } => None,
            })
            .collect();

        tracing::info!(
            "✅ Augmented {} of {} compounds",
            records.len(),
            inputs.len()
        );
        Ok(records)
    }

    async fn augment_one(&self, input: &CompoundInput, normalized_quantity: f64) -> ItemOutcome {
        let cid = match self.resolve(&input.identifier).await {
            Ok(cid) => cid,
            Err(e) => {
                tracing::warn!("⚠️ Skipping {}: {}", input.identifier, e);
                return ItemOutcome::Skipped {
                    transport: e.is_transport(),
                };
            }
        };

        match self.client.fetch_properties(cid, PROPERTY_NAMES).await {
            Ok(properties) => ItemOutcome::Augmented(build_record(
                &input.identifier,
                cid,
                normalized_quantity,
                properties,
            )),
            Err(e) => {
                let transport = e.is_transport();
                let err = ProxyError::PropertyFetch {
                    cid,
                    reason: e.to_string(),
                };
                tracing::warn!("⚠️ Skipping {}: {}", input.identifier, err);
                ItemOutcome::Skipped { transport }
            }
        }
    }

    async fn resolve(&self, identifier: &str) -> Result<u64> {
        let cids = self
            .client
            .lookup_identifier(identifier)
            .await
            .map_err(|e| match e {
                // 保留傳輸層錯誤原樣，供上層判斷整體是否失聯
                e if e.is_transport() => e,
                e => ProxyError::Resolution {
                    identifier: identifier.to_string(),
                    reason: e.to_string(),
                },
            })?;

        cids.first().copied().ok_or_else(|| ProxyError::Resolution {
            identifier: identifier.to_string(),
            reason: "no CID returned".to_string(),
        })
    }
}

/// 依總量換算成百分比，總和為 100
pub fn normalize_quantities(inputs: &[CompoundInput]) -> Result<Vec<f64>> {
    if let Some(bad) = inputs
        .iter()
        .find(|i| !i.quantity.is_finite() || i.quantity < 0.0)
    {
        return Err(ProxyError::invalid_input(format!(
            "quantity for {} must be a non-negative number",
            bad.identifier
        )));
    }

    let total: f64 = inputs.iter().map(|i| i.quantity).sum();
    if total == 0.0 {
        return Err(ProxyError::invalid_input(
            "total quantity is zero, cannot normalize",
        ));
    }
    if !total.is_finite() {
        return Err(ProxyError::invalid_input(
            "total quantity overflows, cannot normalize",
        ));
    }

    Ok(inputs.iter().map(|i| i.quantity / total * 100.0).collect())
}

fn build_record(
    identifier: &str,
    cid: u64,
    normalized_quantity: f64,
    properties: CompoundProperties,
) -> CompoundRecord {
    let canonical_structure = properties
        .canonical_smiles
        .or(properties.isomeric_smiles);

    let record = CompoundRecord {
        identifier: identifier.to_string(),
        cid,
        normalized_quantity,
        canonical_structure,
        polar_surface_area: properties.tpsa,
        molecular_weight: properties.molecular_weight,
        log_p: properties.xlogp,
        hydrogen_bond_acceptor_count: properties.hbond_acceptor_count,
        complexity: properties.complexity,
    };

    for (field, missing) in [
        ("canonical_structure", record.canonical_structure.is_none()),
        ("polar_surface_area", record.polar_surface_area.is_none()),
        ("molecular_weight", record.molecular_weight.is_none()),
        ("log_p", record.log_p.is_none()),
        (
            "hydrogen_bond_acceptor_count",
            record.hydrogen_bond_acceptor_count.is_none(),
        ),
        ("complexity", record.complexity.is_none()),
    ] {
        if missing {
            tracing::info!("ℹ️ {} (CID {}): {} missing, using null", identifier, cid, field);
        }
    }

    record
}
