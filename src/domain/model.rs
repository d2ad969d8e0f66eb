use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 請求中的一筆化合物：外部登錄號（通常是 CAS 號）與用量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundInput {
    pub identifier: String,
    pub quantity: f64,
}

impl CompoundInput {
    pub fn new(identifier: impl Into<String>, quantity: f64) -> Self {
        Self {
            identifier: identifier.into(),
            quantity,
        }
    }
}

/// 補上 PubChem 屬性後的輸出紀錄，缺少的屬性序列化為 null
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundRecord {
    pub identifier: String,
    pub cid: u64,
    pub normalized_quantity: f64,
    pub canonical_structure: Option<String>,
    pub polar_surface_area: Option<f64>,
    pub molecular_weight: Option<f64>,
    pub log_p: Option<f64>,
    pub hydrogen_bond_acceptor_count: Option<i64>,
    pub complexity: Option<f64>,
}

/// PubChem `PropertyTable.Properties` 的單一項目。
///
/// PubChem 會把 `MolecularWeight` 以字串回傳，所以數值欄位同時接受數字與數字字串。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompoundProperties {
    #[serde(rename = "CID")]
    pub cid: Option<u64>,
    #[serde(rename = "CanonicalSMILES")]
    pub canonical_smiles: Option<String>,
    #[serde(rename = "IsomericSMILES")]
    pub isomeric_smiles: Option<String>,
    #[serde(rename = "TPSA", default, deserialize_with = "lenient_f64")]
    pub tpsa: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub molecular_weight: Option<f64>,
    #[serde(rename = "XLogP", default, deserialize_with = "lenient_f64")]
    pub xlogp: Option<f64>,
    #[serde(rename = "HBondAcceptorCount", default, deserialize_with = "lenient_i64")]
    pub hbond_acceptor_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub complexity: Option<f64>,
}

/// 向 PubChem 要求的屬性清單，順序即 URL 中的順序
pub const PROPERTY_NAMES: &[&str] = &[
    "CanonicalSMILES",
    "IsomericSMILES",
    "TPSA",
    "MolecularWeight",
    "XLogP",
    "HBondAcceptorCount",
    "Complexity",
];

/// 外部 JSON 文件的摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPreview {
    pub source: String,
    pub item_count: usize,
    pub items: Vec<Value>,
}

/// 代理端點允許的 PubChem 查詢命名空間
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupNamespace {
    Name,
    Cid,
    Smiles,
    InchiKey,
}

impl LookupNamespace {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "cid" => Some(Self::Cid),
            "smiles" => Some(Self::Smiles),
            "inchikey" => Some(Self::InchiKey),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Cid => "cid",
            Self::Smiles => "smiles",
            Self::InchiKey => "inchikey",
        }
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn lenient_i64<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}
