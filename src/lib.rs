pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{cache::LruResponseCache, pubchem::PubChemClient};
pub use app::{build_router, AppState};
pub use core::{augmentor::CompoundAugmentor, preview::DocumentPreviewer};
pub use domain::model::{CompoundInput, CompoundRecord, DocumentPreview, LookupNamespace};
pub use utils::error::{ProxyError, Result};
