pub mod augmentor;
pub mod preview;

pub use crate::domain::model::{CompoundInput, CompoundRecord, DocumentPreview};
pub use crate::domain::ports::{ConfigProvider, RegistryClient, ResponseCache};
pub use crate::utils::error::Result;
