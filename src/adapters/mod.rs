// Adapters layer: concrete implementations for external systems (registry http client, cache).

pub mod cache;
pub mod pubchem;
