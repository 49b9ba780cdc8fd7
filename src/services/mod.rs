// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod id_cache;
pub mod metadata_resolver;
pub mod reconciliation_service;


pub use id_cache::IdTranslationCache;

pub use metadata_resolver::{
    MetadataResolver,
    ProviderChoice,
};

pub use reconciliation_service::{
    ReconcilerConfig,
    ReconciliationService,
    TickReport,
};
