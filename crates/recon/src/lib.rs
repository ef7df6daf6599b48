//! `vaultclean-recon`: credential vault export reconciliation engine.
//!
//! Pure engine crate: receives pre-parsed vault documents, returns the
//! cleaned entry list plus a report. No CLI or file IO dependencies.

pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod filter;
pub mod flag;
pub mod item;
pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod reuse;
pub mod summary;
pub mod uri;

pub use config::CleanupConfig;
pub use document::VaultDocument;
pub use engine::run;
pub use error::VaultError;
pub use item::{Folder, ItemKind, VaultItem};
pub use model::{CleanupInput, CleanupOutcome, CleanupReport, CleanupSummary};
pub use reuse::ReuseIndex;
