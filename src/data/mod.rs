//! Static content and engine configuration
//!
//! Definitions live in a registry filled once at startup, either from the
//! built-in catalog or from external RON files for easy modding.

pub mod catalog;
pub mod config;
pub mod loader;
pub mod registry;

pub use config::{ConfigError, EngineConfig, IdentificationConfig, LootConfig, ModifierConfig};
pub use loader::{export_default_content, load_content_dir, registry_from_dir, ContentError};
pub use registry::{Content, ContentRef, DefinitionRegistry, Domain, SharedRegistry};
