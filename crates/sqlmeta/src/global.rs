//! Process-wide default registry.

use std::sync::{Arc, OnceLock};

use sqlmeta_core::MetadataRegistry;

static GLOBAL_REGISTRY: OnceLock<Arc<MetadataRegistry>> = OnceLock::new();

/// Install the process-wide registry.
///
/// Only the first call has an effect; later registries are dropped and
/// `false` is returned.
pub fn set_global_shared_registry(registry: Arc<MetadataRegistry>) -> bool {
    let installed = GLOBAL_REGISTRY.set(registry).is_ok();
    if installed {
        tracing::debug!("Installed global metadata registry");
    } else {
        tracing::warn!("Global metadata registry already set, ignoring replacement");
    }
    installed
}

/// Convenience wrapper around [`set_global_shared_registry`].
pub fn set_global_registry(registry: MetadataRegistry) -> bool {
    set_global_shared_registry(Arc::new(registry))
}

/// The process-wide registry, if one was installed.
pub fn global_registry() -> Option<Arc<MetadataRegistry>> {
    GLOBAL_REGISTRY.get().cloned()
}
