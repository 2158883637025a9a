//! Language Backend Bundle
//!
//! The single collection point for Relay's language backends. It depends on
//! every backend crate enabled by a feature, so the binary that depends on
//! the bundle links them and their `inventory` submissions become visible to
//! the capability registry and the dispatch table.
//!
//! Disabling a feature removes the backend from the binary; requests for its
//! languages then report that support is not available.

use relay_plugin_api::{iter_backends, BackendMetadata, LanguageBackend};

/// Metadata of every backend compiled into the bundle
///
/// Referencing each crate's metadata keeps the linker from discarding the
/// crate and the inventory submission that comes with it.
pub fn linked_backends() -> Vec<&'static BackendMetadata> {
    #[allow(unused_mut)]
    let mut linked: Vec<&'static BackendMetadata> = Vec::new();
    #[cfg(feature = "lang-kotlin")]
    linked.push(&relay_lang_kotlin::METADATA);
    #[cfg(feature = "lang-javascript")]
    linked.push(&relay_lang_javascript::METADATA);
    #[cfg(feature = "lang-python")]
    linked.push(&relay_lang_python::METADATA);
    #[cfg(feature = "lang-go")]
    linked.push(&relay_lang_go::METADATA);
    #[cfg(feature = "lang-rust")]
    linked.push(&relay_lang_rust::METADATA);
    linked
}

/// Instantiate every backend discovered through the inventory
pub fn all_backends() -> Vec<Box<dyn LanguageBackend>> {
    let linked = linked_backends();
    let backends: Vec<Box<dyn LanguageBackend>> = iter_backends()
        .map(|descriptor| {
            tracing::debug!(
                backend = descriptor.name,
                probe_id = descriptor.probe_id,
                "Discovered language backend via inventory"
            );
            (descriptor.factory)()
        })
        .collect();

    tracing::info!(
        backend_count = backends.len(),
        compiled = linked.len(),
        "Language backend discovery complete"
    );

    if backends.len() < linked.len() {
        tracing::warn!("Some linked backends were not discovered - inventory system may be broken");
    }

    backends
}
