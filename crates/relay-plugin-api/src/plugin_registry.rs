use crate::backend::LanguageBackend;

// Re-export inventory for the macro.
pub use inventory;

/// Describes a language backend to the core system.
///
/// This struct is created by the `relay_backend!` macro and collected
/// at link-time by the `inventory` crate.
pub struct BackendDescriptor {
    pub name: &'static str,
    pub probe_id: &'static str,
    pub factory: fn() -> Box<dyn LanguageBackend>,
}

inventory::collect!(BackendDescriptor);

/// Returns an iterator over all registered backends.
pub fn iter_backends() -> impl Iterator<Item = &'static BackendDescriptor> {
    inventory::iter::<BackendDescriptor>.into_iter()
}

/// Registers a backend crate with the `inventory` system.
///
/// ```rust,ignore
/// relay_backend! {
///     name: "kotlin",
///     probe_id: "relay.lang.kotlin",
///     factory: KotlinBackend::boxed
/// }
/// ```
#[macro_export]
macro_rules! relay_backend {
    (
        name: $name:expr,
        probe_id: $probe_id:expr,
        factory: $factory:expr
    ) => {
        $crate::inventory::submit! {
            $crate::BackendDescriptor {
                name: $name,
                probe_id: $probe_id,
                factory: $factory,
            }
        }
    };
}
