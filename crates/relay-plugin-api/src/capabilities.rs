//! Capability registry
//!
//! Answers "is the backend for this language installed?" and memoizes the
//! answer for the lifetime of the process. Java is always available and
//! `Unknown` never is; neither is cached nor probed. Every other language is
//! probed once per cache generation through a pluggable [`CapabilityProbe`].
//!
//! Concurrent first lookups may probe the same language more than once. The
//! last writer wins and every writer stores the same answer for a well-behaved
//! probe. An answer from a probe that was replaced while it ran is returned to
//! its caller but never stored.

use crate::language::SupportedLanguage;
use crate::plugin_registry::iter_backends;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a probe could not confirm a backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// No backend registered under the probe id
    #[error("backend '{0}' not found")]
    ClassNotFound(String),

    /// A backend was found but could not be loaded
    #[error("backend '{probe_id}' failed to link: {message}")]
    Linkage { probe_id: String, message: String },

    /// Anything else that went wrong while probing
    #[error("probe for '{probe_id}' failed: {message}")]
    Runtime { probe_id: String, message: String },
}

/// Strategy used to check whether a backend is present
pub trait CapabilityProbe: Send + Sync {
    /// Whether the backend identified by `probe_id` can be used
    fn probe(&self, probe_id: &str) -> Result<bool, ProbeError>;
}

/// Default probe: a backend is present iff a backend crate linked into the
/// binary registered a descriptor carrying the probe id.
#[derive(Debug, Default, Clone, Copy)]
pub struct InventoryProbe;

impl CapabilityProbe for InventoryProbe {
    fn probe(&self, probe_id: &str) -> Result<bool, ProbeError> {
        if iter_backends().any(|descriptor| descriptor.probe_id == probe_id) {
            Ok(true)
        } else {
            Err(ProbeError::ClassNotFound(probe_id.to_string()))
        }
    }
}

/// Identifier probed for a language's backend. Java and Unknown have none.
pub fn probe_id(language: SupportedLanguage) -> Option<&'static str> {
    match language {
        SupportedLanguage::Kotlin => Some("relay.lang.kotlin"),
        SupportedLanguage::JavaScript | SupportedLanguage::TypeScript => {
            Some("relay.lang.javascript")
        }
        SupportedLanguage::Python => Some("relay.lang.python"),
        SupportedLanguage::Go => Some("relay.lang.go"),
        SupportedLanguage::Rust => Some("relay.lang.rust"),
        SupportedLanguage::Java | SupportedLanguage::Unknown => None,
    }
}

static GLOBAL: Lazy<Arc<CapabilityRegistry>> = Lazy::new(|| Arc::new(CapabilityRegistry::new()));

/// The current probe and how many times it has been replaced
struct ProbeSlot {
    probe: Arc<dyn CapabilityProbe>,
    generation: u64,
}

/// Memoized language availability
pub struct CapabilityRegistry {
    cache: DashMap<SupportedLanguage, bool>,
    probe: RwLock<ProbeSlot>,
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityRegistry {
    /// Registry backed by the link-time inventory
    pub fn new() -> Self {
        Self::with_probe(Arc::new(InventoryProbe))
    }

    /// Registry backed by a custom probe
    pub fn with_probe(probe: Arc<dyn CapabilityProbe>) -> Self {
        Self {
            cache: DashMap::new(),
            probe: RwLock::new(ProbeSlot {
                probe,
                generation: 0,
            }),
        }
    }

    /// The process-wide registry
    pub fn global() -> Arc<CapabilityRegistry> {
        Arc::clone(&GLOBAL)
    }

    /// Probe id for a language
    pub fn probe_id(&self, language: SupportedLanguage) -> Option<&'static str> {
        probe_id(language)
    }

    /// Whether requests for `language` can be served
    pub fn is_available(&self, language: SupportedLanguage) -> bool {
        match language {
            SupportedLanguage::Java => return true,
            SupportedLanguage::Unknown => return false,
            _ => {}
        }

        if let Some(cached) = self.cache.get(&language) {
            return *cached;
        }

        let Some(id) = probe_id(language) else {
            return false;
        };
        let (probe, generation) = {
            let slot = self.probe.read();
            (Arc::clone(&slot.probe), slot.generation)
        };
        let available = run_probe(probe.as_ref(), language, id);

        // Held across the check and the insert so a replacement cannot clear
        // the cache in between
        let slot = self.probe.read();
        if slot.generation == generation {
            self.cache.insert(language, available);
        } else {
            debug!(language = %language, "Probe replaced while running; answer not cached");
        }
        available
    }

    fn replace_probe(&self, probe: Arc<dyn CapabilityProbe>) {
        let mut slot = self.probe.write();
        slot.probe = probe;
        slot.generation += 1;
        self.cache.clear();
    }

    /// Replace the probe. Cached answers from the previous probe are dropped.
    pub fn set_probe(&self, probe: Arc<dyn CapabilityProbe>) {
        self.replace_probe(probe);
    }

    /// Forget every cached answer and go back to the inventory probe
    pub fn clear_cache(&self) {
        self.replace_probe(Arc::new(InventoryProbe));
    }

    /// Availability of every supported language, keyed by lowercase name
    pub fn availability_map(&self) -> BTreeMap<String, bool> {
        SupportedLanguage::supported()
            .map(|language| (language.as_key().to_string(), self.is_available(language)))
            .collect()
    }

    /// Number of cached entries
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

fn run_probe(probe: &dyn CapabilityProbe, language: SupportedLanguage, id: &str) -> bool {
    match catch_unwind(AssertUnwindSafe(|| probe.probe(id))) {
        Ok(Ok(available)) => {
            debug!(language = %language, probe_id = id, available, "Probed backend");
            available
        }
        Ok(Err(e)) => {
            debug!(language = %language, probe_id = id, error = %e, "Backend not available");
            false
        }
        Err(_) => {
            warn!(language = %language, probe_id = id, "Capability probe panicked");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serial_test::serial;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::thread;

    #[derive(Default)]
    struct CountingProbe {
        calls: AtomicUsize,
    }

    impl CapabilityProbe for CountingProbe {
        fn probe(&self, probe_id: &str) -> Result<bool, ProbeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(probe_id == "relay.lang.python")
        }
    }

    struct FailingProbe;

    impl CapabilityProbe for FailingProbe {
        fn probe(&self, probe_id: &str) -> Result<bool, ProbeError> {
            Err(ProbeError::Linkage {
                probe_id: probe_id.to_string(),
                message: "incompatible version".to_string(),
            })
        }
    }

    struct PanickingProbe;

    impl CapabilityProbe for PanickingProbe {
        fn probe(&self, _probe_id: &str) -> Result<bool, ProbeError> {
            panic!("probe exploded");
        }
    }

    #[test]
    fn test_java_and_unknown_never_probe() {
        let probe = Arc::new(CountingProbe::default());
        let registry = CapabilityRegistry::with_probe(probe.clone());

        assert!(registry.is_available(SupportedLanguage::Java));
        assert!(!registry.is_available(SupportedLanguage::Unknown));
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
        assert_eq!(registry.cached_len(), 0);
    }

    #[test]
    fn test_answers_are_memoized() {
        let probe = Arc::new(CountingProbe::default());
        let registry = CapabilityRegistry::with_probe(probe.clone());

        assert!(registry.is_available(SupportedLanguage::Python));
        assert!(registry.is_available(SupportedLanguage::Python));
        assert!(!registry.is_available(SupportedLanguage::Go));
        assert!(!registry.is_available(SupportedLanguage::Go));
        assert_eq!(probe.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_probe_errors_and_panics_mean_unavailable() {
        let registry = CapabilityRegistry::with_probe(Arc::new(FailingProbe));
        assert!(!registry.is_available(SupportedLanguage::Kotlin));

        let registry = CapabilityRegistry::with_probe(Arc::new(PanickingProbe));
        assert!(!registry.is_available(SupportedLanguage::Rust));
        assert_eq!(registry.cached_len(), 1);
    }

    #[test]
    fn test_set_probe_drops_cached_answers() {
        let registry = CapabilityRegistry::with_probe(Arc::new(FailingProbe));
        assert!(!registry.is_available(SupportedLanguage::Python));

        registry.set_probe(Arc::new(CountingProbe::default()));
        assert!(registry.is_available(SupportedLanguage::Python));
    }

    /// Answers `true` once the test releases it
    struct GatedProbe {
        started: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl CapabilityProbe for GatedProbe {
        fn probe(&self, _probe_id: &str) -> Result<bool, ProbeError> {
            self.started.lock().send(()).unwrap();
            self.release.lock().recv().unwrap();
            Ok(true)
        }
    }

    #[test]
    fn test_stale_answer_is_not_cached_after_replacement() {
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let registry = Arc::new(CapabilityRegistry::with_probe(Arc::new(GatedProbe {
            started: Mutex::new(started_tx),
            release: Mutex::new(release_rx),
        })));

        let lookup = {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.is_available(SupportedLanguage::Python))
        };
        started_rx.recv().unwrap();
        registry.set_probe(Arc::new(FailingProbe));
        release_tx.send(()).unwrap();

        assert!(lookup.join().unwrap());
        assert_eq!(registry.cached_len(), 0);
        assert!(!registry.is_available(SupportedLanguage::Python));
    }

    #[test]
    fn test_typescript_shares_javascript_probe_id() {
        assert_eq!(
            probe_id(SupportedLanguage::TypeScript),
            probe_id(SupportedLanguage::JavaScript)
        );
        assert_eq!(probe_id(SupportedLanguage::Java), None);
    }

    #[test]
    fn test_availability_map_omits_unknown() {
        let registry = CapabilityRegistry::with_probe(Arc::new(CountingProbe::default()));
        let map = registry.availability_map();
        assert_eq!(map.len(), 7);
        assert_eq!(map.get("java"), Some(&true));
        assert_eq!(map.get("python"), Some(&true));
        assert_eq!(map.get("go"), Some(&false));
        assert!(!map.contains_key("unknown"));
    }

    #[test]
    #[serial]
    fn test_global_clear_cache_restores_default_probe() {
        let global = CapabilityRegistry::global();
        global.set_probe(Arc::new(CountingProbe::default()));
        assert!(global.is_available(SupportedLanguage::Python));

        global.clear_cache();
        assert_eq!(global.cached_len(), 0);
        // No backend crate is linked into this test binary
        assert!(!global.is_available(SupportedLanguage::Python));
        global.clear_cache();
    }
}
