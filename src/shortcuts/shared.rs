// Process-wide registry handle
//
// Reads are lock-free snapshots. Reconfiguration swaps the whole registry in
// one step; readers holding an older snapshot finish with it.

use std::sync::Arc;

use arc_swap::ArcSwap;

use super::DescriptorRegistry;

#[derive(Debug, Clone)]
pub struct SharedRegistry {
    inner: Arc<ArcSwap<DescriptorRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: DescriptorRegistry) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(registry)),
        }
    }

    /// Current registry snapshot
    pub fn load(&self) -> Arc<DescriptorRegistry> {
        self.inner.load_full()
    }

    /// Administrative replacement of the registry
    pub fn reconfigure(&self, registry: DescriptorRegistry) {
        self.inner.store(Arc::new(registry));
        tracing::info!("Descriptor registry reconfigured");
    }
}

impl Default for SharedRegistry {
    fn default() -> Self {
        Self::new(DescriptorRegistry::default())
    }
}

impl From<DescriptorRegistry> for SharedRegistry {
    fn from(registry: DescriptorRegistry) -> Self {
        Self::new(registry)
    }
}
