//! Fullscreen capability with runtime variant selection.
//!
//! Browsers expose fullscreen under several vendor-prefixed names.  The host
//! registers one `FullscreenBackend` per variant and `Fullscreen::detect`
//! keeps the first the platform supports; callers only ever see the single
//! request/exit/query/subscribe contract below.

use tracing::{debug, info};

use vigil_contracts::error::PlatformError;

use crate::traits::{FullscreenBackend, SubscriptionId};

pub struct Fullscreen {
    backend: Option<Box<dyn FullscreenBackend>>,
}

impl Fullscreen {
    /// Keep the first supported backend from `candidates`, in order.
    pub fn detect(candidates: Vec<Box<dyn FullscreenBackend>>) -> Self {
        let backend = candidates.into_iter().find(|b| {
            let supported = b.is_supported();
            debug!(variant = b.name(), supported, "probing fullscreen variant");
            supported
        });
        match &backend {
            Some(b) => info!(variant = b.name(), "fullscreen variant selected"),
            None => info!("no fullscreen variant supported"),
        }
        Self { backend }
    }

    /// A capability where every request is rejected as unsupported.
    pub fn unsupported() -> Self {
        Self { backend: None }
    }

    pub fn variant(&self) -> Option<&str> {
        self.backend.as_deref().map(|b| b.name())
    }

    pub fn request(&self) -> Result<(), PlatformError> {
        self.backend()?.request()
    }

    pub fn exit(&self) -> Result<(), PlatformError> {
        self.backend()?.exit()
    }

    pub fn is_active(&self) -> bool {
        self.backend.as_deref().is_some_and(|b| b.is_active())
    }

    pub fn subscribe(&self) -> Result<SubscriptionId, PlatformError> {
        Ok(self.backend()?.subscribe())
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        if let Some(b) = self.backend.as_deref() {
            b.unsubscribe(id);
        }
    }

    fn backend(&self) -> Result<&dyn FullscreenBackend, PlatformError> {
        self.backend.as_deref().ok_or_else(|| PlatformError::Unsupported {
            capability: "fullscreen".to_string(),
        })
    }
}
