//! Shared handler state.

use std::sync::Arc;

use pixgrid_session::SessionStore;

/// Bounds on request size and conversion cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
    /// Largest accepted downscaled width.
    pub max_pixel_size: u32,
    /// Largest accepted side of a converted image.
    pub max_output_side: u32,
}

impl Limits {
    /// 32 MiB uploads, 1024-pixel grids, 16384-pixel outputs.
    pub const DEFAULT: Self = Self {
        max_upload_bytes: 32 * 1024 * 1024,
        max_pixel_size: 1024,
        max_output_side: 16_384,
    };
}

impl Default for Limits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    store: Arc<SessionStore>,
    limits: Limits,
}

impl AppState {
    /// Bundle the session store with request limits.
    #[must_use]
    pub const fn new(store: Arc<SessionStore>, limits: Limits) -> Self {
        Self { store, limits }
    }

    /// The session store.
    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Request limits.
    #[must_use]
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }
}
