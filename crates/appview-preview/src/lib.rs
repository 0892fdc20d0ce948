//! Appview preview engine
//!
//! Turns appearance documents and raw sprite bytes into timed preview
//! animations:
//!
//! - **Animation**: the loop state machine (infinite, ping-pong, finite) and
//!   a tokio scheduler running one loop per entity key
//! - **Sequences**: frame group selection and frame composition, including
//!   outfit addon stacking and color-zone tinting
//! - **Caches**: sprite bytes, decoded sprites and finished sequences, with
//!   per-appearance invalidation
//! - **Backends**: the [`AssetBackend`] seam plus directory and in-memory
//!   implementations
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use appview_model::Category;
//! use appview_preview::{DirectoryBackend, PreviewConfig, PreviewService};
//!
//! # async fn run() -> Result<(), appview_preview::PreviewError> {
//! let backend = Arc::new(DirectoryBackend::new("assets"));
//! let service = PreviewService::new(backend, PreviewConfig::default())?;
//! if let Some(sequence) = service.preview_sequence(Category::Objects, 2050).await? {
//!     println!("{} frames every {} ms", sequence.len(), sequence.interval_ms);
//! }
//! # Ok(())
//! # }
//! ```

pub mod animation;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod sequence;
pub mod service;
pub mod worker;

// Re-export main types for convenience
pub use animation::{AnimationLoop, AnimationRunState, AnimationScheduler, LoopConfig, TickEvent};
pub use backend::{AssetBackend, BackendError, DirectoryBackend, MemoryBackend};
pub use cache::{AppearanceKey, SpriteKey};
pub use config::{ConfigError, PreviewConfig};
pub use error::PreviewError;
pub use sequence::{
    build_sequence, build_static_frame, select_frame_group, OutfitFrameRequest, PreviewSequence,
};
pub use service::PreviewService;
pub use worker::DecodeWorker;
