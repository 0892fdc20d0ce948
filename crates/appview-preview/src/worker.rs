//! Background sprite decoding.
//!
//! Decoding runs on tokio's blocking pool, at most `decode_concurrency` at a
//! time. Concurrent requests for the same sprite share one decode, as long
//! as they carry the same bytes; a slot whose bytes changed decodes anew.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use appview_sprite::{decode_png, RgbaImage};
use log::{debug, warn};
use tokio::sync::{oneshot, Semaphore};

use crate::cache::{SpriteBytes, SpriteKey};

type Decoded = Option<Arc<RgbaImage>>;

/// A sprite slot together with the hash of the bytes being decoded for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct DecodeKey {
    sprite: SpriteKey,
    content: blake3::Hash,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct WorkerInner {
    permits: Arc<Semaphore>,
    pending: Mutex<HashMap<DecodeKey, Vec<oneshot::Sender<Decoded>>>>,
    shut_down: AtomicBool,
}

/// Decodes sprite PNGs off the async threads.
///
/// Cloning is cheap; clones share the pending map and concurrency limit.
#[derive(Clone)]
pub struct DecodeWorker {
    inner: Arc<WorkerInner>,
}

impl DecodeWorker {
    /// Creates a worker decoding at most `concurrency` sprites at once.
    pub fn new(concurrency: usize) -> Self {
        Self {
            inner: Arc::new(WorkerInner {
                permits: Arc::new(Semaphore::new(concurrency.max(1))),
                pending: Mutex::new(HashMap::new()),
                shut_down: AtomicBool::new(false),
            }),
        }
    }

    /// Decodes `bytes`, the current contents of slot `sprite`.
    ///
    /// Resolves to `None` when decoding fails or the worker shuts down while
    /// the request is pending. Must be called within a tokio runtime.
    pub async fn decode(&self, sprite: SpriteKey, bytes: SpriteBytes) -> Decoded {
        let key = DecodeKey {
            sprite,
            content: blake3::hash(&bytes),
        };
        let (tx, rx) = oneshot::channel();
        let first = {
            let mut pending = lock(&self.inner.pending);
            if self.inner.shut_down.load(Ordering::Acquire) {
                return None;
            }
            let waiters = pending.entry(key).or_default();
            waiters.push(tx);
            waiters.len() == 1
        };

        if first {
            tokio::spawn(run_decode(Arc::clone(&self.inner), key, bytes));
        } else {
            debug!("joining in-flight decode of sprite {}", sprite.index);
        }

        rx.await.unwrap_or(None)
    }

    /// Number of sprites currently being decoded.
    pub fn pending_count(&self) -> usize {
        lock(&self.inner.pending).len()
    }

    /// Stops accepting work and resolves every pending request with `None`.
    ///
    /// Decodes already running finish in the background; their results are
    /// discarded.
    pub fn shutdown(&self) {
        self.inner.shut_down.store(true, Ordering::Release);
        self.inner.permits.close();
        let pending: Vec<_> = lock(&self.inner.pending).drain().collect();
        for (_, waiters) in pending {
            for waiter in waiters {
                let _ = waiter.send(None);
            }
        }
    }
}

async fn run_decode(inner: Arc<WorkerInner>, key: DecodeKey, bytes: SpriteBytes) {
    let result = match Arc::clone(&inner.permits).acquire_owned().await {
        Ok(permit) => {
            let decoded = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                decode_png(&bytes)
            })
            .await;
            match decoded {
                Ok(Ok(image)) => Some(Arc::new(image)),
                Ok(Err(e)) => {
                    warn!("failed to decode sprite {}: {}", key.sprite.index, e);
                    None
                }
                Err(e) => {
                    warn!("decode task for sprite {} failed: {}", key.sprite.index, e);
                    None
                }
            }
        }
        // Semaphore closed by shutdown
        Err(_) => None,
    };

    let waiters = lock(&inner.pending).remove(&key).unwrap_or_default();
    for waiter in waiters {
        let _ = waiter.send(result.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appview_model::Category;
    use appview_sprite::png::{write_rgba_to_vec_with_hash, PngConfig};
    use crate::cache::AppearanceKey;

    fn png_bytes(pixel: [u8; 4]) -> SpriteBytes {
        let (data, _) =
            write_rgba_to_vec_with_hash(&RgbaImage::filled(2, 2, pixel), &PngConfig::default())
                .unwrap();
        Arc::from(data)
    }

    fn key(index: usize) -> SpriteKey {
        AppearanceKey::new(Category::Objects, 1).sprite(index)
    }

    #[tokio::test]
    async fn test_decodes_png() {
        let worker = DecodeWorker::new(2);
        let image = worker.decode(key(0), png_bytes([1, 2, 3, 255])).await.unwrap();
        assert_eq!(image.get(1, 1), [1, 2, 3, 255]);
        assert_eq!(worker.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_bytes_resolve_to_none() {
        let worker = DecodeWorker::new(1);
        assert!(worker.decode(key(0), Arc::from(&b"nope"[..])).await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_result() {
        let worker = DecodeWorker::new(1);
        let bytes = png_bytes([9, 9, 9, 255]);
        let (a, b) = tokio::join!(
            worker.decode(key(3), bytes.clone()),
            worker.decode(key(3), bytes)
        );
        let (a, b) = (a.unwrap(), b.unwrap());
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn test_changed_bytes_do_not_join_older_decode() {
        let worker = DecodeWorker::new(1);
        // Hold the only permit so the first decode stays pending
        let permit = Arc::clone(&worker.inner.permits).acquire_owned().await.unwrap();
        let old = {
            let worker = worker.clone();
            let bytes = png_bytes([10, 0, 0, 255]);
            tokio::spawn(async move { worker.decode(key(0), bytes).await })
        };
        while worker.pending_count() == 0 {
            tokio::task::yield_now().await;
        }
        let new = {
            let worker = worker.clone();
            let bytes = png_bytes([99, 0, 0, 255]);
            tokio::spawn(async move { worker.decode(key(0), bytes).await })
        };
        while worker.pending_count() < 2 {
            tokio::task::yield_now().await;
        }

        drop(permit);

        assert_eq!(old.await.unwrap().unwrap().get(0, 0), [10, 0, 0, 255]);
        assert_eq!(new.await.unwrap().unwrap().get(0, 0), [99, 0, 0, 255]);
        assert_eq!(worker.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_resolves_pending_with_none() {
        let worker = DecodeWorker::new(1);
        // Hold the only permit so the request stays pending
        let permit = Arc::clone(&worker.inner.permits).acquire_owned().await.unwrap();
        let pending = {
            let worker = worker.clone();
            let bytes = png_bytes([5, 5, 5, 255]);
            tokio::spawn(async move { worker.decode(key(1), bytes).await })
        };
        while worker.pending_count() == 0 {
            tokio::task::yield_now().await;
        }

        worker.shutdown();
        drop(permit);

        assert!(pending.await.unwrap().is_none());
        assert!(worker.decode(key(2), png_bytes([0, 0, 0, 255])).await.is_none());
        assert_eq!(worker.pending_count(), 0);
    }
}
