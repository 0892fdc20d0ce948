//! Timer-driven animation loops keyed by entity.
//!
//! Each running key owns one tokio task ticking an [`AnimationLoop`] at a
//! fixed interval. Ticks of one key never overlap; keys are independent.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use log::debug;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use super::state::{AnimationLoop, LoopConfig, TickEvent};

/// Callback receiving every phase change of a loop.
pub type TickCallback = Box<dyn FnMut(TickEvent) + Send + 'static>;

type SharedCallback = Arc<Mutex<TickCallback>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Entry {
    generation: u64,
    handle: JoinHandle<()>,
    state: Arc<Mutex<AnimationLoop>>,
    callback: SharedCallback,
}

struct Inner<K> {
    entries: Mutex<HashMap<K, Entry>>,
    next_generation: AtomicU64,
}

impl<K> Drop for Inner<K> {
    fn drop(&mut self) {
        let entries = self
            .entries
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        for (_, entry) in entries.drain() {
            entry.handle.abort();
        }
    }
}

/// Runs at most one animation loop per key.
///
/// Cloning is cheap and clones share the same set of loops. Dropping the last
/// clone stops every loop. Starting a loop requires a tokio runtime.
pub struct AnimationScheduler<K> {
    inner: Arc<Inner<K>>,
}

impl<K> Clone for AnimationScheduler<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K> Default for AnimationScheduler<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> AnimationScheduler<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                next_generation: AtomicU64::new(0),
            }),
        }
    }

    /// Starts a loop for `key`.
    ///
    /// Returns false, leaving the running loop untouched, when `key` is
    /// already running.
    pub fn start<F>(&self, key: K, config: LoopConfig, on_tick: F) -> bool
    where
        F: FnMut(TickEvent) + Send + 'static,
    {
        let callback: SharedCallback = Arc::new(Mutex::new(Box::new(on_tick)));
        self.start_shared(key, config, callback)
    }

    fn start_shared(&self, key: K, config: LoopConfig, callback: SharedCallback) -> bool {
        let mut entries = lock(&self.inner.entries);
        if entries.contains_key(&key) {
            return false;
        }

        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
        let interval = config.interval.max(Duration::from_millis(1));
        let mut looper = AnimationLoop::new(config);
        looper.start();
        let state = Arc::new(Mutex::new(looper));

        let handle = tokio::spawn(run_loop(
            key.clone(),
            generation,
            interval,
            Arc::clone(&state),
            Arc::clone(&callback),
            Arc::downgrade(&self.inner),
        ));
        debug!("animation loop started (generation {})", generation);

        entries.insert(
            key,
            Entry {
                generation,
                handle,
                state,
                callback,
            },
        );
        true
    }

    /// Stops the loop for `key`. Returns false when it was not running.
    pub fn stop(&self, key: &K) -> bool {
        let entry = lock(&self.inner.entries).remove(key);
        match entry {
            Some(entry) => {
                entry.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Stops every loop.
    pub fn stop_all(&self) {
        let drained: Vec<Entry> = lock(&self.inner.entries).drain().map(|(_, e)| e).collect();
        for entry in drained {
            entry.handle.abort();
        }
    }

    /// Stops the loops whose key matches `predicate`; returns how many.
    pub fn stop_matching<P>(&self, predicate: P) -> usize
    where
        P: Fn(&K) -> bool,
    {
        let mut entries = lock(&self.inner.entries);
        let keys: Vec<K> = entries.keys().filter(|k| predicate(k)).cloned().collect();
        for key in &keys {
            if let Some(entry) = entries.remove(key) {
                entry.handle.abort();
            }
        }
        keys.len()
    }

    /// Restarts a running loop with a new interval, keeping its phase and
    /// callback. Returns false when `key` was not running.
    pub fn restart_with_interval(&self, key: &K, interval: Duration) -> bool {
        let entry = lock(&self.inner.entries).remove(key);
        let Some(entry) = entry else {
            return false;
        };
        entry.handle.abort();

        let (config, phase) = {
            let looper = lock(&entry.state);
            (looper.config().clone(), looper.phase().unwrap_or(0))
        };
        let config = config.with_interval(interval).with_start_phase(phase);
        self.start_shared(key.clone(), config, entry.callback)
    }

    pub fn is_running(&self, key: &K) -> bool {
        lock(&self.inner.entries).contains_key(key)
    }

    /// Phase of the loop for `key`, `None` when not running.
    pub fn current_phase(&self, key: &K) -> Option<u32> {
        let state = lock(&self.inner.entries)
            .get(key)
            .map(|entry| Arc::clone(&entry.state))?;
        let phase = lock(&state).phase();
        phase
    }

    pub fn running_count(&self) -> usize {
        lock(&self.inner.entries).len()
    }
}

async fn run_loop<K>(
    key: K,
    generation: u64,
    interval: Duration,
    state: Arc<Mutex<AnimationLoop>>,
    callback: SharedCallback,
    scheduler: Weak<Inner<K>>,
) where
    K: Eq + Hash,
{
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    loop {
        ticker.tick().await;
        let event = lock(&state).tick();
        match event {
            Some(event @ TickEvent::Completed { .. }) => {
                (*lock(&callback))(event);
                break;
            }
            Some(event) => (*lock(&callback))(event),
            None => {}
        }
    }

    // Finite loop finished; drop our entry unless a newer loop replaced it
    if let Some(inner) = scheduler.upgrade() {
        let mut entries = lock(&inner.entries);
        if entries.get(&key).is_some_and(|e| e.generation == generation) {
            entries.remove(&key);
            debug!("animation loop completed (generation {})", generation);
        }
    }
}
