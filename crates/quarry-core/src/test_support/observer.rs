use crate::{
    cache::{CachedValue, MemoryCache, QueryCache},
    obs::{QueryExecuted, QueryObserver},
    query::CachePolicy,
};
use async_trait::async_trait;
use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

///
/// RecordingObserver
///

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<QueryExecuted>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<QueryExecuted> {
        self.events.lock().expect("observer log").clone()
    }
}

impl QueryObserver for RecordingObserver {
    fn on_query_executed(&self, event: &QueryExecuted) {
        self.events.lock().expect("observer log").push(event.clone());
    }
}

///
/// PanickingObserver
///

pub struct PanickingObserver;

impl QueryObserver for PanickingObserver {
    fn on_query_executed(&self, _event: &QueryExecuted) {
        panic!("observer exploded");
    }
}

///
/// CountingCache
/// Memory cache that counts lookups and writes.
///

#[derive(Default)]
pub struct CountingCache {
    inner: MemoryCache,
    gets: AtomicUsize,
    sets: AtomicUsize,
}

impl CountingCache {
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryCache for CountingCache {
    async fn try_get(&self, policy: &CachePolicy) -> Option<CachedValue> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.try_get(policy).await
    }

    async fn set(&self, policy: &CachePolicy, value: CachedValue) {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set(policy, value).await;
    }
}
