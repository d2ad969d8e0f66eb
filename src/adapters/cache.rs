use crate::domain::ports::ResponseCache;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

struct LruState {
    entries: HashMap<String, Value>,
    lru_order: VecDeque<String>,
}

impl LruState {
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.lru_order.iter().position(|k| k == key) {
            if let Some(existing) = self.lru_order.remove(pos) {
                self.lru_order.push_back(existing);
            }
        } else {
            self.lru_order.push_back(key.to_string());
        }
    }

    fn pop_lru(&mut self) -> Option<String> {
        let key = self.lru_order.pop_front()?;
        self.entries.remove(&key);
        Some(key)
    }
}

/// 有容量上限的 LRU 回應快取，容量為 0 時不保存任何東西
pub struct LruResponseCache {
    state: Mutex<LruState>,
    capacity: usize,
}

impl LruResponseCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(LruState {
                entries: HashMap::new(),
                lru_order: VecDeque::new(),
            }),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for LruResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl ResponseCache for LruResponseCache {
    fn get(&self, key: &str) -> Option<Value> {
        let mut state = self.state.lock().ok()?;
        let value = state.entries.get(key).cloned()?;
        state.touch(key);
        Some(value)
    }

    fn insert(&self, key: String, value: Value) {
        if self.capacity == 0 {
            return;
        }
        let Ok(mut state) = self.state.lock() else {
            tracing::warn!("⚠️ Response cache lock poisoned, skipping insert");
            return;
        };

        state.touch(&key);
        state.entries.insert(key, value);

        while state.entries.len() > self.capacity {
            match state.pop_lru() {
                Some(evicted) => tracing::debug!("🗑️ Evicted cached response: {}", evicted),
                None => break,
            }
        }
    }

    fn len(&self) -> usize {
        self.state.lock().map(|s| s.entries.len()).unwrap_or(0)
    }
}
