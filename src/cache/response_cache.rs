//! Cache compartido de respuestas de la API
//!
//! Envuelve un `TimedCache` de valores JSON para que los servicios lo
//! compartan. El lock nunca se mantiene durante una llamada de red.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::cache_config::CacheConfig;
use super::timed_cache::{CacheStats, Clock, TimedCache};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct ResponseCache {
    inner: Arc<Mutex<TimedCache<serde_json::Value>>>,
}

impl ResponseCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TimedCache::new(config.ttl))),
        }
    }

    pub fn with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TimedCache::with_clock(config.ttl, clock))),
        }
    }

    /// Leer una entrada y deserializarla; una entrada corrupta se descarta
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut cache = self.inner.lock().await;
        let value = cache.get(key)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(e) => {
                warn!("⚠️ Entrada de cache inválida para '{}': {}", key, e);
                cache.delete(key);
                None
            }
        }
    }

    /// Guardar una respuesta tipada
    pub async fn put<T: Serialize>(&self, key: impl Into<String>, value: &T) {
        let key = key.into();
        match serde_json::to_value(value) {
            Ok(json) => self.inner.lock().await.set(key, json),
            Err(e) => warn!("⚠️ No se pudo cachear '{}': {}", key, e),
        }
    }

    /// Devolver la entrada cacheada o pedirla y guardarla.
    /// El lock se libera antes de llamar a `fetch`; si hubo una invalidación
    /// mientras la respuesta estaba en vuelo, se devuelve pero no se guarda.
    pub async fn get_or_fetch<T, Fut>(&self, key: String, fetch: impl FnOnce() -> Fut) -> AppResult<T>
    where
        T: Serialize + DeserializeOwned,
        Fut: Future<Output = AppResult<T>>,
    {
        if let Some(cached) = self.get_as::<T>(&key).await {
            debug!("💾 Cache hit: {}", key);
            return Ok(cached);
        }

        debug!("🔍 Cache miss: {}", key);
        let epoch = self.inner.lock().await.epoch();
        let fresh = fetch().await?;
        match serde_json::to_value(&fresh) {
            Ok(json) => {
                self.inner.lock().await.set_if_epoch(key, json, epoch);
            }
            Err(e) => warn!("⚠️ No se pudo cachear '{}': {}", key, e),
        }
        Ok(fresh)
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.inner.lock().await.delete(key)
    }

    pub async fn clear_by_prefix(&self, prefix: &str) -> usize {
        self.inner.lock().await.clear_by_prefix(prefix)
    }

    pub async fn clear(&self) {
        debug!("🗑️ Vaciando cache completo");
        self.inner.lock().await.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats().clone()
    }
}
