//! Cache en memoria con expiración por tiempo
//!
//! Cada entrada guarda el instante en que se escribió. La expiración se
//! revisa sólo al leer: no hay barrido en segundo plano.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

/// Fuente de tiempo del cache
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reloj del sistema
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Entrada con su timestamp de creación
#[derive(Debug, Clone)]
struct CachedEntry<V> {
    value: V,
    created_at: DateTime<Utc>,
}

/// Estadísticas del cache
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries_expired: u64,
    pub entries_invalidated: u64,
    pub stale_writes_skipped: u64,
}

/// Cache clave/valor con TTL fijo. Requiere `&mut self` para mutar:
/// el acceso concurrente se resuelve por fuera (ver `ResponseCache`).
///
/// `epoch` avanza con cada invalidación. Un valor leído de la red antes de
/// una invalidación sólo se guarda con `set_if_epoch` si el epoch no cambió.
pub struct TimedCache<V> {
    entries: HashMap<String, CachedEntry<V>>,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
    stats: CacheStats,
    epoch: u64,
}

impl<V: Clone> TimedCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(36_500)),
            clock,
            stats: CacheStats::default(),
            epoch: 0,
        }
    }

    /// Guardar un valor con el timestamp actual
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        debug!("💾 Cache set: {}", key);
        self.entries.insert(
            key,
            CachedEntry {
                value,
                created_at: self.clock.now(),
            },
        );
    }

    /// Guardar sólo si no hubo invalidaciones desde `epoch`
    pub fn set_if_epoch(&mut self, key: impl Into<String>, value: V, epoch: u64) -> bool {
        let key = key.into();
        if epoch != self.epoch {
            self.stats.stale_writes_skipped += 1;
            debug!("⏭️ Cache set descartado (invalidado durante la lectura): {}", key);
            return false;
        }
        self.set(key, value);
        true
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Obtener un valor vigente; si expiró se elimina
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let expired = match self.entries.get(key) {
            None => {
                self.stats.misses += 1;
                debug!("Cache miss para clave: {}", key);
                return None;
            }
            Some(entry) => now - entry.created_at > self.ttl,
        };

        if expired {
            self.entries.remove(key);
            self.stats.entries_expired += 1;
            self.stats.misses += 1;
            debug!("Cache miss (expired) para clave: {}", key);
            return None;
        }

        self.stats.hits += 1;
        debug!("Cache hit para clave: {}", key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Eliminar una entrada
    pub fn delete(&mut self, key: &str) -> bool {
        self.epoch += 1;
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.stats.entries_invalidated += 1;
        }
        removed
    }

    /// Eliminar todas las claves que comiencen con `prefix` (comparación literal)
    pub fn clear_by_prefix(&mut self, prefix: &str) -> usize {
        self.epoch += 1;
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - self.entries.len();
        self.stats.entries_invalidated += removed as u64;
        debug!("🗑️ Cache invalidado por prefijo '{}': {} entradas", prefix, removed);
        removed
    }

    /// Vaciar el cache completo (logout)
    pub fn clear(&mut self) {
        self.epoch += 1;
        self.stats.entries_invalidated += self.entries.len() as u64;
        self.entries.clear();
    }

    /// Número de entradas guardadas (incluye expiradas aún no leídas)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Reloj manual para avanzar el tiempo en tests
    pub(crate) struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        pub(crate) fn new() -> Arc<Self> {
            Arc::new(Self {
                now: Mutex::new(Utc::now()),
            })
        }

        pub(crate) fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now = *now + chrono::Duration::from_std(by).unwrap();
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    fn cache_with_clock() -> (TimedCache<String>, Arc<ManualClock>) {
        let clock = ManualClock::new();
        let cache = TimedCache::with_clock(Duration::from_secs(60), clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_set_then_get_returns_value() {
        let (mut cache, _) = cache_with_clock();
        cache.set("clientes:list:t1:page=1", "v".to_string());
        assert_eq!(cache.get("clientes:list:t1:page=1"), Some("v".to_string()));
    }

    #[test]
    fn test_entry_expires_after_ttl_and_stays_evicted() {
        let (mut cache, clock) = cache_with_clock();
        cache.set("k", "v".to_string());

        clock.advance(Duration::from_secs(59));
        assert_eq!(cache.get("k"), Some("v".to_string()));

        clock.advance(Duration::from_secs(2));
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
        assert_eq!(cache.stats().entries_expired, 1);
    }

    #[test]
    fn test_reads_do_not_refresh_timestamp() {
        let (mut cache, clock) = cache_with_clock();
        cache.set("k", "v".to_string());
        clock.advance(Duration::from_secs(40));
        assert!(cache.get("k").is_some());
        clock.advance(Duration::from_secs(40));
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn test_delete() {
        let (mut cache, _) = cache_with_clock();
        cache.set("k", "v".to_string());
        assert!(cache.delete("k"));
        assert!(!cache.delete("k"));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_clear_by_prefix_only_touches_matching_keys() {
        let (mut cache, _) = cache_with_clock();
        cache.set("orders-page-1", "a".to_string());
        cache.set("orders-page-2", "b".to_string());
        cache.set("profiles:all:t1", "c".to_string());
        cache.set("my-orders-page-1", "d".to_string());

        assert_eq!(cache.clear_by_prefix("orders-"), 2);
        assert_eq!(cache.get("orders-page-1"), None);
        assert_eq!(cache.get("profiles:all:t1"), Some("c".to_string()));
        assert_eq!(cache.get("my-orders-page-1"), Some("d".to_string()));
    }

    #[test]
    fn test_set_if_epoch_skips_after_invalidation() {
        let (mut cache, _) = cache_with_clock();
        let epoch = cache.epoch();
        cache.clear_by_prefix("clientes:");

        assert!(!cache.set_if_epoch("clientes:list:t1:page=1", "viejo".to_string(), epoch));
        assert_eq!(cache.get("clientes:list:t1:page=1"), None);
        assert_eq!(cache.stats().stale_writes_skipped, 1);

        let epoch = cache.epoch();
        assert!(cache.set_if_epoch("clientes:list:t1:page=1", "nuevo".to_string(), epoch));
        assert_eq!(cache.get("clientes:list:t1:page=1"), Some("nuevo".to_string()));
    }

    #[test]
    fn test_clear() {
        let (mut cache, _) = cache_with_clock();
        cache.set("a", "1".to_string());
        cache.set("b", "2".to_string());
        cache.clear();
        assert_eq!(cache.len(), 0);
    }
}
