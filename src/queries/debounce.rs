//! Debounce del texto de búsqueda

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

/// Deja pasar un valor sólo si no llegó otro durante la espera
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Esperar el retardo; `None` si entretanto llegó un valor más nuevo
    pub async fn settle<T>(&self, value: T) -> Option<T> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;

        if self.generation.load(Ordering::SeqCst) == generation {
            Some(value)
        } else {
            debug!("⏭️ Valor descartado por debounce (generación {})", generation);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_value_settles() {
        let debouncer = Debouncer::new(Duration::from_millis(400));

        let (first, second) = tokio::join!(debouncer.settle("ac"), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            debouncer.settle("acme").await
        });

        assert_eq!(first, None);
        assert_eq!(second, Some("acme"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_values_all_settle() {
        let debouncer = Debouncer::new(Duration::from_millis(400));

        assert_eq!(debouncer.settle("a").await, Some("a"));
        assert_eq!(debouncer.settle("b").await, Some("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_full_delay() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let start = tokio::time::Instant::now();
        debouncer.settle(()).await;
        assert!(start.elapsed() >= Duration::from_millis(300));
    }
}
