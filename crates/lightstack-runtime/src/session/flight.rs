//! Single-flight de-duplication of an async operation.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;

type Slot<T, E> = Arc<OnceCell<Result<T, E>>>;

/// Runs at most one instance of an operation at a time.
///
/// Callers arriving while an operation is in flight await the same
/// result, success or error. The slot is released once the operation
/// completes, so the next call after completion starts a fresh one.
///
/// # Example
///
/// ```
/// use lightstack_runtime::session::SingleFlight;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let flight: SingleFlight<u32, String> = SingleFlight::new();
/// let (a, b) = tokio::join!(
///     flight.run(|| async { Ok(1) }),
///     flight.run(|| async { Ok(2) }),
/// );
/// assert_eq!(a, Ok(1));
/// assert_eq!(b, Ok(1));
/// # }
/// ```
pub struct SingleFlight<T, E> {
    slot: Mutex<Option<Slot<T, E>>>,
}

impl<T, E> SingleFlight<T, E>
where
    T: Clone,
    E: Clone,
{
    /// Creates an idle flight.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Runs `op`, or joins the operation already in flight.
    pub async fn run<F, Fut>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let cell = {
            let mut slot = self.slot.lock();
            Arc::clone(slot.get_or_insert_with(|| Arc::new(OnceCell::new())))
        };

        let result = cell.get_or_init(op).await.clone();

        let mut slot = self.slot.lock();
        if slot.as_ref().is_some_and(|current| Arc::ptr_eq(current, &cell)) {
            *slot = None;
        }
        result
    }

    /// Detaches the in-flight operation: it still completes for the
    /// callers already waiting on it, but new callers start afresh.
    pub fn forget(&self) {
        *self.slot.lock() = None;
    }

    /// Returns `true` while an operation is in flight.
    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.slot.lock().is_some()
    }
}

impl<T: Clone, E: Clone> Default for SingleFlight<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> std::fmt::Debug for SingleFlight<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleFlight")
            .field("in_flight", &self.slot.lock().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn concurrent_callers_share_one_run() {
        let flight: SingleFlight<usize, String> = SingleFlight::new();
        let runs = AtomicUsize::new(0);
        let runs = &runs;

        let op = move || async move {
            runs.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(7)
        };

        let (a, b, c) = tokio::join!(flight.run(op), flight.run(op), flight.run(op));

        assert_eq!((a, b, c), (Ok(7), Ok(7), Ok(7)));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(!flight.in_flight());
    }

    #[tokio::test]
    async fn errors_are_shared_too() {
        let flight: SingleFlight<usize, String> = SingleFlight::new();

        let (a, b) = tokio::join!(
            flight.run(|| async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Err("boom".to_string())
            }),
            flight.run(|| async { Ok(1) }),
        );

        assert_eq!(a, Err("boom".to_string()));
        assert_eq!(b, Err("boom".to_string()));
    }

    #[tokio::test]
    async fn sequential_calls_run_again() {
        let flight: SingleFlight<usize, String> = SingleFlight::new();

        assert_eq!(flight.run(|| async { Ok(1) }).await, Ok(1));
        assert_eq!(flight.run(|| async { Ok(2) }).await, Ok(2));
    }

    #[tokio::test]
    async fn forget_starts_a_new_flight() {
        let flight: SingleFlight<usize, String> = SingleFlight::new();

        let slow = flight.run(|| async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            Ok(1)
        });
        let fresh = async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            flight.forget();
            flight.run(|| async { Ok(2) }).await
        };

        let (a, b) = tokio::join!(slow, fresh);
        assert_eq!(a, Ok(1));
        assert_eq!(b, Ok(2));
    }
}
