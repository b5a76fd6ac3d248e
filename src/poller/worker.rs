use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use super::source::StatusSource;
use crate::status::{normalize, RtkStatus};

/// Handle to a running poll loop. Dropping it does not stop the loop;
/// call [`CancelHandle::cancel`].
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
    join: JoinHandle<()>,
}

impl CancelHandle {
    /// Requests cooperative cancellation. The flag is checked at the top of
    /// each iteration, so an in-flight request still completes and its
    /// result or error is still delivered; no further iteration starts.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Waits for the loop task to exit. Returns within one period of
    /// [`CancelHandle::cancel`] being called.
    pub async fn join(self) {
        let _ = self.join.await;
    }
}

/// Starts a poll loop over `source`: one request per iteration, normalized
/// results go to `on_update`, request failures go to `on_error` and never
/// stop the loop. The `period` sleep is measured after the request
/// resolves, so iterations never overlap and consecutive attempts are at
/// least `period` apart.
pub fn start<S, U, E>(
    mut source: S,
    period: Duration,
    mut on_update: U,
    mut on_error: E,
) -> CancelHandle
where
    S: StatusSource,
    U: FnMut(RtkStatus) + Send + 'static,
    E: FnMut(S::Error) + Send + 'static,
{
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = cancelled.clone();

    let join = tokio::spawn(async move {
        while !flag.load(Ordering::SeqCst) {
            match source.get_status().await {
                Ok(raw) => on_update(normalize(&raw, Utc::now().timestamp_millis())),
                Err(err) => on_error(err),
            }
            sleep(period).await;
        }
    });

    CancelHandle { cancelled, join }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::RawRtkStatus;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    const PERIOD: Duration = Duration::from_millis(10);

    struct FailingSource;

    impl StatusSource for FailingSource {
        type Error = std::io::Error;

        async fn get_status(&mut self) -> Result<RawRtkStatus, Self::Error> {
            Err(std::io::Error::other("hub unreachable"))
        }
    }

    struct StaticSource;

    impl StatusSource for StaticSource {
        type Error = std::io::Error;

        async fn get_status(&mut self) -> Result<RawRtkStatus, Self::Error> {
            Ok(serde_json::from_str(r#"{ "cnr": { "G01": 45.0 } }"#).unwrap())
        }
    }

    /// Each request takes two periods; used to verify that iterations
    /// never overlap.
    struct SlowSource {
        in_flight: Arc<AtomicUsize>,
        max_in_flight: Arc<AtomicUsize>,
    }

    impl StatusSource for SlowSource {
        type Error = std::io::Error;

        async fn get_status(&mut self) -> Result<RawRtkStatus, Self::Error> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);
            sleep(PERIOD * 2).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(RawRtkStatus::default())
        }
    }

    #[tokio::test]
    async fn failing_source_reports_errors_and_keeps_going() {
        let errors = Arc::new(AtomicUsize::new(0));
        let updates = Arc::new(AtomicUsize::new(0));

        let handle = {
            let errors = errors.clone();
            let updates = updates.clone();
            start(
                FailingSource,
                PERIOD,
                move |_| {
                    updates.fetch_add(1, Ordering::SeqCst);
                },
                move |_| {
                    errors.fetch_add(1, Ordering::SeqCst);
                },
            )
        };

        sleep(PERIOD * 5).await;
        handle.cancel();
        handle.join().await;

        assert!(errors.load(Ordering::SeqCst) >= 2);
        assert_eq!(updates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn updates_are_normalized_snapshots() {
        let statuses = Arc::new(Mutex::new(Vec::new()));

        let handle = {
            let statuses = statuses.clone();
            start(
                StaticSource,
                PERIOD,
                move |status| statuses.lock().unwrap().push(status),
                |err: std::io::Error| panic!("unexpected error: {err}"),
            )
        };

        sleep(PERIOD * 5).await;
        handle.cancel();
        handle.join().await;

        let statuses = statuses.lock().unwrap();
        assert!(statuses.len() >= 2);
        for status in statuses.iter() {
            assert_eq!(status.satellites["G01"].cnr, 45.0);
            assert!(status.last_updated_at > 0);
            assert_eq!(status.satellites["G01"].last_updated_at, status.last_updated_at);
        }
    }

    #[tokio::test]
    async fn no_deliveries_after_cancel_settles() {
        let updates = Arc::new(AtomicUsize::new(0));

        let handle = {
            let updates = updates.clone();
            start(
                StaticSource,
                PERIOD,
                move |_| {
                    updates.fetch_add(1, Ordering::SeqCst);
                },
                |_| {},
            )
        };

        handle.cancel();
        assert!(handle.is_cancelled());
        handle.join().await;

        // At most the one in-flight iteration may have landed.
        let settled = updates.load(Ordering::SeqCst);
        assert!(settled <= 1);

        sleep(PERIOD * 5).await;
        assert_eq!(updates.load(Ordering::SeqCst), settled);
    }

    #[tokio::test]
    async fn iterations_never_overlap() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_in_flight = Arc::new(AtomicUsize::new(0));
        let updates = Arc::new(AtomicUsize::new(0));

        let source = SlowSource {
            in_flight: in_flight.clone(),
            max_in_flight: max_in_flight.clone(),
        };

        let handle = {
            let updates = updates.clone();
            start(
                source,
                PERIOD,
                move |_| {
                    updates.fetch_add(1, Ordering::SeqCst);
                },
                |_| {},
            )
        };

        sleep(PERIOD * 10).await;
        handle.cancel();
        handle.join().await;

        assert!(updates.load(Ordering::SeqCst) >= 2);
        assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
    }
}
