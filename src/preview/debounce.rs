//! Restartable debounce timer for style updates

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

/// Quiet period a style edit must survive before the widget re-renders
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Coalesces bursts of values into the last value of each burst.
///
/// Every pushed value restarts the timer. Once `window` passes without a new value,
/// the latest one is emitted on the settled channel. Dropping the debouncer flushes
/// any pending value and closes the channel.
pub struct StyleDebouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> StyleDebouncer<T> {
    /// Spawn the timer task. Returns the debouncer and the settled-value receiver.
    pub fn spawn(window: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            while let Some(first) = rx.recv().await {
                let mut pending = first;
                let mut coalesced = 0usize;

                loop {
                    tokio::select! {
                        next = rx.recv() => match next {
                            Some(value) => {
                                pending = value;
                                coalesced += 1;
                            }
                            None => {
                                let _ = settled_tx.send(pending);
                                return;
                            }
                        },
                        _ = tokio::time::sleep(window) => break,
                    }
                }

                trace!(coalesced, "debounce window elapsed");
                if settled_tx.send(pending).is_err() {
                    return; // Receiver dropped
                }
            }
        });

        (Self { tx, task }, settled_rx)
    }

    /// Queue a value, restarting the timer. Best-effort: ignored once the task has stopped.
    pub fn push(&self, value: T) {
        let _ = self.tx.send(value);
    }

    /// Whether the timer task is still running
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn test_burst_inside_window_renders_once_with_last_value() {
        let (debouncer, mut settled) = StyleDebouncer::spawn(DEFAULT_DEBOUNCE);

        for value in 0..10 {
            debouncer.push(value);
            sleep(Duration::from_millis(10)).await;
        }
        sleep(Duration::from_millis(400)).await;

        assert_eq!(settled.try_recv().unwrap(), 9);
        assert!(settled.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_events_render_each_time() {
        let (debouncer, mut settled) = StyleDebouncer::spawn(DEFAULT_DEBOUNCE);

        for value in 0..4 {
            debouncer.push(value);
            sleep(Duration::from_millis(200)).await;
        }

        let mut seen = Vec::new();
        while let Ok(value) = settled.try_recv() {
            seen.push(value);
        }
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_restarts_on_each_event() {
        let (debouncer, mut settled) = StyleDebouncer::spawn(DEFAULT_DEBOUNCE);

        // Each gap is under the window, so the burst spans well over 150ms in total
        for value in 0..5 {
            debouncer.push(value);
            sleep(Duration::from_millis(100)).await;
        }
        assert!(settled.try_recv().is_err());

        sleep(Duration::from_millis(100)).await;
        assert_eq!(settled.try_recv().unwrap(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_flushes_pending_value() {
        let (debouncer, mut settled) = StyleDebouncer::spawn(DEFAULT_DEBOUNCE);
        debouncer.push("a");
        debouncer.push("b");
        drop(debouncer);

        assert_eq!(settled.recv().await, Some("b"));
        assert_eq!(settled.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_stops_once_receiver_is_gone() {
        let (debouncer, settled) = StyleDebouncer::spawn(DEFAULT_DEBOUNCE);
        assert!(debouncer.is_running());

        drop(settled);
        debouncer.push(1);
        sleep(DEFAULT_DEBOUNCE + Duration::from_millis(10)).await;
        assert!(!debouncer.is_running());
    }
}
