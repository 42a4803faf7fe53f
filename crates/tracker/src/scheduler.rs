//! Poll scheduler -- periodic synchronization of live records with the
//! authoritative service state.
//!
//! One scheduler per operation kind, each with its own fixed interval
//! (attacks change state faster than cracking jobs, so they poll more
//! often). On each tick every non-terminal record gets one `fetch_status`
//! call, with at most one outstanding call per id: if the previous tick's
//! fetch has not resolved yet, the id is skipped this tick rather than
//! issued an overlapping call.
//!
//! A resolved response is reconciled against the store's record as it is
//! at that moment, not the one captured at tick start, so a stop that
//! landed terminal while the fetch was in flight wins.
//!
//! Stopping the scheduler cancels the pending timer; fetches already in
//! flight run to completion but their results are discarded instead of
//! written to a store nobody is observing any more. Fetch failures are
//! never surfaced -- the next tick retries implicitly.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use rfops_client::CommandClient;
use rfops_core::Operation;

use crate::store::OperationStore;

/// Attack state changes are quick; poll every 3s.
pub const ATTACK_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Cracking jobs move slowly (provisioning, long keyspace walks); 5s.
pub const JOB_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// State shared with spawned fetch tasks.
struct Shared {
    /// Cleared by `stop`; checked by in-flight tasks before any store write.
    active: AtomicBool,
    /// Ids with an unresolved fetch.
    in_flight: Mutex<HashSet<String>>,
}

impl Shared {
    fn begin_fetch(&self, id: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.to_string())
    }

    fn end_fetch(&self, id: &str) {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id);
    }
}

/// Recurring synchronization pass over one store.
///
/// Single start/stop lifecycle per tracking context; stopped on drop.
pub struct PollScheduler<O: Operation, C: CommandClient<O>> {
    store: Arc<OperationStore<O>>,
    client: Arc<C>,
    interval: Duration,
    shared: Arc<Shared>,
    ticker: Option<JoinHandle<()>>,
}

impl<O: Operation, C: CommandClient<O>> PollScheduler<O, C> {
    pub fn new(store: Arc<OperationStore<O>>, client: Arc<C>, interval: Duration) -> Self {
        PollScheduler {
            store,
            client,
            interval,
            shared: Arc::new(Shared {
                active: AtomicBool::new(false),
                in_flight: Mutex::new(HashSet::new()),
            }),
            ticker: None,
        }
    }

    /// Begin ticking. The first pass runs one interval after this call.
    /// Starting an already-running scheduler is a no-op.
    pub fn start(&mut self) {
        if self.ticker.is_some() {
            return;
        }
        self.shared.active.store(true, Ordering::SeqCst);

        let store = Arc::clone(&self.store);
        let client = Arc::clone(&self.client);
        let shared = Arc::clone(&self.shared);
        let period = self.interval;

        self.ticker = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // tokio's interval fires immediately; consume that so the
            // first pass waits one full period.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                run_tick(&store, &client, &shared);
            }
        }));
    }

    /// Cancel the recurring timer. In-flight fetches run to completion
    /// but their results are discarded, not written to the store.
    pub fn stop(&mut self) {
        self.shared.active.store(false, Ordering::SeqCst);
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }
}

impl<O: Operation, C: CommandClient<O>> Drop for PollScheduler<O, C> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One synchronization pass: one fetch per live record, skipping ids
/// whose previous fetch has not resolved.
fn run_tick<O: Operation, C: CommandClient<O>>(
    store: &Arc<OperationStore<O>>,
    client: &Arc<C>,
    shared: &Arc<Shared>,
) {
    let live: Vec<String> = store
        .list()
        .into_iter()
        .filter(|record| !record.is_terminal())
        .map(|record| record.id().to_string())
        .collect();

    for id in live {
        if !shared.begin_fetch(&id) {
            continue;
        }
        let store = Arc::clone(store);
        let client = Arc::clone(client);
        let shared = Arc::clone(shared);
        tokio::spawn(async move {
            let outcome = client.fetch_status(&id).await;
            shared.end_fetch(&id);
            if !shared.active.load(Ordering::SeqCst) {
                // Scheduler was stopped while this fetch was in flight.
                return;
            }
            match outcome {
                Ok(remote) => {
                    // Re-read the store so terminal stickiness is judged
                    // against its state at write time. The record may also
                    // have been dismissed while we were in flight.
                    if let Some(local) = store.get(&id) {
                        let merged = O::reconcile(&local, remote);
                        let _ = store.update(&id, merged);
                    }
                }
                Err(err) => {
                    eprintln!("poll failed for {} '{}': {}", O::KIND, id, err);
                }
            }
        });
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::attack;
    use async_trait::async_trait;
    use rfops_client::ClientError;
    use rfops_core::{Attack, AttackConfig, AttackStatus};
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;

    /// Pops a scripted fetch response per call, optionally after a delay.
    /// Tracks total and maximum-concurrent fetch calls.
    struct PollingClient {
        responses: Mutex<VecDeque<Result<Attack, ClientError>>>,
        delay: Duration,
        total: AtomicUsize,
        current: AtomicUsize,
        max_concurrent: AtomicUsize,
    }

    impl PollingClient {
        fn new(responses: Vec<Result<Attack, ClientError>>, delay: Duration) -> Self {
            PollingClient {
                responses: Mutex::new(responses.into()),
                delay,
                total: AtomicUsize::new(0),
                current: AtomicUsize::new(0),
                max_concurrent: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CommandClient<Attack> for PollingClient {
        async fn create(&self, _config: &AttackConfig) -> Result<Attack, ClientError> {
            unreachable!("scheduler tests never create")
        }

        async fn start(&self, _id: &str) -> Result<Attack, ClientError> {
            unreachable!("scheduler tests never start")
        }

        async fn stop(&self, _id: &str) -> Result<Attack, ClientError> {
            unreachable!("scheduler tests never stop")
        }

        async fn fetch_status(&self, _id: &str) -> Result<Attack, ClientError> {
            self.total.fetch_add(1, Ordering::SeqCst);
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_concurrent.fetch_max(now, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.current.fetch_sub(1, Ordering::SeqCst);
            let next = self.responses.lock().unwrap().pop_front();
            next.unwrap_or(Err(ClientError::Connection {
                message: "script exhausted".into(),
            }))
        }
    }

    fn scheduler(
        client: PollingClient,
        interval: Duration,
    ) -> (
        PollScheduler<Attack, PollingClient>,
        Arc<OperationStore<Attack>>,
        Arc<PollingClient>,
    ) {
        let store = Arc::new(OperationStore::new());
        let client = Arc::new(client);
        (
            PollScheduler::new(Arc::clone(&store), Arc::clone(&client), interval),
            store,
            client,
        )
    }

    #[tokio::test]
    async fn first_tick_waits_one_interval() {
        let client = PollingClient::new(
            vec![Ok(attack("atk-1", AttackStatus::Running))],
            Duration::ZERO,
        );
        let (mut scheduler, store, client) = scheduler(client, Duration::from_millis(60));
        store.add(attack("atk-1", AttackStatus::Running)).unwrap();

        scheduler.start();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(client.total.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(client.total.load(Ordering::SeqCst) >= 1);
        scheduler.stop();
    }

    #[tokio::test]
    async fn poll_merges_the_remote_record_into_the_store() {
        let mut running = attack("atk-1", AttackStatus::Running);
        running.progress_percent = 42.0;
        let client = PollingClient::new(vec![Ok(running)], Duration::ZERO);
        let (mut scheduler, store, _client) = scheduler(client, Duration::from_millis(10));
        store.add(attack("atk-1", AttackStatus::Initializing)).unwrap();

        scheduler.start();
        tokio::time::sleep(Duration::from_millis(60)).await;
        scheduler.stop();

        let stored = store.get("atk-1").unwrap();
        assert_eq!(stored.status, AttackStatus::Running);
        assert_eq!(stored.progress_percent, 42.0);
    }

    #[tokio::test]
    async fn at_most_one_outstanding_fetch_per_id() {
        // Fetch takes several intervals to resolve; overlapping ticks
        // must skip the id instead of stacking calls.
        let responses: Vec<_> = (0..10)
            .map(|_| Ok(attack("atk-1", AttackStatus::Running)))
            .collect();
        let client = PollingClient::new(responses, Duration::from_millis(50));
        let (mut scheduler, store, client) = scheduler(client, Duration::from_millis(10));
        store.add(attack("atk-1", AttackStatus::Running)).unwrap();

        scheduler.start();
        tokio::time::sleep(Duration::from_millis(150)).await;
        scheduler.stop();

        assert!(client.total.load(Ordering::SeqCst) >= 1);
        assert_eq!(client.max_concurrent.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn terminal_records_are_not_polled() {
        let client = PollingClient::new(vec![], Duration::ZERO);
        let (mut scheduler, store, client) = scheduler(client, Duration::from_millis(10));
        store.add(attack("atk-1", AttackStatus::Success)).unwrap();
        store.add(attack("atk-2", AttackStatus::Cancelled)).unwrap();

        scheduler.start();
        tokio::time::sleep(Duration::from_millis(60)).await;
        scheduler.stop();

        assert_eq!(client.total.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fetch_failure_leaves_the_record_unchanged_and_retries() {
        let client = PollingClient::new(
            vec![
                Err(ClientError::Connection {
                    message: "unreachable".into(),
                }),
                Err(ClientError::NotFound { id: "atk-1".into() }),
            ],
            Duration::ZERO,
        );
        let (mut scheduler, store, client) = scheduler(client, Duration::from_millis(10));
        let original = attack("atk-1", AttackStatus::Running);
        store.add(original.clone()).unwrap();

        scheduler.start();
        tokio::time::sleep(Duration::from_millis(45)).await;
        scheduler.stop();

        assert!(client.total.load(Ordering::SeqCst) >= 2);
        assert_eq!(store.get("atk-1"), Some(original));
    }

    #[tokio::test]
    async fn results_resolving_after_stop_are_discarded() {
        let mut done = attack("atk-1", AttackStatus::Success);
        done.progress_percent = 100.0;
        let client = PollingClient::new(vec![Ok(done)], Duration::from_millis(80));
        let (mut scheduler, store, client) = scheduler(client, Duration::from_millis(10));
        let original = attack("atk-1", AttackStatus::Running);
        store.add(original.clone()).unwrap();

        scheduler.start();
        // Let one fetch get issued, then stop while it is in flight.
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(client.current.load(Ordering::SeqCst) >= 1);
        scheduler.stop();
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(store.get("atk-1"), Some(original));
    }

    #[tokio::test]
    async fn start_twice_is_a_noop() {
        let client = PollingClient::new(vec![], Duration::ZERO);
        let (mut scheduler, _store, _client) = scheduler(client, Duration::from_millis(10));
        scheduler.start();
        assert!(scheduler.is_running());
        scheduler.start();
        assert!(scheduler.is_running());
        scheduler.stop();
        assert!(!scheduler.is_running());
    }
}
