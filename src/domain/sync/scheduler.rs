use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::domain::pagination::Page;
use crate::domain::shared::RepositoryResult;
use crate::domain::user::UserRepository;

pub const DEFAULT_MAX_PARALLEL_USERS: usize = 100;

/// Syncs everything one user is subscribed to. Implementations log their
/// own failures; the scheduler only sees completion.
#[async_trait]
pub trait UserSyncer: Send + Sync {
    async fn sync(&self, user_id: &str);
}

/// A user handed to the pool. Dropping it signals completion to the
/// producer, which waits for every job of a page before listing the next.
struct Job {
    user_id: String,
    _done: mpsc::Sender<()>,
}

struct Running {
    stop_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Periodically syncs every user through a bounded pool of tasks.
///
/// At most one run is in flight at any time: ticks that fire while a run
/// is still executing are dropped.
pub struct Synchronizer {
    users: Arc<dyn UserRepository>,
    worker: Arc<dyn UserSyncer>,
    interval: Duration,
    max_parallel_users: usize,
    running: Mutex<Option<Running>>,
}

impl Synchronizer {
    pub fn new(
        users: Arc<dyn UserRepository>,
        worker: Arc<dyn UserSyncer>,
        interval: Duration,
        max_parallel_users: usize,
    ) -> Self {
        Self {
            users,
            worker,
            interval: interval.max(Duration::from_millis(1)),
            max_parallel_users: max_parallel_users.max(1),
            running: Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    /// Spawn the ticker task. The first run happens one interval from now.
    /// Calling `start` on a running synchronizer does nothing.
    pub fn start(self: &Arc<Self>) {
        let mut running = self.running.lock();
        if running.is_some() {
            tracing::warn!("Synchronizer already running");
            return;
        }

        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let this = Arc::clone(self);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + this.interval, this.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => this.run_once().await,
                }
            }

            tracing::debug!("Synchronizer loop exited");
        });

        *running = Some(Running { stop_tx, handle });
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            max_parallel_users = self.max_parallel_users,
            "Synchronizer started"
        );
    }

    /// Stop ticking and wait for the run in flight, if any, to finish.
    /// Later calls return immediately.
    pub async fn stop(&self) {
        let Some(running) = self.running.lock().take() else {
            return;
        };

        let _ = running.stop_tx.send(());
        if let Err(e) = running.handle.await {
            tracing::error!(error = %e, "Synchronizer task failed");
        }
        tracing::info!("Synchronizer stopped");
    }

    /// One full run, with the outcome logged.
    pub async fn run_once(&self) {
        let started = Instant::now();
        match self.sync_users().await {
            Ok(users) => tracing::info!(
                users,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Sync run finished"
            ),
            Err(e) => tracing::error!(error = %e, "Sync run aborted"),
        }
    }

    /// Sync every user once and return how many were dispatched.
    ///
    /// Users are listed a page at a time and pushed onto a bounded channel
    /// drained by up to `max_parallel_users` tasks. The next page is only
    /// listed once every user of the current one is done. A listing error
    /// aborts the run after the jobs already dispatched complete.
    pub async fn sync_users(&self) -> RepositoryResult<usize> {
        let mut page = Page::new(self.max_parallel_users);
        let mut listing = self.users.list(&page).await?;
        if listing.items.is_empty() {
            return Ok(0);
        }

        let (job_tx, job_rx) = async_channel::bounded::<Job>(self.max_parallel_users);
        let width = listing.items.len().min(self.max_parallel_users);
        let workers: Vec<JoinHandle<()>> = (0..width)
            .map(|_| tokio::spawn(drain_jobs(job_rx.clone(), Arc::clone(&self.worker))))
            .collect();
        drop(job_rx);

        let mut dispatched = 0;
        let result = loop {
            let (done_tx, mut done_rx) = mpsc::channel::<()>(1);
            for user in listing.items {
                let job = Job {
                    user_id: user.id,
                    _done: done_tx.clone(),
                };
                if job_tx.send(job).await.is_err() {
                    break;
                }
                dispatched += 1;
            }
            drop(done_tx);
            // Resolves once every job of this page has been dropped.
            let _ = done_rx.recv().await;

            match listing.continuation_id {
                None => break Ok(dispatched),
                Some(next) => {
                    page = page.after(next);
                    match self.users.list(&page).await {
                        Ok(next_listing) => listing = next_listing,
                        Err(e) => break Err(e),
                    }
                }
            }
        };

        job_tx.close();
        for worker in workers {
            if let Err(e) = worker.await {
                tracing::error!(error = %e, "Sync task failed");
            }
        }

        result
    }
}

async fn drain_jobs(jobs: async_channel::Receiver<Job>, syncer: Arc<dyn UserSyncer>) {
    while let Ok(job) = jobs.recv().await {
        let outcome = AssertUnwindSafe(syncer.sync(&job.user_id))
            .catch_unwind()
            .await;
        if outcome.is_err() {
            tracing::error!(user_id = %job.user_id, "User sync panicked");
        }
    }
}
