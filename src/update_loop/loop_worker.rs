use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use chrono::Local;
use log::{debug, info};
use tokio::sync::Mutex;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::client::MetricsSource;
use crate::view::{render_snapshot, DashboardView};

use super::CyclePolicy;

/// Counts cycles that have started but not finished.
pub(super) struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    pub(super) fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// One refresh: fetch, then render everything or nothing.
/// Returns whether the view was updated.
pub async fn refresh_once<S, V>(source: &S, view: &Mutex<V>) -> bool
where
    S: MetricsSource,
    V: DashboardView,
{
    let Some(snapshot) = source.fetch_metrics().await else {
        return false;
    };

    // Held across all four steps so another cycle cannot interleave with them.
    let mut view = view.lock().await;
    render_snapshot(&mut *view, &snapshot, Local::now());
    true
}

pub(super) async fn update_loop<S, V>(
    source: Arc<S>,
    view: Arc<Mutex<V>>,
    interval: Duration,
    policy: CyclePolicy,
    in_flight: Arc<AtomicUsize>,
    cancel_token: CancellationToken,
) where
    S: MetricsSource,
    V: DashboardView,
{
    // First tick completes immediately, which gives the initial refresh.
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut cycle: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                info!("update loop shutting down after {cycle} cycles");
                break;
            }
            _ = ticker.tick() => {
                if policy == CyclePolicy::SkipIfBusy && in_flight.load(Ordering::SeqCst) > 0 {
                    debug!("skipping tick: previous refresh still in flight");
                    continue;
                }

                cycle += 1;
                let guard = InFlight::enter(&in_flight);
                let source = Arc::clone(&source);
                let view = Arc::clone(&view);
                // Detached: cancelling the loop never aborts a request already sent.
                tokio::spawn(async move {
                    let _guard = guard;
                    let updated = refresh_once(&*source, &*view).await;
                    debug!("refresh cycle {cycle} finished (updated: {updated})");
                });
            }
        }
    }
}
