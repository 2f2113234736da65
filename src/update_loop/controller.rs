use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use anyhow::{bail, Context, Result};
use log::info;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::client::MetricsSource;
use crate::view::DashboardView;

use super::loop_worker::update_loop;
use super::{LoopConfig, LoopStatus};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a running update loop. Dropping it leaves the loop running;
/// call [`cancel`](Self::cancel) or [`stop`](Self::stop) to end it.
pub struct UpdateLoopHandle {
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
    in_flight: Arc<AtomicUsize>,
}

impl UpdateLoopHandle {
    /// Stops future ticks. Requests already sent still complete and render.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    pub fn status(&self) -> LoopStatus {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            LoopStatus::Refreshing
        } else {
            LoopStatus::Idle
        }
    }

    /// Cycles currently waiting on the backend or rendering.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub async fn stop(self) -> Result<()> {
        self.cancel();
        self.handle
            .await
            .context("update loop task failed to join")
    }
}

/// Refreshes once right away, then every `config.interval` until cancelled.
/// Must be called from inside a tokio runtime.
pub fn start_update_loop<S, V>(
    source: Arc<S>,
    view: Arc<Mutex<V>>,
    config: LoopConfig,
) -> UpdateLoopHandle
where
    S: MetricsSource,
    V: DashboardView,
{
    let interval = config.interval.max(MIN_INTERVAL);
    info!(
        "starting update loop: every {}ms, {:?} cycles",
        interval.as_millis(),
        config.policy
    );

    let cancel_token = CancellationToken::new();
    let in_flight = Arc::new(AtomicUsize::new(0));

    let handle = tokio::spawn(update_loop(
        source,
        view,
        interval,
        config.policy,
        Arc::clone(&in_flight),
        cancel_token.clone(),
    ));

    UpdateLoopHandle {
        handle,
        cancel_token,
        in_flight,
    }
}

/// Owns at most one running loop.
pub struct UpdateLoopController {
    active: Option<UpdateLoopHandle>,
}

impl Default for UpdateLoopController {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateLoopController {
    pub fn new() -> Self {
        Self { active: None }
    }

    pub fn start<S, V>(
        &mut self,
        source: Arc<S>,
        view: Arc<Mutex<V>>,
        config: LoopConfig,
    ) -> Result<()>
    where
        S: MetricsSource,
        V: DashboardView,
    {
        if self.active.is_some() {
            bail!("update loop already active");
        }

        self.active = Some(start_update_loop(source, view, config));
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn status(&self) -> LoopStatus {
        self.active
            .as_ref()
            .map(UpdateLoopHandle::status)
            .unwrap_or(LoopStatus::Idle)
    }

    /// No-op when nothing is running.
    pub async fn stop(&mut self) -> Result<()> {
        match self.active.take() {
            Some(handle) => handle.stop().await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetricsSnapshot, RiskLevel};
    use crate::update_loop::CyclePolicy;
    use crate::view::testing::RecordingView;
    use crate::view::{PanelView, Slot};
    use std::future::Future;
    use tokio::time::sleep;

    /// Counts calls; each answer arrives after `delay`.
    struct ScriptedSource {
        calls: AtomicUsize,
        delay: Duration,
        answer: Option<MetricsSnapshot>,
    }

    impl ScriptedSource {
        fn new(delay_ms: u64, answer: Option<MetricsSnapshot>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay: Duration::from_millis(delay_ms),
                answer,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl MetricsSource for ScriptedSource {
        fn fetch_metrics(&self) -> impl Future<Output = Option<MetricsSnapshot>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let delay = self.delay;
            let answer = self.answer.clone();
            async move {
                if !delay.is_zero() {
                    sleep(delay).await;
                }
                answer
            }
        }
    }

    fn medium() -> MetricsSnapshot {
        MetricsSnapshot {
            mouse_clicks: 10,
            key_presses: 20,
            screen_time: 125.0,
            current_app: "Editor".into(),
            risk_level: RiskLevel::Medium,
            recommendations: vec!["Take five".into()],
        }
    }

    fn config(interval_ms: u64, policy: CyclePolicy) -> LoopConfig {
        LoopConfig {
            interval: Duration::from_millis(interval_ms),
            policy,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn refreshes_once_before_first_interval() {
        let source = ScriptedSource::new(0, Some(medium()));
        let view = Arc::new(Mutex::new(RecordingView::default()));
        let handle = start_update_loop(
            Arc::clone(&source),
            Arc::clone(&view),
            config(5000, CyclePolicy::Concurrent),
        );

        sleep(Duration::from_millis(1)).await;
        assert_eq!(source.calls(), 1);
        assert_eq!(view.lock().await.calls.len(), 4);

        sleep(Duration::from_millis(4990)).await;
        assert_eq!(source.calls(), 1);

        sleep(Duration::from_millis(20)).await;
        assert_eq!(source.calls(), 2);

        handle.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn slow_cycles_overlap_by_default() {
        let source = ScriptedSource::new(12_000, Some(medium()));
        let view = Arc::new(Mutex::new(RecordingView::default()));
        let handle = start_update_loop(
            Arc::clone(&source),
            Arc::clone(&view),
            config(5000, CyclePolicy::Concurrent),
        );

        sleep(Duration::from_millis(11_000)).await;
        assert_eq!(source.calls(), 3);
        assert_eq!(handle.in_flight(), 3);
        assert_eq!(handle.status(), LoopStatus::Refreshing);
        assert!(view.lock().await.calls.is_empty());

        handle.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn skip_if_busy_drops_ticks_while_waiting() {
        let source = ScriptedSource::new(12_000, Some(medium()));
        let view = Arc::new(Mutex::new(RecordingView::default()));
        let handle = start_update_loop(
            Arc::clone(&source),
            Arc::clone(&view),
            config(5000, CyclePolicy::SkipIfBusy),
        );

        sleep(Duration::from_millis(11_000)).await;
        assert_eq!(source.calls(), 1);
        assert_eq!(handle.in_flight(), 1);

        // First answer lands at 12s; the tick at 15s starts the next cycle.
        sleep(Duration::from_millis(4_500)).await;
        assert_eq!(source.calls(), 2);
        assert_eq!(view.lock().await.calls.len(), 4);

        handle.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_ticks_but_lets_in_flight_cycle_render() {
        let source = ScriptedSource::new(2000, Some(medium()));
        let view = Arc::new(Mutex::new(RecordingView::default()));
        let handle = start_update_loop(
            Arc::clone(&source),
            Arc::clone(&view),
            config(5000, CyclePolicy::Concurrent),
        );

        sleep(Duration::from_millis(1)).await;
        handle.cancel();
        assert!(handle.is_cancelled());

        sleep(Duration::from_millis(3000)).await;
        assert_eq!(view.lock().await.calls.len(), 4);
        assert_eq!(handle.status(), LoopStatus::Idle);

        sleep(Duration::from_millis(20_000)).await;
        assert_eq!(source.calls(), 1);

        handle.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetches_keep_stale_panel() {
        let mut panel = PanelView::new();
        crate::view::render_snapshot(&mut panel, &medium(), chrono::Local::now());
        let before = panel.clone();

        let source = ScriptedSource::new(0, None);
        let view = Arc::new(Mutex::new(panel));
        let handle = start_update_loop(
            Arc::clone(&source),
            Arc::clone(&view),
            config(1000, CyclePolicy::Concurrent),
        );

        sleep(Duration::from_millis(2500)).await;
        assert_eq!(source.calls(), 3);
        let panel = view.lock().await;
        assert_eq!(*panel, before);
        assert_eq!(panel.text(Slot::RiskMessage), Some("Consider taking a break soon"));
        drop(panel);

        handle.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn controller_runs_one_loop_at_a_time() {
        let source = ScriptedSource::new(0, Some(medium()));
        let view = Arc::new(Mutex::new(RecordingView::default()));
        let mut controller = UpdateLoopController::new();

        controller
            .start(Arc::clone(&source), Arc::clone(&view), LoopConfig::default())
            .unwrap();
        assert!(controller.is_running());
        assert!(controller
            .start(Arc::clone(&source), Arc::clone(&view), LoopConfig::default())
            .is_err());

        controller.stop().await.unwrap();
        assert!(!controller.is_running());
        assert_eq!(controller.status(), LoopStatus::Idle);
        controller.stop().await.unwrap();
    }
}
