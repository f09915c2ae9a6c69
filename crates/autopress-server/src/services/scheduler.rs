//! InventoryScheduler - daily article generation and startup replenishment
//!
//! Two background tasks are spawned on start:
//! - A daily trigger that runs one generation attempt at a fixed UTC time
//! - A one-off replenishment loop that tops the store up to a minimum count
//!
//! Failures inside either task are logged and never stop the trigger.

use autopress_core::{Article, ArticleGenerator, ArticleStore};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Duration;
use tracing::{debug, error, info, warn};

/// Scheduling parameters
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Time of day (UTC) for the daily article
    pub daily_at: NaiveTime,
    /// Minimum number of articles ensured at startup
    pub target_inventory: u64,
    /// Pause between consecutive replenishment attempts
    pub replenish_delay: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            daily_at: NaiveTime::from_hms_opt(2, 0, 0).unwrap_or_default(),
            target_inventory: 3,
            replenish_delay: Duration::from_millis(2000),
        }
    }
}

/// Outcome of a replenishment pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplenishReport {
    pub deficit: u64,
    pub succeeded: u64,
    pub failed: u64,
}

/// Handles for the running background tasks
struct SchedulerHandles {
    daily: tokio::task::AbortHandle,
    replenish: tokio::task::AbortHandle,
}

/// Wall-clock source for the daily trigger
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Next instant strictly after `now` whose UTC time of day is `at`.
pub fn next_run_after(now: DateTime<Utc>, at: NaiveTime) -> DateTime<Utc> {
    let today = now.date_naive().and_time(at).and_utc();
    if today > now {
        today
    } else {
        today + chrono::Duration::days(1)
    }
}

/// Next daily firing, never on or before a day that already fired.
///
/// Guards against the wall clock stepping back after a tick.
pub fn next_daily_run(
    now: DateTime<Utc>,
    at: NaiveTime,
    last_fired: Option<NaiveDate>,
) -> DateTime<Utc> {
    let mut next = next_run_after(now, at);
    if let Some(fired) = last_fired {
        while next.date_naive() <= fired {
            next += chrono::Duration::days(1);
        }
    }
    next
}

/// InventoryScheduler drives generation attempts on a timer.
pub struct InventoryScheduler {
    generator: Arc<ArticleGenerator>,
    store: Arc<dyn ArticleStore>,
    config: SchedulerConfig,
    clock: Arc<dyn Clock>,
    /// `None` until started; never reset
    handles: Mutex<Option<SchedulerHandles>>,
}

impl InventoryScheduler {
    /// Create a scheduler. Nothing runs until [`InventoryScheduler::start`].
    pub fn new(
        generator: Arc<ArticleGenerator>,
        store: Arc<dyn ArticleStore>,
        config: SchedulerConfig,
    ) -> Self {
        Self::with_clock(generator, store, config, Arc::new(SystemClock))
    }

    /// Create a scheduler reading time from `clock`.
    pub fn with_clock(
        generator: Arc<ArticleGenerator>,
        store: Arc<dyn ArticleStore>,
        config: SchedulerConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            generator,
            store,
            config,
            clock,
            handles: Mutex::new(None),
        }
    }

    /// Start the daily trigger and the replenishment loop.
    ///
    /// Returns `false` (and does nothing else) if already started.
    pub async fn start(self: Arc<Self>) -> bool {
        let mut handles = self.handles.lock().await;
        if handles.is_some() {
            warn!("Scheduler already started");
            return false;
        }

        let daily = tokio::spawn(Arc::clone(&self).run_daily()).abort_handle();
        info!(
            daily_at = %self.config.daily_at.format("%H:%M"),
            "Article scheduler configured (daily, UTC)"
        );

        let service = Arc::clone(&self);
        let replenish = tokio::spawn(async move {
            if let Err(e) = service.ensure_minimum_inventory().await {
                error!(error = %e, "Error ensuring minimum articles");
            }
        })
        .abort_handle();

        *handles = Some(SchedulerHandles { daily, replenish });
        true
    }

    /// Whether the daily trigger task is still alive
    pub async fn is_trigger_active(&self) -> bool {
        self.handles
            .lock()
            .await
            .as_ref()
            .map(|h| !h.daily.is_finished())
            .unwrap_or(false)
    }

    /// Whether the startup replenishment task has completed
    pub async fn is_replenish_finished(&self) -> bool {
        self.handles
            .lock()
            .await
            .as_ref()
            .map(|h| h.replenish.is_finished())
            .unwrap_or(false)
    }

    async fn run_daily(self: Arc<Self>) {
        let mut last_fired: Option<NaiveDate> = None;
        loop {
            let now = self.clock.now();
            let next = next_daily_run(now, self.config.daily_at, last_fired);
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            debug!(next_run = %next, "Waiting for next daily article");

            tokio::time::sleep(wait).await;
            last_fired = Some(next.date_naive());
            self.run_tick().await;
        }
    }

    /// One firing of the daily trigger. Errors are logged, not returned.
    pub async fn run_tick(&self) -> Option<Article> {
        info!("Daily article generation triggered");
        match self.generator.generate_and_save(None).await {
            Ok(article) => {
                info!(article_id = %article.id, "Daily article generated");
                Some(article)
            }
            Err(e) => {
                error!(error = %e, "Failed to generate daily article");
                None
            }
        }
    }

    /// Generate articles until the store holds at least `target_inventory`.
    ///
    /// Attempts run sequentially with `replenish_delay` between them. A failed
    /// attempt is counted and the loop carries on.
    pub async fn ensure_minimum_inventory(&self) -> autopress_core::Result<ReplenishReport> {
        let current = self.store.count()?;
        let deficit = self.config.target_inventory.saturating_sub(current);

        let mut report = ReplenishReport {
            deficit,
            succeeded: 0,
            failed: 0,
        };
        if deficit == 0 {
            debug!(current, "Article inventory already satisfied");
            return Ok(report);
        }

        info!(needed = deficit, current, "Generating initial articles");
        for i in 0..deficit {
            if i > 0 {
                tokio::time::sleep(self.config.replenish_delay).await;
            }

            match self.generator.generate_and_save(None).await {
                Ok(_) => report.succeeded += 1,
                Err(e) => {
                    report.failed += 1;
                    error!(attempt = i + 1, error = %e, "Initial article generation failed");
                }
            }
        }

        info!(
            deficit = report.deficit,
            succeeded = report.succeeded,
            failed = report.failed,
            "Initial article generation finished"
        );
        Ok(report)
    }

    /// Manual trigger: one attempt, persisted, independent of the timer.
    pub async fn generate_now(&self, topic: Option<&str>) -> autopress_core::Result<Article> {
        self.generator.generate_and_save(topic).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use autopress_core::generation::{FallbackCatalog, PromptSelector};
    use autopress_core::{ArticleDraft, Database, Error, GenerationOutcome, TextGenerator};
    use chrono::{TimeZone, Timelike};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Generator that counts calls and fails the first `fail_first` of them.
    struct CountingGenerator {
        calls: AtomicUsize,
        fail_first: usize,
    }

    impl CountingGenerator {
        fn new(fail_first: usize) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail_first,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for CountingGenerator {
        async fn generate(&self, prompt: &str) -> GenerationOutcome {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_first {
                GenerationOutcome::Failure("simulated outage".to_string())
            } else {
                GenerationOutcome::success(format!("Article number {}.", n), prompt)
            }
        }
    }

    /// Store with a fixed count that rejects every write.
    struct RejectingStore {
        count: u64,
    }

    impl ArticleStore for RejectingStore {
        fn create(&self, _draft: &ArticleDraft) -> autopress_core::Result<Article> {
            Err(Error::LockPoisoned)
        }

        fn count(&self) -> autopress_core::Result<u64> {
            Ok(self.count)
        }
    }

    fn config(target_inventory: u64) -> SchedulerConfig {
        // Keep the daily trigger far from "now" so it never fires during a test
        let daily_at = (Utc::now() + chrono::Duration::hours(12))
            .time()
            .with_nanosecond(0)
            .unwrap();
        SchedulerConfig {
            daily_at,
            target_inventory,
            replenish_delay: Duration::from_millis(2000),
        }
    }

    fn scheduler(
        store: Arc<dyn ArticleStore>,
        client: Arc<CountingGenerator>,
        target_inventory: u64,
    ) -> Arc<InventoryScheduler> {
        let generator = Arc::new(ArticleGenerator::with_parts(
            Arc::clone(&store),
            Some(client),
            PromptSelector::with_seed(11),
            FallbackCatalog::default(),
        ));
        Arc::new(InventoryScheduler::new(generator, store, config(target_inventory)))
    }

    /// Wall clock that advances with tokio's (possibly paused) clock.
    struct TokioClock {
        wall: DateTime<Utc>,
        origin: tokio::time::Instant,
    }

    impl TokioClock {
        fn starting_at(wall: DateTime<Utc>) -> Arc<Self> {
            Arc::new(Self {
                wall,
                origin: tokio::time::Instant::now(),
            })
        }
    }

    impl Clock for TokioClock {
        fn now(&self) -> DateTime<Utc> {
            self.wall + chrono::Duration::from_std(self.origin.elapsed()).unwrap()
        }
    }

    fn seeded_db(existing: usize) -> Arc<Database> {
        let db = Arc::new(Database::open_in_memory().unwrap());
        for i in 0..existing {
            db.create_article(&ArticleDraft::new(format!("Existing {}", i), "Body.", "Body..."))
                .unwrap();
        }
        db
    }

    #[test]
    fn test_next_run_later_today() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 1, 30, 0).unwrap();
        let at = NaiveTime::from_hms_opt(2, 0, 0).unwrap();
        assert_eq!(
            next_run_after(now, at),
            Utc.with_ymd_and_hms(2026, 3, 1, 2, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_next_run_tomorrow() {
        let at = NaiveTime::from_hms_opt(2, 0, 0).unwrap();

        let exactly = Utc.with_ymd_and_hms(2026, 3, 1, 2, 0, 0).unwrap();
        assert_eq!(
            next_run_after(exactly, at),
            Utc.with_ymd_and_hms(2026, 3, 2, 2, 0, 0).unwrap()
        );

        let after = Utc.with_ymd_and_hms(2026, 12, 31, 23, 0, 0).unwrap();
        assert_eq!(
            next_run_after(after, at),
            Utc.with_ymd_and_hms(2027, 1, 1, 2, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_next_daily_run_skips_fired_day() {
        let at = NaiveTime::from_hms_opt(2, 0, 0).unwrap();
        let fired = Utc.with_ymd_and_hms(2026, 3, 1, 2, 0, 0).unwrap();

        // Clock stepped back to just before the instant that already fired
        let stepped_back = Utc.with_ymd_and_hms(2026, 3, 1, 1, 59, 0).unwrap();
        assert_eq!(
            next_daily_run(stepped_back, at, Some(fired.date_naive())),
            Utc.with_ymd_and_hms(2026, 3, 2, 2, 0, 0).unwrap()
        );

        assert_eq!(
            next_daily_run(stepped_back, at, None),
            Utc.with_ymd_and_hms(2026, 3, 1, 2, 0, 0).unwrap()
        );

        let next_day = Utc.with_ymd_and_hms(2026, 3, 2, 1, 0, 0).unwrap();
        assert_eq!(
            next_daily_run(next_day, at, Some(fired.date_naive())),
            Utc.with_ymd_and_hms(2026, 3, 2, 2, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.daily_at, NaiveTime::from_hms_opt(2, 0, 0).unwrap());
        assert_eq!(config.target_inventory, 3);
        assert_eq!(config.replenish_delay, Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_replenish_fills_deficit_sequentially() {
        let db = seeded_db(1);
        let client = CountingGenerator::new(0);
        let scheduler = scheduler(db.clone(), client.clone(), 3);

        let started = tokio::time::Instant::now();
        let report = scheduler.ensure_minimum_inventory().await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(
            report,
            ReplenishReport {
                deficit: 2,
                succeeded: 2,
                failed: 0
            }
        );
        assert_eq!(client.calls(), 2);
        assert_eq!(db.count_articles().unwrap(), 3);

        // Two attempts, one delay between them
        let delay = Duration::from_millis(2000);
        assert!(elapsed >= delay);
        assert!(elapsed < delay * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replenish_continues_after_failures() {
        let store = Arc::new(RejectingStore { count: 1 });
        let client = CountingGenerator::new(1);
        let scheduler = scheduler(store, client.clone(), 3);

        let report = scheduler.ensure_minimum_inventory().await.unwrap();

        assert_eq!(report.deficit, 2);
        assert_eq!(report.failed, 2);
        assert_eq!(report.succeeded, 0);
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn test_replenish_noop_when_satisfied() {
        let db = seeded_db(5);
        let client = CountingGenerator::new(0);
        let scheduler = scheduler(db.clone(), client.clone(), 3);

        let report = scheduler.ensure_minimum_inventory().await.unwrap();
        assert_eq!(report.deficit, 0);
        assert_eq!(client.calls(), 0);
        assert_eq!(db.count_articles().unwrap(), 5);
    }

    #[tokio::test]
    async fn test_tick_failure_is_contained() {
        let store = Arc::new(RejectingStore { count: 0 });
        let client = CountingGenerator::new(0);
        let scheduler = scheduler(store, client.clone(), 0);

        assert!(scheduler.run_tick().await.is_none());
        assert!(scheduler.run_tick().await.is_none());
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn test_tick_persists_article() {
        let db = seeded_db(0);
        let client = CountingGenerator::new(0);
        let scheduler = scheduler(db.clone(), client, 0);

        let article = scheduler.run_tick().await.unwrap();
        assert_eq!(db.get_article(&article.id).unwrap().unwrap(), article);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_idempotent() {
        let db = seeded_db(0);
        let client = CountingGenerator::new(0);
        let scheduler = scheduler(db.clone(), client.clone(), 3);

        assert!(!scheduler.is_trigger_active().await);
        assert!(Arc::clone(&scheduler).start().await);
        assert!(!Arc::clone(&scheduler).start().await);
                assert!(scheduler.is_trigger_active().await);

        // Let replenishment run to completion
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert!(scheduler.is_replenish_finished().await);
        assert!(scheduler.is_trigger_active().await);
        assert_eq!(client.calls(), 3);
        assert_eq!(db.count_articles().unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_daily_trigger_fires_once_per_day_after_double_start() {
        let db = seeded_db(0);
        let client = CountingGenerator::new(0);
        let generator = Arc::new(ArticleGenerator::with_parts(
            db.clone(),
            Some(client.clone()),
            PromptSelector::with_seed(5),
            FallbackCatalog::default(),
        ));
        let config = SchedulerConfig {
            daily_at: NaiveTime::from_hms_opt(2, 0, 0).unwrap(),
            target_inventory: 0,
            replenish_delay: Duration::from_millis(2000),
        };
        let clock = TokioClock::starting_at(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
        let scheduler = Arc::new(InventoryScheduler::with_clock(
            generator,
            db.clone(),
            config,
            clock,
        ));

        assert!(Arc::clone(&scheduler).start().await);
        assert!(!Arc::clone(&scheduler).start().await);

        tokio::time::sleep(Duration::from_secs(60 * 60)).await;
        assert_eq!(client.calls(), 0);

        // Past 02:00 on the first day
        tokio::time::sleep(Duration::from_secs(60 * 60 + 1)).await;
        assert_eq!(client.calls(), 1);
        assert_eq!(db.count_articles().unwrap(), 1);

        // Past 02:00 on the second day
        tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
        assert_eq!(client.calls(), 2);
        assert_eq!(db.count_articles().unwrap(), 2);
        assert!(scheduler.is_trigger_active().await);
    }

    #[tokio::test]
    async fn test_generate_now_without_start() {
        let db = seeded_db(0);
        let client = CountingGenerator::new(0);
        let scheduler = scheduler(db.clone(), client, 3);

        let article = scheduler.generate_now(Some("manual topic")).await.unwrap();
        assert_eq!(article.title, "Manual Topic");
        assert!(!scheduler.is_trigger_active().await);
        assert_eq!(db.count_articles().unwrap(), 1);
    }
}
