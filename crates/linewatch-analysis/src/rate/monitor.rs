//! RateMonitor: threshold alerting over a trailing window, with dampening.
//!
//! Each evaluation asks the crossing log how many events fall inside the
//! window ending at `now`. An alert fires when the count reaches the
//! threshold and the previous alert is older than the cooldown. The cooldown
//! expires lazily on the next evaluation; there is no timer.

use std::sync::{Arc, Mutex, MutexGuard};

use linewatch_core::config::AlertConfig;
use linewatch_core::errors::{ConfigError, StorageError};
use linewatch_core::events::TrafficAlert;
use linewatch_core::traits::CrossingLog;
use linewatch_core::types::Timestamp;
use serde::Serialize;

/// Monitor configuration, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorSettings {
    pub window_minutes: u32,
    pub threshold: u64,
    pub cooldown_seconds: f64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        let config = AlertConfig::default();
        Self {
            window_minutes: config.effective_window_minutes(),
            threshold: config.effective_threshold(),
            cooldown_seconds: config.effective_cooldown_seconds(),
        }
    }
}

impl MonitorSettings {
    pub fn from_config(config: &AlertConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            window_minutes: config.effective_window_minutes(),
            threshold: config.effective_threshold(),
            cooldown_seconds: config.effective_cooldown_seconds(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        AlertConfig {
            window_minutes: Some(self.window_minutes),
            threshold: Some(self.threshold),
            cooldown_seconds: Some(self.cooldown_seconds),
        }
        .validate()
    }

    pub fn window_seconds(&self) -> f64 {
        f64::from(self.window_minutes) * 60.0
    }
}

/// Outcome of one evaluation. `count` is always filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlertDecision {
    pub alert: bool,
    pub count: u64,
}

impl AlertDecision {
    /// The structured alert for the sink, if this decision raised one.
    pub fn to_alert(&self, now: Timestamp, threshold: u64) -> Option<TrafficAlert> {
        self.alert.then_some(TrafficAlert {
            triggered_at: now,
            count: self.count,
            threshold,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonitorState {
    Quiet,
    Cooldown { remaining_secs: f64 },
}

/// Windowed rate monitor over any [`CrossingLog`].
pub struct RateMonitor<L: CrossingLog + ?Sized> {
    log: Arc<L>,
    settings: MonitorSettings,
    last_alert: Mutex<Option<Timestamp>>,
}

impl<L: CrossingLog + ?Sized> RateMonitor<L> {
    pub fn new(log: Arc<L>, settings: MonitorSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            log,
            settings,
            last_alert: Mutex::new(None),
        })
    }

    pub fn from_config(log: Arc<L>, config: &AlertConfig) -> Result<Self, ConfigError> {
        Self::new(log, MonitorSettings::from_config(config)?)
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// Count the window ending at `now` and decide whether to alert.
    ///
    /// A failed count is returned as-is and leaves the alert state untouched.
    pub fn evaluate(&self, now: Timestamp) -> Result<AlertDecision, StorageError> {
        let window_start = now.minus_secs(self.settings.window_seconds());
        let count = self.log.count_since(window_start)?;

        if count < self.settings.threshold {
            return Ok(AlertDecision { alert: false, count });
        }

        let mut last_alert = self.lock();
        let cooled_down = match *last_alert {
            None => true,
            Some(last) => now.secs_since(last) > self.settings.cooldown_seconds,
        };
        if !cooled_down {
            tracing::trace!(count, "threshold reached during cooldown");
            return Ok(AlertDecision { alert: false, count });
        }

        *last_alert = Some(now);
        tracing::warn!(
            count,
            threshold = self.settings.threshold,
            window_minutes = self.settings.window_minutes,
            "traffic alert"
        );
        Ok(AlertDecision { alert: true, count })
    }

    pub fn state(&self, now: Timestamp) -> MonitorState {
        match *self.lock() {
            Some(last) => {
                let remaining_secs = self.settings.cooldown_seconds - now.secs_since(last);
                if remaining_secs >= 0.0 {
                    MonitorState::Cooldown { remaining_secs }
                } else {
                    MonitorState::Quiet
                }
            }
            None => MonitorState::Quiet,
        }
    }

    pub fn last_alert_time(&self) -> Option<Timestamp> {
        *self.lock()
    }

    /// The guarded value is a plain `Option`, valid even after a panic.
    fn lock(&self) -> MutexGuard<'_, Option<Timestamp>> {
        self.last_alert
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    use linewatch_core::types::{EventId, NewCrossing};

    use super::*;

    /// Log whose count is set directly by the test.
    #[derive(Default)]
    struct FixedCount {
        count: AtomicU64,
        fail: AtomicBool,
    }

    impl FixedCount {
        fn set(&self, n: u64) {
            self.count.store(n, Ordering::SeqCst);
        }
    }

    impl CrossingLog for FixedCount {
        fn initialize(&self) -> Result<(), StorageError> {
            Ok(())
        }

        fn append(&self, _crossing: &NewCrossing) -> Result<EventId, StorageError> {
            Ok(0)
        }

        fn count_since(&self, _threshold: Timestamp) -> Result<u64, StorageError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(StorageError::unavailable("disk gone"));
            }
            Ok(self.count.load(Ordering::SeqCst))
        }
    }

    fn monitor(log: &Arc<FixedCount>) -> RateMonitor<FixedCount> {
        RateMonitor::new(Arc::clone(log), MonitorSettings::default()).unwrap()
    }

    #[test]
    fn below_threshold_is_quiet() {
        let log = Arc::new(FixedCount::default());
        let m = monitor(&log);
        log.set(9);
        assert_eq!(
            m.evaluate(Timestamp(100.0)).unwrap(),
            AlertDecision { alert: false, count: 9 }
        );
        assert!(m.last_alert_time().is_none());
    }

    /// Captured fmt output for one test.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn alert_is_logged_at_warn() {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();

        let log = Arc::new(FixedCount::default());
        let m = monitor(&log);
        log.set(10);
        tracing::subscriber::with_default(subscriber, || {
            assert!(m.evaluate(Timestamp(100.0)).unwrap().alert);
        });

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let line = output
            .lines()
            .find(|l| l.contains("traffic alert"))
            .expect("alert line");
        assert!(line.contains("WARN"), "{line}");
        assert!(line.contains("count=10"), "{line}");
    }

    #[test]
    fn cooldown_suppresses_second_alert() {
        let log = Arc::new(FixedCount::default());
        let m = monitor(&log);
        log.set(12);
        assert!(m.evaluate(Timestamp(100.0)).unwrap().alert);
        assert!(!m.evaluate(Timestamp(103.0)).unwrap().alert);
        assert_eq!(
            m.state(Timestamp(103.0)),
            MonitorState::Cooldown { remaining_secs: 7.0 }
        );
        assert_eq!(m.last_alert_time(), Some(Timestamp(100.0)));
    }

    #[test]
    fn cooldown_boundary_is_exclusive() {
        let log = Arc::new(FixedCount::default());
        let m = monitor(&log);
        log.set(10);
        assert!(m.evaluate(Timestamp(0.0)).unwrap().alert);
        assert!(!m.evaluate(Timestamp(10.0)).unwrap().alert);
        assert!(m.evaluate(Timestamp(10.5)).unwrap().alert);
        assert_eq!(m.state(Timestamp(30.0)), MonitorState::Quiet);
    }

    #[test]
    fn failed_count_leaves_state_untouched() {
        let log = Arc::new(FixedCount::default());
        let m = monitor(&log);
        log.set(10);
        m.evaluate(Timestamp(0.0)).unwrap();

        log.fail.store(true, Ordering::SeqCst);
        let err = m.evaluate(Timestamp(50.0)).unwrap_err();
        assert!(err.is_unavailable());
        assert_eq!(m.last_alert_time(), Some(Timestamp(0.0)));
    }

    #[test]
    fn decision_builds_alert_payload() {
        let fired = AlertDecision { alert: true, count: 11 };
        assert_eq!(
            fired.to_alert(Timestamp(5.0), 10),
            Some(TrafficAlert {
                triggered_at: Timestamp(5.0),
                count: 11,
                threshold: 10,
            })
        );
        assert!(AlertDecision { alert: false, count: 11 }
            .to_alert(Timestamp(5.0), 10)
            .is_none());
    }

    #[test]
    fn zero_threshold_is_rejected() {
        let log = Arc::new(FixedCount::default());
        let settings = MonitorSettings {
            threshold: 0,
            ..MonitorSettings::default()
        };
        assert!(RateMonitor::new(log, settings).is_err());
    }

    #[test]
    fn concurrent_evaluations_alert_once() {
        let log = Arc::new(FixedCount::default());
        log.set(50);
        let m = Arc::new(monitor(&log));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let m = Arc::clone(&m);
                std::thread::spawn(move || m.evaluate(Timestamp(1000.0)).unwrap().alert)
            })
            .collect();
        let alerts = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|fired| *fired)
            .count();
        assert_eq!(alerts, 1);
    }
}
