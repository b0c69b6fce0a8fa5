use std::time::{Duration, Instant};

/// 編輯停止後觸發自動儲存前的靜默時間。 / Quiet period after the last edit before autosave fires.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_secs(2);
/// 自動儲存提示的顯示時間。 / How long the indicator stays visible after an autosave.
pub const DEFAULT_AUTOSAVE_INDICATOR: Duration = Duration::from_secs(1);
/// 明確儲存提示的顯示時間。 / How long the indicator stays visible after an explicit save.
pub const DEFAULT_SAVE_INDICATOR: Duration = Duration::from_secs(2);

/// 單一槽位的延遲任務：每次排程都取代前一個。 / Single-slot delayed task: scheduling replaces whatever was pending.
///
/// Time is always passed in by the caller so the primitive never sleeps and
/// is not tied to a runtime.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet_period: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            deadline: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// 取消待處理任務並重新排程。 / Cancels any pending task and schedules a new one.
    pub fn schedule(&mut self, now: Instant) -> Instant {
        let deadline = now + self.quiet_period;
        self.deadline = Some(deadline);
        deadline
    }

    /// 取消待處理任務；回傳先前是否有任務。 / Cancels the pending task, reporting whether one existed.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// 到期時觸發一次並清空槽位。 / Fires once when due and empties the slot.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// 距離到期的剩餘時間。 / Time left until the pending task is due.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

/// 短暫顯示的「已儲存」提示。 / Transient "saved" notification.
#[derive(Debug, Clone, Default)]
pub struct SavedIndicator {
    visible_until: Option<Instant>,
}

impl SavedIndicator {
    pub fn show(&mut self, now: Instant, duration: Duration) {
        self.visible_until = Some(now + duration);
    }

    pub fn hide(&mut self) {
        self.visible_until = None;
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        matches!(self.visible_until, Some(until) if now < until)
    }

    /// 過期時清除；若此次呼叫造成隱藏則回傳 `true`。 / Clears an expired indicator, returning `true` when this call hid it.
    pub fn clear_expired(&mut self, now: Instant) -> bool {
        match self.visible_until {
            Some(until) if now >= until => {
                self.visible_until = None;
                true
            }
            _ => false,
        }
    }

    fn time_until_hidden(&self, now: Instant) -> Option<Duration> {
        self.visible_until
            .map(|until| until.saturating_duration_since(now))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveTimings {
    pub quiet_period: Duration,
    pub autosave_indicator: Duration,
    pub save_indicator: Duration,
}

impl Default for AutosaveTimings {
    fn default() -> Self {
        Self {
            quiet_period: DEFAULT_QUIET_PERIOD,
            autosave_indicator: DEFAULT_AUTOSAVE_INDICATOR,
            save_indicator: DEFAULT_SAVE_INDICATOR,
        }
    }
}

/// 觸發提示的儲存種類。 / Which kind of save raised the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Autosave,
    Explicit,
}

/// 去抖動的自動儲存排程器。 / Debounced autosave scheduler.
///
/// Holds no document content; it only decides when the registry snapshot
/// should be flushed and how long the indicator stays up.
#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    debouncer: Debouncer,
    indicator: SavedIndicator,
    timings: AutosaveTimings,
}

impl AutosaveScheduler {
    pub fn new(timings: AutosaveTimings) -> Self {
        Self {
            debouncer: Debouncer::new(timings.quiet_period),
            indicator: SavedIndicator::default(),
            timings,
        }
    }

    pub fn timings(&self) -> AutosaveTimings {
        self.timings
    }

    /// 記錄一次編輯並重新開始計時。 / Records an edit and restarts the quiet period.
    pub fn note_edit(&mut self, now: Instant) -> Instant {
        self.debouncer.schedule(now)
    }

    /// 若已到期則回傳 `true`（每次排程最多一次）。 / Returns `true` once when the pending flush is due.
    pub fn take_due(&mut self, now: Instant) -> bool {
        self.debouncer.fire_due(now)
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn cancel(&mut self) -> bool {
        self.debouncer.cancel()
    }

    pub fn show_saved(&mut self, now: Instant, kind: SaveKind) {
        let duration = match kind {
            SaveKind::Autosave => self.timings.autosave_indicator,
            SaveKind::Explicit => self.timings.save_indicator,
        };
        self.indicator.show(now, duration);
    }

    pub fn indicator_visible(&self, now: Instant) -> bool {
        self.indicator.is_visible(now)
    }

    pub fn expire_indicator(&mut self, now: Instant) -> bool {
        self.indicator.clear_expired(now)
    }

    /// 下一次需要喚醒的時間（自動儲存或提示過期）。 / Delay until the next flush or indicator expiry, if any.
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        match (
            self.debouncer.time_until_due(now),
            self.indicator.time_until_hidden(now),
        ) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
