//! Timed placeholder and progressive-reveal state machine.
//!
//! Each [`RevealScheduler`] owns at most one [`TickTimer`]. The timer is a
//! spawned `tokio::time::interval` task posting [`SummaryEvent::Tick`] to the
//! loop; dropping the handle aborts the task. Every transition replaces or
//! clears the single timer slot, and every tick carries the [`TimerToken`]
//! of the timer that produced it, so a tick already queued for a replaced
//! timer is recognized and ignored.

use crate::events::SummaryEvent;
use crate::host::PanelId;
use arkiva_core::{ArkivaResult, ConfigError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Frames of the loading indicator, cycled while a generation is pending.
pub const PLACEHOLDER_FRAMES: [&str; 4] = ["·  ", "·· ", "···", " ··"];

/// Shortest period a tick timer runs at.
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// Identifies one started timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// Presentation state of one panel's summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealState {
    Idle,
    /// Waiting on a generation; `tick` indexes [`PLACEHOLDER_FRAMES`].
    Placeholder { tick: usize },
    /// `prefix_len` characters of the text are visible, always fewer than
    /// its full length.
    Revealing { prefix_len: usize },
    /// The whole text is visible. The tick that makes the prefix reach the
    /// full length lands here directly.
    Done,
    Failed { message: String },
}

/// Cadence of the two animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTiming {
    pub placeholder_interval: Duration,
    pub reveal_interval: Duration,
    /// Characters added per reveal tick.
    pub reveal_step: usize,
}

impl RevealTiming {
    /// Reject zero periods and a zero step.
    pub fn validate(&self) -> ArkivaResult<()> {
        for (field, period) in [
            ("placeholder_interval", self.placeholder_interval),
            ("reveal_interval", self.reveal_interval),
        ] {
            if period.is_zero() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: format!("{:?}", period),
                    reason: "must be > 0".to_string(),
                }
                .into());
            }
        }
        if self.reveal_step == 0 {
            return Err(ConfigError::InvalidValue {
                field: "reveal_step".to_string(),
                value: "0".to_string(),
                reason: "must be > 0".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            placeholder_interval: Duration::from_millis(150),
            reveal_interval: Duration::from_millis(15),
            reveal_step: 1,
        }
    }
}

/// Handle to a running tick task. Aborts the task on drop.
#[derive(Debug)]
pub struct TickTimer {
    token: TimerToken,
    handle: JoinHandle<()>,
}

impl TickTimer {
    fn start(
        panel: PanelId,
        token: TimerToken,
        period: Duration,
        events: mpsc::Sender<SummaryEvent>,
    ) -> Self {
        let period = period.max(MIN_TICK_PERIOD);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick of an interval completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if events
                    .send(SummaryEvent::Tick { panel, token })
                    .await
                    .is_err()
                {
                    break;
                }
            }
        });
        Self { token, handle }
    }

    pub fn token(&self) -> TimerToken {
        self.token
    }
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Restartable state machine driving one panel's summary display.
#[derive(Debug)]
pub struct RevealScheduler {
    panel: PanelId,
    timing: RevealTiming,
    events: mpsc::Sender<SummaryEvent>,
    state: RevealState,
    text: String,
    text_chars: usize,
    timer: Option<TickTimer>,
    next_token: u64,
}

impl RevealScheduler {
    pub fn new(panel: PanelId, timing: RevealTiming, events: mpsc::Sender<SummaryEvent>) -> Self {
        Self {
            panel,
            timing,
            events,
            state: RevealState::Idle,
            text: String::new(),
            text_chars: 0,
            timer: None,
            next_token: 0,
        }
    }

    pub fn state(&self) -> &RevealState {
        &self.state
    }

    /// Full text being revealed (empty unless revealing or done).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the revealed text in characters.
    pub fn text_len(&self) -> usize {
        self.text_chars
    }

    /// Number of characters currently visible.
    pub fn prefix_len(&self) -> usize {
        match self.state {
            RevealState::Revealing { prefix_len } => prefix_len,
            RevealState::Done => self.text_chars,
            _ => 0,
        }
    }

    /// The part of the text currently visible. Never splits a character.
    pub fn visible_text(&self) -> &str {
        match self.state {
            RevealState::Revealing { prefix_len } => char_prefix(&self.text, prefix_len),
            RevealState::Done => &self.text,
            _ => "",
        }
    }

    /// Current loading-indicator frame, if the placeholder is showing.
    pub fn placeholder_frame(&self) -> Option<&'static str> {
        match self.state {
            RevealState::Placeholder { tick } => {
                Some(PLACEHOLDER_FRAMES[tick % PLACEHOLDER_FRAMES.len()])
            }
            _ => None,
        }
    }

    pub fn active_timer(&self) -> Option<TimerToken> {
        self.timer.as_ref().map(TickTimer::token)
    }

    /// Show the loading indicator. Keeps animating if already showing.
    pub fn show_placeholder(&mut self) {
        if matches!(self.state, RevealState::Placeholder { .. }) {
            return;
        }
        self.clear_text();
        self.state = RevealState::Placeholder { tick: 0 };
        self.start_timer(self.timing.placeholder_interval);
    }

    /// Start revealing `text`.
    ///
    /// Revealing the same text again while it is already being revealed or
    /// fully shown does not restart the animation.
    pub fn reveal(&mut self, text: impl Into<String>) {
        let text = text.into();
        let showing = matches!(
            self.state,
            RevealState::Revealing { .. } | RevealState::Done
        );
        if showing && self.text == text {
            return;
        }

        self.stop_timer();
        self.text_chars = text.chars().count();
        self.text = text;
        if self.text_chars == 0 {
            self.state = RevealState::Done;
            return;
        }
        self.state = RevealState::Revealing { prefix_len: 0 };
        self.start_timer(self.timing.reveal_interval);
    }

    /// Stop everything and show `message` instead of any text.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.stop_timer();
        self.clear_text();
        self.state = RevealState::Failed {
            message: message.into(),
        };
    }

    pub fn reset(&mut self) {
        self.stop_timer();
        self.clear_text();
        self.state = RevealState::Idle;
    }

    /// Advance the animation. Returns whether the visible state changed.
    ///
    /// Ticks from any timer other than the live one are ignored.
    pub fn on_tick(&mut self, token: TimerToken) -> bool {
        if self.active_timer() != Some(token) {
            trace!(panel = %self.panel, "ignoring tick from replaced timer");
            return false;
        }

        match self.state {
            RevealState::Placeholder { tick } => {
                self.state = RevealState::Placeholder {
                    tick: (tick + 1) % PLACEHOLDER_FRAMES.len(),
                };
                true
            }
            RevealState::Revealing { prefix_len } => {
                let step = self.timing.reveal_step.max(1);
                let next = prefix_len.saturating_add(step).min(self.text_chars);
                if next >= self.text_chars {
                    self.stop_timer();
                    self.state = RevealState::Done;
                } else {
                    self.state = RevealState::Revealing { prefix_len: next };
                }
                true
            }
            RevealState::Idle | RevealState::Done | RevealState::Failed { .. } => {
                self.stop_timer();
                false
            }
        }
    }

    fn clear_text(&mut self) {
        self.text.clear();
        self.text_chars = 0;
    }

    fn start_timer(&mut self, period: Duration) {
        self.stop_timer();
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        debug!(panel = %self.panel, ?period, "starting reveal timer");
        self.timer = Some(TickTimer::start(
            self.panel,
            token,
            period,
            self.events.clone(),
        ));
    }

    fn stop_timer(&mut self) {
        if self.timer.take().is_some() {
            debug!(panel = %self.panel, "stopped reveal timer");
        }
    }
}

/// The first `chars` characters of `text`.
pub fn char_prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// The visible prefix grows strictly tick over tick and ends at the full text.
        #[test]
        fn prop_reveal_prefix_strictly_increases(
            text in "[a-zë📄 ]{1,40}",
            step in 1usize..6
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .start_paused(true)
                .build()
                .unwrap();
            runtime.block_on(async {
                let (tx, mut rx) = mpsc::channel(256);
                let timing = RevealTiming { reveal_step: step, ..RevealTiming::default() };
                let mut s = RevealScheduler::new(PanelId::new(1), timing, tx);
                s.reveal(text.clone());

                let total = text.chars().count();
                let mut last = 0usize;
                while s.state() != &RevealState::Done {
                    let token = match rx.recv().await {
                        Some(SummaryEvent::Tick { token, .. }) => token,
                        _ => unreachable!(),
                    };
                    s.on_tick(token);
                    let now = s.visible_text().chars().count();
                    prop_assert!(now > last);
                    prop_assert!(now <= total);
                    prop_assert!(text.starts_with(s.visible_text()));
                    last = now;
                }
                prop_assert_eq!(last, total);
                Ok(())
            })?;
        }
    }
}
