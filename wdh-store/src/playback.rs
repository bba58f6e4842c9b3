//! Cursor playback: a background timer walks the cursor forward in time.
//!
//! The timer thread never touches state. It only sends tick messages over
//! a channel; the owner calls [`Playback::poll`] from the dispatch thread
//! to apply them, so every state change still goes through the store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use chrono::TimeDelta;

use crate::state::CursorSetting;
use crate::store::{Action, Store};

/// Identifies one playback run while it is active.
pub type PlayId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// Wall-clock delay between cursor advances.
    pub interval: Duration,
    /// How far the cursor moves per tick.
    pub step: TimeDelta,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            interval: Duration::from_millis(10),
            step: TimeDelta::minutes(15),
        }
    }
}

/// Advance the cursor by one step, or signal the end of the window.
pub fn advance(offset: TimeDelta, step: TimeDelta, max_offset: TimeDelta) -> Option<TimeDelta> {
    let next = offset + step;
    (next <= max_offset).then_some(next)
}

struct Timer {
    id: PlayId,
    stop: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

/// Owns the timer thread and applies its ticks to a store. At most one
/// timer runs at a time; dropping the controller stops it.
pub struct Playback {
    config: PlaybackConfig,
    tick_tx: Sender<()>,
    tick_rx: Receiver<()>,
    timer: Option<Timer>,
    next_id: PlayId,
}

impl Playback {
    pub fn new(config: PlaybackConfig) -> Self {
        let (tick_tx, tick_rx) = channel();
        Playback {
            config,
            tick_tx,
            tick_rx,
            timer: None,
            next_id: 1,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.timer.is_some()
    }

    /// Begin playback over a window `max_offset` long. A cursor with no
    /// explicit position, or one already at the end, rewinds to the start.
    /// Starting while already playing changes nothing else.
    pub fn start(&mut self, store: &mut Store, max_offset: TimeDelta) {
        let explicit = match store.state().graph.cursor {
            CursorSetting::Fixed(offset) => Some(offset),
            _ => None,
        };
        if explicit.map_or(true, |offset| offset >= max_offset) {
            store.dispatch(Action::SetCursorOffset(CursorSetting::Fixed(
                TimeDelta::zero(),
            )));
        }
        if self.timer.is_some() {
            return;
        }

        // drop ticks left over from an earlier run
        while self.tick_rx.try_recv().is_ok() {}

        let id = self.next_id;
        self.next_id += 1;
        let stop = Arc::new(AtomicBool::new(false));
        let thread = {
            let stop = Arc::clone(&stop);
            let tick_tx = self.tick_tx.clone();
            let interval = self.config.interval;
            std::thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    std::thread::sleep(interval);
                    if stop.load(Ordering::Relaxed) || tick_tx.send(()).is_err() {
                        break;
                    }
                }
            })
        };
        log::debug!("playback {id} started");
        self.timer = Some(Timer { id, stop, thread });
        store.dispatch(Action::PlaybackStarted(id));
    }

    /// Apply all pending timer ticks. Call this from the dispatch thread.
    pub fn poll(&mut self, store: &mut Store, max_offset: TimeDelta) {
        while self.timer.is_some() && self.tick_rx.try_recv().is_ok() {
            self.on_tick(store, max_offset);
        }
    }

    /// One playback step: move the cursor forward, stopping when it would
    /// pass the end of the window.
    pub fn on_tick(&mut self, store: &mut Store, max_offset: TimeDelta) {
        if self.timer.is_none() {
            return;
        }
        let offset = match store.state().graph.cursor {
            CursorSetting::Fixed(offset) => offset,
            _ => TimeDelta::zero(),
        };
        match advance(offset, self.config.step, max_offset) {
            Some(next) => store.dispatch(Action::SetCursorOffset(CursorSetting::Fixed(next))),
            None => self.stop(store),
        }
    }

    /// Stop playback, leaving the cursor where it is. Safe to call when
    /// nothing is playing.
    pub fn stop(&mut self, store: &mut Store) {
        let Some(timer) = self.timer.take() else {
            return;
        };
        timer.stop.store(true, Ordering::Relaxed);
        if timer.thread.join().is_err() {
            log::warn!("playback timer thread panicked");
        }
        log::debug!("playback {} stopped", timer.id);
        store.dispatch(Action::PlaybackStopped);
    }
}

impl Default for Playback {
    fn default() -> Self {
        Playback::new(PlaybackConfig::default())
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop.store(true, Ordering::Relaxed);
            let _ = timer.thread.join();
        }
    }
}
