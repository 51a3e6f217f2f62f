// src/ticker.rs

//! Tick sources that pace the animation.
//!
//! `IntervalTicker` runs in a dedicated background thread and sends
//! `HostEvent::Tick` to the host at a fixed period. Every tick carries the
//! generation of the ticker that produced it; when the host restarts its
//! tick source the generation moves on and ticks still sitting in the
//! channel from the old ticker are recognisably stale.
//!
//! Ticks are coalesced rather than queued. The host channel is bounded (see
//! [`TICK_QUEUE_DEPTH`]) and a ticker that finds it full drops the tick, so a
//! host that falls behind resumes at the current pace instead of replaying a
//! backlog.

use crate::host::HostEvent;
use anyhow::{Context, Result};
use log::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Capacity of the host event channel. One pending tick is enough to keep
/// the host busy; anything beyond that would only be replayed late.
pub const TICK_QUEUE_DEPTH: usize = 1;

/// Creates the bounded channel tick sources send into.
pub fn event_channel() -> (SyncSender<HostEvent>, Receiver<HostEvent>) {
    mpsc::sync_channel(TICK_QUEUE_DEPTH)
}

/// Background thread emitting ticks at a fixed period.
pub struct IntervalTicker {
    stop_flag: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl IntervalTicker {
    /// Spawns the ticker thread. The first tick arrives one `period` after
    /// spawning. Ticks that find the channel full are dropped.
    pub fn spawn(sender: SyncSender<HostEvent>, period: Duration, generation: u64) -> Result<Self> {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop_flag);

        let thread_handle = thread::Builder::new()
            .name(format!("ticker-{}", generation))
            .spawn(move || {
                debug!("IntervalTicker {}: started ({:?} period)", generation, period);
                let mut next = Instant::now() + period;
                loop {
                    let now = Instant::now();
                    if now < next {
                        thread::park_timeout(next - now);
                    }
                    if thread_stop.load(Ordering::Acquire) {
                        break;
                    }
                    // Woken early, either spuriously or by unpark.
                    if Instant::now() < next {
                        continue;
                    }
                    next += period;
                    let now = Instant::now();
                    if next <= now {
                        // Overslept by a whole period or more; don't catch up.
                        next = now + period;
                    }

                    match sender.try_send(HostEvent::Tick { generation }) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => {
                            trace!("IntervalTicker {}: host busy, tick dropped", generation);
                        }
                        Err(TrySendError::Disconnected(_)) => {
                            info!("IntervalTicker {}: host channel closed, exiting", generation);
                            break;
                        }
                    }
                }
                debug!("IntervalTicker {}: thread exiting", generation);
            })
            .context("Failed to spawn ticker thread")?;

        Ok(Self {
            stop_flag,
            thread_handle: Some(thread_handle),
            generation,
        })
    }

    /// Stops the thread and waits for it to exit. No tick is sent by this
    /// ticker once `stop` returns.
    pub fn stop(&mut self) {
        if let Some(handle) = self.thread_handle.take() {
            self.stop_flag.store(true, Ordering::Release);
            handle.thread().unpark();
            if let Err(e) = handle.join() {
                error!("IntervalTicker {} thread panicked: {:?}", self.generation, e);
            }
        }
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Something the host can (re)start to receive ticks from.
pub trait TickSource {
    /// Stops the current timer, if any, then starts a new one under a fresh
    /// generation.
    fn restart(&mut self) -> Result<()>;

    /// Generation of the timer currently running.
    fn generation(&self) -> u64;

    fn stop(&mut self);
}

/// Tick source backed by an [`IntervalTicker`] thread.
pub struct IntervalTickSource {
    sender: SyncSender<HostEvent>,
    period: Duration,
    generation: u64,
    ticker: Option<IntervalTicker>,
}

impl IntervalTickSource {
    /// Creates a stopped source. Call [`TickSource::restart`] to start it.
    pub fn new(sender: SyncSender<HostEvent>, period: Duration) -> Self {
        IntervalTickSource {
            sender,
            period,
            generation: 0,
            ticker: None,
        }
    }
}

impl TickSource for IntervalTickSource {
    fn restart(&mut self) -> Result<()> {
        self.stop();
        self.generation += 1;
        self.ticker = Some(IntervalTicker::spawn(
            self.sender.clone(),
            self.period,
            self.generation,
        )?);
        Ok(())
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn stop(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.stop();
        }
    }
}

/// Tick source with no timer behind it. The caller sends
/// `HostEvent::Tick` itself, which suits tests and frame-exact rendering.
#[derive(Debug, Default)]
pub struct ManualTickSource {
    generation: u64,
    restarts: usize,
}

impl ManualTickSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restarts(&self) -> usize {
        self.restarts
    }

    /// A tick event for the current generation.
    pub fn tick(&self) -> HostEvent {
        HostEvent::Tick {
            generation: self.generation,
        }
    }
}

impl TickSource for ManualTickSource {
    fn restart(&mut self) -> Result<()> {
        self.generation += 1;
        self.restarts += 1;
        Ok(())
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn stop(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use test_log::test;

    #[test]
    fn interval_ticker_emits_tagged_ticks() {
        let (tx, rx) = event_channel();
        let mut ticker = IntervalTicker::spawn(tx, Duration::from_millis(5), 7).unwrap();
        for _ in 0..3 {
            let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
            assert_eq!(event, HostEvent::Tick { generation: 7 });
        }
        ticker.stop();
    }

    #[test]
    fn stopped_ticker_sends_nothing_more() {
        let (tx, rx) = event_channel();
        let mut ticker = IntervalTicker::spawn(tx, Duration::from_millis(2), 1).unwrap();
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        ticker.stop();
        // Drain anything sent before stop returned; the sender is gone after that.
        while rx.try_recv().is_ok() {}
        assert_eq!(
            rx.recv_timeout(Duration::from_millis(50)),
            Err(mpsc::RecvTimeoutError::Disconnected)
        );
    }

    #[test]
    fn restart_stops_old_ticker_before_starting_new_generation() {
        let (tx, rx) = event_channel();
        let mut source = IntervalTickSource::new(tx, Duration::from_millis(2));
        source.restart().unwrap();
        assert_eq!(source.generation(), 1);
        rx.recv_timeout(Duration::from_secs(5)).unwrap();

        source.restart().unwrap();
        assert_eq!(source.generation(), 2);
        // Old ticks may still be queued, but once a generation-2 tick shows
        // up no generation-1 tick may follow it.
        let mut seen_new = false;
        for _ in 0..20 {
            match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                HostEvent::Tick { generation: 2 } => seen_new = true,
                HostEvent::Tick { generation: 1 } => assert!(!seen_new),
                other => panic!("unexpected event {:?}", other),
            }
        }
        assert!(seen_new);
        source.stop();
    }

    #[test]
    fn stalled_host_finds_at_most_one_pending_tick() {
        let (tx, rx) = event_channel();
        let mut ticker = IntervalTicker::spawn(tx, Duration::from_millis(2), 3).unwrap();
        // Roughly a hundred periods pass without the host reading anything.
        thread::sleep(Duration::from_millis(200));

        let mut backlog = 0;
        while let Ok(event) = rx.try_recv() {
            assert_eq!(event, HostEvent::Tick { generation: 3 });
            backlog += 1;
        }
        ticker.stop();
        assert!(backlog >= 1, "no tick arrived during the stall");
        // The queued tick plus at most one sent while draining.
        assert!(backlog <= TICK_QUEUE_DEPTH + 1, "backlog of {} ticks", backlog);
    }

    #[test]
    fn manual_source_counts_restarts() {
        let mut source = ManualTickSource::new();
        assert_eq!(source.tick(), HostEvent::Tick { generation: 0 });
        source.restart().unwrap();
        source.restart().unwrap();
        assert_eq!(source.restarts(), 2);
        assert_eq!(source.tick(), HostEvent::Tick { generation: 2 });
    }
}
