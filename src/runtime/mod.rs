//! Runtime Module - per-session event loop
//!
//! Every session owns one bounded message queue. Producers push into it:
//! - the ticker task (`Tick` every tick interval)
//! - the transport's input task (`Key`, `Resize`, `Closed`)
//!
//! The [`Scheduler`] drains the queue one message at a time, applies it to
//! the [`Session`] and then draws a frame through a [`FrameSink`]. State is
//! never touched outside that loop.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::KeyEvent;
use rand::Rng;
use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;
use tracing::{debug, trace};

use crate::tui::{Control, Session};

/// Queue depth per session
pub const QUEUE_CAPACITY: usize = 64;

// ─────────────────────────────────────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────────────────────────────────────

/// Everything that can happen to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Animation clock tick
    Tick,
    /// Decoded key press
    Key(KeyEvent),
    /// Terminal size changed (or became known)
    Resize { width: u16, height: u16 },
    /// Input side went away
    Closed,
}

// ─────────────────────────────────────────────────────────────────────────────
// Frame Sink Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Where rendered frames go
#[async_trait]
pub trait FrameSink: Send {
    type Backend: Backend + Send;

    /// Terminal the session draws into
    fn terminal(&mut self) -> &mut Terminal<Self::Backend>;

    /// Push the last drawn frame to the viewer
    async fn present(&mut self) -> io::Result<()>;

    /// Follow a size change reported by the viewer
    fn resize(&mut self, width: u16, height: u16) -> io::Result<()> {
        self.terminal().resize(Rect::new(0, 0, width, height))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ticker
// ─────────────────────────────────────────────────────────────────────────────

/// Push `Tick` into `tx` every `every` until the queue closes.
///
/// The queue is bounded, so a slow consumer delays the next tick instead of
/// piling them up.
pub fn spawn_ticker(tx: mpsc::Sender<Message>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval_at(Instant::now() + every, every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = IntervalStream::new(interval);

        while ticks.next().await.is_some() {
            if tx.send(Message::Tick).await.is_err() {
                break;
            }
        }
        trace!("Ticker stopped");
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Scheduler
// ─────────────────────────────────────────────────────────────────────────────

/// Serializes all messages of one session
pub struct Scheduler {
    tx: mpsc::Sender<Message>,
    rx: mpsc::Receiver<Message>,
    tick_interval: Duration,
}

impl Scheduler {
    pub fn new(tick_interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        Self {
            tx,
            rx,
            tick_interval,
        }
    }

    /// Handle for input producers
    pub fn sender(&self) -> mpsc::Sender<Message> {
        self.tx.clone()
    }

    /// Run until the session quits or every producer is gone.
    ///
    /// Draws once up front so the viewer sees the loading screen right away.
    pub async fn run<R, S>(self, session: &mut Session<R>, sink: &mut S) -> io::Result<()>
    where
        R: Rng + Send,
        S: FrameSink,
    {
        let Self {
            tx,
            mut rx,
            tick_interval,
        } = self;

        let ticker = spawn_ticker(tx, tick_interval);
        let result = drive(&mut rx, session, sink).await;
        ticker.abort();
        result
    }
}

async fn drive<R, S>(
    rx: &mut mpsc::Receiver<Message>,
    session: &mut Session<R>,
    sink: &mut S,
) -> io::Result<()>
where
    R: Rng + Send,
    S: FrameSink,
{
    render(session, sink).await?;

    while let Some(msg) = rx.recv().await {
        let resized = matches!(msg, Message::Resize { .. });
        if session.update(msg) == Control::Quit {
            debug!("Session quit");
            break;
        }
        // The session has already clamped the reported size
        if resized {
            let (width, height) = session.size();
            sink.resize(width, height)?;
        }
        render(session, sink).await?;
    }
    Ok(())
}

async fn render<R, S>(session: &Session<R>, sink: &mut S) -> io::Result<()>
where
    R: Rng + Send,
    S: FrameSink,
{
    sink.terminal().draw(|frame| session.draw(frame))?;
    sink.present().await
}
