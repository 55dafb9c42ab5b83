//! Local Application - runs a session on the current terminal

use std::io::{self, Stdout, Write};
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use crossterm::{
    cursor,
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::content::ContentProvider;
use super::session::Session;
use crate::config::SessionConfig;
use crate::runtime::{FrameSink, Message, Scheduler};

/// Frames go straight to stdout
struct LocalSink {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

#[async_trait]
impl FrameSink for LocalSink {
    type Backend = CrosstermBackend<Stdout>;

    fn terminal(&mut self) -> &mut Terminal<Self::Backend> {
        &mut self.terminal
    }

    async fn present(&mut self) -> io::Result<()> {
        // CrosstermBackend flushes at the end of every draw
        Ok(())
    }
}

/// Portfolio on the local terminal
pub struct LocalApp {
    session: Session,
    config: SessionConfig,
}

impl LocalApp {
    pub fn new(content: Arc<dyn ContentProvider>, effects: bool) -> anyhow::Result<Self> {
        let config = SessionConfig {
            effects_enabled: effects,
            ..SessionConfig::default()
        };
        let session = Session::new(content, &config);
        Ok(Self { session, config })
    }

    /// Run until the viewer quits
    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut sink = LocalSink {
            terminal: setup_terminal()?,
        };
        info!("Local session started");

        let scheduler = Scheduler::new(self.config.tick_interval);
        let input = tokio::spawn(forward_input(scheduler.sender()));

        let result = scheduler.run(&mut self.session, &mut sink).await;
        input.abort();

        restore_terminal(&mut sink.terminal)?;
        info!("Local session ended");
        result.map_err(Into::into)
    }
}

/// Setup terminal for TUI
fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Leave raw mode and the alternate screen before any panic message prints
fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = release_screen(&mut io::stdout());
            previous(info);
        }));
    });
}

fn release_screen(mut out: impl Write) -> io::Result<()> {
    execute!(out, LeaveAlternateScreen, cursor::Show)?;
    out.flush()
}

/// Feed crossterm events into the session queue
async fn forward_input(tx: mpsc::Sender<Message>) {
    match terminal::size() {
        Ok((width, height)) => {
            if tx.send(Message::Resize { width, height }).await.is_err() {
                return;
            }
        }
        Err(e) => warn!(error = %e, "Could not read terminal size"),
    }

    let mut events = EventStream::new();
    while let Some(event) = events.next().await {
        let msg = match event {
            Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => Message::Key(key),
            Ok(Event::Resize(width, height)) => Message::Resize { width, height },
            Ok(_) => continue,
            Err(e) => {
                warn!(error = %e, "Terminal input failed");
                break;
            }
        };
        if tx.send(msg).await.is_err() {
            return;
        }
    }

    let _ = tx.send(Message::Closed).await;
}
