//! Remote Server - one session per TCP connection

use std::future::Future;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use crossterm::{
    cursor, queue,
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::{Terminal, TerminalOptions, Viewport};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, info_span, warn, Instrument};

use super::keys::KeyDecoder;
use super::telnet::{TelnetEvent, TelnetParser, NEGOTIATION};
use crate::config::{ServerConfig, SessionConfig};
use crate::error::{FolioError, Result};
use crate::runtime::{FrameSink, Message, Scheduler};
use crate::tui::{ContentProvider, Session};

/// How long to wait for the client's window size
pub const NAWS_WAIT: Duration = Duration::from_millis(500);

pub const SERVER_FULL: &str = "Portfolio server is full, please try again in a moment.\r\n";

const READ_BUFFER: usize = 1024;

// ─────────────────────────────────────────────────────────────────────────────
// Frame buffer
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory writer the ratatui backend draws into
#[derive(Clone, Default)]
struct FrameBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl FrameBuffer {
    fn take(&self) -> io::Result<Vec<u8>> {
        let mut bytes = self
            .bytes
            .lock()
            .map_err(|_| io::Error::other("frame buffer poisoned"))?;
        Ok(std::mem::take(&mut *bytes))
    }
}

impl Write for FrameBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .map_err(|_| io::Error::other("frame buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Frames drawn into memory, then written to the socket
struct RemoteSink {
    terminal: Terminal<CrosstermBackend<FrameBuffer>>,
    buffer: FrameBuffer,
    writer: OwnedWriteHalf,
}

impl RemoteSink {
    fn new(writer: OwnedWriteHalf, (width, height): (u16, u16)) -> io::Result<Self> {
        let buffer = FrameBuffer::default();
        let terminal = Terminal::with_options(
            CrosstermBackend::new(buffer.clone()),
            TerminalOptions {
                viewport: Viewport::Fixed(Rect::new(0, 0, width, height)),
            },
        )?;
        Ok(Self {
            terminal,
            buffer,
            writer,
        })
    }

    /// Negotiate telnet options and switch the client screen
    async fn begin(&mut self) -> io::Result<()> {
        let mut out = NEGOTIATION.to_vec();
        queue!(out, EnterAlternateScreen, cursor::Hide, Clear(ClearType::All))?;
        self.writer.write_all(&out).await
    }

    /// Give the client its screen back and close the socket
    async fn finish(&mut self) -> io::Result<()> {
        let mut out = Vec::new();
        queue!(out, cursor::Show, LeaveAlternateScreen)?;
        out.extend_from_slice(b"Thanks for visiting!\r\n");
        self.writer.write_all(&out).await?;
        self.writer.shutdown().await
    }
}

#[async_trait]
impl FrameSink for RemoteSink {
    type Backend = CrosstermBackend<FrameBuffer>;

    fn terminal(&mut self) -> &mut Terminal<Self::Backend> {
        &mut self.terminal
    }

    async fn present(&mut self) -> io::Result<()> {
        let bytes = self.buffer.take()?;
        if bytes.is_empty() {
            return Ok(());
        }
        self.writer.write_all(&bytes).await?;
        self.writer.flush().await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Server
// ─────────────────────────────────────────────────────────────────────────────

/// Portfolio server
pub struct Server {
    config: ServerConfig,
    content: Arc<dyn ContentProvider>,
}

impl Server {
    pub fn new(config: ServerConfig, content: Arc<dyn ContentProvider>) -> Self {
        Self { config, content }
    }

    /// Bind the configured address
    pub async fn bind(&self) -> Result<TcpListener> {
        let address = self.config.resolve().await?;
        TcpListener::bind(address)
            .await
            .map_err(|e| FolioError::Transport {
                reason: format!("cannot listen on {address}: {e}"),
            })
    }

    /// Bind and serve until Ctrl+C
    pub async fn run(self) -> Result<()> {
        let listener = self.bind().await?;
        self.serve(listener, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Could not listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Accept connections on `listener` until `shutdown` resolves, then
    /// close every session and wait for them.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let local = listener.local_addr()?;
        info!(address = %local, max_sessions = self.config.max_sessions, "Server listening");

        let permits = Arc::new(Semaphore::new(self.config.max_sessions));
        let (stop_tx, stop_rx) = watch::channel(false);
        let mut sessions = JoinSet::new();
        let mut next_id: u64 = 0;

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down");
                    break;
                }
                Some(joined) = sessions.join_next(), if !sessions.is_empty() => {
                    if let Err(e) = joined {
                        warn!(error = %e, "Session task failed");
                    }
                }
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            warn!(error = %e, "Accept failed");
                            continue;
                        }
                    };

                    let Ok(permit) = Arc::clone(&permits).try_acquire_owned() else {
                        warn!(%peer, "Session limit reached, refusing connection");
                        tokio::spawn(refuse(stream));
                        continue;
                    };

                    next_id += 1;
                    let span = info_span!("session", id = next_id, %peer);
                    let content = Arc::clone(&self.content);
                    let config = self.config.session;
                    let stop = stop_rx.clone();
                    sessions.spawn(
                        async move {
                            info!("Viewer connected");
                            match handle_connection(stream, content, config, stop).await {
                                Ok(()) => info!("Viewer disconnected"),
                                Err(e) => debug!(error = %format!("{e:#}"), "Session ended with error"),
                            }
                            drop(permit);
                        }
                        .instrument(span),
                    );
                }
            }
        }

        drop(listener);
        let _ = stop_tx.send(true);
        while let Some(joined) = sessions.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Session task failed");
            }
        }
        info!("Server stopped");
        Ok(())
    }
}

async fn refuse(mut stream: TcpStream) {
    let _ = stream.write_all(SERVER_FULL.as_bytes()).await;
    let _ = stream.shutdown().await;
}

async fn handle_connection(
    stream: TcpStream,
    content: Arc<dyn ContentProvider>,
    config: SessionConfig,
    stop: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    stream.set_nodelay(true)?;
    let (reader, writer) = stream.into_split();

    let mut sink = RemoteSink::new(writer, config.default_size)?;
    sink.begin().await.context("negotiation failed")?;

    let mut session = Session::new(content, &config);
    let scheduler = Scheduler::new(config.tick_interval);
    let input = tokio::spawn(read_input(
        reader,
        scheduler.sender(),
        stop,
        config.default_size,
    ));

    let result = scheduler.run(&mut session, &mut sink).await;
    input.abort();

    // The peer may already be gone
    let _ = sink.finish().await;
    result.context("frame write failed")
}

/// Decode socket bytes into session messages
async fn read_input(
    mut reader: OwnedReadHalf,
    tx: mpsc::Sender<Message>,
    mut stop: watch::Receiver<bool>,
    (default_width, default_height): (u16, u16),
) {
    let mut telnet = TelnetParser::new();
    let mut keys = KeyDecoder::new();
    let mut buf = [0u8; READ_BUFFER];
    let mut sized = false;

    let naws_deadline = tokio::time::sleep(NAWS_WAIT);
    tokio::pin!(naws_deadline);

    loop {
        let mut messages = Vec::new();
        tokio::select! {
            _ = stop.changed() => break,
            _ = &mut naws_deadline, if !sized => {
                debug!(width = default_width, height = default_height, "No window size from client, using default");
                sized = true;
                messages.push(Message::Resize { width: default_width, height: default_height });
            }
            read = reader.read(&mut buf) => {
                let n = match read {
                    Ok(0) => break,
                    Ok(n) => n,
                    Err(e) => {
                        debug!(error = %e, "Read failed");
                        break;
                    }
                };
                for event in telnet.feed(&buf[..n]) {
                    match event {
                        TelnetEvent::WindowSize { width, height } => {
                            sized = true;
                            messages.push(Message::Resize { width, height });
                        }
                        TelnetEvent::Data(bytes) => {
                            messages.extend(keys.feed(&bytes).into_iter().map(Message::Key));
                        }
                    }
                }
            }
        }

        for msg in messages {
            if tx.send(msg).await.is_err() {
                return;
            }
        }
    }

    let _ = tx.send(Message::Closed).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::PortfolioContent;
    use tokio::sync::oneshot;

    fn server(max_sessions: usize) -> Server {
        let config = ServerConfig {
            max_sessions,
            ..ServerConfig::default()
        };
        Server::new(config, Arc::new(PortfolioContent::default()))
    }

    async fn read_until(stream: &mut TcpStream, needle: &[u8]) -> Vec<u8> {
        let mut seen = Vec::new();
        let mut buf = [0u8; 4096];
        while !seen.windows(needle.len()).any(|w| w == needle) {
            let n = stream.read(&mut buf).await.unwrap();
            assert!(n > 0, "connection closed before {:?}", String::from_utf8_lossy(needle));
            seen.extend_from_slice(&buf[..n]);
        }
        seen
    }

    #[tokio::test]
    async fn test_session_negotiates_renders_and_quits() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server(4).serve(listener, async {
            let _ = stop_rx.await;
        }));

        let mut client = TcpStream::connect(address).await.unwrap();
        let greeting = read_until(&mut client, &NEGOTIATION).await;
        assert!(greeting.starts_with(&NEGOTIATION));

        let mut naws = vec![255, 250, 31, 0, 100, 0, 30, 255, 240];
        naws.extend_from_slice(b"q");
        client.write_all(&naws).await.unwrap();

        let screen = read_until(&mut client, b"Thanks for visiting!").await;
        assert!(String::from_utf8_lossy(&screen).contains("Portfolio"));

        let _ = stop_tx.send(());
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_refuses_over_limit() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server(1).serve(listener, async {
            let _ = stop_rx.await;
        }));

        let mut first = TcpStream::connect(address).await.unwrap();
        read_until(&mut first, &NEGOTIATION).await;

        let mut second = TcpStream::connect(address).await.unwrap();
        read_until(&mut second, SERVER_FULL.as_bytes()).await;

        let _ = stop_tx.send(());
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_closes_sessions() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server(4).serve(listener, async {
            let _ = stop_rx.await;
        }));

        let mut client = TcpStream::connect(address).await.unwrap();
        read_until(&mut client, &NEGOTIATION).await;

        let _ = stop_tx.send(());
        read_until(&mut client, b"Thanks for visiting!").await;
        handle.await.unwrap().unwrap();
    }
}
