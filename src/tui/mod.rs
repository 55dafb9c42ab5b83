//! TUI Module - portfolio rendering core
//!
//! Transport-agnostic: a [`Session`] only sees messages and a ratatui
//! `Frame`, so the same core runs on a local terminal or a remote socket.
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      FRAME (session.rs draw)                        │
//! │  Header, tabs, content box, footer. Pure rendering.                 │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲
//!                               │ Text + Canvas
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │        COMPOSITOR  ◄──  VIEWPORT (visible lines)                    │
//! │                    ◄──  PARTICLE ENGINE (canvas)                    │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲
//!                               │ section text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │        SECTION STATE  ──►  CONTENT PROVIDER (content.rs)            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

mod app;
mod compositor;
mod content;
mod events;
mod particles;
mod section;
mod session;
mod theme;
mod viewport;

pub use app::LocalApp;
pub use compositor::overlay;
pub use content::{
    format_hms, pulsed_percentage, ContentContext, ContentProvider, PortfolioContent,
};
pub use events::{action_for, Action};
pub use particles::{Canvas, CanvasCell, Particle, ParticleEngine};
pub use section::{Nav, Section, SectionState};
pub use session::{AnimationClock, Control, FrameAreas, Session};
pub use theme::{StyleName, Theme};
pub use viewport::Viewport;

/// Run the portfolio on the local terminal
pub async fn run(content: std::sync::Arc<dyn ContentProvider>, effects: bool) -> anyhow::Result<()> {
    let app = LocalApp::new(content, effects)?;
    app.run().await
}
