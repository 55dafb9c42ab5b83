//! Termfolio - interactive terminal portfolio
//!
//! A section-based portfolio with a scrolling viewport and a particle layer,
//! served to any number of independent terminal sessions.

pub mod config;
pub mod data;
pub mod error;
pub mod runtime;
pub mod transport;
pub mod tui;

pub use config::{ServerConfig, SessionConfig};
pub use data::{DataLoader, PortfolioData};
pub use error::{FixSuggestion, FolioError};
pub use runtime::{FrameSink, Message, Scheduler};
pub use transport::Server;
pub use tui::{ContentProvider, PortfolioContent, Section, Session};
