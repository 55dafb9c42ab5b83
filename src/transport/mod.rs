//! Transport Module - remote viewers over TCP
//!
//! - `telnet`: option negotiation and window-size reports
//! - `keys`: raw input bytes to key events
//! - `server`: listener, session cap, one session per connection

mod keys;
mod server;
mod telnet;

pub use keys::KeyDecoder;
pub use server::{Server, NAWS_WAIT, SERVER_FULL};
pub use telnet::{TelnetEvent, TelnetParser, NEGOTIATION};
