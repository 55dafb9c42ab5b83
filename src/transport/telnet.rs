//! Telnet - the subset needed for a character-mode remote terminal
//!
//! The server asks the client to let it echo, to drop go-ahead, and to
//! report its window size (NAWS, RFC 1073). Everything else the client
//! negotiates is read and discarded.

use crate::config::clamp_terminal_size;

pub const IAC: u8 = 255;
pub const DONT: u8 = 254;
pub const DO: u8 = 253;
pub const WONT: u8 = 252;
pub const WILL: u8 = 251;
pub const SB: u8 = 250;
pub const SE: u8 = 240;

pub const OPT_ECHO: u8 = 1;
pub const OPT_SGA: u8 = 3;
pub const OPT_NAWS: u8 = 31;

/// Longest subnegotiation payload kept
const MAX_SUBNEGOTIATION: usize = 64;

/// Sent once on connect
pub const NEGOTIATION: [u8; 9] = [
    IAC, WILL, OPT_ECHO, //
    IAC, WILL, OPT_SGA, //
    IAC, DO, OPT_NAWS,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelnetEvent {
    /// Plain input bytes, IAC sequences removed
    Data(Vec<u8>),
    /// Client window size
    WindowSize { width: u16, height: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Data,
    Iac,
    /// Waiting for the option byte of WILL/WONT/DO/DONT
    Option,
    Sub,
    SubIac,
}

/// Incremental IAC stripper; bytes may arrive split at any point
#[derive(Debug, Default)]
pub struct TelnetParser {
    state: State,
    sub: Vec<u8>,
}

impl TelnetParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a chunk read from the socket
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<TelnetEvent> {
        let mut events = Vec::new();
        let mut data = Vec::with_capacity(bytes.len());

        for &b in bytes {
            match self.state {
                State::Data => {
                    if b == IAC {
                        self.state = State::Iac;
                    } else {
                        data.push(b);
                    }
                }
                State::Iac => {
                    self.state = match b {
                        // Escaped 0xFF
                        IAC => {
                            data.push(IAC);
                            State::Data
                        }
                        WILL | WONT | DO | DONT => State::Option,
                        SB => {
                            self.sub.clear();
                            State::Sub
                        }
                        // NOP, GA, AYT and friends
                        _ => State::Data,
                    };
                }
                State::Option => self.state = State::Data,
                State::Sub => {
                    if b == IAC {
                        self.state = State::SubIac;
                    } else if self.sub.len() < MAX_SUBNEGOTIATION {
                        self.sub.push(b);
                    }
                }
                State::SubIac => match b {
                    SE => {
                        if let Some(size) = self.window_size() {
                            flush(&mut data, &mut events);
                            events.push(size);
                        }
                        self.sub.clear();
                        self.state = State::Data;
                    }
                    IAC => {
                        if self.sub.len() < MAX_SUBNEGOTIATION {
                            self.sub.push(IAC);
                        }
                        self.state = State::Sub;
                    }
                    // Malformed; resync on the command byte
                    _ => {
                        self.sub.clear();
                        self.state = State::Data;
                    }
                },
            }
        }

        flush(&mut data, &mut events);
        events
    }

    fn window_size(&self) -> Option<TelnetEvent> {
        match self.sub.as_slice() {
            [OPT_NAWS, w0, w1, h0, h1, ..] => {
                let width = u16::from_be_bytes([*w0, *w1]);
                let height = u16::from_be_bytes([*h0, *h1]);
                // Some clients report 0x0 when the size is unknown
                if width == 0 || height == 0 {
                    return None;
                }
                let (width, height) = clamp_terminal_size(width, height);
                Some(TelnetEvent::WindowSize { width, height })
            }
            _ => None,
        }
    }
}

fn flush(data: &mut Vec<u8>, events: &mut Vec<TelnetEvent>) {
    if !data.is_empty() {
        events.push(TelnetEvent::Data(std::mem::take(data)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn naws(width: u16, height: u16) -> Vec<u8> {
        let [w0, w1] = width.to_be_bytes();
        let [h0, h1] = height.to_be_bytes();
        vec![IAC, SB, OPT_NAWS, w0, w1, h0, h1, IAC, SE]
    }

    #[test]
    fn test_plain_data_passes_through() {
        let mut p = TelnetParser::new();
        assert_eq!(p.feed(b"jjq"), vec![TelnetEvent::Data(b"jjq".to_vec())]);
    }

    #[test]
    fn test_negotiation_replies_are_stripped() {
        let mut p = TelnetParser::new();
        let input = [IAC, DO, OPT_ECHO, b'x', IAC, WILL, OPT_NAWS, IAC, 241, b'y'];
        assert_eq!(p.feed(&input), vec![TelnetEvent::Data(b"xy".to_vec())]);
    }

    #[test]
    fn test_naws_decoded() {
        let mut p = TelnetParser::new();
        assert_eq!(
            p.feed(&naws(132, 43)),
            vec![TelnetEvent::WindowSize {
                width: 132,
                height: 43
            }]
        );
    }

    #[test]
    fn test_naws_with_escaped_255() {
        let mut p = TelnetParser::new();
        // width 255 is sent as IAC IAC
        let input = [IAC, SB, OPT_NAWS, 0, IAC, IAC, 0, 50, IAC, SE];
        assert_eq!(
            p.feed(&input),
            vec![TelnetEvent::WindowSize {
                width: 255,
                height: 50
            }]
        );
    }

    #[test]
    fn test_split_across_reads() {
        let mut p = TelnetParser::new();
        let bytes = naws(100, 30);
        let (a, b) = bytes.split_at(4);

        assert!(p.feed(a).is_empty());
        assert_eq!(
            p.feed(b),
            vec![TelnetEvent::WindowSize {
                width: 100,
                height: 30
            }]
        );
    }

    #[test]
    fn test_order_preserved_around_naws() {
        let mut p = TelnetParser::new();
        let mut input = b"a".to_vec();
        input.extend(naws(90, 20));
        input.extend(b"b");

        assert_eq!(
            p.feed(&input),
            vec![
                TelnetEvent::Data(b"a".to_vec()),
                TelnetEvent::WindowSize {
                    width: 90,
                    height: 20
                },
                TelnetEvent::Data(b"b".to_vec()),
            ]
        );
    }

    #[test]
    fn test_zero_size_ignored() {
        let mut p = TelnetParser::new();
        assert!(p.feed(&naws(0, 0)).is_empty());
    }

    #[test]
    fn test_oversized_naws_is_clamped() {
        let mut p = TelnetParser::new();
        assert_eq!(
            p.feed(&naws(0xfefe, 0xfefe)),
            vec![TelnetEvent::WindowSize {
                width: 500,
                height: 200
            }]
        );
        assert_eq!(
            p.feed(&naws(640, 48)),
            vec![TelnetEvent::WindowSize {
                width: 500,
                height: 48
            }]
        );
    }

    #[test]
    fn test_escaped_iac_in_data() {
        let mut p = TelnetParser::new();
        assert_eq!(p.feed(&[IAC, IAC]), vec![TelnetEvent::Data(vec![IAC])]);
    }
}
