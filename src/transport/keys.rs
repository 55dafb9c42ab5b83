//! Key decoding - raw terminal bytes to crossterm key events
//!
//! Covers what a remote terminal actually sends in character mode:
//! printable UTF-8, control characters and the common CSI/SS3 sequences
//! for arrows, Home/End and paging.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const ESC: u8 = 0x1b;

/// Longest escape sequence buffered before giving up on it
const MAX_SEQUENCE: usize = 16;

#[derive(Debug, Default)]
pub struct KeyDecoder {
    pending: Vec<u8>,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a chunk; incomplete sequences wait for the next chunk
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<KeyEvent> {
        self.pending.extend_from_slice(bytes);

        let mut keys = Vec::new();
        let mut pos = 0;
        while pos < self.pending.len() {
            match decode_one(&self.pending[pos..]) {
                Decoded::Key(key, used) => {
                    keys.push(key);
                    pos += used;
                }
                Decoded::Skip(used) => pos += used,
                Decoded::Incomplete => break,
            }
        }
        self.pending.drain(..pos);

        if self.pending.len() > MAX_SEQUENCE {
            self.pending.clear();
        }
        keys
    }
}

enum Decoded {
    Key(KeyEvent, usize),
    Skip(usize),
    Incomplete,
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn decode_one(buf: &[u8]) -> Decoded {
    let first = buf[0];
    match first {
        ESC => decode_escape(buf),
        b'\r' | b'\n' => Decoded::Key(key(KeyCode::Enter), 1),
        b'\t' => Decoded::Key(key(KeyCode::Tab), 1),
        0x08 | 0x7f => Decoded::Key(key(KeyCode::Backspace), 1),
        0x00 => Decoded::Skip(1),
        0x01..=0x1a => {
            let letter = char::from(first - 1 + b'a');
            Decoded::Key(KeyEvent::new(KeyCode::Char(letter), KeyModifiers::CONTROL), 1)
        }
        0x1c..=0x1f => Decoded::Skip(1),
        _ => decode_utf8(buf),
    }
}

fn decode_utf8(buf: &[u8]) -> Decoded {
    let len = match buf[0] {
        0x00..=0x7f => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => return Decoded::Skip(1),
    };
    if buf.len() < len {
        return Decoded::Incomplete;
    }
    match std::str::from_utf8(&buf[..len]).ok().and_then(|s| s.chars().next()) {
        Some(c) => Decoded::Key(key(KeyCode::Char(c)), len),
        None => Decoded::Skip(1),
    }
}

fn decode_escape(buf: &[u8]) -> Decoded {
    match buf.get(1) {
        // A lone ESC at the end of a read is the Escape key
        None => Decoded::Key(key(KeyCode::Esc), 1),
        Some(b'[') => decode_csi(buf),
        Some(b'O') => match buf.get(2) {
            None => Decoded::Incomplete,
            Some(&b) => match final_key(b) {
                Some(k) => Decoded::Key(k, 3),
                None => Decoded::Skip(3),
            },
        },
        Some(_) => Decoded::Key(key(KeyCode::Esc), 1),
    }
}

/// `ESC [ params final`
fn decode_csi(buf: &[u8]) -> Decoded {
    let Some(end) = buf[2..].iter().position(|b| (0x40..=0x7e).contains(b)) else {
        return Decoded::Incomplete;
    };
    let end = end + 2;
    let used = end + 1;
    let params = &buf[2..end];
    let first_param = params
        .split(|&b| b == b';')
        .next()
        .and_then(|p| std::str::from_utf8(p).ok())
        .and_then(|p| p.parse::<u16>().ok());

    let decoded = match buf[end] {
        b'~' => match first_param {
            Some(1 | 7) => Some(key(KeyCode::Home)),
            Some(4 | 8) => Some(key(KeyCode::End)),
            Some(5) => Some(key(KeyCode::PageUp)),
            Some(6) => Some(key(KeyCode::PageDown)),
            Some(2) => Some(key(KeyCode::Insert)),
            Some(3) => Some(key(KeyCode::Delete)),
            _ => None,
        },
        b'Z' => Some(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)),
        b => final_key(b),
    };

    match decoded {
        Some(k) => Decoded::Key(k, used),
        None => Decoded::Skip(used),
    }
}

fn final_key(b: u8) -> Option<KeyEvent> {
    let code = match b {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        _ => return None,
    };
    Some(key(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(keys: &[KeyEvent]) -> Vec<KeyCode> {
        keys.iter().map(|k| k.code).collect()
    }

    #[test]
    fn test_printable() {
        let mut d = KeyDecoder::new();
        assert_eq!(
            codes(&d.feed(b"qG?")),
            [KeyCode::Char('q'), KeyCode::Char('G'), KeyCode::Char('?')]
        );
    }

    #[test]
    fn test_arrows_csi_and_ss3() {
        let mut d = KeyDecoder::new();
        let keys = d.feed(b"\x1b[A\x1b[B\x1bOC\x1b[D");
        assert_eq!(
            codes(&keys),
            [KeyCode::Up, KeyCode::Down, KeyCode::Right, KeyCode::Left]
        );
    }

    #[test]
    fn test_paging_and_home_end() {
        let mut d = KeyDecoder::new();
        let keys = d.feed(b"\x1b[5~\x1b[6~\x1b[1~\x1b[4~\x1b[H\x1b[F");
        assert_eq!(
            codes(&keys),
            [
                KeyCode::PageUp,
                KeyCode::PageDown,
                KeyCode::Home,
                KeyCode::End,
                KeyCode::Home,
                KeyCode::End
            ]
        );
    }

    #[test]
    fn test_back_tab() {
        let mut d = KeyDecoder::new();
        let keys = d.feed(b"\t\x1b[Z");
        assert_eq!(codes(&keys), [KeyCode::Tab, KeyCode::BackTab]);
        assert_eq!(keys[1].modifiers, KeyModifiers::SHIFT);
    }

    #[test]
    fn test_ctrl_c() {
        let mut d = KeyDecoder::new();
        let keys = d.feed(&[0x03]);
        assert_eq!(keys, [KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)]);
    }

    #[test]
    fn test_sequence_split_across_reads() {
        let mut d = KeyDecoder::new();
        assert!(d.feed(b"\x1b[").is_empty());
        assert_eq!(codes(&d.feed(b"A")), [KeyCode::Up]);
    }

    #[test]
    fn test_utf8_split_across_reads() {
        let mut d = KeyDecoder::new();
        let bytes = "é".as_bytes();
        assert!(d.feed(&bytes[..1]).is_empty());
        assert_eq!(codes(&d.feed(&bytes[1..])), [KeyCode::Char('é')]);
    }

    #[test]
    fn test_lone_escape() {
        let mut d = KeyDecoder::new();
        assert_eq!(codes(&d.feed(b"\x1b")), [KeyCode::Esc]);
    }

    #[test]
    fn test_crlf_and_nul() {
        let mut d = KeyDecoder::new();
        assert_eq!(codes(&d.feed(b"\r\0")), [KeyCode::Enter]);
    }

    #[test]
    fn test_unknown_sequence_skipped() {
        let mut d = KeyDecoder::new();
        assert_eq!(codes(&d.feed(b"\x1b[99~j")), [KeyCode::Char('j')]);
    }
}
