//! Incremental line parser with a fixed receive buffer.
//!
//! Bytes are pushed into an `N` byte buffer until a terminator (`\r` or
//! `\n`) completes the line. Partial lines survive between calls, so a
//! record may arrive split over several reads or datagrams, and several
//! records may arrive in one.
//!
//! # Overflow
//!
//! A line longer than `N` bytes is never written past the buffer. The parser
//! drops what it has collected, skips input up to the next terminator and
//! then reports a single [`Error::BufferOverflow`] in place of the line.
//! Parsing continues normally after that.
//!
//! ```rust
//! use fwconsole::console::{Error, LineParser};
//!
//! let mut parser: LineParser<8> = LineParser::new();
//! let mut input: &[u8] = b"far too long\nled on\n";
//!
//! assert_eq!(parser.next_line(&mut input), Some(Err(Error::BufferOverflow)));
//! assert_eq!(parser.next_line(&mut input), Some(Ok("led on")));
//! assert_eq!(parser.next_line(&mut input), None);
//! ```

use core::fmt::Write;

use super::dispatcher::Dispatch;
use super::error::Error;

/// Line feed, ends a record.
pub const ASCII_LF: u8 = b'\n';
/// Carriage return, ends a record.
pub const ASCII_CR: u8 = b'\r';

/// Outcome of one completed line: its text, or why it was dropped.
pub type Line<'b> = Result<&'b str, Error>;

/// Splits a byte stream into lines using a fixed `N` byte buffer.
#[derive(Debug)]
pub struct LineParser<const N: usize> {
    buffer: [u8; N],
    len: usize,
    discarding: bool,
}

impl<const N: usize> LineParser<N> {
    /// Create a parser with an empty buffer.
    pub const fn new() -> Self {
        Self {
            buffer: [0; N],
            len: 0,
            discarding: false,
        }
    }

    /// Consume `input` up to and including the next terminator.
    ///
    /// Returns the completed line, or `None` once `input` is exhausted
    /// without completing one; any partial line stays buffered for the next
    /// call. Empty lines (such as the `\n` of a `\r\n` pair) are skipped.
    ///
    /// The returned text borrows the parser and is only valid until the
    /// parser is used again.
    pub fn next_line(&mut self, input: &mut &[u8]) -> Option<Line<'_>> {
        while let Some((&byte, rest)) = input.split_first() {
            *input = rest;
            match byte {
                ASCII_CR | ASCII_LF => {
                    if self.discarding || self.len > 0 {
                        return self.complete();
                    }
                }
                _ if self.discarding => {}
                _ if self.len == N => {
                    warn!("receive buffer full, dropping record");
                    self.len = 0;
                    self.discarding = true;
                }
                _ => {
                    self.buffer[self.len] = byte;
                    self.len += 1;
                }
            }
        }
        None
    }

    /// Treat the end of the current input as a terminator.
    ///
    /// Used for packet transports where a datagram boundary ends a record.
    /// Returns `None` if nothing is pending.
    pub fn finish(&mut self) -> Option<Line<'_>> {
        if self.discarding || self.len > 0 {
            self.complete()
        } else {
            None
        }
    }

    /// Drop the pending partial line and report it as
    /// [`Error::BufferOverflow`] at the next terminator.
    ///
    /// Called when bytes of the current record were lost before reaching the
    /// parser, e.g. a truncated datagram.
    pub fn discard(&mut self) {
        self.len = 0;
        self.discarding = true;
    }

    /// Forget any partial line without reporting it.
    pub fn reset(&mut self) {
        self.len = 0;
        self.discarding = false;
    }

    /// Number of bytes of the pending partial line.
    pub fn pending(&self) -> usize {
        self.len
    }

    /// Size of the receive buffer, i.e. the longest accepted line.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Parse `bytes` and dispatch every completed line.
    ///
    /// Replies go to `out`. Returns the number of records dispatched,
    /// failed ones included. Blank lines are not counted.
    pub fn feed<D>(&mut self, mut bytes: &[u8], dispatcher: &mut D, out: &mut dyn Write) -> usize
    where
        D: Dispatch + ?Sized,
    {
        let mut records = 0;
        while let Some(line) = self.next_line(&mut bytes) {
            if dispatcher.process(line, out).is_some() {
                records += 1;
            }
        }
        records
    }

    fn complete(&mut self) -> Option<Line<'_>> {
        let len = core::mem::take(&mut self.len);
        if core::mem::take(&mut self.discarding) {
            return Some(Err(Error::BufferOverflow));
        }
        Some(core::str::from_utf8(&self.buffer[..len]).map_err(|_| Error::Malformed))
    }
}

impl<const N: usize> Default for LineParser<N> {
    fn default() -> Self {
        Self::new()
    }
}
