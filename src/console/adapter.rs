//! Glue between a datagram socket and the console.
//!
//! [`TransportAdapter::poll`] is meant to be called from the firmware's main
//! loop. Each call receives at most one datagram, runs every record in it
//! through the parser and dispatcher, and sends each record's reply back to
//! the datagram's sender before the next record runs.
//!
//! ```rust
//! use core::cell::Cell;
//! use fwconsole::console::{Dispatcher, TransportAdapter};
//! # use fwconsole::network::{UdpSocket, error::Error};
//! # struct Idle;
//! # impl UdpSocket for Idle {
//! #     type Address = ();
//! #     type Error = Error;
//! #     fn recv_from(&mut self, _: &mut [u8]) -> Result<Option<(usize, ())>, Error> { Ok(None) }
//! #     fn send_to(&mut self, _: &(), buf: &[u8]) -> Result<usize, Error> { Ok(buf.len()) }
//! # }
//!
//! let temp = Cell::new(21.5f32);
//! let mut dispatcher: Dispatcher<'_, 4, 4> = Dispatcher::new();
//! dispatcher.add_variable("temp", &temp).unwrap();
//!
//! let mut console: TransportAdapter<'_, _, 4, 4, 60> = TransportAdapter::new(Idle, dispatcher);
//! // Nothing pending: no records, no side effects.
//! assert_eq!(console.poll(), Ok(0));
//! ```

use core::fmt;

use heapless::String;

use super::dispatcher::{Dispatch, Dispatcher};
use super::parser::LineParser;
use super::MAX_RESPONSE_LEN;
#[cfg(feature = "async")]
use crate::network::AsyncUdpSocket;
use crate::network::UdpSocket;

/// Response sink that keeps what fits and drops the rest.
///
/// Writes never fail, so a chatty handler cannot turn a successful command
/// into an error; [`truncated`](Self::truncated) tells whether anything was
/// lost.
#[derive(Debug, Default)]
pub struct Reply<const N: usize = MAX_RESPONSE_LEN> {
    text: String<N>,
    truncated: bool,
}

impl<const N: usize> Reply<N> {
    /// Create an empty reply.
    pub const fn new() -> Self {
        Self {
            text: String::new(),
            truncated: false,
        }
    }

    /// Collected text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Collected text as bytes, ready to be sent.
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether output was dropped because the reply was full.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Empty the reply for the next record.
    pub fn clear(&mut self) {
        self.text.clear();
        self.truncated = false;
    }
}

impl<const N: usize> fmt::Write for Reply<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.text.push_str(s).is_err() {
            for c in s.chars() {
                if self.text.push(c).is_err() {
                    self.truncated = true;
                    break;
                }
            }
        }
        Ok(())
    }
}

/// Runs a [`Dispatcher`] over a datagram socket.
///
/// `BUFFER` sizes both the datagram scratch buffer and the parser's receive
/// buffer: the longest record, and the largest datagram read in one go.
/// The defaults (10 commands, 10 variables, 60 byte buffer) suit small
/// microcontrollers.
pub struct TransportAdapter<
    'a,
    S,
    const COMMANDS: usize = 10,
    const VARIABLES: usize = 10,
    const BUFFER: usize = 60,
> {
    socket: S,
    dispatcher: Dispatcher<'a, COMMANDS, VARIABLES>,
    parser: LineParser<BUFFER>,
    packet: [u8; BUFFER],
    reply: Reply,
    datagram_terminates: bool,
}

impl<'a, S, const COMMANDS: usize, const VARIABLES: usize, const BUFFER: usize>
    TransportAdapter<'a, S, COMMANDS, VARIABLES, BUFFER>
{
    /// Wrap `socket` and a fully registered `dispatcher`.
    ///
    /// Datagram boundaries terminate records by default, see
    /// [`set_datagram_terminates`](Self::set_datagram_terminates).
    pub fn new(socket: S, dispatcher: Dispatcher<'a, COMMANDS, VARIABLES>) -> Self {
        Self {
            socket,
            dispatcher,
            parser: LineParser::new(),
            packet: [0; BUFFER],
            reply: Reply::new(),
            datagram_terminates: true,
        }
    }

    /// Choose whether the end of a datagram ends the pending record.
    ///
    /// When enabled (the default) `temp` and `temp\n` sent as single
    /// datagrams behave the same. When disabled, a record without a
    /// terminator stays buffered until a later datagram completes it.
    pub fn set_datagram_terminates(&mut self, enabled: bool) {
        self.datagram_terminates = enabled;
    }

    /// Enable or disable `error: <reason>` replies for failed records.
    pub fn set_error_replies(&mut self, enabled: bool) {
        self.dispatcher.set_error_replies(enabled);
    }

    /// The dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher<'a, COMMANDS, VARIABLES> {
        &self.dispatcher
    }

    /// Mutable access to the dispatcher, e.g. for late registrations.
    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<'a, COMMANDS, VARIABLES> {
        &mut self.dispatcher
    }

    /// The parser, mostly to inspect pending bytes.
    pub fn parser(&self) -> &LineParser<BUFFER> {
        &self.parser
    }

    /// The socket.
    pub fn socket(&self) -> &S {
        &self.socket
    }

    /// Mutable access to the socket.
    pub fn socket_mut(&mut self) -> &mut S {
        &mut self.socket
    }

    /// Give back the socket and dispatcher.
    pub fn release(self) -> (S, Dispatcher<'a, COMMANDS, VARIABLES>) {
        (self.socket, self.dispatcher)
    }
}

impl<S, const COMMANDS: usize, const VARIABLES: usize, const BUFFER: usize>
    TransportAdapter<'_, S, COMMANDS, VARIABLES, BUFFER>
where
    S: UdpSocket,
{
    /// Receive and execute at most one datagram.
    ///
    /// Returns the number of records executed, failed ones included, or
    /// `Ok(0)` when the socket had nothing to deliver. A datagram longer
    /// than `BUFFER` is cut; the record it ends in is reported as a buffer
    /// overflow. Errors from `recv_from` are returned immediately. A failed
    /// `send_to` does not stop the remaining records from running; the first
    /// such error is returned once the datagram is done.
    pub fn poll(&mut self) -> Result<usize, S::Error> {
        let Some((len, from)) = self.socket.recv_from(&mut self.packet)? else {
            return Ok(0);
        };
        let received = len.min(BUFFER);
        trace!("datagram of {} bytes", len);

        let mut records = 0;
        let mut result = Ok(());
        let mut input = &self.packet[..received];
        while let Some(line) = self.parser.next_line(&mut input) {
            if self.dispatcher.process(line, &mut self.reply).is_some() {
                records += 1;
            }
            keep_first(&mut result, send_reply(&mut self.socket, &from, &mut self.reply));
        }

        if len > BUFFER {
            warn!("datagram truncated from {} to {} bytes", len, BUFFER);
            self.parser.discard();
        }

        if self.datagram_terminates {
            if let Some(line) = self.parser.finish() {
                if self.dispatcher.process(line, &mut self.reply).is_some() {
                    records += 1;
                }
                keep_first(&mut result, send_reply(&mut self.socket, &from, &mut self.reply));
            }
        }

        result.map(|()| records)
    }
}

#[cfg(feature = "async")]
impl<S, const COMMANDS: usize, const VARIABLES: usize, const BUFFER: usize>
    TransportAdapter<'_, S, COMMANDS, VARIABLES, BUFFER>
where
    S: AsyncUdpSocket,
{
    /// Async counterpart of [`poll`](Self::poll).
    pub async fn poll_async(&mut self) -> Result<usize, S::Error> {
        let Some((len, from)) = self.socket.recv_from(&mut self.packet).await? else {
            return Ok(0);
        };
        let received = len.min(BUFFER);

        let mut records = 0;
        let mut result = Ok(());
        let mut input = &self.packet[..received];
        while let Some(line) = self.parser.next_line(&mut input) {
            if self.dispatcher.process(line, &mut self.reply).is_some() {
                records += 1;
            }
            let sent = send_reply_async(&mut self.socket, &from, &mut self.reply).await;
            keep_first(&mut result, sent);
        }

        if len > BUFFER {
            warn!("datagram truncated from {} to {} bytes", len, BUFFER);
            self.parser.discard();
        }

        if self.datagram_terminates {
            if let Some(line) = self.parser.finish() {
                if self.dispatcher.process(line, &mut self.reply).is_some() {
                    records += 1;
                }
                let sent = send_reply_async(&mut self.socket, &from, &mut self.reply).await;
                keep_first(&mut result, sent);
            }
        }

        result.map(|()| records)
    }
}

impl<S, const COMMANDS: usize, const VARIABLES: usize, const BUFFER: usize> fmt::Debug
    for TransportAdapter<'_, S, COMMANDS, VARIABLES, BUFFER>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportAdapter")
            .field("dispatcher", &self.dispatcher)
            .field("pending", &self.parser.pending())
            .field("datagram_terminates", &self.datagram_terminates)
            .finish()
    }
}

fn keep_first<E>(result: &mut Result<(), E>, outcome: Result<(), E>) {
    if result.is_ok() {
        *result = outcome;
    }
}

fn send_reply<S: UdpSocket>(
    socket: &mut S,
    to: &S::Address,
    reply: &mut Reply,
) -> Result<(), S::Error> {
    if reply.is_empty() {
        return Ok(());
    }
    let sent = socket.send_to(to, reply.as_bytes());
    reply.clear();
    match sent {
        Ok(_) => Ok(()),
        Err(err) => {
            warn!("failed to send reply");
            Err(err)
        }
    }
}

#[cfg(feature = "async")]
async fn send_reply_async<S: AsyncUdpSocket>(
    socket: &mut S,
    to: &S::Address,
    reply: &mut Reply,
) -> Result<(), S::Error> {
    if reply.is_empty() {
        return Ok(());
    }
    let sent = socket.send_to(to, reply.as_bytes()).await;
    reply.clear();
    match sent {
        Ok(_) => Ok(()),
        Err(err) => {
            warn!("failed to send reply");
            Err(err)
        }
    }
}
