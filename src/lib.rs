//! # fwconsole - Remote console for embedded devices
//!
//! A `no_std`, allocation-free console that lets a host application invoke
//! named commands and read or write named variables on a microcontroller.
//! Records are short text lines carried over a datagram transport such as
//! UDP.
//!
//! ## Features
//!
//! - **Fixed capacity**: command table, variable table and receive buffer
//!   are sized with const generics
//! - **Typed variables**: integer, float, boolean and text, bound to plain
//!   `Cell`/`RefCell` state or computed on demand
//! - **Robust parsing**: records split across datagrams, several records per
//!   datagram, oversized records dropped and reported without corrupting state
//! - **Transport agnostic**: any socket implementing [`network::UdpSocket`]
//!
//! ## Usage
//!
//! ```rust
//! use core::cell::Cell;
//! use core::fmt::Write;
//! use fwconsole::console::{Dispatcher, HandlerResult, TransportAdapter};
//! # use fwconsole::network::{UdpSocket, error::Error};
//! # struct Socket;
//! # impl UdpSocket for Socket {
//! #     type Address = ();
//! #     type Error = Error;
//! #     fn recv_from(&mut self, _: &mut [u8]) -> Result<Option<(usize, ())>, Error> { Ok(None) }
//! #     fn send_to(&mut self, _: &(), buf: &[u8]) -> Result<usize, Error> { Ok(buf.len()) }
//! # }
//!
//! let setpoint = Cell::new(21.5f32);
//! let mut ping = |_: &str, out: &mut dyn Write| -> HandlerResult {
//!     out.write_str("pong\r\n")?;
//!     Ok(())
//! };
//!
//! let mut dispatcher: Dispatcher<'_, 8, 8> = Dispatcher::new();
//! dispatcher.add_command("ping", &mut ping).unwrap();
//! dispatcher.add_variable("setpoint", &setpoint).unwrap();
//!
//! let mut console: TransportAdapter<'_, _, 8, 8, 64> = TransportAdapter::new(Socket, dispatcher);
//!
//! // Main loop
//! # for _ in 0..1 {
//! console.poll().ok();
//! # }
//! ```
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `async`: Enable [`network::AsyncUdpSocket`] and `TransportAdapter::poll_async`
//! - `defmt`: Enable defmt logging and `defmt::Format` implementations

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

#[macro_use]
mod fmt;

/// Command and variable console: registries, parser, dispatcher and
/// transport adapter.
pub mod console;

/// Datagram transport abstraction the console runs on.
pub mod network;
