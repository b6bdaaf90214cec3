//! Command and variable console.
//!
//! The console lets a host invoke named commands and read or write named
//! variables on a device by sending short text records:
//!
//! ```text
//! blink 3 250        invoke the command `blink` with argument text "3 250"
//! temp               read the variable `temp`, reply "21.5\r\n"
//! temp=19.5          write the variable `temp`
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │ TransportAdapter│───▶│   LineParser    │───▶│   Dispatcher    │
//! │ (datagram I/O)  │    │ (fixed buffer)  │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!          ▲                                       │           │
//!          │                                       ▼           ▼
//!          │                              ┌──────────────┐ ┌──────────────┐
//!          └──────── Reply ◀───────────── │   Command    │ │   Variable   │
//!                                         │   Registry   │ │   Registry   │
//!                                         └──────────────┘ └──────────────┘
//! ```
//!
//! Every component has a fixed capacity chosen at compile time through const
//! generics; nothing allocates. The parser only knows the dispatcher through
//! the [`Dispatch`] trait, and handlers only see a `core::fmt::Write` sink.
//!
//! # Outcomes
//!
//! Registration errors ([`Error::RegistryFull`], [`Error::DuplicateName`],
//! [`Error::InvalidName`]) are returned to the setup code. Every record
//! received afterwards produces exactly one outcome. Failures are answered
//! with a terse `error: <reason>\r\n` line and never stop the control loop.
//!
//! # Example
//!
//! ```rust
//! use core::cell::Cell;
//! use core::fmt::Write;
//! use fwconsole::console::{Dispatcher, HandlerResult, LineParser, Parameters};
//!
//! let count = Cell::new(0i32);
//! let mut add = |args: &str, out: &mut dyn Write| -> HandlerResult {
//!     let step = Parameters::new(args).next_i32()?;
//!     count.set(count.get() + step);
//!     write!(out, "count {}\r\n", count.get())?;
//!     Ok(())
//! };
//!
//! let mut dispatcher: Dispatcher<'_, 4, 4> = Dispatcher::new();
//! dispatcher.add_command("add", &mut add).unwrap();
//!
//! let mut parser: LineParser<32> = LineParser::new();
//! let mut out: heapless::String<128> = heapless::String::new();
//! let records = parser.feed(b"add 2\nadd 3\nadd x\n", &mut dispatcher, &mut out);
//!
//! assert_eq!(records, 3);
//! assert_eq!(out.as_str(), "count 2\r\ncount 5\r\nerror: invalid value\r\n");
//! ```

#![deny(unsafe_code)]

mod adapter;
mod command;
mod dispatcher;
mod error;
mod parser;
mod record;
mod registry;
mod variable;

pub use adapter::{Reply, TransportAdapter};
pub use command::{Command, CommandHandler, HandlerResult, Parameters};
pub use dispatcher::{DefaultHandler, Dispatch, Dispatcher};
pub use error::Error;
pub use parser::{ASCII_CR, ASCII_LF, Line, LineParser};
pub use record::{Record, RecordKind};
pub use registry::{CommandRegistry, Named, Registry, VariableRegistry, validate_name};
pub use variable::{Accessor, Getter, ReadOnly, Value, VarType, Variable};

/// Longest accepted command or variable name, in bytes.
pub const MAX_NAME_LEN: usize = 32;

/// Longest text variable value, in bytes. This bounds every text variable,
/// including `RefCell<heapless::String<N>>` storage with a larger `N`.
pub const MAX_TEXT_LEN: usize = 32;

/// Size of the reply buffer filled while one record runs. Output beyond it
/// is dropped.
pub const MAX_RESPONSE_LEN: usize = 128;
