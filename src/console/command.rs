//! Command entries and argument handling.
//!
//! A command binds a name to a [`CommandHandler`]. When a record such as
//! `blink 3 250` arrives, the handler registered as `blink` receives the raw
//! argument text `"3 250"` and a response sink. Splitting the text further is
//! left to the handler; [`Parameters`] covers the common cases.
//!
//! Any `FnMut(&str, &mut dyn core::fmt::Write) -> HandlerResult` closure is a
//! handler, so most firmware never implements the trait by hand:
//!
//! ```rust
//! use core::fmt::Write;
//! use fwconsole::console::{Command, HandlerResult, Parameters};
//!
//! let mut blink = |args: &str, out: &mut dyn Write| -> HandlerResult {
//!     let mut params = Parameters::new(args);
//!     let times = params.next_i32()?;
//!     write!(out, "blinking {} times\r\n", times)?;
//!     Ok(())
//! };
//!
//! let command = Command::new("blink", &mut blink);
//! assert_eq!(command.name, "blink");
//! ```

use core::fmt::{self, Write};

use super::error::Error;
use super::registry::Named;
use super::variable::parse_bool;

/// Result returned by command handlers.
///
/// An `Err` is reported back to the host like any other dispatch failure.
pub type HandlerResult = Result<(), Error>;

/// Behaviour bound to a command name.
pub trait CommandHandler {
    /// Run the command with its argument text.
    ///
    /// `args` is trimmed and may be empty. It borrows the receive buffer and
    /// is only valid for the duration of the call. Anything written to `out`
    /// is sent back to the host once the call returns.
    fn call(&mut self, args: &str, out: &mut dyn Write) -> HandlerResult;
}

impl<F> CommandHandler for F
where
    F: FnMut(&str, &mut dyn Write) -> HandlerResult,
{
    fn call(&mut self, args: &str, out: &mut dyn Write) -> HandlerResult {
        self(args, out)
    }
}

/// A registered command.
pub struct Command<'a> {
    /// Name the host uses to invoke the command.
    pub name: &'a str,
    /// Handler invoked for every matching record.
    pub handler: &'a mut dyn CommandHandler,
}

impl<'a> Command<'a> {
    /// Bind `handler` to `name`.
    pub fn new(name: &'a str, handler: &'a mut dyn CommandHandler) -> Self {
        Self { name, handler }
    }

    /// Invoke the handler.
    pub fn invoke(&mut self, args: &str, out: &mut dyn Write) -> HandlerResult {
        self.handler.call(args, out)
    }
}

impl Named for Command<'_> {
    fn name(&self) -> &str {
        self.name
    }
}

impl fmt::Debug for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command").field("name", &self.name).finish()
    }
}

/// Tokenizer over a command's argument text.
///
/// Tokens are separated by ASCII whitespace. A token starting with `"` runs
/// to the next `"` and may contain spaces; an unterminated quote takes the
/// rest of the text. Quotes are not unescaped, so tokens always borrow the
/// original text.
///
/// ```rust
/// use fwconsole::console::Parameters;
///
/// let mut params = Parameters::new(r#"7 "living room" on"#);
/// assert_eq!(params.next_i32(), Ok(7));
/// assert_eq!(params.next_str(), Some("living room"));
/// assert_eq!(params.next_bool(), Ok(true));
/// assert_eq!(params.next_str(), None);
/// ```
#[derive(Debug, Clone)]
pub struct Parameters<'t> {
    rest: &'t str,
}

impl<'t> Parameters<'t> {
    /// Start tokenizing `text`.
    pub fn new(text: &'t str) -> Self {
        Self { rest: text }
    }

    /// Next token, or `None` when the text is exhausted.
    pub fn next_str(&mut self) -> Option<&'t str> {
        let text = self.rest.trim_start();
        if text.is_empty() {
            self.rest = text;
            return None;
        }

        if let Some(quoted) = text.strip_prefix('"') {
            return Some(match quoted.find('"') {
                Some(end) => {
                    self.rest = &quoted[end + 1..];
                    &quoted[..end]
                }
                None => {
                    self.rest = "";
                    quoted
                }
            });
        }

        let end = text
            .find(|c: char| c.is_ascii_whitespace())
            .unwrap_or(text.len());
        self.rest = &text[end..];
        Some(&text[..end])
    }

    /// Next token that must be present.
    pub fn required(&mut self) -> Result<&'t str, Error> {
        self.next_str().ok_or(Error::InvalidValue)
    }

    /// Next token parsed as a signed integer.
    pub fn next_i32(&mut self) -> Result<i32, Error> {
        self.required()?.parse().map_err(|_| Error::InvalidValue)
    }

    /// Next token parsed as an unsigned integer.
    pub fn next_u32(&mut self) -> Result<u32, Error> {
        self.required()?.parse().map_err(|_| Error::InvalidValue)
    }

    /// Next token parsed as a float.
    pub fn next_f32(&mut self) -> Result<f32, Error> {
        self.required()?.parse().map_err(|_| Error::InvalidValue)
    }

    /// Next token parsed as a boolean (`true`/`false`, `on`/`off`, `1`/`0`).
    pub fn next_bool(&mut self) -> Result<bool, Error> {
        parse_bool(self.required()?)
    }

    /// Untokenized remainder, trimmed.
    pub fn rest(&self) -> &'t str {
        self.rest.trim()
    }
}

impl<'t> Iterator for Parameters<'t> {
    type Item = &'t str;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_str()
    }
}
