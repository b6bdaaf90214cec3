//! Resolution of records against the command and variable registries.

use core::fmt::Write;

use heapless::String;

use super::command::{Command, CommandHandler, HandlerResult};
use super::error::Error;
use super::parser::Line;
use super::record::{Record, RecordKind};
use super::registry::{CommandRegistry, VariableRegistry};
use super::variable::{Accessor, Variable};

/// Capability the parser needs from whatever executes records.
pub trait Dispatch {
    /// Whether `name` is a registered variable. Used to tell a bare
    /// variable name (a read) from a command without arguments.
    fn is_variable(&self, name: &str) -> bool;

    /// Execute one record, writing any reply to `out`.
    fn dispatch(&mut self, record: &Record<'_>, out: &mut dyn Write) -> Result<(), Error>;

    /// Whether failed outcomes are answered with an `error: <reason>` line.
    fn error_replies(&self) -> bool {
        true
    }

    /// Classify and execute a line coming from the parser.
    ///
    /// Returns `None` for blank lines, otherwise the outcome of the record.
    /// Failures, including lines the parser had to drop, are answered with
    /// an error line when [`error_replies`](Self::error_replies) is set.
    fn process(&mut self, line: Line<'_>, out: &mut dyn Write) -> Option<Result<(), Error>> {
        let outcome = match line {
            Ok(text) => {
                let record = Record::parse(text, |name| self.is_variable(name))?;
                self.dispatch(&record, out)
            }
            Err(err) => Err(err),
        };
        self.report(outcome, out);
        Some(outcome)
    }

    /// Answer a failed outcome with an error line, if enabled.
    ///
    /// The line is written in one piece: a sink too full to take all of it
    /// receives none of it.
    fn report(&self, outcome: Result<(), Error>, out: &mut dyn Write) {
        let Err(err) = outcome else {
            return;
        };
        debug!("record failed: {}", err);
        if self.error_replies() {
            let mut line: String<ERROR_LINE_LEN> = String::new();
            if write!(line, "error: {}\r\n", err.reason()).is_ok() {
                let _ = out.write_str(&line);
            }
        }
    }
}

const ERROR_LINE_LEN: usize = 32;

/// Catch-all for command names nobody registered.
pub trait DefaultHandler {
    /// Handle the unknown command `name` with its argument text.
    fn call(&mut self, name: &str, args: &str, out: &mut dyn Write) -> HandlerResult;
}

impl<F> DefaultHandler for F
where
    F: FnMut(&str, &str, &mut dyn Write) -> HandlerResult,
{
    fn call(&mut self, name: &str, args: &str, out: &mut dyn Write) -> HandlerResult {
        self(name, args, out)
    }
}

/// Owns the command and variable registries and executes records.
///
/// `COMMANDS` and `VARIABLES` are the registry capacities.
///
/// ```rust
/// use core::cell::Cell;
/// use core::fmt::Write;
/// use fwconsole::console::{Dispatch, Dispatcher, HandlerResult, Record};
///
/// let led = Cell::new(false);
/// let mut toggle = |_: &str, out: &mut dyn Write| -> HandlerResult {
///     led.set(!led.get());
///     write!(out, "led {}\r\n", led.get())?;
///     Ok(())
/// };
/// let temp = Cell::new(21.5f32);
///
/// let mut dispatcher: Dispatcher<'_, 4, 4> = Dispatcher::new();
/// dispatcher.add_command("toggle", &mut toggle).unwrap();
/// dispatcher.add_variable("temp", &temp).unwrap();
///
/// let mut out: heapless::String<64> = heapless::String::new();
/// let record = Record::parse("temp", |name| dispatcher.is_variable(name)).unwrap();
/// dispatcher.dispatch(&record, &mut out).unwrap();
/// assert_eq!(out.as_str(), "21.5\r\n");
/// ```
pub struct Dispatcher<'a, const COMMANDS: usize = 10, const VARIABLES: usize = 10> {
    commands: CommandRegistry<'a, COMMANDS>,
    variables: VariableRegistry<'a, VARIABLES>,
    default_handler: Option<&'a mut dyn DefaultHandler>,
    error_replies: bool,
}

impl<'a, const COMMANDS: usize, const VARIABLES: usize> Dispatcher<'a, COMMANDS, VARIABLES> {
    /// Create a dispatcher with empty registries and error replies enabled.
    pub const fn new() -> Self {
        Self {
            commands: CommandRegistry::new(),
            variables: VariableRegistry::new(),
            default_handler: None,
            error_replies: true,
        }
    }

    /// Register a command.
    ///
    /// Fails with [`Error::DuplicateName`] if the name is already used by a
    /// command or a variable, [`Error::RegistryFull`] when all `COMMANDS`
    /// slots are taken and [`Error::InvalidName`] for names the parser
    /// could never produce.
    pub fn add_command(
        &mut self,
        name: &'a str,
        handler: &'a mut dyn CommandHandler,
    ) -> Result<(), Error> {
        if self.variables.contains(name) {
            return Err(Error::DuplicateName);
        }
        self.commands.register(Command::new(name, handler))?;
        debug!("registered command {=str}", name);
        Ok(())
    }

    /// Register a variable, with the same failure modes as
    /// [`add_command`](Self::add_command).
    pub fn add_variable(&mut self, name: &'a str, accessor: &'a dyn Accessor) -> Result<(), Error> {
        if self.commands.contains(name) {
            return Err(Error::DuplicateName);
        }
        self.variables.register(Variable::new(name, accessor))?;
        debug!("registered variable {=str}", name);
        Ok(())
    }

    /// Route unknown command names to `handler` instead of failing with
    /// [`Error::UnknownName`].
    pub fn set_default_handler(&mut self, handler: &'a mut dyn DefaultHandler) {
        self.default_handler = Some(handler);
    }

    /// Enable or disable `error: <reason>` replies for failed records.
    pub fn set_error_replies(&mut self, enabled: bool) {
        self.error_replies = enabled;
    }

    /// Registered commands.
    pub fn commands(&self) -> &CommandRegistry<'a, COMMANDS> {
        &self.commands
    }

    /// Registered variables.
    pub fn variables(&self) -> &VariableRegistry<'a, VARIABLES> {
        &self.variables
    }

    fn run_command(&mut self, record: &Record<'_>, out: &mut dyn Write) -> Result<(), Error> {
        if let Some(command) = self.commands.find_mut(record.name) {
            trace!("command {=str}", record.name);
            return command.invoke(record.payload, out);
        }

        match self.default_handler.as_mut() {
            Some(handler) => handler.call(record.name, record.payload, out),
            None => {
                warn!("unknown command {=str}", record.name);
                Err(Error::UnknownName)
            }
        }
    }

    fn read_variable(&self, name: &str, out: &mut dyn Write) -> Result<(), Error> {
        let variable = self.variables.find(name).ok_or(Error::UnknownName)?;
        write_value(variable, out)
    }

    fn write_variable(&self, name: &str, text: &str) -> Result<(), Error> {
        let variable = self.variables.find(name).ok_or_else(|| {
            warn!("unknown variable {=str}", name);
            Error::UnknownName
        })?;
        variable.assign(text)
    }
}

fn write_value(variable: &Variable<'_>, out: &mut dyn Write) -> Result<(), Error> {
    write!(out, "{}\r\n", variable.read())?;
    Ok(())
}

impl<const COMMANDS: usize, const VARIABLES: usize> Dispatch for Dispatcher<'_, COMMANDS, VARIABLES> {
    fn is_variable(&self, name: &str) -> bool {
        self.variables.contains(name)
    }

    fn dispatch(&mut self, record: &Record<'_>, out: &mut dyn Write) -> Result<(), Error> {
        match record.kind {
            RecordKind::Command => self.run_command(record, out),
            RecordKind::VariableQuery => self.read_variable(record.name, out),
            RecordKind::VariableAssignment => self.write_variable(record.name, record.payload),
        }
    }

    fn error_replies(&self) -> bool {
        self.error_replies
    }

    /// Classifies and executes with a single variable lookup: the entry found
    /// while telling a query from a bare command serves the query itself.
    fn process(&mut self, line: Line<'_>, out: &mut dyn Write) -> Option<Result<(), Error>> {
        let outcome = match line {
            Ok(text) => {
                let mut resolved = None;
                let record = Record::parse(text, |name| {
                    resolved = self.variables.find(name).copied();
                    resolved.is_some()
                })?;
                match (record.kind, resolved) {
                    (RecordKind::VariableQuery, Some(variable)) => write_value(&variable, out),
                    _ => self.dispatch(&record, out),
                }
            }
            Err(err) => Err(err),
        };
        self.report(outcome, out);
        Some(outcome)
    }
}

impl<const COMMANDS: usize, const VARIABLES: usize> Default for Dispatcher<'_, COMMANDS, VARIABLES> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const COMMANDS: usize, const VARIABLES: usize> core::fmt::Debug
    for Dispatcher<'_, COMMANDS, VARIABLES>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("commands", &self.commands)
            .field("variables", &self.variables)
            .field("default_handler", &self.default_handler.is_some())
            .field("error_replies", &self.error_replies)
            .finish()
    }
}
