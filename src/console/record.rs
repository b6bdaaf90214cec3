//! Classification of a received line into a console record.

use serde::Serialize;

/// What a record asks the console to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// `name [args]`: invoke a command.
    Command,
    /// `name`: read a variable.
    VariableQuery,
    /// `name=value`: write a variable.
    VariableAssignment,
}

/// One parsed line, borrowed from the receive buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'r> {
    /// Requested action.
    pub kind: RecordKind,
    /// Leading token.
    pub name: &'r str,
    /// Argument text for commands, value text for assignments, empty for
    /// queries. Always trimmed.
    pub payload: &'r str,
}

impl<'r> Record<'r> {
    /// Classify a line.
    ///
    /// The name runs up to the first whitespace or `=`. If the remainder
    /// starts with `=` (spaces around it are allowed) the record is an
    /// assignment of the right-hand side. A bare name is a query when
    /// `is_variable` knows it, and a command without arguments otherwise.
    /// Everything else is a command. Blank lines yield `None`.
    ///
    /// ```rust
    /// use fwconsole::console::{Record, RecordKind};
    ///
    /// let record = Record::parse(" temp = 21.5 ", |_| true).unwrap();
    /// assert_eq!(record.kind, RecordKind::VariableAssignment);
    /// assert_eq!((record.name, record.payload), ("temp", "21.5"));
    /// ```
    pub fn parse(line: &'r str, is_variable: impl FnOnce(&str) -> bool) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let end = line
            .find(|c: char| c.is_ascii_whitespace() || c == '=')
            .unwrap_or(line.len());
        let (name, rest) = line.split_at(end);
        let rest = rest.trim_start();

        let (kind, payload) = if let Some(value) = rest.strip_prefix('=') {
            (RecordKind::VariableAssignment, value.trim())
        } else if rest.is_empty() && is_variable(name) {
            (RecordKind::VariableQuery, rest)
        } else {
            (RecordKind::Command, rest)
        };

        Some(Self {
            kind,
            name,
            payload,
        })
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RecordKind {
    fn format(&self, f: defmt::Formatter) {
        match self {
            RecordKind::Command => defmt::write!(f, "Command"),
            RecordKind::VariableQuery => defmt::write!(f, "VariableQuery"),
            RecordKind::VariableAssignment => defmt::write!(f, "VariableAssignment"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Record<'_> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Record {{ kind: {}, name: {=str}, payload: {=str} }}",
            self.kind,
            self.name,
            self.payload
        )
    }
}
