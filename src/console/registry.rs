//! Fixed-capacity, append-only name tables.
//!
//! A [`Registry`] stores up to `N` entries in insertion order inside a
//! `heapless::Vec`. Lookup is a linear, case-sensitive exact match on the
//! entry name, which is the right trade-off for the handful of names a
//! device typically exposes.
//!
//! Duplicate names are rejected: registering a name that is already present
//! fails with [`Error::DuplicateName`] and leaves the original entry in place.

use heapless::Vec;

use super::command::Command;
use super::error::Error;
use super::variable::Variable;
use super::MAX_NAME_LEN;

/// Anything that can be stored in a [`Registry`].
pub trait Named {
    /// Name the entry is looked up by.
    fn name(&self) -> &str;
}

/// Table of commands, see [`Registry`].
pub type CommandRegistry<'a, const N: usize> = Registry<Command<'a>, N>;

/// Table of variables, see [`Registry`].
pub type VariableRegistry<'a, const N: usize> = Registry<Variable<'a>, N>;

/// Check that `name` can be matched by the record parser.
///
/// Names must be non-empty, at most [`MAX_NAME_LEN`] bytes long and must not
/// contain ASCII whitespace or `=`, since both end the name token on the wire.
pub fn validate_name(name: &str) -> Result<(), Error> {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(Error::InvalidName);
    }
    if name
        .bytes()
        .any(|b| b.is_ascii_whitespace() || b == b'=' || b.is_ascii_control())
    {
        return Err(Error::InvalidName);
    }
    Ok(())
}

/// Fixed-capacity table mapping names to entries.
pub struct Registry<E, const N: usize> {
    entries: Vec<E, N>,
}

impl<E: Named, const N: usize> Registry<E, N> {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an entry.
    ///
    /// Checks run in order: name validity ([`Error::InvalidName`]),
    /// uniqueness ([`Error::DuplicateName`]), free capacity
    /// ([`Error::RegistryFull`]). A failed registration never modifies the
    /// existing entries.
    pub fn register(&mut self, entry: E) -> Result<(), Error> {
        validate_name(entry.name())?;
        if self.contains(entry.name()) {
            return Err(Error::DuplicateName);
        }
        self.entries.push(entry).map_err(|_| Error::RegistryFull)
    }

    /// First entry whose name equals `name`.
    pub fn find(&self, name: &str) -> Option<&E> {
        self.entries.iter().find(|entry| entry.name() == name)
    }

    /// Mutable variant of [`find`](Self::find).
    pub fn find_mut(&mut self, name: &str) -> Option<&mut E> {
        self.entries.iter_mut().find(|entry| entry.name() == name)
    }

    /// Whether an entry named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.entries.iter()
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether every slot is taken.
    pub fn is_full(&self) -> bool {
        self.entries.is_full()
    }

    /// Maximum number of entries, fixed at compile time.
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<E: Named, const N: usize> Default for Registry<E, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Named, const N: usize> core::fmt::Debug for Registry<E, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| entry.name()))
            .finish()
    }
}
