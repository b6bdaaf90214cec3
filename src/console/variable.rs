//! Typed variables exposed to the host.
//!
//! A variable pairs a name with an [`Accessor`]. Accessors take `&self` in
//! both directions, so firmware keeps ordinary shared references to its state
//! (`Cell<f32>`, `RefCell<String<N>>`, ...) while the console reads and writes
//! the same values in between.
//!
//! ```rust
//! use core::cell::Cell;
//! use fwconsole::console::{Value, Variable};
//!
//! let setpoint = Cell::new(21.5f32);
//! let variable = Variable::new("setpoint", &setpoint);
//!
//! variable.assign("19.0").unwrap();
//! assert_eq!(setpoint.get(), 19.0);
//! assert_eq!(variable.read(), Value::Float(19.0));
//! ```

use core::cell::{Cell, RefCell};
use core::fmt;

use heapless::String;
use serde::Serialize;

use super::error::Error;
use super::registry::Named;
use super::MAX_TEXT_LEN;

/// Declared type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VarType {
    /// Signed integer, carried as `i32`.
    Integer,
    /// Single precision float.
    Float,
    /// `true`/`false`.
    Boolean,
    /// Short text, at most [`MAX_TEXT_LEN`] bytes.
    Text,
}

impl VarType {
    /// Parse value text received from the host into this type.
    ///
    /// Integers and floats use Rust's `FromStr`; non-finite floats are
    /// rejected. Booleans accept `true`/`false`, `on`/`off`, `yes`/`no` and
    /// `1`/`0`, ignoring ASCII case. Text may be wrapped in double quotes.
    pub fn parse(self, text: &str) -> Result<Value, Error> {
        let text = text.trim();
        match self {
            VarType::Integer => text
                .parse()
                .map(Value::Integer)
                .map_err(|_| Error::InvalidValue),
            VarType::Float => match text.parse::<f32>() {
                Ok(v) if v.is_finite() => Ok(Value::Float(v)),
                _ => Err(Error::InvalidValue),
            },
            VarType::Boolean => parse_bool(text).map(Value::Boolean),
            VarType::Text => {
                let unquoted = text
                    .strip_prefix('"')
                    .and_then(|t| t.strip_suffix('"'))
                    .unwrap_or(text);
                String::try_from(unquoted)
                    .map(Value::Text)
                    .map_err(|_| Error::InvalidValue)
            }
        }
    }
}

pub(crate) fn parse_bool(text: &str) -> Result<bool, Error> {
    const TRUE: [&str; 4] = ["true", "on", "yes", "1"];
    const FALSE: [&str; 4] = ["false", "off", "no", "0"];

    if TRUE.iter().any(|t| t.eq_ignore_ascii_case(text)) {
        Ok(true)
    } else if FALSE.iter().any(|t| t.eq_ignore_ascii_case(text)) {
        Ok(false)
    } else {
        Err(Error::InvalidValue)
    }
}

/// A variable's value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Integer value.
    Integer(i32),
    /// Float value.
    Float(f32),
    /// Boolean value.
    Boolean(bool),
    /// Text value.
    Text(String<MAX_TEXT_LEN>),
}

impl Value {
    /// Type of the value.
    pub fn var_type(&self) -> VarType {
        match self {
            Value::Integer(_) => VarType::Integer,
            Value::Float(_) => VarType::Float,
            Value::Boolean(_) => VarType::Boolean,
            Value::Text(_) => VarType::Text,
        }
    }
}

/// Textual form sent in replies to variable reads.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Boolean(v) => f.write_str(if *v { "true" } else { "false" }),
            Value::Text(v) => f.write_str(v),
        }
    }
}

/// Read/write access to a piece of device state.
pub trait Accessor {
    /// Declared type; assignments are parsed into it.
    fn var_type(&self) -> VarType;

    /// Current value.
    fn get(&self) -> Value;

    /// Store a new value. Only called with values of [`var_type`](Self::var_type)
    /// on writable accessors.
    fn set(&self, value: Value) -> Result<(), Error>;

    /// Whether the host may assign to the variable.
    fn writable(&self) -> bool {
        true
    }
}

impl<A: Accessor + ?Sized> Accessor for &A {
    fn var_type(&self) -> VarType {
        (**self).var_type()
    }

    fn get(&self) -> Value {
        (**self).get()
    }

    fn set(&self, value: Value) -> Result<(), Error> {
        (**self).set(value)
    }

    fn writable(&self) -> bool {
        (**self).writable()
    }
}

macro_rules! impl_integer_cell {
    ($($t:ty),+) => {
        $(
            impl Accessor for Cell<$t> {
                fn var_type(&self) -> VarType {
                    VarType::Integer
                }

                fn get(&self) -> Value {
                    Value::Integer(i32::from(Cell::get(self)))
                }

                fn set(&self, value: Value) -> Result<(), Error> {
                    match value {
                        Value::Integer(v) => {
                            let v = <$t>::try_from(v).map_err(|_| Error::InvalidValue)?;
                            Cell::set(self, v);
                            Ok(())
                        }
                        _ => Err(Error::InvalidValue),
                    }
                }
            }
        )+
    };
}

impl_integer_cell!(i8, i16, i32, u8, u16);

impl Accessor for Cell<f32> {
    fn var_type(&self) -> VarType {
        VarType::Float
    }

    fn get(&self) -> Value {
        Value::Float(Cell::get(self))
    }

    fn set(&self, value: Value) -> Result<(), Error> {
        match value {
            Value::Float(v) => {
                Cell::set(self, v);
                Ok(())
            }
            _ => Err(Error::InvalidValue),
        }
    }
}

impl Accessor for Cell<bool> {
    fn var_type(&self) -> VarType {
        VarType::Boolean
    }

    fn get(&self) -> Value {
        Value::Boolean(Cell::get(self))
    }

    fn set(&self, value: Value) -> Result<(), Error> {
        match value {
            Value::Boolean(v) => {
                Cell::set(self, v);
                Ok(())
            }
            _ => Err(Error::InvalidValue),
        }
    }
}

/// Text variable backed by firmware-owned storage.
///
/// Values travel as [`Value::Text`], which holds at most [`MAX_TEXT_LEN`]
/// bytes whatever `N` is. With `N > MAX_TEXT_LEN` the host can assign at
/// most `MAX_TEXT_LEN` bytes (longer text fails with
/// [`Error::InvalidValue`]), and reads return the first `MAX_TEXT_LEN`
/// bytes of longer content the firmware stored itself. Assignments longer
/// than `N` also fail with [`Error::InvalidValue`].
impl<const N: usize> Accessor for RefCell<String<N>> {
    fn var_type(&self) -> VarType {
        VarType::Text
    }

    /// Text longer than [`MAX_TEXT_LEN`] is cut at a character boundary.
    fn get(&self) -> Value {
        let current = self.borrow();
        let mut text = String::new();
        for c in current.chars() {
            if text.push(c).is_err() {
                break;
            }
        }
        Value::Text(text)
    }

    fn set(&self, value: Value) -> Result<(), Error> {
        match value {
            Value::Text(v) => {
                let text = String::try_from(v.as_str()).map_err(|_| Error::InvalidValue)?;
                self.replace(text);
                Ok(())
            }
            _ => Err(Error::InvalidValue),
        }
    }
}

/// Makes any accessor read-only.
#[derive(Debug)]
pub struct ReadOnly<A>(pub A);

impl<A: Accessor> Accessor for ReadOnly<A> {
    fn var_type(&self) -> VarType {
        self.0.var_type()
    }

    fn get(&self) -> Value {
        self.0.get()
    }

    fn set(&self, _value: Value) -> Result<(), Error> {
        Err(Error::ReadOnly)
    }

    fn writable(&self) -> bool {
        false
    }
}

/// Read-only variable computed on every read, e.g. a sensor sample.
///
/// ```rust
/// use fwconsole::console::{Accessor, Getter, Value, VarType};
///
/// let uptime = Getter::new(VarType::Integer, || Value::Integer(42));
/// assert_eq!(uptime.get(), Value::Integer(42));
/// assert!(!uptime.writable());
/// ```
pub struct Getter<F> {
    var_type: VarType,
    read: F,
}

impl<F: Fn() -> Value> Getter<F> {
    /// Wrap `read`, which must return values of `var_type`.
    pub fn new(var_type: VarType, read: F) -> Self {
        Self { var_type, read }
    }
}

impl<F: Fn() -> Value> Accessor for Getter<F> {
    fn var_type(&self) -> VarType {
        self.var_type
    }

    fn get(&self) -> Value {
        (self.read)()
    }

    fn set(&self, _value: Value) -> Result<(), Error> {
        Err(Error::ReadOnly)
    }

    fn writable(&self) -> bool {
        false
    }
}

impl<F> fmt::Debug for Getter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Getter")
            .field("var_type", &self.var_type)
            .finish()
    }
}

/// A registered variable.
#[derive(Clone, Copy)]
pub struct Variable<'a> {
    /// Name the host reads and assigns through.
    pub name: &'a str,
    /// Access to the underlying state.
    pub accessor: &'a dyn Accessor,
}

impl<'a> Variable<'a> {
    /// Bind `accessor` to `name`.
    pub fn new(name: &'a str, accessor: &'a dyn Accessor) -> Self {
        Self { name, accessor }
    }

    /// Declared type.
    pub fn var_type(&self) -> VarType {
        self.accessor.var_type()
    }

    /// Current value.
    pub fn read(&self) -> Value {
        self.accessor.get()
    }

    /// Parse `text` into the declared type and store it.
    ///
    /// Read-only variables fail with [`Error::ReadOnly`] before the text is
    /// looked at; unparsable text fails with [`Error::InvalidValue`]. The
    /// value is unchanged in both cases.
    pub fn assign(&self, text: &str) -> Result<(), Error> {
        if !self.accessor.writable() {
            return Err(Error::ReadOnly);
        }
        let value = self.var_type().parse(text)?;
        self.accessor.set(value)
    }
}

impl Named for Variable<'_> {
    fn name(&self) -> &str {
        self.name
    }
}

impl fmt::Debug for Variable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("name", &self.name)
            .field("type", &self.var_type())
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for VarType {
    fn format(&self, f: defmt::Formatter) {
        match self {
            VarType::Integer => defmt::write!(f, "Integer"),
            VarType::Float => defmt::write!(f, "Float"),
            VarType::Boolean => defmt::write!(f, "Boolean"),
            VarType::Text => defmt::write!(f, "Text"),
        }
    }
}
