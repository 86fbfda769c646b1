//! Shape model produced by the introspector.
//!
//! A [`Value`] is the uniform description of whatever the caller handed to
//! the validator. It is produced once, up front, so rule dispatch never
//! has to look at raw type information again.

use std::fmt;

/// Newtype name that marks a wrapped time instant.
pub const INSTANT_NEWTYPE_NAME: &str = "Timestamp";

/// Struct name and field layout serde uses for `std::time::SystemTime`.
pub const SYSTEM_TIME_NAME: &str = "SystemTime";
pub const SYSTEM_TIME_FIELDS: &[&str] = &["secs_since_epoch", "nanos_since_epoch"];

/// Classification of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Unit,
    Bool,
    Unsigned,
    Signed,
    Float,
    Char,
    String,
    Bytes,
    Option,
    Sequence,
    Map,
    Enum,
    Record,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Unit => "unit",
            Kind::Bool => "bool",
            Kind::Unsigned => "unsigned integer",
            Kind::Signed => "signed integer",
            Kind::Float => "float",
            Kind::Char => "char",
            Kind::String => "string",
            Kind::Bytes => "bytes",
            Kind::Option => "option",
            Kind::Sequence => "sequence",
            Kind::Map => "map",
            Kind::Enum => "enum",
            Kind::Record => "record",
        };
        f.write_str(name)
    }
}

/// Runtime shape of an introspected value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `()` and unit-like nothing; the absence sentinel at the root.
    Unit,
    Bool(bool),
    Unsigned(u128),
    Signed(i128),
    Float(f64),
    Char(char),
    Str(String),
    Bytes(Vec<u8>),
    /// A value that may point to nothing (`Option<T>`).
    Optional(Option<Box<Value>>),
    Seq(Vec<Value>),
    Map(Vec<(Value, Value)>),
    /// An enum variant with its payload, if any.
    Variant {
        enum_name: &'static str,
        variant: &'static str,
        payload: Option<Box<Value>>,
    },
    Record(Record),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Unit => Kind::Unit,
            Value::Bool(_) => Kind::Bool,
            Value::Unsigned(_) => Kind::Unsigned,
            Value::Signed(_) => Kind::Signed,
            Value::Float(_) => Kind::Float,
            Value::Char(_) => Kind::Char,
            Value::Str(_) => Kind::String,
            Value::Bytes(_) => Kind::Bytes,
            Value::Optional(_) => Kind::Option,
            Value::Seq(_) => Kind::Sequence,
            Value::Map(_) => Kind::Map,
            Value::Variant { .. } => Kind::Enum,
            Value::Record(_) => Kind::Record,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_unsigned(&self) -> Option<u128> {
        match self {
            Value::Unsigned(n) => Some(*n),
            _ => None,
        }
    }
}

/// A structured value: declared type name plus visible fields in
/// declaration order.
///
/// Time instants are always structurally valid and are never descended
/// into. The flag is set by the introspector from the serialized shape,
/// never from the type name alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub type_name: &'static str,
    pub fields: Vec<Field>,
    instant: bool,
}

impl Record {
    pub fn new(type_name: &'static str, fields: Vec<Field>) -> Self {
        Self {
            type_name,
            fields,
            instant: false,
        }
    }

    /// A record standing for a point in time.
    pub fn instant(type_name: &'static str, fields: Vec<Field>) -> Self {
        Self {
            type_name,
            fields,
            instant: true,
        }
    }

    pub fn is_instant(&self) -> bool {
        self.instant
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One visible member of a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub value: Value,
}

impl Field {
    pub fn new(name: &'static str, value: Value) -> Self {
        Self { name, value }
    }

    /// The declared kind of this field.
    pub fn kind(&self) -> Kind {
        self.value.kind()
    }
}
