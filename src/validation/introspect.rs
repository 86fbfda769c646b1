//! Runtime shape introspection.
//!
//! # Responsibilities
//! - Turn any `T: Serialize` into a [`Value`] without knowing `T`
//! - Classify the root as absent, a record, or something else
//!
//! # Design Decisions
//! - serde's data model is the reflection surface: structs arrive with
//!   field names in declaration order, `Option` arrives as none/some
//! - Fields a type keeps out of its serialized form (`#[serde(skip)]`,
//!   `skip_serializing_if`) are invisible here, the same as private members
//! - `Box`, `&`, `Arc` are transparent in serde and need no unwrapping
//! - Nesting depth is capped; exceeding it is a [`UsageFault::TooDeep`].
//!   `Some` and newtype wrappers count as levels, so recursive types built
//!   only from them are bounded too
//! - Instants are recognized by shape: a `Timestamp` newtype, or a
//!   `SystemTime` struct with serde's two epoch fields
//! - Never panics: every input maps to a `Value` or a `UsageFault`

use serde::ser::{
    Serialize, SerializeMap, SerializeSeq, SerializeStruct, SerializeStructVariant,
    SerializeTuple, SerializeTupleStruct, SerializeTupleVariant, Serializer,
};

use crate::validation::report::UsageFault;
use crate::validation::value::{
    Field, Record, Value, INSTANT_NEWTYPE_NAME, SYSTEM_TIME_FIELDS, SYSTEM_TIME_NAME,
};

/// Result of normalizing a root value.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// Nothing to validate: `()` or `None`.
    Absent,
    /// A structured record and its visible fields.
    Record(Record),
}

/// Capture the runtime shape of `value`.
pub fn introspect<T>(value: &T, max_depth: usize) -> Result<Value, UsageFault>
where
    T: Serialize + ?Sized,
{
    value.serialize(ShapeSerializer::new(max_depth))
}

/// Classify an introspected root value.
///
/// `Optional(Some(v))` is dereferenced and `v` normalized in turn, so a
/// `Some(None)` root is still absent.
pub fn normalize(value: Value) -> Result<Normalized, UsageFault> {
    match value {
        Value::Unit | Value::Optional(None) => Ok(Normalized::Absent),
        Value::Optional(Some(inner)) => normalize(*inner),
        Value::Record(record) => Ok(Normalized::Record(record)),
        other => Err(UsageFault::NotARecord { kind: other.kind() }),
    }
}

/// Serializer that records shape instead of producing bytes.
#[derive(Debug, Clone, Copy)]
pub struct ShapeSerializer {
    depth: usize,
    max_depth: usize,
}

impl ShapeSerializer {
    pub fn new(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
        }
    }

    /// Serializer for the children of a compound value.
    fn descend(self) -> Result<Self, UsageFault> {
        if self.depth >= self.max_depth {
            return Err(UsageFault::TooDeep {
                limit: self.max_depth,
            });
        }
        Ok(Self {
            depth: self.depth + 1,
            max_depth: self.max_depth,
        })
    }
}

impl Serializer for ShapeSerializer {
    type Ok = Value;
    type Error = UsageFault;

    type SerializeSeq = SeqCollector;
    type SerializeTuple = SeqCollector;
    type SerializeTupleStruct = SeqCollector;
    type SerializeTupleVariant = SeqCollector;
    type SerializeMap = MapCollector;
    type SerializeStruct = RecordCollector;
    type SerializeStructVariant = RecordCollector;

    fn serialize_bool(self, v: bool) -> Result<Value, UsageFault> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, UsageFault> {
        Ok(Value::Signed(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, UsageFault> {
        Ok(Value::Signed(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, UsageFault> {
        Ok(Value::Signed(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, UsageFault> {
        Ok(Value::Signed(v.into()))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, UsageFault> {
        Ok(Value::Signed(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, UsageFault> {
        Ok(Value::Unsigned(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, UsageFault> {
        Ok(Value::Unsigned(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, UsageFault> {
        Ok(Value::Unsigned(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, UsageFault> {
        Ok(Value::Unsigned(v.into()))
    }

    fn serialize_u128(self, v: u128) -> Result<Value, UsageFault> {
        Ok(Value::Unsigned(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, UsageFault> {
        Ok(Value::Float(v.into()))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, UsageFault> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, UsageFault> {
        Ok(Value::Char(v))
    }

    fn serialize_str(self, v: &str) -> Result<Value, UsageFault> {
        Ok(Value::Str(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, UsageFault> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value, UsageFault> {
        Ok(Value::Optional(None))
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value, UsageFault>
    where
        T: ?Sized + Serialize,
    {
        let inner = value.serialize(self.descend()?)?;
        Ok(Value::Optional(Some(Box::new(inner))))
    }

    fn serialize_unit(self) -> Result<Value, UsageFault> {
        Ok(Value::Unit)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value, UsageFault> {
        Ok(Value::Record(Record::new(name, Vec::new())))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, UsageFault> {
        Ok(Value::Variant {
            enum_name: name,
            variant,
            payload: None,
        })
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Value, UsageFault>
    where
        T: ?Sized + Serialize,
    {
        let inner = value.serialize(self.descend()?)?;
        if name == INSTANT_NEWTYPE_NAME {
            return Ok(Value::Record(Record::instant(
                name,
                vec![Field::new("instant", inner)],
            )));
        }
        Ok(inner)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, UsageFault>
    where
        T: ?Sized + Serialize,
    {
        let payload = value.serialize(self.descend()?)?;
        Ok(Value::Variant {
            enum_name: name,
            variant,
            payload: Some(Box::new(payload)),
        })
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqCollector, UsageFault> {
        SeqCollector::new(self, len.unwrap_or(0), None)
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqCollector, UsageFault> {
        SeqCollector::new(self, len, None)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqCollector, UsageFault> {
        SeqCollector::new(self, len, None)
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SeqCollector, UsageFault> {
        SeqCollector::new(self, len, Some((name, variant)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapCollector, UsageFault> {
        Ok(MapCollector {
            ser: self.descend()?,
            entries: Vec::with_capacity(len.unwrap_or(0)),
            pending_key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<RecordCollector, UsageFault> {
        RecordCollector::new(self, name, len, None)
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<RecordCollector, UsageFault> {
        RecordCollector::new(self, variant, len, Some((name, variant)))
    }
}

/// Wrap `payload` as an enum variant when collecting a variant body.
fn finish_variant(variant: Option<(&'static str, &'static str)>, payload: Value) -> Value {
    match variant {
        Some((enum_name, variant)) => Value::Variant {
            enum_name,
            variant,
            payload: Some(Box::new(payload)),
        },
        None => payload,
    }
}

/// Collects sequences, tuples and tuple variants.
pub struct SeqCollector {
    ser: ShapeSerializer,
    items: Vec<Value>,
    variant: Option<(&'static str, &'static str)>,
}

impl SeqCollector {
    fn new(
        parent: ShapeSerializer,
        len: usize,
        variant: Option<(&'static str, &'static str)>,
    ) -> Result<Self, UsageFault> {
        Ok(Self {
            ser: parent.descend()?,
            items: Vec::with_capacity(len),
            variant,
        })
    }

    fn push<T>(&mut self, value: &T) -> Result<(), UsageFault>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(value.serialize(self.ser)?);
        Ok(())
    }

    fn finish(self) -> Value {
        finish_variant(self.variant, Value::Seq(self.items))
    }
}

impl SerializeSeq for SeqCollector {
    type Ok = Value;
    type Error = UsageFault;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), UsageFault>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value, UsageFault> {
        Ok(self.finish())
    }
}

impl SerializeTuple for SeqCollector {
    type Ok = Value;
    type Error = UsageFault;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), UsageFault>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value, UsageFault> {
        Ok(self.finish())
    }
}

impl SerializeTupleStruct for SeqCollector {
    type Ok = Value;
    type Error = UsageFault;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), UsageFault>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value, UsageFault> {
        Ok(self.finish())
    }
}

impl SerializeTupleVariant for SeqCollector {
    type Ok = Value;
    type Error = UsageFault;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), UsageFault>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value, UsageFault> {
        Ok(self.finish())
    }
}

/// Collects maps as ordered key/value pairs.
pub struct MapCollector {
    ser: ShapeSerializer,
    entries: Vec<(Value, Value)>,
    pending_key: Option<Value>,
}

impl SerializeMap for MapCollector {
    type Ok = Value;
    type Error = UsageFault;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), UsageFault>
    where
        T: ?Sized + Serialize,
    {
        self.pending_key = Some(key.serialize(self.ser)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), UsageFault>
    where
        T: ?Sized + Serialize,
    {
        let key = self.pending_key.take().ok_or_else(|| {
            UsageFault::Introspection("map value serialized before its key".to_string())
        })?;
        self.entries.push((key, value.serialize(self.ser)?));
        Ok(())
    }

    fn end(self) -> Result<Value, UsageFault> {
        Ok(Value::Map(self.entries))
    }
}

/// Collects structs and struct variants as records.
pub struct RecordCollector {
    ser: ShapeSerializer,
    type_name: &'static str,
    fields: Vec<Field>,
    variant: Option<(&'static str, &'static str)>,
}

impl RecordCollector {
    fn new(
        parent: ShapeSerializer,
        type_name: &'static str,
        len: usize,
        variant: Option<(&'static str, &'static str)>,
    ) -> Result<Self, UsageFault> {
        Ok(Self {
            ser: parent.descend()?,
            type_name,
            fields: Vec::with_capacity(len),
            variant,
        })
    }

    fn push<T>(&mut self, key: &'static str, value: &T) -> Result<(), UsageFault>
    where
        T: ?Sized + Serialize,
    {
        let value = value.serialize(self.ser)?;
        self.fields.push(Field::new(key, value));
        Ok(())
    }

    fn is_system_time(&self) -> bool {
        self.variant.is_none()
            && self.type_name == SYSTEM_TIME_NAME
            && self.fields.iter().map(|f| f.name).eq(SYSTEM_TIME_FIELDS.iter().copied())
    }

    fn finish(self) -> Value {
        let record = if self.is_system_time() {
            Record::instant(self.type_name, self.fields)
        } else {
            Record::new(self.type_name, self.fields)
        };
        finish_variant(self.variant, Value::Record(record))
    }
}

impl SerializeStruct for RecordCollector {
    type Ok = Value;
    type Error = UsageFault;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), UsageFault>
    where
        T: ?Sized + Serialize,
    {
        self.push(key, value)
    }

    fn end(self) -> Result<Value, UsageFault> {
        Ok(self.finish())
    }
}

impl SerializeStructVariant for RecordCollector {
    type Ok = Value;
    type Error = UsageFault;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), UsageFault>
    where
        T: ?Sized + Serialize,
    {
        self.push(key, value)
    }

    fn end(self) -> Result<Value, UsageFault> {
        Ok(self.finish())
    }
}
