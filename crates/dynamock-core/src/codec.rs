//! Conversion between native values and tagged DynamoDB attribute values.
//!
//! Every column declares a [`DataType`]; the data type fixes the wire
//! [`TypeTag`] and the textual form of the payload. Free-form maps and lists
//! carry no declared type, so each entry's data type is inferred from the
//! native value when encoding and from the wire tag when decoding.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

use dynamock_model::AttributeValue;
use dynamock_model::attribute_value::TypeTag;

use crate::schema::Column;

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while converting values.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The value does not fit the column's data type.
    #[error("cannot convert {actual} to {expected}")]
    TypeMismatch {
        /// The data type or tag that was expected.
        expected: String,
        /// What was found instead.
        actual: String,
    },
    /// A number payload failed to parse.
    #[error("invalid number: {value}")]
    InvalidNumber {
        /// The offending text.
        value: String,
    },
    /// A date or datetime payload failed to parse.
    #[error("invalid date: {value}")]
    InvalidDate {
        /// The offending text.
        value: String,
    },
    /// A type name or wire tag is not recognized.
    #[error("unknown type tag: {tag}")]
    UnknownTypeTag {
        /// The unrecognized name.
        tag: String,
    },
}

// ---------------------------------------------------------------------------
// DataType
// ---------------------------------------------------------------------------

/// Declared data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// `BOOL`
    Boolean,
    /// `BS`
    BinarySet,
    /// `B`
    Bytes,
    /// ISO date in `S`.
    Date,
    /// ISO datetime with a trailing `Z` in `S`.
    Datetime,
    /// `L`
    List,
    /// `N` with a fractional part.
    Float,
    /// `NS` of floats.
    FloatSet,
    /// `N` holding an integer.
    Integer,
    /// `NS` of integers.
    IntegerSet,
    /// `M`
    Map,
    /// `S`
    String,
    /// `SS`
    StringSet,
    /// Epoch seconds in `N`.
    Timestamp,
}

impl DataType {
    /// Every data type.
    pub const ALL: [Self; 14] = [
        Self::Boolean,
        Self::BinarySet,
        Self::Bytes,
        Self::Date,
        Self::Datetime,
        Self::List,
        Self::Float,
        Self::FloatSet,
        Self::Integer,
        Self::IntegerSet,
        Self::Map,
        Self::String,
        Self::StringSet,
        Self::Timestamp,
    ];

    /// Returns the lowercase name of this data type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::BinarySet => "binary_set",
            Self::Bytes => "bytes",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::List => "list",
            Self::Float => "float",
            Self::FloatSet => "float_set",
            Self::Integer => "integer",
            Self::IntegerSet => "integer_set",
            Self::Map => "map",
            Self::String => "string",
            Self::StringSet => "string_set",
            Self::Timestamp => "timestamp",
        }
    }

    /// Returns the wire tag values of this data type are stored under.
    #[must_use]
    pub fn tag(&self) -> TypeTag {
        match self {
            Self::Boolean => TypeTag::Bool,
            Self::BinarySet => TypeTag::Bs,
            Self::Bytes => TypeTag::B,
            Self::Date | Self::Datetime | Self::String => TypeTag::S,
            Self::List => TypeTag::L,
            Self::Float | Self::Integer | Self::Timestamp => TypeTag::N,
            Self::FloatSet | Self::IntegerSet => TypeTag::Ns,
            Self::Map => TypeTag::M,
            Self::StringSet => TypeTag::Ss,
        }
    }

    /// Infer the data type of a stored value from its tag.
    ///
    /// Numbers decode as integers when every payload parses as one.
    #[must_use]
    pub fn infer(value: &AttributeValue) -> Self {
        match value {
            AttributeValue::S(_) => Self::String,
            AttributeValue::N(n) if n.parse::<i64>().is_ok() => Self::Integer,
            AttributeValue::N(_) => Self::Float,
            AttributeValue::Bool(_) => Self::Boolean,
            AttributeValue::B(_) => Self::Bytes,
            AttributeValue::Ss(_) => Self::StringSet,
            AttributeValue::Ns(ns) if ns.iter().all(|n| n.parse::<i64>().is_ok()) => {
                Self::IntegerSet
            }
            AttributeValue::Ns(_) => Self::FloatSet,
            AttributeValue::Bs(_) => Self::BinarySet,
            AttributeValue::L(_) => Self::List,
            AttributeValue::M(_) => Self::Map,
        }
    }

    /// Returns `true` for the homogeneous set types.
    #[must_use]
    pub fn is_set(&self) -> bool {
        matches!(
            self,
            Self::BinarySet | Self::FloatSet | Self::IntegerSet | Self::StringSet
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = CodecError;

    /// Parse a data type name (`"integer"`) or a wire tag (`"N"`).
    ///
    /// Wire tags resolve to the type a free-form value with that tag would
    /// decode to.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(dt) = Self::ALL.into_iter().find(|dt| dt.name() == s) {
            return Ok(dt);
        }
        match TypeTag::from_name(s) {
            Some(TypeTag::S) => Ok(Self::String),
            Some(TypeTag::N) => Ok(Self::Float),
            Some(TypeTag::Bool) => Ok(Self::Boolean),
            Some(TypeTag::B) => Ok(Self::Bytes),
            Some(TypeTag::Ss) => Ok(Self::StringSet),
            Some(TypeTag::Ns) => Ok(Self::FloatSet),
            Some(TypeTag::Bs) => Ok(Self::BinarySet),
            Some(TypeTag::L) => Ok(Self::List),
            Some(TypeTag::M) => Ok(Self::Map),
            None => Err(CodecError::UnknownTypeTag { tag: s.to_owned() }),
        }
    }
}

// ---------------------------------------------------------------------------
// NativeValue
// ---------------------------------------------------------------------------

/// A decoded, caller-facing value.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    /// Absent value. Never written to a row.
    Null,
    /// Boolean.
    Bool(bool),
    /// Text.
    String(String),
    /// Whole number.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Raw bytes.
    Bytes(Bytes),
    /// Calendar date.
    Date(NaiveDate),
    /// UTC instant, used by datetime and timestamp columns.
    Datetime(DateTime<Utc>),
    /// Ordered list.
    List(Vec<NativeValue>),
    /// Named children.
    Map(BTreeMap<String, NativeValue>),
    /// Set of strings.
    StringSet(Vec<String>),
    /// Set of integers.
    IntegerSet(Vec<i64>),
    /// Set of floats.
    FloatSet(Vec<f64>),
    /// Set of byte strings.
    BinarySet(Vec<Bytes>),
}

impl NativeValue {
    /// Returns `true` for values that are omitted instead of written: null and
    /// the empty string.
    #[must_use]
    pub fn is_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns the string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a short name for the variant, used in error messages and
    /// kind assertions.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Bytes(_) => "bytes",
            Self::Date(_) => "date",
            Self::Datetime(_) => "datetime",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::StringSet(_) => "string_set",
            Self::IntegerSet(_) => "integer_set",
            Self::FloatSet(_) => "float_set",
            Self::BinarySet(_) => "binary_set",
        }
    }

    /// Data type used when this value appears inside a free-form map or list.
    #[must_use]
    pub fn inferred_data_type(&self) -> DataType {
        match self {
            Self::Null | Self::String(_) => DataType::String,
            Self::Bool(_) => DataType::Boolean,
            Self::Integer(_) => DataType::Integer,
            Self::Float(_) => DataType::Float,
            Self::Bytes(_) => DataType::Bytes,
            Self::Date(_) => DataType::Date,
            Self::Datetime(_) => DataType::Datetime,
            Self::List(_) => DataType::List,
            Self::Map(_) => DataType::Map,
            Self::StringSet(_) => DataType::StringSet,
            Self::IntegerSet(_) => DataType::IntegerSet,
            Self::FloatSet(_) => DataType::FloatSet,
            Self::BinarySet(_) => DataType::BinarySet,
        }
    }

    fn truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::String(s) => !s.is_empty(),
            Self::Integer(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Bytes(b) => !b.is_empty(),
            Self::Date(_) | Self::Datetime(_) => true,
            Self::List(items) => !items.is_empty(),
            Self::Map(entries) => !entries.is_empty(),
            Self::StringSet(v) => !v.is_empty(),
            Self::IntegerSet(v) => !v.is_empty(),
            Self::FloatSet(v) => !v.is_empty(),
            Self::BinarySet(v) => !v.is_empty(),
        }
    }
}

impl From<&str> for NativeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for NativeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for NativeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for NativeValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for NativeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for NativeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<NaiveDate> for NativeValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<DateTime<Utc>> for NativeValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Datetime(value)
    }
}

impl<T: Into<NativeValue>> From<Option<T>> for NativeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode `value` for storage under `column`.
///
/// Returns `Ok(None)` for null and empty-string values, which must be
/// omitted from a row rather than written.
pub fn encode(value: &NativeValue, column: &Column) -> Result<Option<AttributeValue>, CodecError> {
    if value.is_null() {
        return Ok(None);
    }
    if column.children.is_empty() {
        return encode_as(value, column.data_type);
    }

    let NativeValue::Map(entries) = value else {
        return Err(mismatch(DataType::Map, value));
    };
    let mut out = std::collections::HashMap::new();
    for child in &column.children {
        let Some(child_value) = entries.get(&child.name) else {
            continue;
        };
        if let Some(encoded) = encode(child_value, child)? {
            out.insert(child.name.clone(), encoded);
        }
    }
    Ok(Some(AttributeValue::M(out)))
}

/// Encode `value` as `data_type`, ignoring any declared children.
pub fn encode_as(
    value: &NativeValue,
    data_type: DataType,
) -> Result<Option<AttributeValue>, CodecError> {
    if value.is_null() {
        return Ok(None);
    }
    let encoded = match data_type {
        DataType::Boolean => AttributeValue::Bool(value.truthy()),
        DataType::Timestamp => match value {
            NativeValue::Datetime(dt) => AttributeValue::N(dt.timestamp().to_string()),
            other => AttributeValue::N(integer_text(other, data_type)?),
        },
        DataType::Datetime => match value {
            NativeValue::Datetime(dt) => {
                AttributeValue::S(dt.format(DATETIME_FORMAT).to_string())
            }
            NativeValue::String(s) => {
                AttributeValue::S(parse_datetime(s)?.format(DATETIME_FORMAT).to_string())
            }
            other => return Err(mismatch(data_type, other)),
        },
        DataType::Date => match value {
            NativeValue::Date(d) => AttributeValue::S(d.format(DATE_FORMAT).to_string()),
            NativeValue::Datetime(dt) => {
                AttributeValue::S(dt.date_naive().format(DATE_FORMAT).to_string())
            }
            other => return Err(mismatch(data_type, other)),
        },
        DataType::Float => AttributeValue::N(float_text(value, data_type)?),
        DataType::Integer => AttributeValue::N(integer_text(value, data_type)?),
        DataType::Bytes => match value {
            NativeValue::Bytes(b) => AttributeValue::B(b.clone()),
            NativeValue::String(s) => AttributeValue::B(Bytes::from(s.clone().into_bytes())),
            other => return Err(mismatch(data_type, other)),
        },
        DataType::String => AttributeValue::S(scalar_text(value, data_type)?),
        DataType::List => match value {
            NativeValue::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    if let Some(encoded) = encode_as(item, item.inferred_data_type())? {
                        out.push(encoded);
                    }
                }
                AttributeValue::L(out)
            }
            other => return Err(mismatch(data_type, other)),
        },
        DataType::Map => match value {
            NativeValue::Map(entries) => {
                let mut out = std::collections::HashMap::with_capacity(entries.len());
                for (name, entry) in entries {
                    if let Some(encoded) = encode_as(entry, entry.inferred_data_type())? {
                        out.insert(name.clone(), encoded);
                    }
                }
                AttributeValue::M(out)
            }
            other => return Err(mismatch(data_type, other)),
        },
        DataType::BinarySet | DataType::FloatSet | DataType::IntegerSet | DataType::StringSet => {
            encode_set(value, data_type)?
        }
    };
    Ok(Some(encoded))
}

fn encode_set(value: &NativeValue, data_type: DataType) -> Result<AttributeValue, CodecError> {
    let items: Vec<NativeValue> = match value {
        NativeValue::StringSet(v) => v.iter().cloned().map(NativeValue::String).collect(),
        NativeValue::IntegerSet(v) => v.iter().copied().map(NativeValue::Integer).collect(),
        NativeValue::FloatSet(v) => v.iter().copied().map(NativeValue::Float).collect(),
        NativeValue::BinarySet(v) => v.iter().cloned().map(NativeValue::Bytes).collect(),
        NativeValue::List(v) => v.clone(),
        other => return Err(mismatch(data_type, other)),
    };

    Ok(match data_type {
        DataType::StringSet => AttributeValue::Ss(
            items
                .iter()
                .map(|v| scalar_text(v, data_type))
                .collect::<Result<_, _>>()?,
        ),
        DataType::IntegerSet => AttributeValue::Ns(
            items
                .iter()
                .map(|v| integer_text(v, data_type))
                .collect::<Result<_, _>>()?,
        ),
        DataType::FloatSet => AttributeValue::Ns(
            items
                .iter()
                .map(|v| float_text(v, data_type))
                .collect::<Result<_, _>>()?,
        ),
        _ => AttributeValue::Bs(
            items
                .iter()
                .map(|v| match v {
                    NativeValue::Bytes(b) => Ok(b.clone()),
                    NativeValue::String(s) => Ok(Bytes::from(s.clone().into_bytes())),
                    other => Err(mismatch(data_type, other)),
                })
                .collect::<Result<_, _>>()?,
        ),
    })
}

/// Render a float so that it always carries a fractional part (`12.0`).
///
/// The value must be finite; see [`encode_as`] for the checked path.
#[must_use]
pub fn format_float(value: f64) -> String {
    format!("{value:?}")
}

fn finite(value: f64) -> Result<f64, CodecError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CodecError::InvalidNumber {
            value: value.to_string(),
        })
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn integer_text(value: &NativeValue, data_type: DataType) -> Result<String, CodecError> {
    match value {
        NativeValue::Integer(i) => Ok(i.to_string()),
        NativeValue::Float(f) => Ok((finite(*f)?.trunc() as i64).to_string()),
        NativeValue::Bool(b) => Ok(i64::from(*b).to_string()),
        NativeValue::String(s) => {
            let f = parse_float(s)?;
            Ok((f.trunc() as i64).to_string())
        }
        other => Err(mismatch(data_type, other)),
    }
}

#[allow(clippy::cast_precision_loss)]
fn float_text(value: &NativeValue, data_type: DataType) -> Result<String, CodecError> {
    match value {
        NativeValue::Float(f) => Ok(format_float(finite(*f)?)),
        NativeValue::Integer(i) => Ok(format_float(*i as f64)),
        NativeValue::String(s) => parse_float(s).map(format_float),
        other => Err(mismatch(data_type, other)),
    }
}

fn scalar_text(value: &NativeValue, data_type: DataType) -> Result<String, CodecError> {
    match value {
        NativeValue::String(s) => Ok(s.clone()),
        NativeValue::Integer(i) => Ok(i.to_string()),
        NativeValue::Float(f) => Ok(format_float(finite(*f)?)),
        NativeValue::Bool(b) => Ok(b.to_string()),
        NativeValue::Date(d) => Ok(d.format(DATE_FORMAT).to_string()),
        NativeValue::Datetime(dt) => Ok(dt.format(DATETIME_FORMAT).to_string()),
        other => Err(mismatch(data_type, other)),
    }
}

fn mismatch(expected: DataType, actual: &NativeValue) -> CodecError {
    CodecError::TypeMismatch {
        expected: expected.name().to_owned(),
        actual: actual.kind().to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a stored value declared by `column`.
///
/// Blank strings decode to [`NativeValue::Null`].
pub fn decode(value: &AttributeValue, column: &Column) -> Result<NativeValue, CodecError> {
    if value.is_blank() {
        return Ok(NativeValue::Null);
    }
    if column.children.is_empty() {
        return decode_as(value, column.data_type);
    }

    let AttributeValue::M(entries) = value else {
        return Err(tag_mismatch(TypeTag::M, value));
    };
    let mut out = BTreeMap::new();
    for child in &column.children {
        match entries.get(&child.name) {
            Some(raw) if !raw.is_blank() => {
                out.insert(child.name.clone(), decode(raw, child)?);
            }
            _ => {}
        }
    }
    Ok(NativeValue::Map(out))
}

/// Decode a stored value whose data type is inferred from its tag.
pub fn decode_inferred(value: &AttributeValue) -> Result<NativeValue, CodecError> {
    decode_as(value, DataType::infer(value))
}

/// Decode a stored value as `data_type`.
pub fn decode_as(value: &AttributeValue, data_type: DataType) -> Result<NativeValue, CodecError> {
    if value.is_blank() {
        return Ok(NativeValue::Null);
    }
    if value.tag() != data_type.tag() {
        return Err(tag_mismatch(data_type.tag(), value));
    }

    Ok(match (data_type, value) {
        (DataType::Boolean, AttributeValue::Bool(b)) => NativeValue::Bool(*b),
        (DataType::Timestamp, AttributeValue::N(n)) => NativeValue::Datetime(parse_timestamp(n)?),
        (DataType::Datetime, AttributeValue::S(s)) => NativeValue::Datetime(parse_datetime(s)?),
        (DataType::Date, AttributeValue::S(s)) => NativeValue::Date(parse_date(s)?),
        (DataType::String, AttributeValue::S(s)) => NativeValue::String(s.clone()),
        (DataType::Float, AttributeValue::N(n)) => NativeValue::Float(parse_float(n)?),
        (DataType::Integer, AttributeValue::N(n)) => NativeValue::Integer(parse_integer(n)?),
        (DataType::Bytes, AttributeValue::B(b)) => NativeValue::Bytes(b.clone()),
        (DataType::StringSet, AttributeValue::Ss(v)) => NativeValue::StringSet(v.clone()),
        (DataType::IntegerSet, AttributeValue::Ns(v)) => NativeValue::IntegerSet(
            v.iter()
                .map(|n| parse_integer(n))
                .collect::<Result<_, _>>()?,
        ),
        (DataType::FloatSet, AttributeValue::Ns(v)) => {
            NativeValue::FloatSet(v.iter().map(|n| parse_float(n)).collect::<Result<_, _>>()?)
        }
        (DataType::BinarySet, AttributeValue::Bs(v)) => NativeValue::BinarySet(v.clone()),
        (DataType::List, AttributeValue::L(items)) => NativeValue::List(
            items
                .iter()
                .map(decode_inferred)
                .collect::<Result<_, _>>()?,
        ),
        (DataType::Map, AttributeValue::M(entries)) => {
            let mut out = BTreeMap::new();
            for (name, entry) in entries {
                out.insert(name.clone(), decode_inferred(entry)?);
            }
            NativeValue::Map(out)
        }
        (_, other) => return Err(tag_mismatch(data_type.tag(), other)),
    })
}

fn parse_integer(text: &str) -> Result<i64, CodecError> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| CodecError::InvalidNumber {
            value: text.to_owned(),
        })
}

fn parse_float(text: &str) -> Result<f64, CodecError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .ok_or_else(|| CodecError::InvalidNumber {
            value: text.to_owned(),
        })
}

fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, CodecError> {
    let seconds = parse_integer(text)?;
    DateTime::from_timestamp(seconds, 0).ok_or_else(|| CodecError::InvalidDate {
        value: text.to_owned(),
    })
}

/// Parse an ISO-8601 datetime, with or without a `Z`/`+00:00` suffix.
pub fn parse_datetime(text: &str) -> Result<DateTime<Utc>, CodecError> {
    let trimmed = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = trimmed.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(naive, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|dt| dt.and_utc())
        .map_err(|_| CodecError::InvalidDate {
            value: text.to_owned(),
        })
}

fn parse_date(text: &str) -> Result<NaiveDate, CodecError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(|_| CodecError::InvalidDate {
        value: text.to_owned(),
    })
}

fn tag_mismatch(expected: TypeTag, actual: &AttributeValue) -> CodecError {
    CodecError::TypeMismatch {
        expected: expected.as_str().to_owned(),
        actual: actual.type_descriptor().to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Fixture builders
// ---------------------------------------------------------------------------

/// A string value, or `None` for the empty string.
#[must_use]
pub fn string(value: &str) -> Option<AttributeValue> {
    (!value.is_empty()).then(|| AttributeValue::S(value.to_owned()))
}

/// An integer number value; fractional parts are truncated.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn integer(value: f64) -> AttributeValue {
    AttributeValue::N((value.trunc() as i64).to_string())
}

/// A float number value.
#[must_use]
pub fn number(value: f64) -> AttributeValue {
    AttributeValue::N(format_float(value))
}

/// A boolean value.
#[must_use]
pub fn boolean(value: bool) -> AttributeValue {
    AttributeValue::Bool(value)
}

/// An epoch-seconds timestamp value.
#[must_use]
pub fn timestamp(value: DateTime<Utc>) -> AttributeValue {
    AttributeValue::N(value.timestamp().to_string())
}

/// An ISO datetime value with a trailing `Z`.
#[must_use]
pub fn date_time(value: DateTime<Utc>) -> AttributeValue {
    AttributeValue::S(value.format(DATETIME_FORMAT).to_string())
}
