use std::{ffi::OsString, fmt, path::PathBuf, str::FromStr};

use crate::BoxError;

/// Shape of the argument an option takes, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentType {
    String,
    StringArray,
}

/// A value the command line parser attached to an option or argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Bool(bool),
    String(String),
    StringArray(Vec<String>),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Bool(it) => fmt::Display::fmt(it, f),
            RawValue::String(it) => f.write_str(it),
            RawValue::StringArray(it) => f.write_str(&it.join(",")),
        }
    }
}

impl From<bool> for RawValue {
    fn from(it: bool) -> RawValue {
        RawValue::Bool(it)
    }
}

impl From<String> for RawValue {
    fn from(it: String) -> RawValue {
        RawValue::String(it)
    }
}

impl From<&str> for RawValue {
    fn from(it: &str) -> RawValue {
        RawValue::String(it.to_string())
    }
}

impl From<Vec<String>> for RawValue {
    fn from(it: Vec<String>) -> RawValue {
        RawValue::StringArray(it)
    }
}

/// Conversion from a parsed [`RawValue`] into the type a setter accepts.
pub trait FromValue: Sized {
    fn from_value(value: RawValue) -> Result<Self, BoxError>;
}

macro_rules! format_err {
    ($($tt:tt)*) => {
        BoxError::from(format!($($tt)*))
    };
}

fn expected(what: &str, value: &RawValue) -> BoxError {
    match value {
        RawValue::Bool(_) => format_err!("expected {}, got a flag", what),
        RawValue::String(it) => format_err!("expected {}, got `{}`", what, it),
        RawValue::StringArray(it) => format_err!("expected {}, got {} values", what, it.len()),
    }
}

impl FromValue for RawValue {
    fn from_value(value: RawValue) -> Result<Self, BoxError> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn from_value(value: RawValue) -> Result<Self, BoxError> {
        match value {
            RawValue::Bool(it) => Ok(it),
            RawValue::String(it) => {
                it.parse().map_err(|err| format_err!("can't parse `{}`, {}", it, err))
            }
            value => Err(expected("a boolean", &value)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: RawValue) -> Result<Self, BoxError> {
        match value {
            RawValue::String(it) => Ok(it),
            value => Err(expected("a value", &value)),
        }
    }
}

impl FromValue for PathBuf {
    fn from_value(value: RawValue) -> Result<Self, BoxError> {
        String::from_value(value).map(PathBuf::from)
    }
}

impl FromValue for OsString {
    fn from_value(value: RawValue) -> Result<Self, BoxError> {
        String::from_value(value).map(OsString::from)
    }
}

impl FromValue for Vec<String> {
    fn from_value(value: RawValue) -> Result<Self, BoxError> {
        match value {
            RawValue::StringArray(it) => Ok(it),
            RawValue::String(it) => Ok(vec![it]),
            value => Err(expected("a list of values", &value)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: RawValue) -> Result<Self, BoxError> {
        T::from_value(value).map(Some)
    }
}

fn parse<T: FromStr>(value: RawValue) -> Result<T, BoxError>
where
    T::Err: fmt::Display,
{
    match value {
        RawValue::String(it) => {
            it.parse::<T>().map_err(|err| format_err!("can't parse `{}`, {}", it, err))
        }
        value => Err(expected("a value", &value)),
    }
}

macro_rules! from_str_impls {
    ($($ty:ident)*) => {$(
        impl FromValue for $ty {
            fn from_value(value: RawValue) -> Result<Self, BoxError> {
                parse(value)
            }
        }
    )*};
}

from_str_impls!(char u8 u16 u32 u64 u128 usize i8 i16 i32 i64 i128 isize f32 f64);
