//! String-to-value converters and post-parse hooks.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::ValueError;
use crate::value::{AnyValue, ArgValue};

type ConvertFn = dyn Fn(&str) -> Result<AnyValue, ValueError> + Send + Sync;
type PostProcessFn = dyn Fn(ArgValue) -> Result<ArgValue, ValueError> + Send + Sync;

/// Converts one command-line token into a typed value.
#[derive(Clone)]
pub struct Converter {
    func: Arc<ConvertFn>,
}

impl Converter {
    /// Wrap a function that already produces an [`AnyValue`].
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&str) -> Result<AnyValue, ValueError> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }

    /// Wrap a fallible parse function producing a comparable value.
    pub fn parse<T, E, F>(func: F) -> Self
    where
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
        T: fmt::Debug + PartialEq + Send + Sync + 'static,
        E: fmt::Display,
    {
        Self::new(move |token| {
            func(token)
                .map(AnyValue::new)
                .map_err(|e| ValueError::new(e.to_string()))
        })
    }

    /// Like [`Converter::parse`] for values without equality.
    pub fn parse_opaque<T, E, F>(func: F) -> Self
    where
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
        T: fmt::Debug + Send + Sync + 'static,
        E: fmt::Display,
    {
        Self::new(move |token| {
            func(token)
                .map(AnyValue::opaque)
                .map_err(|e| ValueError::new(e.to_string()))
        })
    }

    /// Converter built from the type's `FromStr` implementation.
    pub fn from_str_impl<T>() -> Self
    where
        T: FromStr + fmt::Debug + PartialEq + Send + Sync + 'static,
        T::Err: fmt::Display,
    {
        Self::new(|token| match token.parse::<T>() {
            Ok(value) => Ok(AnyValue::new(value).with_label(token)),
            Err(e) => Err(ValueError::new(format!(
                "cannot convert to {}: {e}",
                short_type_name::<T>()
            ))),
        })
    }

    /// The converter used when no type is given: the token as a `String`.
    pub fn string() -> Self {
        Self::new(|token| Ok(AnyValue::new(token.to_string()).with_label(token)))
    }

    /// Convert one token.
    pub fn convert(&self, token: &str) -> Result<AnyValue, ValueError> {
        (self.func)(token)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Converter")
    }
}

/// Hook applied to an argument's value after parsing, before results are
/// returned. Failures are reported like conversion failures.
#[derive(Clone)]
pub struct PostProcess {
    func: Arc<PostProcessFn>,
}

impl PostProcess {
    /// Wrap a post-processing function.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(ArgValue) -> Result<ArgValue, ValueError> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }

    /// Run the hook.
    pub fn apply(&self, value: ArgValue) -> Result<ArgValue, ValueError> {
        (self.func)(value)
    }
}

impl fmt::Debug for PostProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PostProcess")
    }
}

/// Last path segment of a type name, without generics.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
