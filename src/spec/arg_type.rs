//! Requested argument types and the keys specs are registered under.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use clap::ValueEnum;

use crate::spec::{enum_spec, short_type_name, ArgSpec, Converter};

/// Identity of a spec in the registry: a concrete Rust type or a string alias.
#[derive(Debug, Clone)]
pub enum TypeKey {
    /// A concrete type.
    Type {
        /// Identity used for lookup.
        id: TypeId,
        /// Short type name, for messages.
        name: &'static str,
    },
    /// A short name such as `"date"` or `"range"`.
    Alias(String),
}

impl TypeKey {
    /// Key of the concrete type `T`.
    pub fn of<T: 'static>() -> Self {
        TypeKey::Type {
            id: TypeId::of::<T>(),
            name: short_type_name::<T>(),
        }
    }

    /// Key of a string alias.
    pub fn alias(name: impl Into<String>) -> Self {
        TypeKey::Alias(name.into())
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypeKey::Type { id: a, .. }, TypeKey::Type { id: b, .. }) => a == b,
            (TypeKey::Alias(a), TypeKey::Alias(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            TypeKey::Type { id, .. } => {
                0u8.hash(state);
                id.hash(state);
            }
            TypeKey::Alias(name) => {
                1u8.hash(state);
                name.hash(state);
            }
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKey::Type { name, .. } => f.write_str(name),
            TypeKey::Alias(name) => f.write_str(name),
        }
    }
}

impl From<&str> for TypeKey {
    fn from(name: &str) -> Self {
        TypeKey::alias(name)
    }
}

impl From<String> for TypeKey {
    fn from(name: String) -> Self {
        TypeKey::Alias(name)
    }
}

/// A type that carries its own spec, exposed through a static accessor.
///
/// ```
/// use clap_gears::{ArgSpec, Converter, DeclaresSpec};
///
/// #[derive(Debug, PartialEq)]
/// struct Celsius(f64);
///
/// impl DeclaresSpec for Celsius {
///     fn arg_spec() -> ArgSpec {
///         ArgSpec::new(Converter::parse(|s: &str| s.parse::<f64>().map(Celsius)))
///             .names(["temp", "t"])
///             .metavar("DEGREES")
///     }
/// }
/// ```
pub trait DeclaresSpec: 'static {
    /// The spec used when no registry entry exists for the type.
    fn arg_spec() -> ArgSpec;
}

/// The type requested for an argument.
///
/// Resolution tries, in order: the registry entry for the key, the spec the
/// type declares itself, a spec generated for enums, then the fallback
/// converter captured at construction.
#[derive(Debug, Clone)]
pub struct ArgType {
    key: TypeKey,
    declared: Option<fn() -> ArgSpec>,
    generated: Option<fn() -> ArgSpec>,
    fallback: Option<Converter>,
}

impl ArgType {
    /// A type parsed with `FromStr` unless a spec is registered for it.
    pub fn of<T>() -> Self
    where
        T: FromStr + fmt::Debug + PartialEq + Send + Sync + 'static,
        T::Err: fmt::Display,
    {
        Self {
            key: TypeKey::of::<T>(),
            declared: None,
            generated: None,
            fallback: Some(Converter::from_str_impl::<T>()),
        }
    }

    /// A type that must have a registered spec.
    pub fn custom<T: 'static>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            declared: None,
            generated: None,
            fallback: None,
        }
    }

    /// A type that declares its own spec.
    pub fn declared<T: DeclaresSpec>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            declared: Some(T::arg_spec),
            generated: None,
            fallback: None,
        }
    }

    /// An enum whose variants are the allowed tokens.
    pub fn value_enum<E>() -> Self
    where
        E: ValueEnum + fmt::Debug + PartialEq + Send + Sync + 'static,
    {
        Self {
            key: TypeKey::of::<E>(),
            declared: None,
            generated: Some(enum_spec::<E>),
            fallback: None,
        }
    }

    /// A string alias such as `"date"`.
    pub fn alias(name: impl Into<String>) -> Self {
        Self {
            key: TypeKey::alias(name),
            declared: None,
            generated: None,
            fallback: None,
        }
    }

    /// The registry key.
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    pub(crate) fn declared_spec(&self) -> Option<ArgSpec> {
        self.declared.map(|f| f())
    }

    pub(crate) fn generated_spec(&self) -> Option<ArgSpec> {
        self.generated.map(|f| f())
    }

    pub(crate) fn fallback(&self) -> Option<&Converter> {
        self.fallback.as_ref()
    }
}

impl From<&str> for ArgType {
    fn from(name: &str) -> Self {
        ArgType::alias(name)
    }
}

impl From<String> for ArgType {
    fn from(name: String) -> Self {
        ArgType::alias(name)
    }
}
