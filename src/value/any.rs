//! Type-erased argument values.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

type Erased = dyn Any + Send + Sync;
type EqFn = fn(&Erased, &Erased) -> bool;
type DebugFn = fn(&Erased, &mut fmt::Formatter<'_>) -> fmt::Result;
type CopyFn = fn(&Erased) -> Option<Arc<Erased>>;

/// A converted command-line value of any type.
///
/// Cheap to clone (reference counted). Values built with [`AnyValue::new`]
/// support equality, which is what lets them act as dict keys; values built
/// with [`AnyValue::opaque`] never compare equal to anything.
#[derive(Clone)]
pub struct AnyValue {
    inner: Arc<Erased>,
    type_name: &'static str,
    eq: Option<EqFn>,
    debug: DebugFn,
    copy: Option<CopyFn>,
    label: Option<Arc<str>>,
}

fn eq_erased<T: PartialEq + 'static>(a: &Erased, b: &Erased) -> bool {
    match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn copy_erased<T: Clone + Send + Sync + 'static>(v: &Erased) -> Option<Arc<Erased>> {
    v.downcast_ref::<T>()
        .map(|v| Arc::new(v.clone()) as Arc<Erased>)
}

fn debug_erased<T: fmt::Debug + 'static>(v: &Erased, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match v.downcast_ref::<T>() {
        Some(v) => fmt::Debug::fmt(v, f),
        None => f.write_str("<?>"),
    }
}

impl AnyValue {
    /// Wrap a comparable value.
    pub fn new<T>(value: T) -> Self
    where
        T: fmt::Debug + PartialEq + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(value),
            type_name: std::any::type_name::<T>(),
            eq: Some(eq_erased::<T>),
            debug: debug_erased::<T>,
            copy: None,
            label: None,
        }
    }

    /// Wrap a comparable value that [`AnyValue::detach`] can copy.
    pub fn cloneable<T>(value: T) -> Self
    where
        T: Clone + fmt::Debug + PartialEq + Send + Sync + 'static,
    {
        Self {
            copy: Some(copy_erased::<T>),
            ..Self::new(value)
        }
    }

    /// Wrap a value that has no notion of equality (file handles, regexes).
    pub fn opaque<T>(value: T) -> Self
    where
        T: fmt::Debug + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(value),
            type_name: std::any::type_name::<T>(),
            eq: None,
            debug: debug_erased::<T>,
            copy: None,
            label: None,
        }
    }

    /// Attach the text shown for this value in help output.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(Arc::from(label.into()));
        self
    }

    /// Label for help output, if one was attached.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Text used when showing this value as a default in help.
    pub fn display(&self) -> String {
        match &self.label {
            Some(label) => label.to_string(),
            None => format!("{self:?}"),
        }
    }

    /// Rust type name of the wrapped value.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the wrapped value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Borrow the wrapped value as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// A handle to its own copy of the value when it was built with
    /// [`AnyValue::cloneable`]; otherwise another handle to the same value.
    pub fn detach(&self) -> Self {
        match self.copy.and_then(|copy| copy(&*self.inner)) {
            Some(inner) => Self {
                inner,
                ..self.clone()
            },
            None => self.clone(),
        }
    }

    /// Move the value out if this is the only handle to it.
    ///
    /// Returns the handle unchanged when the type does not match or other
    /// clones are still alive.
    pub fn try_unwrap<T: Any + Send + Sync>(self) -> Result<T, Self> {
        let Self {
            inner,
            type_name,
            eq,
            debug,
            copy,
            label,
        } = self;
        let rebuild = |inner| Self {
            inner,
            type_name,
            eq,
            debug,
            copy,
            label: label.clone(),
        };
        match inner.downcast::<T>() {
            Ok(typed) => Arc::try_unwrap(typed).map_err(|typed| rebuild(typed as Arc<Erased>)),
            Err(inner) => Err(rebuild(inner)),
        }
    }
}

impl PartialEq for AnyValue {
    fn eq(&self, other: &Self) -> bool {
        match self.eq {
            Some(eq) => eq(&*self.inner, &*other.inner),
            None => false,
        }
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.debug)(&*self.inner, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_by_type_and_value() {
        assert_eq!(AnyValue::new(5_i64), AnyValue::new(5_i64));
        assert_ne!(AnyValue::new(5_i64), AnyValue::new(6_i64));
        // same digits, different type
        assert_ne!(AnyValue::new(5_i64), AnyValue::new(5_i32));
    }

    #[test]
    fn test_opaque_never_equal() {
        let v = AnyValue::opaque(String::from("x"));
        assert_ne!(v.clone(), v);
    }

    #[test]
    fn test_display_prefers_label() {
        let v = AnyValue::new(String::from("abc"));
        assert_eq!(v.display(), "\"abc\"");
        assert_eq!(v.with_label("abc").display(), "abc");
    }

    #[test]
    fn test_try_unwrap_unique_and_shared() {
        let v = AnyValue::new(String::from("x"));
        assert_eq!(v.try_unwrap::<String>().unwrap(), "x");

        let v = AnyValue::new(String::from("y"));
        let keep = v.clone();
        let back = v.try_unwrap::<String>().unwrap_err();
        assert_eq!(back, keep);

        let v = AnyValue::new(1_u8);
        assert!(v.try_unwrap::<String>().is_err());
    }

    #[test]
    fn test_detach_copies_cloneable_values() {
        let shared = AnyValue::cloneable(String::from("x")).with_label("x");
        let copy = shared.detach();
        assert_eq!(copy, shared);
        assert_eq!(copy.label(), Some("x"));
        assert_eq!(copy.try_unwrap::<String>().unwrap(), "x");

        let plain = AnyValue::new(String::from("y"));
        let alias = plain.detach();
        assert!(alias.try_unwrap::<String>().is_err());
    }
}
