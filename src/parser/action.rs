//! What an argument does with its values, and how many it takes.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// What happens when an argument occurs on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep the (last) supplied value.
    Store,
    /// Store the const value.
    StoreConst,
    /// Store `true`; absence yields `false`.
    StoreTrue,
    /// Store `false`; absence yields `true`.
    StoreFalse,
    /// Collect one entry per occurrence.
    Append,
    /// Collect the const value once per occurrence.
    AppendConst,
    /// Collect every supplied value into one flat list.
    Extend,
    /// Collect `KEY=VALUE` items into a dict.
    SetItem,
    /// Count occurrences.
    Count,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::Store,
        Action::StoreConst,
        Action::StoreTrue,
        Action::StoreFalse,
        Action::Append,
        Action::AppendConst,
        Action::Extend,
        Action::SetItem,
        Action::Count,
    ];

    /// The action's name, e.g. `store_true`.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Store => "store",
            Action::StoreConst => "store_const",
            Action::StoreTrue => "store_true",
            Action::StoreFalse => "store_false",
            Action::Append => "append",
            Action::AppendConst => "append_const",
            Action::Extend => "extend",
            Action::SetItem => "setitem",
            Action::Count => "count",
        }
    }

    /// Whether the action reads values from the command line.
    pub fn takes_values(&self) -> bool {
        matches!(
            self,
            Action::Store | Action::Append | Action::Extend | Action::SetItem
        )
    }

    /// Whether occurrences add up into a collection.
    pub fn accumulates(&self) -> bool {
        matches!(
            self,
            Action::Append | Action::AppendConst | Action::Extend | Action::SetItem
        )
    }

    /// Whether `required` means "at least one item" rather than "present".
    pub(crate) fn requires_nonempty(&self) -> bool {
        matches!(self, Action::Extend | Action::SetItem)
    }

    /// Plural used in declaration errors, e.g. "extend actions".
    pub(crate) fn what(&self) -> &'static str {
        match self {
            Action::Store => "store actions",
            Action::StoreConst => "store_const actions",
            Action::StoreTrue => "store_true actions",
            Action::StoreFalse => "store_false actions",
            Action::Append => "append actions",
            Action::AppendConst => "append_const actions",
            Action::Extend => "extend actions",
            Action::SetItem => "setitem actions",
            Action::Count => "count actions",
        }
    }

    pub(crate) fn uses_const(&self) -> bool {
        matches!(self, Action::StoreConst | Action::AppendConst)
    }
}

impl FromStr for Action {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or_else(|| ValueError::invalid_choice(s, Action::ALL.map(|a| a.name())))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How many values one occurrence consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nargs {
    /// Exactly N values, collected into a list.
    Exactly(usize),
    /// `?`: zero or one value.
    Optional,
    /// `*`: any number of values.
    ZeroOrMore,
    /// `+`: at least one value.
    OneOrMore,
    /// `...`: everything that follows, dashes included.
    Remainder,
}

impl Nargs {
    /// Whether one occurrence can hold more than one value.
    pub fn is_variadic(&self) -> bool {
        match self {
            Nargs::Exactly(n) => *n > 1,
            Nargs::Optional => false,
            Nargs::ZeroOrMore | Nargs::OneOrMore | Nargs::Remainder => true,
        }
    }

    /// Whether an occurrence may carry no value at all.
    pub fn allows_none(&self) -> bool {
        matches!(self, Nargs::Optional | Nargs::ZeroOrMore | Nargs::Remainder)
    }
}

impl FromStr for Nargs {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "?" => Ok(Nargs::Optional),
            "*" => Ok(Nargs::ZeroOrMore),
            "+" => Ok(Nargs::OneOrMore),
            "..." | "remainder" => Ok(Nargs::Remainder),
            n => n
                .parse()
                .map(Nargs::Exactly)
                .map_err(|_| ValueError::new(format!("invalid nargs '{s}'"))),
        }
    }
}

impl fmt::Display for Nargs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nargs::Exactly(n) => write!(f, "{n}"),
            Nargs::Optional => f.write_str("?"),
            Nargs::ZeroOrMore => f.write_str("*"),
            Nargs::OneOrMore => f.write_str("+"),
            Nargs::Remainder => f.write_str("..."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names_parse_back() {
        for action in Action::ALL {
            assert_eq!(action.name().parse::<Action>().unwrap(), action);
        }
        let err = "stor".parse::<Action>().unwrap_err();
        assert!(err.choices().contains(&"store".to_string()));
    }

    #[test]
    fn test_nargs_forms() {
        assert_eq!("?".parse::<Nargs>().unwrap(), Nargs::Optional);
        assert_eq!("3".parse::<Nargs>().unwrap(), Nargs::Exactly(3));
        assert_eq!("...".parse::<Nargs>().unwrap(), Nargs::Remainder);
        assert!("x".parse::<Nargs>().is_err());
        assert!(Nargs::Exactly(2).is_variadic());
        assert!(!Nargs::Exactly(1).is_variadic());
    }
}
