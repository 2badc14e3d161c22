//! Reading supplied values back out of clap's matches.

use clap::parser::{MatchesError, ValueSource};
use clap::ArgMatches;

use crate::parser::arg_def::{ArgDef, ArgKind};
use crate::parser::value_parser::DictItem;
use crate::parser::{Action, Nargs};
use crate::value::{AnyValue, ArgValue, Dict};

fn on_command_line(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

/// Value given by an occurrence without a value (`--opt` with `nargs = ?`).
fn bare(def: &ArgDef) -> ArgValue {
    def.const_value
        .clone()
        .map_or(ArgValue::Missing, ArgValue::One)
}

/// One occurrence's values, shaped by nargs.
fn occurrence(def: &ArgDef, values: Vec<AnyValue>) -> ArgValue {
    match def.nargs {
        None | Some(Nargs::Optional) => values
            .into_iter()
            .next_back()
            .map_or_else(|| bare(def), ArgValue::One),
        Some(_) => ArgValue::List(values.into_iter().map(ArgValue::One).collect()),
    }
}

/// What the command line supplied for `def`, or `None` when it supplied
/// nothing. Defaults are not applied here.
pub(crate) fn collect(def: &ArgDef, matches: &ArgMatches) -> Result<Option<ArgValue>, MatchesError> {
    let id = def.dest.as_str();
    match def.action {
        Action::StoreTrue | Action::StoreFalse | Action::StoreConst => {
            let (on, off) = match def.action {
                Action::StoreTrue => (ArgValue::one(true), ArgValue::one(false)),
                Action::StoreFalse => (ArgValue::one(false), ArgValue::one(true)),
                _ => (bare(def), ArgValue::Missing),
            };
            if on_command_line(matches, id) {
                return Ok(Some(on));
            }
            let negated = def.negated.is_some() && on_command_line(matches, &def.negated_id());
            Ok(negated.then_some(off))
        }

        Action::Count | Action::AppendConst => {
            let count = usize::from(matches.try_get_one::<u8>(id)?.copied().unwrap_or(0));
            if count == 0 {
                return Ok(None);
            }
            Ok(Some(match def.action {
                Action::Count => ArgValue::one(count),
                _ => ArgValue::List(vec![bare(def); count]),
            }))
        }

        Action::Store | Action::Append | Action::Extend | Action::SetItem => {
            if !on_command_line(matches, id) {
                return Ok(None);
            }
            // An option given without values still counts as supplied.
            let mut groups: Vec<Vec<AnyValue>> = matches
                .try_get_occurrences::<AnyValue>(id)?
                .map(|occurrences| occurrences.map(|values| values.cloned().collect()).collect())
                .unwrap_or_default();

            let value = match def.action {
                // A positional is a single occurrence, however clap groups it.
                Action::Store if def.kind == ArgKind::Positional => {
                    occurrence(def, groups.into_iter().flatten().collect())
                }
                Action::Store => occurrence(def, groups.pop().unwrap_or_default()),
                Action::Append => ArgValue::List(
                    groups
                        .into_iter()
                        .map(|values| occurrence(def, values))
                        .collect(),
                ),
                Action::Extend => ArgValue::List(
                    groups
                        .into_iter()
                        .flatten()
                        .map(ArgValue::One)
                        .collect(),
                ),
                _ => ArgValue::Dict(
                    groups
                        .into_iter()
                        .flatten()
                        .filter_map(|item| {
                            item.downcast_ref::<DictItem>()
                                .map(|item| (item.key.clone(), item.value.clone()))
                        })
                        .collect::<Dict>(),
                ),
            };
            Ok(Some(value))
        }
    }
}
