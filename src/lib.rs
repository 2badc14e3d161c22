//! Adder methods, dict arguments, type specs and enum support on top of
//! `clap`.
//!
//! ```
//! use clap_gears::{ArgumentParser, Decl};
//!
//! let mut parser = ArgumentParser::new("greet");
//! parser.add_positional("name").unwrap();
//! parser.add_list(Decl::from("tag")).unwrap();
//! parser.add_dict(Decl::from("env").with_type("path")).unwrap();
//!
//! let args = parser
//!     .try_parse_from(["greet", "world", "--tag", "a", "b", "--env", "HOME=/root"])
//!     .unwrap();
//! assert_eq!(args.one::<String>("name").unwrap(), "world");
//! assert_eq!(args.get_list::<String>("tag").unwrap(), ["a", "b"]);
//! ```

pub mod completion;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod parser;
pub mod spec;
pub mod types;
pub mod value;

pub use config::{ParserSettings, SettingsError};
pub use error::{AccessError, ConfigError, ParseError, ValueError};
pub use parser::{Action, ArgumentParser, Decl, Nargs, ParsedArgs};
pub use spec::{
    enum_spec, ArgSpec, ArgType, Completer, Converter, DeclaresSpec, DefaultValue, PostProcess,
    SpecRegistry, TypeKey,
};
pub use value::{AnyValue, ArgValue, Dict};
