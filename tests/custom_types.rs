//! Tests for custom types: explicit converters, self-declared specs,
//! registered specs and enums.

mod common;

use clap::ValueEnum;
use clap_gears::{ArgSpec, ArgType, ConfigError, Converter, Decl, DeclaresSpec};
use common::{parse, parse_err, parser};
use indexmap::IndexMap;
use pretty_assertions::assert_eq;

/// A type with nothing but a converter.
#[derive(Debug, Clone, PartialEq)]
struct Minimal(String);

fn minimal() -> Decl {
    Decl::new()
        .with_type(ArgType::custom::<Minimal>())
        .converter(Converter::parse(|s: &str| Ok::<_, String>(Minimal(s.to_string()))))
}

/// A type that declares its own spec.
#[derive(Debug, Clone, PartialEq)]
struct Declared(f64);

impl DeclaresSpec for Declared {
    fn arg_spec() -> ArgSpec {
        ArgSpec::new(Converter::parse(|s: &str| s.parse::<f64>().map(Declared)))
            .names(["declared", "t"])
            .default_raw("-1")
            .help("a Declared value")
    }
}

/// A type whose spec is registered on the parser.
#[derive(Debug, Clone, PartialEq)]
struct Registered(f64);

fn registered_parser() -> clap_gears::ArgumentParser {
    let mut p = parser();
    p.registry_mut().register_type::<Registered>(
        ArgSpec::new(Converter::parse(|s: &str| s.parse::<f64>().map(Registered)))
            .names(["registered", "T"])
            .default_raw("-1")
            .help("a Registered value"),
    );
    p
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Shade {
    Foo,
    Bar,
    Coo,
}

// ============================================================================
// Spec fields
// ============================================================================

/// Test a type known only through its converter.
#[test]
fn test_minimal_type() {
    let mut p = parser();
    p.add_optional(minimal().name("x")).unwrap();
    assert_eq!(parse(&p, "-x aa").one::<Minimal>("x").unwrap(), &Minimal("aa".into()));
    assert_eq!(parse(&p, "").get::<Minimal>("x").unwrap(), None);

    let mut p = parser();
    p.add_optional(minimal().name("x").default_raw("zz")).unwrap();
    assert_eq!(parse(&p, "").one::<Minimal>("x").unwrap(), &Minimal("zz".into()));

    let mut p = parser();
    assert!(matches!(
        p.add_optional(minimal()),
        Err(ConfigError::MissingName("optional"))
    ));
}

/// Test that an unknown type without a converter is refused.
#[test]
fn test_unknown_type() {
    let mut p = parser();
    assert!(matches!(
        p.add_optional(Decl::from("x").with_type(ArgType::custom::<Minimal>())),
        Err(ConfigError::UnknownType(_))
    ));
    assert!(matches!(
        p.add_optional(Decl::from("x").with_type("no_such_alias")),
        Err(ConfigError::UnknownType(_))
    ));
}

/// Test names and defaults taken from a self-declared spec.
#[test]
fn test_declared_spec() {
    let declared = || Decl::new().with_type(ArgType::declared::<Declared>());

    let mut p = parser();
    assert_eq!(p.add_optional(declared()).unwrap(), "declared");
    assert_eq!(parse(&p, "").one::<Declared>("declared").unwrap(), &Declared(-1.0));
    assert_eq!(parse(&p, "--declared 2").one::<Declared>("declared").unwrap(), &Declared(2.0));
    assert_eq!(parse(&p, "-t 2").one::<Declared>("declared").unwrap(), &Declared(2.0));

    let mut p = parser();
    p.add_optional(declared().name("x")).unwrap();
    assert_eq!(parse(&p, "").one::<Declared>("x").unwrap(), &Declared(-1.0));
    assert_eq!(parse(&p, "-x 2").one::<Declared>("x").unwrap(), &Declared(2.0));

    let mut p = parser();
    p.add_optional(declared().name("x").default_raw("-5")).unwrap();
    assert_eq!(parse(&p, "").one::<Declared>("x").unwrap(), &Declared(-5.0));
}

/// Test names and defaults taken from a registered spec.
#[test]
fn test_registered_spec() {
    let registered = || Decl::new().with_type(ArgType::custom::<Registered>());

    let mut p = registered_parser();
    assert_eq!(p.add_optional(registered()).unwrap(), "registered");
    assert_eq!(parse(&p, "").one::<Registered>("registered").unwrap(), &Registered(-1.0));
    assert_eq!(parse(&p, "-T 2").one::<Registered>("registered").unwrap(), &Registered(2.0));

    let mut p = registered_parser();
    p.add_optional(registered().name("x").default_raw("-5")).unwrap();
    assert_eq!(parse(&p, "").one::<Registered>("x").unwrap(), &Registered(-5.0));
    assert_eq!(parse(&p, "-x 2").one::<Registered>("x").unwrap(), &Registered(2.0));
}

/// Test that a required argument ignores the spec default.
#[test]
fn test_required_ignores_spec_default() {
    let mut p = parser();
    p.add_optional(
        Decl::from("x")
            .with_type(ArgType::declared::<Declared>())
            .required(true),
    )
    .unwrap();
    parse_err(&p, "");
    assert!(!p.render_help().contains("[default: -1]"));
}

/// Test that a registry entry wins over the spec a type declares.
#[test]
fn test_registry_beats_declared_spec() {
    let mut p = parser();
    p.register_spec(
        ArgType::declared::<Declared>().key().clone(),
        ArgSpec::new(Converter::parse(|s: &str| s.parse::<f64>().map(|v| Declared(v * 10.0))))
            .names(["scaled"]),
    );
    assert_eq!(
        p.add_optional(Decl::new().with_type(ArgType::declared::<Declared>()))
            .unwrap(),
        "scaled"
    );
    assert_eq!(parse(&p, "--scaled 2").one::<Declared>("scaled").unwrap(), &Declared(20.0));
}

/// Test that lists and dicts of custom types start empty regardless of spec.
#[test]
fn test_collections_of_custom_types() {
    let mut p = parser();
    p.add_list(Decl::from("x").with_type(ArgType::declared::<Declared>()))
        .unwrap();
    assert_eq!(parse(&p, "").get_list::<Declared>("x").unwrap(), vec![]);
    assert_eq!(
        parse(&p, "-x 7.5 8.5 -x 9.5").get_list::<Declared>("x").unwrap(),
        vec![Declared(7.5), Declared(8.5), Declared(9.5)]
    );

    let mut p = registered_parser();
    p.add_dict(
        Decl::from("x")
            .with_type(ArgType::custom::<Registered>())
            .key_typed::<i64>(),
    )
    .unwrap();
    assert!(parse(&p, "").get_dict::<i64, Registered>("x").unwrap().is_empty());
    assert_eq!(
        parse(&p, "-x 7=7.5 8=8.5 -x 9=9.5")
            .get_dict::<i64, Registered>("x")
            .unwrap(),
        IndexMap::from([
            (7, Registered(7.5)),
            (8, Registered(8.5)),
            (9, Registered(9.5)),
        ])
    );
}

// ============================================================================
// Enums
// ============================================================================

/// Test enum optionals with and without defaults.
#[test]
fn test_enum_optional() {
    let mut p = parser();
    p.add_optional(Decl::from("x").value_enum::<Shade>()).unwrap();
    assert_eq!(parse(&p, "").get::<Shade>("x").unwrap(), None);
    assert_eq!(parse(&p, "-x Foo").one::<Shade>("x").unwrap(), &Shade::Foo);
    let err = parse_err(&p, "-x no-such-value");
    assert!(err.to_string().contains("Foo, Bar, Coo"), "{err}");
    parse_err(&p, "-x foo");

    let mut p = parser();
    p.add_optional(
        Decl::from("x")
            .value_enum::<Shade>()
            .default_variant(Shade::Coo),
    )
    .unwrap();
    assert_eq!(parse(&p, "").one::<Shade>("x").unwrap(), &Shade::Coo);
    assert_eq!(parse(&p, "-x Bar").one::<Shade>("x").unwrap(), &Shade::Bar);
    let help = p.render_help();
    assert!(help.contains("[default: Coo]"), "{help}");
    assert!(help.contains("Foo/Bar/Coo"), "{help}");
}

/// Test that tokens are matched against member names as written.
#[test]
fn test_enum_member_names() {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    enum E {
        A,
        B,
    }

    let mut p = parser();
    p.add_optional(Decl::from("x").value_enum::<E>()).unwrap();
    assert_eq!(parse(&p, "-x A").one::<E>("x").unwrap(), &E::A);
    let err = parse_err(&p, "-x C");
    assert!(err.to_string().contains("A, B"), "{err}");
    parse_err(&p, "-x a");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Tone {
    LightGrey,
    DARK,
}

/// Test multi-word and upper-case members.
#[test]
fn test_enum_multi_word_members() {
    let mut p = parser();
    p.add_list(Decl::from("x").value_enum::<Tone>()).unwrap();
    assert_eq!(
        parse(&p, "-x LightGrey DARK").get_list::<Tone>("x").unwrap(),
        vec![Tone::LightGrey, Tone::DARK]
    );
    parse_err(&p, "-x light-grey");
    parse_err(&p, "-x dark");
    assert!(p.render_help().contains("LightGrey/DARK"));
}

/// Test that typed and variant enum defaults show the same name in help.
#[test]
fn test_enum_default_help_names_agree() {
    let help_for = |decl: Decl| {
        let mut p = parser();
        p.add_optional(decl).unwrap();
        p.render_help()
    };
    let typed = help_for(
        Decl::from("x")
            .value_enum::<Tone>()
            .default_typed(Tone::LightGrey),
    );
    let variant = help_for(
        Decl::from("x")
            .value_enum::<Tone>()
            .default_variant(Tone::LightGrey),
    );
    assert!(typed.contains("[default: LightGrey]"), "{typed}");
    assert_eq!(typed, variant);
}

/// Test that explicit choices narrow an enum.
#[test]
fn test_enum_explicit_choices() {
    let mut p = parser();
    p.add_optional(Decl::from("x").value_enum::<Shade>().choices(["Foo", "Bar"]))
        .unwrap();
    assert_eq!(parse(&p, "").get::<Shade>("x").unwrap(), None);
    assert_eq!(parse(&p, "-x Bar").one::<Shade>("x").unwrap(), &Shade::Bar);
    parse_err(&p, "-x Coo");
}

/// Test that enum names default from the type.
#[test]
fn test_enum_default_names() {
    let mut p = parser();
    assert_eq!(p.add_optional(Decl::new().value_enum::<Shade>()).unwrap(), "shade");
    assert!(p.render_help().contains("<SHADE>"));
}

/// Test enum lists.
#[test]
fn test_enum_list() {
    let mut p = parser();
    p.add_list(Decl::from("x").value_enum::<Shade>()).unwrap();
    let two = vec![Shade::Foo, Shade::Bar];
    assert_eq!(parse(&p, "").get_list::<Shade>("x").unwrap(), vec![]);
    assert_eq!(parse(&p, "-x Foo Bar").get_list::<Shade>("x").unwrap(), two);
    assert_eq!(parse(&p, "-x Foo -x Bar").get_list::<Shade>("x").unwrap(), two);
    parse_err(&p, "-x no-such-value");

    let mut p = parser();
    p.add_list(Decl::from("x").value_enum::<Shade>().choices(["Foo", "Bar"]))
        .unwrap();
    parse_err(&p, "-x Coo");
}

/// Test enum dicts.
#[test]
fn test_enum_dict() {
    let mut p = parser();
    p.add_dict(Decl::from("x").value_enum::<Shade>()).unwrap();
    let expected = IndexMap::from([
        ("k1".to_string(), Shade::Foo),
        ("k2".to_string(), Shade::Bar),
    ]);
    assert!(parse(&p, "").get_dict::<String, Shade>("x").unwrap().is_empty());
    assert_eq!(
        parse(&p, "-x k1=Foo k2=Bar").get_dict::<String, Shade>("x").unwrap(),
        expected
    );
    assert_eq!(
        parse(&p, "-x k1=Foo -x k2=Bar").get_dict::<String, Shade>("x").unwrap(),
        expected
    );
    parse_err(&p, "-x k1=no-such-value");
}
