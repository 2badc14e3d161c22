//! Literal data in a compact, Python-like notation.
//!
//! Accepted forms: `None`, `True`, `False`, integers, floats, single or
//! double quoted strings, `[lists]`, `(tuples,)`, `{sets}` and
//! `{key: value}` dicts, nested freely. A bare top-level `1, 2` is a tuple.
//! Parsing never evaluates anything; unknown input is an error.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Number, Value};

use crate::error::ValueError;

/// Deepest container nesting accepted.
const MAX_DEPTH: usize = 128;

/// A parsed literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    /// Distinct elements, in order of first appearance.
    Set(Vec<Literal>),
    /// Pairs in insertion order; a repeated key keeps its first position.
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    /// Convert to JSON. Tuples and sets become arrays; non-string dict keys
    /// are rendered in literal notation.
    pub fn to_json(&self) -> Value {
        match self {
            Literal::None => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(i) => Value::Number(Number::from(*i)),
            Literal::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Literal::Str(s) => Value::String(s.clone()),
            Literal::List(items) | Literal::Tuple(items) | Literal::Set(items) => {
                Value::Array(items.iter().map(Literal::to_json).collect())
            }
            Literal::Dict(pairs) => {
                let mut map = Map::new();
                for (k, v) in pairs {
                    let key = match k {
                        Literal::Str(s) => s.clone(),
                        other => other.to_string(),
                    };
                    map.insert(key, v.to_json());
                }
                Value::Object(map)
            }
        }
    }
}

impl FromStr for Literal {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(s);
        let first = parser.value()?;
        parser.skip_ws();
        let value = if parser.eat(',') {
            let mut items = vec![first];
            items.extend(parser.items(None)?);
            Literal::Tuple(items)
        } else {
            first
        };
        parser.skip_ws();
        if let Some(c) = parser.peek() {
            return Err(parser.error(&format!("unexpected '{c}'")));
        }
        Ok(value)
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn error(&self, what: &str) -> ValueError {
        ValueError::new(format!(
            "malformed literal '{}': {what} at position {}",
            self.source, self.pos
        ))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ValueError> {
        self.skip_ws();
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{expected}'")))
        }
    }

    fn value(&mut self) -> Result<Literal, ValueError> {
        self.skip_ws();
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some('[') => self.nested(|p| p.items(Some(']')).map(Literal::List)),
            Some('(') => self.nested(Self::tuple),
            Some('{') => self.nested(Self::braces),
            Some(q @ ('\'' | '"')) => {
                self.bump();
                self.string(q).map(Literal::Str)
            }
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.keyword(),
            Some(c) => Err(self.error(&format!("unexpected '{c}'"))),
        }
    }

    /// Consume an opening bracket and parse its contents with `inner`.
    fn nested<F>(&mut self, inner: F) -> Result<Literal, ValueError>
    where
        F: FnOnce(&mut Self) -> Result<Literal, ValueError>,
    {
        if self.depth == MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.bump();
        self.depth += 1;
        let result = inner(self);
        self.depth -= 1;
        result
    }

    /// Comma-separated values up to `close`, trailing comma allowed.
    /// `None` reads to the end of input.
    fn items(&mut self, close: Option<char>) -> Result<Vec<Literal>, ValueError> {
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match close {
                Some(c) if self.eat(c) => return Ok(items),
                None if self.peek().is_none() => return Ok(items),
                _ => {}
            }
            items.push(self.value()?);
            self.skip_ws();
            if self.eat(',') {
                continue;
            }
            return match close {
                Some(c) => self.expect(c).map(|()| items),
                None => Ok(items),
            };
        }
    }

    fn tuple(&mut self) -> Result<Literal, ValueError> {
        self.skip_ws();
        if self.eat(')') {
            return Ok(Literal::Tuple(Vec::new()));
        }
        let first = self.value()?;
        self.skip_ws();
        if self.eat(')') {
            // parenthesized expression, not a tuple
            return Ok(first);
        }
        self.expect(',')?;
        let mut items = vec![first];
        items.extend(self.items(Some(')'))?);
        Ok(Literal::Tuple(items))
    }

    fn braces(&mut self) -> Result<Literal, ValueError> {
        self.skip_ws();
        if self.eat('}') {
            return Ok(Literal::Dict(Vec::new()));
        }
        let first = self.value()?;
        self.skip_ws();
        if self.eat(':') {
            let value = self.value()?;
            let mut pairs = vec![(first, value)];
            loop {
                self.skip_ws();
                if self.eat('}') {
                    return Ok(Literal::Dict(pairs));
                }
                self.expect(',')?;
                self.skip_ws();
                if self.eat('}') {
                    return Ok(Literal::Dict(pairs));
                }
                let key = self.value()?;
                self.expect(':')?;
                let value = self.value()?;
                match pairs.iter_mut().find(|(k, _)| *k == key) {
                    Some(entry) => entry.1 = value,
                    None => pairs.push((key, value)),
                }
            }
        }

        let mut items = vec![first];
        if !self.eat('}') {
            self.expect(',')?;
            items.extend(self.items(Some('}'))?);
        }
        let mut distinct: Vec<Literal> = Vec::with_capacity(items.len());
        for item in items {
            if !distinct.contains(&item) {
                distinct.push(item);
            }
        }
        Ok(Literal::Set(distinct))
    }

    fn string(&mut self, quote: char) -> Result<String, ValueError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    None => return Err(self.error("unterminated string")),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('0') => out.push('\0'),
                    Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Result<Literal, ValueError> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.bump();
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | '_' => {}
                '.' => is_float = true,
                'e' | 'E' => {
                    is_float = true;
                    if matches!(self.chars.get(self.pos + 1), Some('-' | '+')) {
                        self.bump();
                    }
                }
                _ => break,
            }
            self.bump();
        }
        let text: String = self.chars[start..self.pos]
            .iter()
            .filter(|c| **c != '_')
            .collect();
        let parsed = if is_float {
            text.parse::<f64>().ok().map(Literal::Float)
        } else {
            text.parse::<i64>().ok().map(Literal::Int)
        };
        parsed.ok_or_else(|| {
            self.pos = start;
            self.error(&format!("invalid number '{text}'"))
        })
    }

    fn keyword(&mut self) -> Result<Literal, ValueError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.bump();
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "None" => Ok(Literal::None),
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            _ => {
                self.pos = start;
                Err(self.error(&format!("unknown name '{word}'")))
            }
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Literal]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::None => f.write_str("None"),
            Literal::Bool(true) => f.write_str("True"),
            Literal::Bool(false) => f.write_str("False"),
            Literal::Int(i) => write!(f, "{i}"),
            Literal::Float(x) => write!(f, "{x:?}"),
            Literal::Str(s) => {
                f.write_str("'")?;
                for c in s.chars() {
                    match c {
                        '\'' => f.write_str("\\'")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        '\r' => f.write_str("\\r")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("'")
            }
            Literal::List(items) => {
                f.write_str("[")?;
                write_seq(f, items)?;
                f.write_str("]")
            }
            Literal::Tuple(items) => {
                f.write_str("(")?;
                write_seq(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Literal::Set(items) if items.is_empty() => f.write_str("set()"),
            Literal::Set(items) => {
                f.write_str("{")?;
                write_seq(f, items)?;
                f.write_str("}")
            }
            Literal::Dict(pairs) => {
                f.write_str("{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lit(s: &str) -> Literal {
        s.parse().unwrap()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(lit("None"), Literal::None);
        assert_eq!(lit("True"), Literal::Bool(true));
        assert_eq!(lit("-12"), Literal::Int(-12));
        assert_eq!(lit("1_000"), Literal::Int(1000));
        assert_eq!(lit("2.5e3"), Literal::Float(2500.0));
        assert_eq!(lit(r#""a\"b""#), Literal::Str("a\"b".into()));
        assert_eq!(lit("'x\\ny'"), Literal::Str("x\ny".into()));
    }

    #[test]
    fn test_containers() {
        assert_eq!(
            lit("[1, 'a', [None],]"),
            Literal::List(vec![
                Literal::Int(1),
                Literal::Str("a".into()),
                Literal::List(vec![Literal::None]),
            ])
        );
        assert_eq!(lit("(1,)"), Literal::Tuple(vec![Literal::Int(1)]));
        assert_eq!(lit("(1)"), Literal::Int(1));
        assert_eq!(lit("()"), Literal::Tuple(vec![]));
        assert_eq!(lit("1, 2"), Literal::Tuple(vec![Literal::Int(1), Literal::Int(2)]));
        assert_eq!(lit("{}"), Literal::Dict(vec![]));
        assert_eq!(lit("{1, 2, 1}"), Literal::Set(vec![Literal::Int(1), Literal::Int(2)]));
    }

    #[test]
    fn test_dict_repeated_key_overwrites_in_place() {
        assert_eq!(
            lit("{'a': 1, 'b': 2, 'a': 3}"),
            Literal::Dict(vec![
                (Literal::Str("a".into()), Literal::Int(3)),
                (Literal::Str("b".into()), Literal::Int(2)),
            ])
        );
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        for bad in ["", "[1, 2", "{'a' 1}", "'open", "os.system('x')", "1 2", "nan", "--1"] {
            assert!(bad.parse::<Literal>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_nesting_is_limited() {
        let err = "[".repeat(100_000).parse::<Literal>().unwrap_err();
        assert!(err.to_string().contains("nesting too deep"), "{err}");

        let deep = format!("{}{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert!(deep.parse::<Literal>().is_err());

        let ok = format!("{}1{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(ok.parse::<Literal>().is_ok());
    }

    #[test]
    fn test_display_uses_literal_notation() {
        assert_eq!(lit("{'k': (1,)}").to_string(), "{'k': (1,)}");
        assert_eq!(lit("[1.0, None, 'it\\'s']").to_string(), "[1.0, None, 'it\\'s']");
    }

    #[test]
    fn test_to_json() {
        let json = lit("{'a': [1, 2.5], 3: None}").to_json();
        assert_eq!(json, serde_json::json!({"a": [1, 2.5], "3": null}));
    }
}
