//! Angle-bracket substitutions for library arguments.
//!
//! # Syntax
//!
//! - `<name>` - replaced by a no-argument handler
//! - `<name:arg>` - replaced by a handler receiving `arg`
//!
//! Tokens without a registered handler, or whose handler yields nothing, are
//! left in the output unchanged.
//!
//! # Example
//!
//! ```
//! use toolrig::libs::Substitutions;
//!
//! let mut subst = Substitutions::new();
//! subst.register_with_arg("path", |name| Some(format!("/data/{}", name.to_lowercase())));
//! assert_eq!(subst.substitute("<path:SUITES>/libs"), "/data/suites/libs");
//! ```

use std::collections::HashMap;

/// A segment of a string containing substitution tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Token: `<name>` or `<name:arg>`
    Token { name: String, arg: Option<String> },
}

impl Segment {
    fn render(&self) -> String {
        match self {
            Segment::Literal(text) => text.clone(),
            Segment::Token { name, arg: None } => format!("<{}>", name),
            Segment::Token {
                name,
                arg: Some(arg),
            } => format!("<{}:{}>", name, arg),
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse a string into literals and substitution tokens.
///
/// A `<` that does not open a well-formed token is kept as literal text.
pub fn parse_substitutions(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = input;

    while let Some(start) = rest.find('<') {
        literal.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let Some(end) = after.find('>') else {
            literal.push_str(&rest[start..]);
            rest = "";
            break;
        };

        let body = &after[..end];
        let (name, arg) = match body.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (body, None),
        };

        if name.is_empty() || !name.chars().all(is_name_char) || body.contains('<') {
            literal.push('<');
            rest = after;
            continue;
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Token {
            name: name.to_string(),
            arg: arg.map(str::to_string),
        });
        rest = &after[end + 1..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

type NoArgHandler<'a> = Box<dyn Fn() -> Option<String> + 'a>;
type ArgHandler<'a> = Box<dyn Fn(&str) -> Option<String> + 'a>;

/// Registry of substitution handlers.
#[derive(Default)]
pub struct Substitutions<'a> {
    no_arg: HashMap<String, NoArgHandler<'a>>,
    with_arg: HashMap<String, ArgHandler<'a>>,
}

impl<'a> Substitutions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `<name>`.
    pub fn register_no_arg<F>(&mut self, name: &str, handler: F)
    where
        F: Fn() -> Option<String> + 'a,
    {
        self.no_arg.insert(name.to_string(), Box::new(handler));
    }

    /// Register a handler for `<name:arg>`.
    pub fn register_with_arg<F>(&mut self, name: &str, handler: F)
    where
        F: Fn(&str) -> Option<String> + 'a,
    {
        self.with_arg.insert(name.to_string(), Box::new(handler));
    }

    /// Whether any handler is registered under `name`.
    pub fn handles(&self, name: &str) -> bool {
        self.no_arg.contains_key(name) || self.with_arg.contains_key(name)
    }

    fn expand(&self, name: &str, arg: Option<&str>) -> Option<String> {
        match arg {
            None => self.no_arg.get(name).and_then(|h| h()),
            Some(arg) => self.with_arg.get(name).and_then(|h| h(arg)),
        }
    }

    /// Replace every token in `input` that a handler resolves.
    pub fn substitute(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        for segment in parse_substitutions(input) {
            match &segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Token { name, arg } => match self.expand(name, arg.as_deref()) {
                    Some(value) => out.push_str(&value),
                    None => {
                        if self.handles(name) {
                            tracing::warn!("could not resolve {}", segment.render());
                        }
                        out.push_str(&segment.render());
                    }
                },
            }
        }
        out
    }
}

impl std::fmt::Debug for Substitutions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut no_arg: Vec<_> = self.no_arg.keys().collect();
        let mut with_arg: Vec<_> = self.with_arg.keys().collect();
        no_arg.sort();
        with_arg.sort();
        f.debug_struct("Substitutions")
            .field("no_arg", &no_arg)
            .field("with_arg", &with_arg)
            .finish()
    }
}
