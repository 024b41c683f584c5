//! Compiled patterns: matching strings against templates and substituting
//! values back into them.

use crate::error::{Error, Result};
use crate::parse::{self, Segment};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::OnceLock;

/// A binding of a pattern word name to a matching expression or a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bind {
    pub name: String,
    pub expr: String,
}

impl Bind {
    pub fn new(name: impl Into<String>, expr: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expr: expr.into(),
        }
    }
}

/// An ordered collection of bindings. Order is significant: the same name
/// may be bound multiple times, and occurrences are consumed positionally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binds(Vec<Bind>);

impl Binds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bind: Bind) {
        self.0.push(bind);
    }

    /// Returns the first bound value of `key`, in order of occurrence.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|b| b.name == key)
            .map(|b| b.expr.as_str())
    }

    /// Returns all the bound values of `key`, in order of occurrence.
    pub fn all(&self, key: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|b| b.name == key)
            .map(|b| b.expr.as_str())
            .collect()
    }

    /// Reports whether `key` is bound at least once.
    pub fn has(&self, key: &str) -> bool {
        self.0.iter().any(|b| b.name == key)
    }
}

impl Deref for Binds {
    type Target = [Bind];

    fn deref(&self) -> &[Bind] {
        &self.0
    }
}

impl From<Vec<Bind>> for Binds {
    fn from(binds: Vec<Bind>) -> Self {
        Self(binds)
    }
}

impl FromIterator<Bind> for Binds {
    fn from_iter<I: IntoIterator<Item = Bind>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Binds {
    type Item = Bind;
    type IntoIter = std::vec::IntoIter<Bind>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Binds {
    type Item = &'a Bind;
    type IntoIter = std::slice::Iter<'a, Bind>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A compiled pattern: a template's segments plus a matching expression
/// bound to each pattern word.
///
/// A pattern may be matched against a string to extract the substrings at
/// the pattern word locations ([`matches`](Pattern::matches),
/// [`search`](Pattern::search)), or applied to a list of bindings to render
/// a new string ([`apply`](Pattern::apply),
/// [`apply_with`](Pattern::apply_with)).
///
/// The underlying regex is assembled lazily on first use and cached; any
/// call to [`bind`](Pattern::bind) invalidates the cache. A pattern that is
/// only matched or applied (never rebound) may be shared freely across
/// threads.
#[derive(Debug, Clone)]
pub struct Pattern {
    template: String,
    segments: Vec<Segment>,
    rules: HashMap<String, String>, // pattern word → regexp; empty = unset
    compiled: OnceLock<Compiled>,
}

#[derive(Debug, Clone)]
struct Compiled {
    re: Regex,
    // Capture group i+1 holds the i-th pattern word occurrence.
    names: Vec<String>,
}

impl Pattern {
    /// Parses `template` and binds the given matching expressions to its
    /// pattern words. Names not appearing in the template are an error.
    pub fn parse(template: &str, binds: &[Bind]) -> Result<Self> {
        let segments = parse::parse(template)?;
        let mut rules: HashMap<String, String> = HashMap::new();
        for seg in &segments {
            if let Segment::Placeholder(name) = seg {
                rules.entry(name.clone()).or_default();
            }
        }
        let mut pattern = Self {
            template: template.to_string(),
            segments,
            rules,
            compiled: OnceLock::new(),
        };
        for bind in binds {
            pattern.bind(&bind.name, &bind.expr)?;
        }
        Ok(pattern)
    }

    /// Returns the original template string.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Rebinds the matching expression for `name`, invalidating the
    /// compiled regex cache.
    pub fn bind(&mut self, name: &str, expr: &str) -> Result<()> {
        match self.rules.get_mut(name) {
            Some(rule) => {
                *rule = expr.to_string();
                self.compiled = OnceLock::new();
                Ok(())
            }
            None => Err(Error::UnknownWord(name.to_string())),
        }
    }

    /// Returns one binding per pattern word occurrence, in template order,
    /// populated with the currently bound expressions. The result does not
    /// alias the pattern; a caller may fill it in and pass it to
    /// [`apply`](Pattern::apply).
    pub fn binds(&self) -> Binds {
        self.segments
            .iter()
            .filter_map(|seg| match seg {
                Segment::Placeholder(name) => Some(Bind::new(
                    name.clone(),
                    self.rules.get(name).cloned().unwrap_or_default(),
                )),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Matches `needle` against the pattern. The match must cover the whole
    /// string; a match confined to a substring reports
    /// [`Error::NoMatch`]. On success the returned bindings carry the
    /// matched substrings in template occurrence order.
    pub fn matches(&self, needle: &str) -> Result<Binds> {
        let compiled = self.compiled()?;
        match compiled.re.captures(needle) {
            Some(caps) if caps.get(0).is_some_and(|m| m.start() == 0 && m.end() == needle.len()) => {
                Ok(compiled.bind_matches(&caps))
            }
            _ => Err(Error::NoMatch),
        }
    }

    /// Scans `needle` for all non-overlapping matches of the pattern, left
    /// to right, calling `visit(start, end, binds)` for each. A visitor
    /// returning [`Error::StopSearch`] ends the scan with success; any
    /// other error aborts the scan and is returned.
    pub fn search<F>(&self, needle: &str, mut visit: F) -> Result<()>
    where
        F: FnMut(usize, usize, Binds) -> Result<()>,
    {
        let compiled = self.compiled()?;
        for caps in compiled.re.captures_iter(needle) {
            let Some(m) = caps.get(0) else { continue };
            if let Err(err) = visit(m.start(), m.end(), compiled.bind_matches(&caps)) {
                return match err {
                    Error::StopSearch => Ok(()),
                    other => Err(other),
                };
            }
        }
        Ok(())
    }

    /// Renders the template with the given values substituted for its
    /// pattern words. Values are consumed per name in the order supplied;
    /// if a name occurs in the template more often than in `binds`, the
    /// last supplied value is repeated. A name with no value at all is an
    /// error; values for names the template does not use are ignored.
    pub fn apply(&self, binds: &[Bind]) -> Result<String> {
        let mut values: HashMap<&str, Vec<&str>> = HashMap::new();
        for bind in binds {
            values
                .entry(bind.name.as_str())
                .or_default()
                .push(bind.expr.as_str());
        }

        let mut cursors: HashMap<&str, usize> = HashMap::new();
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let Some(vals) = values.get(name.as_str()) else {
                        return Err(Error::MissingValue(name.clone()));
                    };
                    let cursor = cursors.entry(name.as_str()).or_insert(0);
                    out.push_str(vals[(*cursor).min(vals.len() - 1)]);
                    *cursor += 1;
                }
            }
        }
        Ok(out)
    }

    /// As [`apply`](Pattern::apply), but the value for the n-th occurrence
    /// (1-based, counted per name) of each pattern word is produced by
    /// `synth(name, n)`. A synthesis failure aborts with an error naming
    /// the pattern word.
    pub fn apply_with<F>(&self, mut synth: F) -> Result<String>
    where
        F: FnMut(&str, usize) -> Result<String>,
    {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let counter = index.entry(name.as_str()).or_insert(0);
                    *counter += 1;
                    let n = *counter;
                    let value = synth(name, n).map_err(|err| Error::BindValue {
                        name: name.clone(),
                        message: err.to_string(),
                    })?;
                    out.push_str(&value);
                }
            }
        }
        Ok(out)
    }

    /// Constructs a new pattern from `template`, reusing the matching
    /// expressions of this pattern. Every pattern word in `template` must
    /// already be known to this pattern; only the referenced expressions
    /// are carried over.
    pub fn derive(&self, template: &str) -> Result<Self> {
        let segments = parse::parse(template)?;
        let mut rules: HashMap<String, String> = HashMap::new();
        for seg in &segments {
            if let Segment::Placeholder(name) = seg {
                let rule = self
                    .rules
                    .get(name)
                    .ok_or_else(|| Error::UnknownWord(name.clone()))?;
                rules.insert(name.clone(), rule.clone());
            }
        }
        Ok(Self {
            template: template.to_string(),
            segments,
            rules,
            compiled: OnceLock::new(),
        })
    }

    fn compiled(&self) -> Result<&Compiled> {
        if let Some(compiled) = self.compiled.get() {
            return Ok(compiled);
        }
        let built = self.build_regex()?;
        Ok(self.compiled.get_or_init(|| built))
    }

    /// Assembles the full-template regex: literals escaped, each pattern
    /// word occurrence wrapped in its own capture group. Capture groups
    /// inside a bound expression are rewritten as non-capturing so group
    /// i+1 always corresponds to the i-th occurrence.
    fn build_regex(&self) -> Result<Compiled> {
        let mut expr = String::new();
        let mut names = Vec::new();
        for seg in &self.segments {
            match seg {
                Segment::Literal(text) => expr.push_str(&regex::escape(text)),
                Segment::Placeholder(name) => {
                    let rule = self
                        .rules
                        .get(name)
                        .filter(|rule| !rule.is_empty())
                        .ok_or_else(|| Error::UnboundWord(name.clone()))?;
                    // Compile the expression on its own first, so a bad
                    // expression is reported against its pattern word.
                    Regex::new(rule).map_err(|source| Error::InvalidExpr {
                        name: name.clone(),
                        source,
                    })?;
                    expr.push('(');
                    expr.push_str(&suppress_captures(rule));
                    expr.push(')');
                    names.push(name.clone());
                }
            }
        }
        let re = Regex::new(&expr)?;
        Ok(Compiled { re, names })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

impl Compiled {
    fn bind_matches(&self, caps: &regex::Captures<'_>) -> Binds {
        let mut binds = Binds::new();
        for (i, name) in self.names.iter().enumerate() {
            if let Some(m) = caps.get(i + 1) {
                binds.push(Bind::new(name.clone(), m.as_str()));
            }
        }
        binds
    }
}

/// Rewrites every capturing group in `expr` as non-capturing, dropping
/// group names, so that a user-supplied expression cannot perturb the
/// group numbering of the assembled pattern regex. Escapes and character
/// classes are honored; the expression is otherwise left untouched.
fn suppress_captures(expr: &str) -> String {
    let mut out = String::with_capacity(expr.len());
    let mut chars = expr.char_indices().peekable();
    // Character classes nest ([a[bc]] is a class containing a class), so a
    // depth count is needed to know when a ( is back in ordinary syntax.
    let mut class_depth = 0usize;
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                out.push('\\');
                if let Some((_, escaped)) = chars.next() {
                    out.push(escaped);
                }
            }
            '[' => {
                class_depth += 1;
                out.push(c);
            }
            ']' if class_depth > 0 => {
                class_depth -= 1;
                out.push(c);
            }
            '(' if class_depth == 0 => {
                let rest = &expr[i..];
                if rest.starts_with("(?P<") || rest.starts_with("(?<") {
                    // Named group: replace the name with a non-capturing
                    // group marker.
                    out.push_str("(?:");
                    for (_, skipped) in chars.by_ref() {
                        if skipped == '>' {
                            break;
                        }
                    }
                } else if matches!(chars.peek(), Some((_, '?'))) {
                    // Already non-capturing, or an inline flag group.
                    out.push(c);
                } else {
                    out.push_str("(?:");
                }
            }
            _ => out.push(c),
        }
    }
    out
}
