//! Transformations between pairs of templates.
//!
//! A [`Transform`] pairs a left and a right pattern sharing one namespace
//! of pattern words: matching a string against the left side and applying
//! the captured bindings to the right side rewrites the string from one
//! shape into the other. A [`Reversible`] transform additionally
//! guarantees, structurally, that forward then backward application (or
//! vice versa) reproduces the original string.

use crate::error::{Error, Result};
use crate::pattern::{Bind, Binds, Pattern};

/// A transformation between two templates. Applying it matches the left
/// pattern against the needle and, on success, applies the resulting
/// bindings to the right pattern.
#[derive(Debug, Clone)]
pub struct Transform {
    lhs: Pattern,
    rhs: Pattern,
}

impl Transform {
    /// Constructs a transformation from the template strings `lhs` and
    /// `rhs` and the matching expressions shared by both. The right
    /// template may only use pattern words the left template declares.
    pub fn new(lhs: &str, rhs: &str, binds: &[Bind]) -> Result<Self> {
        let lp = Pattern::parse(lhs, binds).map_err(|err| annotate(err, lhs))?;
        let rp = lp.derive(rhs).map_err(|err| annotate(err, rhs))?;
        Ok(Self { lhs: lp, rhs: rp })
    }

    /// Returns the reverse transformation, with the left and right
    /// patterns in opposite order. No recompilation takes place; compiled
    /// matchers carry over.
    pub fn reverse(&self) -> Self {
        Self {
            lhs: self.rhs.clone(),
            rhs: self.lhs.clone(),
        }
    }

    /// Matches `needle` against the left pattern and applies the result to
    /// the right pattern.
    pub fn apply(&self, needle: &str) -> Result<String> {
        let binds = self.lhs.matches(needle)?;
        self.rhs.apply(&binds)
    }

    /// Scans `needle` for all non-overlapping matches of the left pattern,
    /// rewriting each through the right pattern and calling
    /// `visit(start, end, rewritten)` with the span of the original match.
    /// A visitor returning [`Error::StopSearch`] ends the scan with
    /// success; any other error aborts the scan and is returned.
    pub fn search<F>(&self, needle: &str, mut visit: F) -> Result<()>
    where
        F: FnMut(usize, usize, String) -> Result<()>,
    {
        self.lhs.search(needle, |start, end, binds| {
            let out = self.rhs.apply(&binds)?;
            visit(start, end, out)
        })
    }

    /// Replaces all non-overlapping matches of the left pattern in
    /// `needle` with their rewriting through the right pattern, leaving
    /// unmatched spans untouched.
    pub fn replace(&self, needle: &str) -> Result<String> {
        let mut out = String::new();
        let mut cursor = 0;
        self.search(needle, |start, end, rewritten| {
            out.push_str(&needle[cursor..start]);
            out.push_str(&rewritten);
            cursor = end;
            Ok(())
        })?;
        out.push_str(&needle[cursor..]);
        Ok(out)
    }
}

/// A transformation whose forward and reverse applications are inverses of
/// each other: if `t.apply(x)` succeeds with `a`, then
/// `t.reverse().apply(a)` succeeds and returns `x`, and vice versa.
///
/// Only the checked constructor can build one. The check is structural: it
/// requires each side to reference every pattern word exactly as often as
/// the other, and does not inspect the bound expressions themselves.
#[derive(Debug, Clone)]
pub struct Reversible(Transform);

impl Reversible {
    /// Constructs a reversible transformation from the template strings
    /// `lhs` and `rhs` and their shared matching expressions. Template
    /// syntax errors are reported as such; any other construction failure,
    /// and any occurrence-count mismatch between the two sides, is
    /// [`Error::NotReversible`].
    pub fn new(lhs: &str, rhs: &str, binds: &[Bind]) -> Result<Self> {
        match Transform::new(lhs, rhs, binds) {
            Ok(t) if reversible(&t.lhs.binds(), &t.rhs.binds()) => Ok(Self(t)),
            Ok(_) => Err(Error::NotReversible),
            Err(err @ (Error::Parse(_) | Error::ParseTemplate { .. })) => Err(err),
            Err(_) => Err(Error::NotReversible),
        }
    }

    /// Returns the reverse transformation, which is itself reversible.
    pub fn reverse(&self) -> Self {
        Self(self.0.reverse())
    }

    /// Applies the transformation, as [`Transform::apply`].
    pub fn apply(&self, needle: &str) -> Result<String> {
        self.0.apply(needle)
    }

    /// Performs the scanning rewrite, as [`Transform::search`].
    pub fn search<F>(&self, needle: &str, visit: F) -> Result<()>
    where
        F: FnMut(usize, usize, String) -> Result<()>,
    {
        self.0.search(needle, visit)
    }

    /// Replaces all matches, as [`Transform::replace`].
    pub fn replace(&self, needle: &str) -> Result<String> {
        self.0.replace(needle)
    }
}

/// Attaches the offending template text to a template syntax error; other
/// errors pass through untouched.
fn annotate(err: Error, template: &str) -> Error {
    match err {
        Error::Parse(source) => Error::ParseTemplate {
            template: template.to_string(),
            source,
        },
        other => other,
    }
}

/// Reports whether two binding lists are mutually saturating: each side
/// references every pattern word name exactly as many times as the other.
/// Values are not examined, so permutations within a name are not
/// distinguished.
fn reversible(a: &Binds, b: &Binds) -> bool {
    let mut tally: std::collections::HashMap<&str, i64> = std::collections::HashMap::new();
    for bind in a {
        *tally.entry(bind.name.as_str()).or_insert(0) += 1;
    }
    for bind in b {
        match tally.get_mut(bind.name.as_str()) {
            None => return false, // a does not bind this name at all
            Some(count) => {
                *count -= 1;
                if *count < 0 {
                    return false; // a does not bind this name often enough
                }
            }
        }
    }
    // Any positive remainder means b does not bind this name often enough.
    tally.values().all(|&count| count == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binds(pairs: &[(&str, &str)]) -> Binds {
        pairs
            .iter()
            .map(|(name, expr)| Bind::new(*name, *expr))
            .collect()
    }

    fn names(list: &[&str]) -> Binds {
        list.iter().map(|name| Bind::new(*name, "")).collect()
    }

    #[test]
    fn test_reversible_predicate() {
        let cases: &[(&[&str], &[&str], bool)] = &[
            // Both empty.
            (&[], &[], true),
            // One side nonempty.
            (&["a"], &[], false),
            (&[], &["b"], false),
            // Exact and permuted matches.
            (&["a", "b", "c"], &["a", "b", "c"], true),
            (&["c", "a", "b"], &["a", "b", "c"], true),
            // Repeated names.
            (&["foo", "foo"], &["foo", "foo"], true),
            (&["a", "a", "b"], &["a", "b", "a"], true),
            // Unbalanced occurrence counts.
            (&["a", "x", "a", "y"], &["x", "a", "a"], false),
            (&["a", "x", "x"], &["x", "a", "x", "y"], false),
            (&["b", "x", "b"], &["x", "b", "x"], false),
        ];
        for (a, b, want) in cases {
            assert_eq!(
                reversible(&names(a), &names(b)),
                *want,
                "reversible({a:?}, {b:?})"
            );
        }
    }

    #[test]
    fn test_forward_reverse_identity() {
        let cases: &[(&str, &str, &[(&str, &str)], &str)] = &[
            ("", "", &[], ""),
            ("x", "y", &[], "x"),
            ("x${0}", "${0}y", &[("0", r"\d+")], "x22"),
            (
                "${1} or ${2} things",
                "{${1}, ${2}}",
                &[("1", r"\d+"), ("2", r"\d+")],
                "5 or 6 things",
            ),
            (
                "all your ${x} are belong to ${y}",
                "give ${y} your ${x}",
                &[("x", "base"), ("y", "us")],
                "all your base are belong to us",
            ),
            (
                "a ${adj} ${adj} ${noun} came by",
                "I want a ^${adj} ^${noun} that is ^${adj}",
                &[("adj", "(little|blue)"), ("noun", "car")],
                "a little blue car came by",
            ),
        ];
        for &(lhs, rhs, rules, input) in cases {
            // Forward then reverse is the identity.
            let t = Reversible::new(lhs, rhs, &binds(rules)).unwrap();
            let a = t.apply(input).unwrap();
            let b = t.reverse().apply(&a).unwrap();
            assert_eq!(b, input, "FR identity for {lhs:?} / {rhs:?}");

            // Reverse then forward is the identity, with the sides swapped.
            let t = Reversible::new(rhs, lhs, &binds(rules)).unwrap();
            let b = t.reverse().apply(input).unwrap();
            let a = t.apply(&b).unwrap();
            assert_eq!(a, input, "RF identity for {rhs:?} / {lhs:?}");
        }
    }

    #[test]
    fn test_git_url_transform() {
        let t = Reversible::new(
            "git@${host}:${user}/${repo}.git",
            "http://${host}/${user}/${repo}",
            &binds(&[("host", r"\w+(\.\w+)*"), ("user", r"\w+"), ("repo", r"\w+")]),
        )
        .unwrap();

        let url = t.apply("git@bitbucket.org:creachadair/stringset.git").unwrap();
        assert_eq!(url, "http://bitbucket.org/creachadair/stringset");

        let back = t.reverse().apply(&url).unwrap();
        assert_eq!(back, "git@bitbucket.org:creachadair/stringset.git");
    }

    #[test]
    fn test_not_reversible() {
        let cases: &[(&str, &str)] = &[
            ("${a}", "boof"),
            ("beef", "${b}"),
            ("${a},${x},${a},${y}", "${x} + ${a} + ${a}"),
            ("${a},${x},${x}", "${x} + ${a} + ${x} + ${y}"),
            ("${b} + ${x} + ${b}", "${x} + ${b} + ${x}"),
        ];
        for (lhs, rhs) in cases {
            let err = Reversible::new(lhs, rhs, &[]).unwrap_err();
            assert!(
                matches!(err, Error::NotReversible),
                "Reversible::new({lhs:?}, {rhs:?}): got {err}"
            );
        }
    }

    #[test]
    fn test_bad_templates_are_parse_errors() {
        assert!(matches!(
            Reversible::new("${", "OK", &[]),
            Err(Error::ParseTemplate { .. })
        ));
        assert!(matches!(
            Reversible::new("OK", "${", &[]),
            Err(Error::ParseTemplate { .. })
        ));
        assert!(matches!(
            Transform::new("${", "OK", &[]),
            Err(Error::ParseTemplate { .. })
        ));
        assert!(matches!(
            Transform::new("OK", "${", &[]),
            Err(Error::ParseTemplate { .. })
        ));
    }

    #[test]
    fn test_parse_errors_name_the_template() {
        let err = Transform::new("${", "OK", &[]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("parsing '${'"), "{msg}");
        assert!(msg.contains("incomplete pattern word"), "{msg}");

        let err = Transform::new("OK", "${bad", &[]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("parsing '${bad'"), "{msg}");
    }

    #[test]
    fn test_unchecked_transform_allows_imbalance() {
        // Transform::new does not run the reversibility check; dropping a
        // word on the right side is allowed.
        let t = Transform::new(
            "${a}/${b}",
            "${a}",
            &binds(&[("a", r"\w+"), ("b", r"\w+")]),
        )
        .unwrap();
        assert_eq!(t.apply("x/y").unwrap(), "x");
    }

    #[test]
    fn test_search_rewrites_in_order() {
        let t = Reversible::new(
            "(${n} ${op} ${n})",
            "${n} ${n} ${op}",
            &binds(&[("n", r"\d+"), ("op", r"[-+*/]")]),
        )
        .unwrap();
        let infix = "(5 + 3)\n(2 * 4)\n(6 - 3)\n(9 / 1)";
        let postfix = "5 3 +\n2 4 *\n6 3 -\n9 1 /";

        let mut forward = Vec::new();
        t.search(infix, |start, end, s| {
            assert!(infix[start..end].starts_with('('));
            forward.push(s);
            Ok(())
        })
        .unwrap();
        assert_eq!(forward.join("\n"), postfix);

        let mut back = Vec::new();
        t.reverse()
            .search(postfix, |_, _, s| {
                back.push(s);
                Ok(())
            })
            .unwrap();
        assert_eq!(back.join("\n"), infix);
    }

    #[test]
    fn test_search_stop_early() {
        let t = Transform::new("${n}", "<${n}>", &binds(&[("n", r"\d+")])).unwrap();
        let mut seen = Vec::new();
        t.search("1 2 3", |_, _, s| {
            seen.push(s);
            Err(Error::StopSearch)
        })
        .unwrap();
        assert_eq!(seen, vec!["<1>".to_string()]);
    }

    #[test]
    fn test_replace() {
        let t = Transform::new(
            "`${text}`",
            "<tt>${text}</tt>",
            &binds(&[("text", "([^`]*)")]),
        )
        .unwrap();
        let input = "calling `f` or `g` with no argument returns `#f`";
        let want = "calling <tt>f</tt> or <tt>g</tt> with no argument returns <tt>#f</tt>";
        assert_eq!(t.replace(input).unwrap(), want);

        // No matches leaves the input unchanged.
        assert_eq!(t.replace("no backticks here").unwrap(), "no backticks here");
    }

    #[test]
    fn test_apply_no_match() {
        let t = Transform::new("a${n}", "${n}a", &binds(&[("n", r"\d+")])).unwrap();
        assert!(matches!(t.apply("b7"), Err(Error::NoMatch)));
    }
}
