//! Template-anchored pattern matching and reversible string rewriting.
//!
//! A [`Pattern`] is a compiled template string containing *pattern words*,
//! named locations where substitution may occur. A pattern may be matched
//! against a string to produce bindings of names to substrings, or applied
//! to a list of bindings to produce a transformed string.
//!
//! # Template grammar
//!
//! A pattern word has the form `${name}`: a single word (letters, digits,
//! and `/ : _ - + = #`) in curly brackets, prefixed by a dollar sign. A
//! literal dollar sign is written `$$`; all other characters stand for
//! themselves.
//!
//! # Matching
//!
//! Binding a regular expression to each pattern word turns the template
//! into a matcher. [`Pattern::matches`] succeeds when the whole string
//! matches the expanded template, returning the submatch text per pattern
//! word occurrence; [`Pattern::search`] visits every non-overlapping match
//! within a string.
//!
//! ```
//! use patsub::{Bind, Pattern};
//!
//! let p = Pattern::parse("A#${num}", &[Bind::new("num", r"\d+")])?;
//! let binds = p.matches("A#5")?;
//! assert_eq!(binds.first("num"), Some("5"));
//! # Ok::<(), patsub::Error>(())
//! ```
//!
//! # Substitution
//!
//! [`Pattern::apply`] interpolates an ordered list of values into the
//! template; [`Pattern::apply_with`] synthesizes each value through a
//! callback.
//!
//! # Transformations
//!
//! A [`Transform`] couples two templates over one set of pattern words, so
//! that text matched by one can be re-rendered through the other. When
//! both sides use every pattern word equally often, the checked
//! [`Reversible`] constructor produces a transformation whose forward and
//! reverse applications are inverses:
//!
//! ```
//! use patsub::{Bind, Reversible};
//!
//! let t = Reversible::new(
//!     "git@${host}:${user}/${repo}.git",
//!     "http://${host}/${user}/${repo}",
//!     &[
//!         Bind::new("host", r"\w+(\.\w+)*"),
//!         Bind::new("user", r"\w+"),
//!         Bind::new("repo", r"\w+"),
//!     ],
//! )?;
//!
//! let url = t.apply("git@bitbucket.org:creachadair/stringset.git")?;
//! assert_eq!(url, "http://bitbucket.org/creachadair/stringset");
//! assert_eq!(
//!     t.reverse().apply(&url)?,
//!     "git@bitbucket.org:creachadair/stringset.git",
//! );
//! # Ok::<(), patsub::Error>(())
//! ```

pub mod cli;
pub mod error;
pub mod output;
pub mod parse;
pub mod pattern;
pub mod transform;

pub use error::{Error, ParseError, Result};
pub use pattern::{Bind, Binds, Pattern};
pub use transform::{Reversible, Transform};
