//! Include/exclude rules applied to result strings.
//!
//! A [`Filter`] is a conjunction of six checks. Each *include* list, when
//! non-empty, requires at least one of its patterns to match; each *exclude*
//! list rejects a value matching any of its patterns. Empty lists always
//! pass, so [`Filter::default`] accepts everything.

/// Patterns checked against the start, end, and interior of a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Patterns {
    /// Prefixes.
    pub starts: Vec<String>,
    /// Suffixes.
    pub ends: Vec<String>,
    /// Substrings.
    pub contains: Vec<String>,
}

impl Patterns {
    /// Returns `true` if all three lists are empty.
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty() && self.ends.is_empty() && self.contains.is_empty()
    }
}

/// Predicate over permutation strings.
///
/// # Example
/// ```
/// use permute::Filter;
///
/// let filter = Filter::default()
///     .starts_with("a")
///     .excluding_ending_with("c");
///
/// let kept: Vec<&str> = filter.apply(["abc", "acb", "bac"]).collect();
/// assert_eq!(kept, ["acb"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Filter {
    /// Values must match at least one pattern of each non-empty list.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub include: Patterns,
    /// Values must match no pattern of any list.
    pub exclude: Patterns,
}

impl Filter {
    /// Requires a prefix (alternatives accumulate).
    #[must_use]
    pub fn starts_with(mut self, prefix: impl Into<String>) -> Self {
        self.include.starts.push(prefix.into());
        self
    }

    /// Requires a suffix (alternatives accumulate).
    #[must_use]
    pub fn ends_with(mut self, suffix: impl Into<String>) -> Self {
        self.include.ends.push(suffix.into());
        self
    }

    /// Requires a substring (alternatives accumulate).
    #[must_use]
    pub fn containing(mut self, needle: impl Into<String>) -> Self {
        self.include.contains.push(needle.into());
        self
    }

    /// Rejects values with this prefix.
    #[must_use]
    pub fn excluding_starting_with(mut self, prefix: impl Into<String>) -> Self {
        self.exclude.starts.push(prefix.into());
        self
    }

    /// Rejects values with this suffix.
    #[must_use]
    pub fn excluding_ending_with(mut self, suffix: impl Into<String>) -> Self {
        self.exclude.ends.push(suffix.into());
        self
    }

    /// Rejects values containing this substring.
    #[must_use]
    pub fn excluding_containing(mut self, needle: impl Into<String>) -> Self {
        self.exclude.contains.push(needle.into());
        self
    }

    /// Returns `true` if no rule is configured.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Returns `true` if `value` passes every check.
    pub fn matches(&self, value: &str) -> bool {
        let Self { include, exclude } = self;

        none_match(&exclude.starts, |p| value.starts_with(p))
            && any_match(&include.starts, |p| value.starts_with(p))
            && none_match(&exclude.ends, |p| value.ends_with(p))
            && any_match(&include.ends, |p| value.ends_with(p))
            && none_match(&exclude.contains, |p| value.contains(p))
            && any_match(&include.contains, |p| value.contains(p))
    }

    /// Lazily keeps the values of `values` that pass [`Self::matches`].
    pub fn apply<'a, I, S>(&'a self, values: I) -> impl Iterator<Item = S> + 'a
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: 'a,
        S: AsRef<str>,
    {
        values
            .into_iter()
            .filter(move |value| self.matches(value.as_ref()))
    }
}

fn any_match(patterns: &[String], check: impl Fn(&str) -> bool) -> bool {
    patterns.is_empty() || patterns.iter().any(|p| check(p))
}

fn none_match(patterns: &[String], check: impl Fn(&str) -> bool) -> bool {
    !patterns.iter().any(|p| check(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: [&str; 6] = ["abc", "acb", "bac", "bca", "cab", "cba"];

    fn kept(filter: &Filter) -> Vec<&'static str> {
        filter.apply(WORDS).collect()
    }

    #[test]
    fn empty_filter_accepts_everything() {
        let filter = Filter::default();
        assert!(filter.is_empty());
        assert_eq!(kept(&filter), WORDS);
    }

    #[test]
    fn include_lists_are_alternatives() {
        let filter = Filter::default().starts_with("a").starts_with("c");
        assert_eq!(kept(&filter), ["abc", "acb", "cab", "cba"]);

        let filter = Filter::default().ends_with("a");
        assert_eq!(kept(&filter), ["bca", "cba"]);

        let filter = Filter::default().containing("ab");
        assert_eq!(kept(&filter), ["abc", "cab"]);
    }

    #[test]
    fn exclude_lists_reject_any_match() {
        let filter = Filter::default()
            .excluding_starting_with("a")
            .excluding_containing("ca");
        assert_eq!(kept(&filter), ["bac", "cba"]);

        let filter = Filter::default().excluding_ending_with("c").excluding_ending_with("b");
        assert_eq!(kept(&filter), ["bca", "cba"]);
    }

    #[test]
    fn all_checks_must_pass() {
        let filter = Filter::default()
            .starts_with("b")
            .ends_with("c")
            .excluding_containing("ca");
        assert_eq!(kept(&filter), ["bac"]);
        assert!(!filter.matches("bcac"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_flattened_includes() {
        let filter: Filter = serde_json::from_str(
            r#"{ "starts": ["a"], "exclude": { "contains": ["bc"] } }"#,
        )
        .unwrap();
        assert_eq!(
            filter,
            Filter::default()
                .starts_with("a")
                .excluding_containing("bc")
        );
        assert_eq!(kept(&filter), ["acb"]);
    }
}
