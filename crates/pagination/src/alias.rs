//! Resolution of parameters that can be supplied under two names.
//!
//! Query records often accept a public alias (`count`, `offset`) next to
//! the canonical internal name (`limit_paraphrases`, `offset_paraphrases`).
//! The canonical name always wins when both are present, regardless of the
//! order in which the client supplied them.

/// Where a resolved parameter value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamSource {
    /// The canonical parameter name was supplied.
    Canonical,
    /// Only the alias was supplied.
    Alias,
    /// Neither name was supplied and the declared default applies.
    Default,
}

/// A resolved value together with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<T> {
    value: T,
    source: ParamSource,
}

impl<T: Copy> Resolved<T> {
    /// The resolved value.
    #[must_use]
    pub const fn value(&self) -> T {
        self.value
    }
}

impl<T> Resolved<T> {
    /// Which name, if any, supplied the value.
    #[must_use]
    pub const fn source(&self) -> ParamSource {
        self.source
    }

    /// Consume the wrapper and return the value.
    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }
}

/// A canonical parameter and its alias, both optional.
///
/// # Examples
///
/// ```
/// use pagination::{AliasPair, ParamSource};
///
/// let only_alias = AliasPair::new(None, Some(10_u64)).resolve_or(9999);
/// assert_eq!(only_alias.value(), 10);
/// assert_eq!(only_alias.source(), ParamSource::Alias);
///
/// let neither = AliasPair::<u64>::new(None, None).resolve_or(9999);
/// assert_eq!(neither.source(), ParamSource::Default);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasPair<T> {
    canonical: Option<T>,
    alias: Option<T>,
}

impl<T> AliasPair<T> {
    /// Pair a canonical value with its alias.
    #[must_use]
    pub const fn new(canonical: Option<T>, alias: Option<T>) -> Self {
        Self { canonical, alias }
    }

    /// Resolve the pair, preferring the canonical value.
    #[must_use]
    pub fn resolve(self) -> Option<Resolved<T>> {
        match (self.canonical, self.alias) {
            (Some(value), _) => Some(Resolved {
                value,
                source: ParamSource::Canonical,
            }),
            (None, Some(value)) => Some(Resolved {
                value,
                source: ParamSource::Alias,
            }),
            (None, None) => None,
        }
    }

    /// Resolve the pair, falling back to `default` when neither is present.
    #[must_use]
    pub fn resolve_or(self, default: T) -> Resolved<T> {
        self.resolve().unwrap_or(Resolved {
            value: default,
            source: ParamSource::Default,
        })
    }
}

impl<T: PartialEq> AliasPair<T> {
    /// `true` when both names were supplied with different values.
    #[must_use]
    pub fn is_conflicting(&self) -> bool {
        matches!((&self.canonical, &self.alias), (Some(a), Some(b)) if a != b)
    }
}

#[cfg(test)]
mod tests {
    //! Covers canonical-over-alias precedence.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Some(25), Some(10), 25, ParamSource::Canonical)]
    #[case(Some(10), Some(25), 10, ParamSource::Canonical)]
    #[case(None, Some(10), 10, ParamSource::Alias)]
    #[case(Some(7), None, 7, ParamSource::Canonical)]
    #[case(None, None, 9999, ParamSource::Default)]
    fn canonical_value_takes_precedence(
        #[case] canonical: Option<u64>,
        #[case] alias: Option<u64>,
        #[case] expected: u64,
        #[case] source: ParamSource,
    ) {
        let resolved = AliasPair::new(canonical, alias).resolve_or(9999);
        assert_eq!(resolved.value(), expected);
        assert_eq!(resolved.source(), source);
    }

    #[rstest]
    #[case(Some(1), Some(2), true)]
    #[case(Some(2), Some(2), false)]
    #[case(None, Some(2), false)]
    fn detects_conflicting_pairs(
        #[case] canonical: Option<u64>,
        #[case] alias: Option<u64>,
        #[case] expected: bool,
    ) {
        assert_eq!(AliasPair::new(canonical, alias).is_conflicting(), expected);
    }
}
