//! # Detokenization Artifact Cleanup
//!
//! The exact substitutions are tuned against reference output per
//! vocabulary, so they live in a swappable rule table rather than
//! hard-coded control flow.

/// An ordered list of literal `(pattern, replacement)` substitutions.
///
/// The default set collapses the space the forward pipeline inserts
/// before punctuation and English contractions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupRules {
    rules: Vec<(String, String)>,
}

impl Default for CleanupRules {
    fn default() -> Self {
        Self::from_rules([
            (" .", "."),
            (" ?", "?"),
            (" !", "!"),
            (" ,", ","),
            (" ' ", "' "),
            (" n't", "n't"),
            (" 'm", "'m"),
            (" 's", "'s"),
            (" 've", "'ve"),
            (" 're", "'re"),
        ])
    }
}

impl CleanupRules {
    /// Build a rule table from ordered pairs.
    pub fn from_rules<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            rules: rules
                .into_iter()
                .map(|(p, r)| (p.into(), r.into()))
                .collect(),
        }
    }

    /// The configured rules, in application order.
    pub fn rules(&self) -> &[(String, String)] {
        &self.rules
    }

    /// Apply every substitution in order.
    pub fn apply(
        &self,
        text: &str,
    ) -> String {
        let mut out = text.to_string();
        for (pattern, replacement) in &self.rules {
            if out.contains(pattern.as_str()) {
                out = out.replace(pattern.as_str(), replacement);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = CleanupRules::default();

        assert_eq!(rules.apply("hello , world !"), "hello, world!");
        assert_eq!(rules.apply("it 's here"), "it's here");
        assert_eq!(rules.apply("do n't stop"), "don't stop");
        assert_eq!(rules.apply("untouched"), "untouched");
    }

    #[test]
    fn test_custom_rules_apply_in_order() {
        let rules = CleanupRules::from_rules([("aa", "b"), ("bb", "c")]);

        // "aaaa" -> "bb" -> "c"; order matters.
        assert_eq!(rules.apply("aaaa"), "c");
    }
}
