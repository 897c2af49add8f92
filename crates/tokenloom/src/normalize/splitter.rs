//! # Pattern-Based Span Splitting

use unicode_general_category::{GeneralCategory, get_general_category};

use crate::errors::{TlResult, TokenloomError};
use crate::ragged::RaggedBatch;

/// A split span: ordinary text for the encoder, or a protected special
/// literal mapped directly to its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Span {
    /// A normal text span.
    Text(String),

    /// A literal special-token occurrence.
    Special(String),
}

/// The fixed rule set partitioning each input string into spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitRule {
    /// Split on Unicode whitespace; whitespace itself is dropped.
    Whitespace,

    /// Split on whitespace and isolate punctuation chars as their own
    /// spans.
    Punctuation,

    /// Spans are the matches of a regex pattern; unmatched gaps are
    /// kept as spans of their own so no byte disappears.
    Pattern(String),
}

/// Compiled splitting engine; lookaround patterns fall through to the
/// fancy engine, everything else uses the faster plain engine.
#[derive(Debug, Clone)]
enum CompiledRule {
    Whitespace,
    Punctuation,
    Plain(regex::Regex),
    Fancy(Box<fancy_regex::Regex>),
}

/// Splits input strings into ordered spans, protecting special-token
/// literals before the pattern applies.
#[derive(Debug, Clone)]
pub struct Splitter {
    rule: CompiledRule,
    special_re: Option<regex::Regex>,
}

impl Splitter {
    /// Compile a splitter.
    ///
    /// ## Arguments
    /// * `rule` - The split rule.
    /// * `special_pattern` - Optional alternation over special literals,
    ///   from [`crate::vocab::SpecialVocab::special_pattern`].
    ///
    /// ## Returns
    /// A `TlResult<Splitter>`, with errors on uncompilable patterns.
    pub fn try_new(
        rule: &SplitRule,
        special_pattern: Option<&str>,
    ) -> TlResult<Self> {
        let rule = match rule {
            SplitRule::Whitespace => CompiledRule::Whitespace,
            SplitRule::Punctuation => CompiledRule::Punctuation,
            SplitRule::Pattern(pattern) => {
                if needs_fancy(pattern) {
                    CompiledRule::Fancy(Box::new(fancy_regex::Regex::new(pattern).map_err(
                        |e| TokenloomError::BadPattern(format!("{pattern:?}: {e}")),
                    )?))
                } else {
                    CompiledRule::Plain(regex::Regex::new(pattern).map_err(|e| {
                        TokenloomError::BadPattern(format!("{pattern:?}: {e}"))
                    })?)
                }
            }
        };

        let special_re = match special_pattern {
            None => None,
            Some(p) => Some(
                regex::Regex::new(p)
                    .map_err(|e| TokenloomError::BadPattern(format!("{p:?}: {e}")))?,
            ),
        };

        Ok(Self { rule, special_re })
    }

    /// Split one string into ordered spans.
    pub fn split(
        &self,
        text: &str,
    ) -> Vec<Span> {
        let mut spans = Vec::new();

        match &self.special_re {
            None => self.split_text(text, &mut spans),
            Some(re) => {
                let mut rest = text;
                while let Some(m) = re.find(rest) {
                    self.split_text(&rest[..m.start()], &mut spans);
                    spans.push(Span::Special(m.as_str().to_string()));
                    rest = &rest[m.end()..];
                }
                self.split_text(rest, &mut spans);
            }
        }

        spans
    }

    /// Split a batch; one inner row of spans per input string.
    pub fn split_batch(
        &self,
        batch: &[String],
    ) -> RaggedBatch<Span> {
        let mut out = RaggedBatch::new();
        for text in batch {
            out.push_row(self.split(text));
        }
        out
    }

    fn split_text(
        &self,
        text: &str,
        spans: &mut Vec<Span>,
    ) {
        if text.is_empty() {
            return;
        }
        match &self.rule {
            CompiledRule::Whitespace => {
                spans.extend(
                    text.split_whitespace()
                        .map(|w| Span::Text(w.to_string())),
                );
            }
            CompiledRule::Punctuation => split_punctuation(text, spans),
            CompiledRule::Plain(re) => {
                let mut last = 0;
                for m in re.find_iter(text) {
                    if last < m.start() {
                        spans.push(Span::Text(text[last..m.start()].to_string()));
                    }
                    spans.push(Span::Text(m.as_str().to_string()));
                    last = m.end();
                }
                if last < text.len() {
                    spans.push(Span::Text(text[last..].to_string()));
                }
            }
            CompiledRule::Fancy(re) => {
                let mut last = 0;
                for m in re.find_iter(text) {
                    let Ok(m) = m else { break };
                    if last < m.start() {
                        spans.push(Span::Text(text[last..m.start()].to_string()));
                    }
                    spans.push(Span::Text(m.as_str().to_string()));
                    last = m.end();
                }
                if last < text.len() {
                    spans.push(Span::Text(text[last..].to_string()));
                }
            }
        }
    }
}

/// Lookaround constructs the plain engine cannot compile.
fn needs_fancy(pattern: &str) -> bool {
    ["(?=", "(?!", "(?<=", "(?<!"]
        .iter()
        .any(|c| pattern.contains(c))
}

/// Whitespace split with punctuation chars isolated as their own spans.
fn split_punctuation(
    text: &str,
    spans: &mut Vec<Span>,
) {
    let mut current = String::new();
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !current.is_empty() {
                spans.push(Span::Text(core::mem::take(&mut current)));
            }
        } else if is_punctuation(ch) {
            if !current.is_empty() {
                spans.push(Span::Text(core::mem::take(&mut current)));
            }
            spans.push(Span::Text(ch.to_string()));
        } else {
            current.push(ch);
        }
    }
    if !current.is_empty() {
        spans.push(Span::Text(current));
    }
}

/// ASCII symbol ranges count as punctuation here, matching the
/// reference basic tokenizer, in addition to the Unicode `P*` classes.
fn is_punctuation(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_punctuation();
    }
    matches!(
        get_general_category(ch),
        GeneralCategory::ConnectorPunctuation
            | GeneralCategory::DashPunctuation
            | GeneralCategory::OpenPunctuation
            | GeneralCategory::ClosePunctuation
            | GeneralCategory::InitialPunctuation
            | GeneralCategory::FinalPunctuation
            | GeneralCategory::OtherPunctuation
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(spans: &[Span]) -> Vec<&str> {
        spans
            .iter()
            .map(|s| match s {
                Span::Text(t) => t.as_str(),
                Span::Special(t) => t.as_str(),
            })
            .collect()
    }

    #[test]
    fn test_whitespace() {
        let splitter = Splitter::try_new(&SplitRule::Whitespace, None).unwrap();

        assert_eq!(
            texts(&splitter.split("  hello   world ")),
            vec!["hello", "world"],
        );
        assert!(splitter.split("").is_empty());
    }

    #[test]
    fn test_punctuation_isolation() {
        let splitter = Splitter::try_new(&SplitRule::Punctuation, None).unwrap();

        assert_eq!(
            texts(&splitter.split("don't stop, ok?")),
            vec!["don", "'", "t", "stop", ",", "ok", "?"],
        );
    }

    #[test]
    fn test_pattern_keeps_gaps() {
        let splitter =
            Splitter::try_new(&SplitRule::Pattern(r"\w+".to_string()), None).unwrap();

        // The ", " gap stays a span; no byte disappears.
        assert_eq!(
            texts(&splitter.split("ab, cd")),
            vec!["ab", ", ", "cd"],
        );
    }

    #[test]
    fn test_fancy_pattern_selection() {
        // Trailing-whitespace lookahead needs the fancy engine.
        let rule = SplitRule::Pattern(r"\s+(?!\S)|\s+|\w+".to_string());
        let splitter = Splitter::try_new(&rule, None).unwrap();

        assert_eq!(texts(&splitter.split("a b")), vec!["a", " ", "b"]);
    }

    #[test]
    fn test_specials_are_protected() {
        let splitter = Splitter::try_new(
            &SplitRule::Whitespace,
            Some(r"<\|end\|>"),
        )
        .unwrap();

        let spans = splitter.split("hi <|end|>there");
        assert_eq!(
            spans,
            vec![
                Span::Text("hi".to_string()),
                Span::Special("<|end|>".to_string()),
                Span::Text("there".to_string()),
            ],
        );
    }

    #[test]
    fn test_bad_pattern_is_fatal() {
        assert!(Splitter::try_new(&SplitRule::Pattern("(".to_string()), None).is_err());
    }

    #[test]
    fn test_split_batch_rows() {
        let splitter = Splitter::try_new(&SplitRule::Whitespace, None).unwrap();
        let batch = splitter.split_batch(&["a b".to_string(), String::new()]);

        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.row(0).len(), 2);
        // Empty inputs stay as empty rows.
        assert_eq!(batch.row(1).len(), 0);
    }
}
