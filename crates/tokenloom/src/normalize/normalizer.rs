//! # Unicode Normalization Stages

use unicode_general_category::{GeneralCategory, get_general_category};
use unicode_normalization::UnicodeNormalization;

/// One normalization step; steps compose in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizerStage {
    /// Canonical composition.
    Nfc,

    /// Canonical decomposition.
    Nfd,

    /// Unicode lowercasing.
    Lowercase,

    /// Decompose, then drop nonspacing combining marks.
    StripAccents,
}

/// An ordered list of normalization stages.
///
/// Every stage is idempotent, so the whole normalizer is: applying it
/// twice yields the same string as applying it once.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    stages: Vec<NormalizerStage>,
}

impl Normalizer {
    /// Build a normalizer from explicit stages.
    pub fn new(stages: Vec<NormalizerStage>) -> Self {
        Self { stages }
    }

    /// Build the stage list implied by config flags.
    ///
    /// ## Arguments
    /// * `lowercase` - Apply Unicode lowercasing.
    /// * `strip_accents` - Decompose and drop combining marks.
    pub fn from_flags(
        lowercase: bool,
        strip_accents: bool,
    ) -> Self {
        let mut stages = Vec::new();
        if lowercase {
            stages.push(NormalizerStage::Lowercase);
        }
        if strip_accents {
            stages.push(NormalizerStage::StripAccents);
        }
        Self::new(stages)
    }

    /// The configured stages.
    pub fn stages(&self) -> &[NormalizerStage] {
        &self.stages
    }

    /// Check if the normalizer is a no-op.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Normalize one string through every stage in order.
    pub fn normalize(
        &self,
        text: &str,
    ) -> String {
        let mut out = text.to_string();
        for stage in &self.stages {
            out = match stage {
                NormalizerStage::Nfc => out.as_str().nfc().collect(),
                NormalizerStage::Nfd => out.as_str().nfd().collect(),
                NormalizerStage::Lowercase => out.to_lowercase(),
                NormalizerStage::StripAccents => out
                    .as_str()
                    .nfd()
                    .filter(|&c| get_general_category(c) != GeneralCategory::NonspacingMark)
                    .collect(),
            };
        }
        out
    }

    /// Normalize a batch of strings.
    pub fn normalize_batch(
        &self,
        batch: &[String],
    ) -> Vec<String> {
        batch.iter().map(|s| self.normalize(s)).collect()
    }
}
