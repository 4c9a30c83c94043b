//! Free-text style lookup: exact name, case-insensitive name, substring, then fuzzy.

use std::collections::{HashMap, HashSet};

use similar::TextDiff;
use tracing::debug;

use crate::data::model::{rarity_score, Style};

/// Fuzzy candidates scoring below this are not considered matches.
pub const FUZZY_CUTOFF: f64 = 0.5;

/// Similarity between a query and a candidate name, in `[0, 1]`.
pub trait Similarity {
    fn similarity(&self, query: &str, candidate: &str) -> f64;
}

impl<F> Similarity for F
where
    F: Fn(&str, &str) -> f64,
{
    fn similarity(&self, query: &str, candidate: &str) -> f64 {
        self(query, candidate)
    }
}

/// Character-level matching ratio `2M / T`, where `M` counts matched characters
/// and `T` is the combined length of both strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceRatio;

impl Similarity for SequenceRatio {
    fn similarity(&self, query: &str, candidate: &str) -> f64 {
        f64::from(TextDiff::from_chars(query, candidate).ratio())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    CaseInsensitive,
    Substring,
    Fuzzy,
}

/// Resolved styles (unique, first-match order) and the queries nothing matched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution<'a> {
    pub styles: Vec<&'a Style>,
    pub unresolved: Vec<String>,
}

pub struct StyleQueryResolver<'a> {
    styles: &'a [Style],
    by_name: HashMap<&'a str, &'a Style>,
    by_lower_name: HashMap<String, &'a Style>,
    similarity: Box<dyn Similarity + Send + Sync>,
}

impl<'a> StyleQueryResolver<'a> {
    pub fn new(styles: &'a [Style]) -> Self {
        Self::with_similarity(styles, SequenceRatio)
    }

    pub fn with_similarity(
        styles: &'a [Style],
        similarity: impl Similarity + Send + Sync + 'static,
    ) -> Self {
        let by_name = styles
            .iter()
            .map(|style| (style.style_name.as_str(), style))
            .collect();
        let by_lower_name = styles
            .iter()
            .map(|style| (style.style_name.to_lowercase(), style))
            .collect();
        Self {
            styles,
            by_name,
            by_lower_name,
            similarity: Box::new(similarity),
        }
    }

    /// Resolve one trimmed, non-empty query.
    pub fn resolve_one(&self, query: &str) -> Option<(&'a Style, MatchTier)> {
        if let Some(style) = self.by_name.get(query) {
            return Some((style, MatchTier::Exact));
        }
        if let Some(style) = self.by_lower_name.get(&query.to_lowercase()) {
            return Some((style, MatchTier::CaseInsensitive));
        }
        if let Some(style) = self.best_substring_match(query) {
            return Some((style, MatchTier::Substring));
        }
        self.best_fuzzy_match(query)
            .map(|style| (style, MatchTier::Fuzzy))
    }

    pub fn resolve<Q: AsRef<str>>(&self, queries: &[Q]) -> Resolution<'a> {
        let mut resolution = Resolution::default();
        let mut seen_styles = HashSet::new();
        let mut seen_unresolved = HashSet::new();

        for query in queries {
            let query = query.as_ref().trim();
            if query.is_empty() {
                continue;
            }
            match self.resolve_one(query) {
                Some((style, tier)) => {
                    debug!(query, style = %style.style_name, ?tier, "style query resolved");
                    if seen_styles.insert(style.style_name.as_str()) {
                        resolution.styles.push(style);
                    }
                }
                None => {
                    debug!(query, "style query unresolved");
                    if seen_unresolved.insert(query.to_string()) {
                        resolution.unresolved.push(query.to_string());
                    }
                }
            }
        }

        resolution
    }

    /// Substring hit on name, character, alias or raw style text. Prefers names that
    /// start with the query, then higher rarity, then shorter names, then roster order.
    fn best_substring_match(&self, query: &str) -> Option<&'a Style> {
        self.styles
            .iter()
            .filter(|style| {
                style.style_name.contains(query)
                    || style.character.contains(query)
                    || style.alias.contains(query)
                    || style.style_raw.contains(query)
            })
            .min_by(|left, right| {
                let left_prefix = !left.style_name.starts_with(query);
                let right_prefix = !right.style_name.starts_with(query);
                left_prefix
                    .cmp(&right_prefix)
                    .then_with(|| rarity_score(&right.rarity).total_cmp(&rarity_score(&left.rarity)))
                    .then_with(|| {
                        left.style_name
                            .chars()
                            .count()
                            .cmp(&right.style_name.chars().count())
                    })
            })
    }

    fn best_fuzzy_match(&self, query: &str) -> Option<&'a Style> {
        let mut best: Option<(&'a Style, f64)> = None;
        for style in self.styles {
            let score = self.similarity.similarity(query, &style.style_name);
            if score < FUZZY_CUTOFF {
                continue;
            }
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((style, score));
            }
        }
        best.map(|(style, _)| style)
    }
}

/// Split raw user input on newlines, commas and ideographic commas.
pub fn split_style_input(raw: &str) -> Vec<String> {
    raw.split(|ch| matches!(ch, '\n' | '\r' | ',' | '、'))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
