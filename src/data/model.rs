//! Dataset records: styles, skills and virtual enemies as produced by the workbook normalizer.
//! Field names follow the JSON dataset keys so records deserialize directly.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// One load-out of a playable character. Bonuses come in two limit-break tiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub style_name: String,
    pub alias: String,
    pub character: String,
    pub style_raw: String,
    pub rarity: String,
    pub attack_bonus_no_lb: f64,
    pub attack_bonus_lb3: f64,
    pub crit_damage_no_lb: f64,
    pub crit_damage_lb3: f64,
    pub crit_rate_no_lb: f64,
    pub crit_rate_lb3: f64,
    pub destruction_no_lb: f64,
    pub destruction_lb3: f64,
    pub passive_no_lb: String,
    pub passive_lb3: String,
    pub element_tag: String,
    pub jewel_type: f64,
    pub def_bonus_no_lb: f64,
    pub def_bonus_lb3: f64,
    pub attack_scope_no_lb: String,
    pub def_scope_no_lb: String,
    pub crit_damage_scope_no_lb: String,
    pub crit_rate_scope_no_lb: String,
    pub destruction_scope_no_lb: String,
    pub attack_scope_lb3: String,
    pub def_scope_lb3: String,
    pub crit_damage_scope_lb3: String,
    pub crit_rate_scope_lb3: String,
    pub destruction_scope_lb3: String,
}

impl Style {
    pub fn attack_bonus(&self) -> f64 {
        self.attack_bonus_no_lb.max(self.attack_bonus_lb3)
    }

    pub fn def_bonus(&self) -> f64 {
        self.def_bonus_no_lb.max(self.def_bonus_lb3)
    }

    pub fn crit_damage_bonus(&self) -> f64 {
        self.crit_damage_no_lb.max(self.crit_damage_lb3)
    }

    pub fn crit_rate_bonus(&self) -> f64 {
        self.crit_rate_no_lb.max(self.crit_rate_lb3)
    }

    pub fn destruction_bonus(&self) -> f64 {
        self.destruction_no_lb.max(self.destruction_lb3)
    }

    /// Both passive descriptions, space separated.
    pub fn passive_text(&self) -> String {
        format!("{} {}", self.passive_no_lb, self.passive_lb3)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub skill_name: String,
    pub weapon: String,
    pub element: String,
    pub target: String,
    pub hit: f64,
    pub owner_style_hint: String,
    pub owner_character: String,
    pub sp: f64,
    pub multiplier: f64,
    pub notes: String,
    pub basic_flag: f64,
    pub per_hit_multipliers: Vec<f64>,
}

/// Virtual enemy from the workbook. Multiplier maps are keyed by weapon/element symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Enemy {
    pub name: String,
    pub dp: f64,
    pub hp: f64,
    pub dr: f64,
    pub stat: f64,
    pub category: String,
    pub detail_url: String,
    pub weapon_mult: BTreeMap<String, f64>,
    pub element_mult: BTreeMap<String, f64>,
}

impl Enemy {
    pub fn has_dp_phase(&self) -> bool {
        self.dp > 0.0
    }

    pub fn weapon_multiplier(&self, weapon: &str) -> Option<f64> {
        self.weapon_mult.get(weapon).copied()
    }

    pub fn element_multiplier(&self, element: &str) -> Option<f64> {
        self.element_mult.get(element).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseSymbolError {
    kind: &'static str,
    value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weapon {
    #[serde(rename = "斬")]
    Slash,
    #[serde(rename = "突")]
    Pierce,
    #[serde(rename = "打")]
    Blunt,
}

impl Weapon {
    pub const ALL: [Weapon; 3] = [Weapon::Slash, Weapon::Pierce, Weapon::Blunt];

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Slash => "斬",
            Self::Pierce => "突",
            Self::Blunt => "打",
        }
    }

    fn english(&self) -> &'static str {
        match self {
            Self::Slash => "slash",
            Self::Pierce => "pierce",
            Self::Blunt => "blunt",
        }
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Weapon {
    type Err = ParseSymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|w| w.symbol() == trimmed || w.english().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseSymbolError {
                kind: "weapon",
                value: trimmed.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    #[serde(rename = "火")]
    Fire,
    #[serde(rename = "氷")]
    Ice,
    #[serde(rename = "雷")]
    Thunder,
    #[serde(rename = "光")]
    Light,
    #[serde(rename = "闇")]
    Dark,
    #[serde(rename = "無")]
    Neutral,
}

impl Element {
    pub const ALL: [Element; 6] = [
        Element::Fire,
        Element::Ice,
        Element::Thunder,
        Element::Light,
        Element::Dark,
        Element::Neutral,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Fire => "火",
            Self::Ice => "氷",
            Self::Thunder => "雷",
            Self::Light => "光",
            Self::Dark => "闇",
            Self::Neutral => "無",
        }
    }

    fn english(&self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Ice => "ice",
            Self::Thunder => "thunder",
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Neutral => "none",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ParseSymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|e| e.symbol() == trimmed || e.english().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseSymbolError {
                kind: "element",
                value: trimmed.to_string(),
            })
    }
}

/// Rarity grade multiplier. Unknown grades score like S.
pub fn rarity_score(rarity: &str) -> f64 {
    match rarity.to_uppercase().as_str() {
        "SS" => 1.2,
        "S" => 1.0,
        "A" => 0.85,
        _ => 1.0,
    }
}

fn percent_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([-+]?[0-9]+(?:\.[0-9]+)?)\s*%").expect("percent pattern is valid"))
}

/// All `N%` figures in `text` as fractions (`30%` -> 0.3), in order of appearance.
/// Full-width digits and signs are folded with NFKC first.
pub fn extract_percent_values(text: &str) -> Vec<f64> {
    let folded: String = text.nfkc().collect();
    percent_pattern()
        .captures_iter(&folded)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
        .map(|value| value / 100.0)
        .collect()
}
