//! Per-skill attack, support and debuff scoring.
//!
//! Keyword markers are matched against the workbook's Japanese skill notes.

use crate::data::knowledge::{BuffKind, KnowledgeIndex};
use crate::data::model::{extract_percent_values, Element, Enemy, Skill, Weapon};

pub const SUPPORT_KEYWORDS: &[&str] = &[
    "バフ",
    "フィールド",
    "チャージ",
    "士気",
    "クリティカル",
    "スキル攻撃力",
    "トークン",
    "OD",
    "SP",
];
pub const DEBUFF_KEYWORDS: &[&str] = &["防御ダウン", "脆弱", "耐性", "デバフ", "被ダメ", "弱体", "封印"];
pub const ATTACK_KEYWORDS: &[&str] = &["対HPダメージ", "対DPダメージ", "連撃", "破壊率", "貫通"];

pub const HP_DAMAGE_MARKER: &str = "対HPダメージ";
pub const DP_DAMAGE_MARKER: &str = "対DPダメージ";
pub const HEAL_MARKER: &str = "回復";
pub const DEFENSE_DOWN_MARKER: &str = "防御ダウン";
pub const VULNERABILITY_MARKER: &str = "脆弱";
const TRAIT_DP_MARKER: &str = "DP";
const TRAIT_RESISTANCE_MARKER: &str = "耐";

const MIN_AXIS_MULTIPLIER: f64 = 0.05;
const PREFERRED_WEAPON_FACTOR: f64 = 1.15;
const PREFERRED_ELEMENT_FACTOR: f64 = 1.2;
const ATTACK_KEYWORD_BONUS: f64 = 0.07;
const MIN_BASE_MULTIPLIER: f64 = 0.1;
const PENETRATION_WEIGHT: f64 = 0.65;
const MIND_EYE_WEIGHT: f64 = 0.4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub weapon: Option<Weapon>,
    pub element: Option<Element>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackScore {
    pub overall: f64,
    pub hp: f64,
    pub dp: f64,
    pub weakness: f64,
}

pub fn count_keywords(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|keyword| text.contains(**keyword)).count()
}

pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(*keyword))
}

#[derive(Debug, Clone, Copy)]
pub struct SkillScorer<'k> {
    knowledge: &'k KnowledgeIndex,
}

impl<'k> SkillScorer<'k> {
    pub fn new(knowledge: &'k KnowledgeIndex) -> Self {
        Self { knowledge }
    }

    pub fn weakness_factor(&self, skill: &Skill, enemy: Option<&Enemy>, prefs: &Preferences) -> f64 {
        let mut factor = 1.0;

        if let Some(enemy) = enemy {
            if let Some(mult) = enemy.weapon_multiplier(&skill.weapon) {
                factor *= mult.max(MIN_AXIS_MULTIPLIER);
            }
            if let Some(mult) = enemy.element_multiplier(&skill.element) {
                factor *= mult.max(MIN_AXIS_MULTIPLIER);
            }
        }

        if prefs.weapon.is_some_and(|weapon| skill.weapon == weapon.symbol()) {
            factor *= PREFERRED_WEAPON_FACTOR;
        }
        if prefs.element.is_some_and(|element| skill.element == element.symbol()) {
            factor *= PREFERRED_ELEMENT_FACTOR;
        }

        factor
    }

    pub fn attack_skill_score(
        &self,
        skill: &Skill,
        enemy: Option<&Enemy>,
        prefs: &Preferences,
    ) -> AttackScore {
        let weakness = self.weakness_factor(skill, enemy, prefs);
        let notes = skill.notes.as_str();

        let percents = extract_percent_values(notes);
        let top_percent = percents.iter().copied().reduce(f64::max);
        let hp_bonus = match top_percent {
            Some(value) if notes.contains(HP_DAMAGE_MARKER) => value,
            _ => 0.0,
        };
        let dp_bonus = match top_percent {
            Some(value) if notes.contains(DP_DAMAGE_MARKER) => value,
            _ => 0.0,
        };

        let keyword_bonus = count_keywords(notes, ATTACK_KEYWORDS) as f64 * ATTACK_KEYWORD_BONUS;
        let base = skill.multiplier.max(MIN_BASE_MULTIPLIER);
        let penetration = self.knowledge.buff(BuffKind::Penetration).get(&skill.skill_name)
            * PENETRATION_WEIGHT;
        let mind_eye =
            self.knowledge.buff(BuffKind::MindEye).get(&skill.skill_name) * MIND_EYE_WEIGHT;
        let shared = keyword_bonus + penetration + mind_eye;

        let hp = base * (1.0 + hp_bonus + shared) * weakness;
        let dp = base * (1.0 + dp_bonus + shared) * weakness;
        AttackScore {
            overall: hp.max(dp),
            hp,
            dp,
            weakness,
        }
    }

    pub fn support_skill_score(&self, skill: &Skill) -> f64 {
        let notes = skill.notes.as_str();
        let name = skill.skill_name.as_str();
        let mut score = count_keywords(notes, SUPPORT_KEYWORDS) as f64;
        if notes.contains(HEAL_MARKER) {
            score += 0.4;
        }
        score += self.knowledge.buff(BuffKind::SkillAttack).get(name) * 10.0;
        score += self.knowledge.buff(BuffKind::ElementAttack).get(name) * 10.0;
        score += self.knowledge.buff(BuffKind::Charge).get(name) * 9.0;
        score += self.knowledge.buff(BuffKind::CritDamage).get(name) * 7.0;
        score += self.knowledge.buff(BuffKind::CritRate).get(name) * 7.0;
        score += self.knowledge.buff(BuffKind::Field).get(name) * 8.0;
        score
    }

    pub fn debuff_skill_score(&self, skill: &Skill) -> f64 {
        let notes = skill.notes.as_str();
        let mut score = count_keywords(notes, DEBUFF_KEYWORDS) as f64;

        let debuff_trait = self.knowledge.debuff_trait(&skill.skill_name);
        if !debuff_trait.is_empty() {
            score += 2.0;
            if debuff_trait.contains(VULNERABILITY_MARKER) {
                score += 0.7;
            }
            if debuff_trait.contains(TRAIT_DP_MARKER) || debuff_trait.contains(TRAIT_RESISTANCE_MARKER) {
                score += 0.5;
            }
        }
        if notes.contains(DEFENSE_DOWN_MARKER) {
            score += 1.0;
        }
        if notes.contains(VULNERABILITY_MARKER) {
            score += 1.0;
        }
        score
    }
}
