//! Aggregate a style's skills into a single [StyleScore] and classify its role.

use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::advisor::skill_score::{
    contains_any, Preferences, SkillScorer, DEBUFF_KEYWORDS, DEFENSE_DOWN_MARKER,
    SUPPORT_KEYWORDS, VULNERABILITY_MARKER,
};
use crate::data::knowledge::KnowledgeIndex;
use crate::data::model::{rarity_score, Enemy, Skill, Style};

const PASSIVE_KEYWORD_BONUS: f64 = 0.8;
const SUPPORT_WEIGHT: f64 = 0.7;
const DEBUFF_WEIGHT: f64 = 0.7;
const ROLE_CUTOFF_FLOOR: f64 = 1.6;
const ROLE_CUTOFF_ATTACK_SHARE: f64 = 0.12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Attacker,
    Buffer,
    Debuffer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attacker => "attacker",
            Self::Buffer => "buffer",
            Self::Debuffer => "debuffer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn serialize_skill_name<S: Serializer>(skill: &Option<&Skill>, serializer: S) -> Result<S::Ok, S::Error> {
    match skill {
        Some(skill) => serializer.serialize_some(&skill.skill_name),
        None => serializer.serialize_none(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleScore<'a> {
    pub style: &'a Style,
    pub role: Role,
    pub total_score: f64,
    pub attack_score: f64,
    pub support_score: f64,
    pub debuff_score: f64,
    #[serde(serialize_with = "serialize_skill_name")]
    pub breaker_skill: Option<&'a Skill>,
    #[serde(serialize_with = "serialize_skill_name")]
    pub finisher_skill: Option<&'a Skill>,
    #[serde(serialize_with = "serialize_skill_name")]
    pub support_skill: Option<&'a Skill>,
    #[serde(serialize_with = "serialize_skill_name")]
    pub debuff_skill: Option<&'a Skill>,
    pub weakness_factor: f64,
}

impl StyleScore<'_> {
    pub fn style_name(&self) -> &str {
        &self.style.style_name
    }

    pub fn character(&self) -> &str {
        &self.style.character
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RoleEvidence {
    /// Best support skill is listed in a team-buff knowledge table.
    pub curated_buff: bool,
    /// Best debuff skill has a trait row or a defense-down/vulnerability note.
    pub curated_debuff: bool,
    pub attack_score: f64,
    pub support_score: f64,
    pub debuff_score: f64,
}

impl RoleEvidence {
    pub fn cutoff(&self) -> f64 {
        ROLE_CUTOFF_FLOOR.max(self.attack_score * ROLE_CUTOFF_ATTACK_SHARE)
    }
}

pub struct RoleRule {
    pub name: &'static str,
    pub role: Role,
    pub applies: fn(&RoleEvidence) -> bool,
}

fn has_curated_buff(evidence: &RoleEvidence) -> bool {
    evidence.curated_buff
}

fn has_curated_debuff(evidence: &RoleEvidence) -> bool {
    evidence.curated_debuff
}

fn debuff_dominates(evidence: &RoleEvidence) -> bool {
    evidence.debuff_score >= evidence.cutoff() && evidence.debuff_score >= evidence.support_score
}

fn support_over_cutoff(evidence: &RoleEvidence) -> bool {
    evidence.support_score >= evidence.cutoff()
}

/// Evaluated top to bottom; the first rule that applies decides. No match means attacker.
pub const ROLE_RULES: &[RoleRule] = &[
    RoleRule {
        name: "curated team buff",
        role: Role::Buffer,
        applies: has_curated_buff,
    },
    RoleRule {
        name: "curated debuff",
        role: Role::Debuffer,
        applies: has_curated_debuff,
    },
    RoleRule {
        name: "debuff score over cutoff",
        role: Role::Debuffer,
        applies: debuff_dominates,
    },
    RoleRule {
        name: "support score over cutoff",
        role: Role::Buffer,
        applies: support_over_cutoff,
    },
];

pub fn matching_role_rule(evidence: &RoleEvidence) -> Option<&'static RoleRule> {
    ROLE_RULES.iter().find(|rule| (rule.applies)(evidence))
}

pub fn classify_role(evidence: &RoleEvidence) -> Role {
    match matching_role_rule(evidence) {
        Some(rule) => {
            debug!(rule = rule.name, role = %rule.role, "role rule matched");
            rule.role
        }
        None => Role::Attacker,
    }
}

#[derive(Debug, Clone, Default)]
pub struct SkillCatalog<'a> {
    by_character: HashMap<&'a str, Vec<&'a Skill>>,
    by_style_hint: HashMap<&'a str, Vec<&'a Skill>>,
}

impl<'a> SkillCatalog<'a> {
    pub fn new(skills: &'a [Skill]) -> Self {
        let mut catalog = SkillCatalog::default();
        for skill in skills {
            catalog
                .by_character
                .entry(skill.owner_character.as_str())
                .or_default()
                .push(skill);
            if !skill.owner_style_hint.is_empty() {
                catalog
                    .by_style_hint
                    .entry(skill.owner_style_hint.as_str())
                    .or_default()
                    .push(skill);
            }
        }
        catalog
    }

    /// Skills tagged with the style's exact name; else the character's skills whose hint
    /// mentions the alias; else every skill of the character.
    pub fn candidate_skills(&self, style: &Style) -> Vec<&'a Skill> {
        if let Some(tagged) = self.by_style_hint.get(style.style_name.as_str()) {
            if !tagged.is_empty() {
                return tagged.clone();
            }
        }

        let character_skills = self
            .by_character
            .get(style.character.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        if !style.alias.is_empty() {
            let by_alias: Vec<&'a Skill> = character_skills
                .iter()
                .copied()
                .filter(|skill| skill.owner_style_hint.contains(style.alias.as_str()))
                .collect();
            if !by_alias.is_empty() {
                return by_alias;
            }
        }
        character_skills.to_vec()
    }
}

#[derive(Debug, Clone, Copy)]
struct Best<'a> {
    skill: Option<&'a Skill>,
    score: f64,
}

impl<'a> Best<'a> {
    fn new() -> Self {
        Self {
            skill: None,
            score: 0.0,
        }
    }

    /// Keep `skill` if it strictly beats the current best; ties keep the earlier skill.
    fn offer(&mut self, skill: &'a Skill, score: f64) -> bool {
        if score > self.score {
            self.skill = Some(skill);
            self.score = score;
            true
        } else {
            false
        }
    }
}

pub struct StyleScorer<'s, 'a> {
    catalog: &'s SkillCatalog<'a>,
    knowledge: &'s KnowledgeIndex,
    skills: SkillScorer<'s>,
}

impl<'s, 'a> StyleScorer<'s, 'a> {
    pub fn new(catalog: &'s SkillCatalog<'a>, knowledge: &'s KnowledgeIndex) -> Self {
        Self {
            catalog,
            knowledge,
            skills: SkillScorer::new(knowledge),
        }
    }

    pub fn score_style(
        &self,
        style: &'a Style,
        enemy: Option<&Enemy>,
        prefs: &Preferences,
    ) -> StyleScore<'a> {
        let mut best_overall = Best::new();
        let mut best_hp = Best::new();
        let mut best_dp = Best::new();
        let mut best_support = Best::new();
        let mut best_debuff = Best::new();
        let mut weakness_factor = 1.0;

        for skill in self.catalog.candidate_skills(style) {
            let attack = self.skills.attack_skill_score(skill, enemy, prefs);
            if best_overall.offer(skill, attack.overall) {
                weakness_factor = attack.weakness;
            }
            best_hp.offer(skill, attack.hp);
            best_dp.offer(skill, attack.dp);
            best_support.offer(skill, self.skills.support_skill_score(skill));
            best_debuff.offer(skill, self.skills.debuff_skill_score(skill));
        }

        let rarity = rarity_score(&style.rarity);
        let stat_boost = style.attack_bonus()
            + style.crit_damage_bonus() * 0.35
            + style.crit_rate_bonus() * 0.25
            + style.destruction_bonus() * 0.2;

        // DP enemies split the breaker (DP phase) from the finisher (HP phase).
        let two_phase = enemy.is_some_and(Enemy::has_dp_phase);
        let (finisher_skill, breaker_skill, mut attack_core) = if two_phase {
            (best_hp.skill, best_dp.skill, best_hp.score)
        } else {
            (best_overall.skill, best_overall.skill, best_overall.score)
        };
        if attack_core <= 0.0 {
            attack_core = best_overall.score;
        }

        let attack_score = attack_core * rarity * (1.0 + stat_boost);
        let mut support_score = (best_support.score + style.attack_bonus() * 3.0) * rarity;
        let mut debuff_score = (best_debuff.score + style.destruction_bonus() * 2.0) * rarity;

        let passive = style.passive_text();
        if contains_any(&passive, SUPPORT_KEYWORDS) {
            support_score += PASSIVE_KEYWORD_BONUS;
        }
        if contains_any(&passive, DEBUFF_KEYWORDS) {
            debuff_score += PASSIVE_KEYWORD_BONUS;
        }

        let evidence = RoleEvidence {
            curated_buff: best_support
                .skill
                .is_some_and(|skill| self.knowledge.is_team_buff(&skill.skill_name)),
            curated_debuff: best_debuff.skill.is_some_and(|skill| {
                self.knowledge.has_debuff_trait(&skill.skill_name)
                    || skill.notes.contains(DEFENSE_DOWN_MARKER)
                    || skill.notes.contains(VULNERABILITY_MARKER)
            }),
            attack_score,
            support_score,
            debuff_score,
        };
        let role = classify_role(&evidence);

        StyleScore {
            style,
            role,
            total_score: attack_score + support_score * SUPPORT_WEIGHT + debuff_score * DEBUFF_WEIGHT,
            attack_score,
            support_score,
            debuff_score,
            breaker_skill,
            finisher_skill,
            support_skill: best_support.skill,
            debuff_skill: best_debuff.skill,
            weakness_factor,
        }
    }
}
