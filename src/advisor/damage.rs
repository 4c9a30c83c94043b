//! Single-number damage proxy for an assembled team.
//!
//! Not a combat simulation: every factor is a heuristic layer multiplied onto a fixed
//! base, so relative scores compare teams against the same enemy.

use serde::Serialize;

use crate::advisor::style_score::{Role, StyleScore};
use crate::data::knowledge::{BuffKind, KnowledgeIndex};
use crate::data::model::Enemy;

pub const BASE_DAMAGE: f64 = 1_000_000.0;
pub const SUPPORT_LAYER_CAP: f64 = 2.2;
pub const DEBUFF_LAYER_CAP: f64 = 1.8;

const SUPPORT_LAYER_WEIGHTS: [(BuffKind, f64); 6] = [
    (BuffKind::SkillAttack, 0.7),
    (BuffKind::ElementAttack, 0.65),
    (BuffKind::Charge, 0.7),
    (BuffKind::Field, 0.55),
    (BuffKind::CritDamage, 0.45),
    (BuffKind::CritRate, 0.45),
];
const ROLE_SUPPORT_LAYER: f64 = 0.05;
const TRAIT_DEBUFF_LAYER: f64 = 0.12;
const ROLE_DEBUFF_LAYER: f64 = 0.08;
const LAYER_ROLE_SCORE: f64 = 2.0;

const CRIT_BASE: f64 = 1.5;
const CRIT_BONUS_CAP: f64 = 1.2;
const TEAM_CRIT_SHARE: f64 = 0.25;
const BREAK_PHASE_CAP: f64 = 0.85;
const BREAKER_MULT_WEIGHT: f64 = 0.045;
const BREAK_DEBUFF_WEIGHT: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DamageBreakdown {
    pub skill_mult: f64,
    pub weakness: f64,
    pub total_atk_bonus: f64,
    pub total_support_layers: f64,
    pub total_debuff_layers: f64,
    pub crit_factor: f64,
    pub break_phase_factor: f64,
}

impl DamageBreakdown {
    pub fn estimated_damage(&self) -> f64 {
        BASE_DAMAGE
            * self.skill_mult
            * (1.0 + self.total_atk_bonus + self.total_support_layers)
            * (1.0 + self.total_debuff_layers)
            * self.weakness
            * self.crit_factor
            * self.break_phase_factor
    }

    pub fn relative_score(&self) -> f64 {
        self.estimated_damage() / BASE_DAMAGE
    }
}

pub struct DamageEstimator<'k> {
    knowledge: &'k KnowledgeIndex,
}

impl<'k> DamageEstimator<'k> {
    pub fn new(knowledge: &'k KnowledgeIndex) -> Self {
        Self { knowledge }
    }

    /// `None` when there is no main attacker.
    pub fn breakdown(
        &self,
        team: &[StyleScore<'_>],
        main: Option<&StyleScore<'_>>,
        enemy: Option<&Enemy>,
    ) -> Option<DamageBreakdown> {
        let main = main?;
        let phase_has_dp = enemy.is_some_and(Enemy::has_dp_phase);

        let skill_mult = main
            .finisher_skill
            .map_or(1.0, |skill| skill.multiplier)
            .max(0.5);
        let weakness = main.weakness_factor.max(0.1);
        let total_atk_bonus: f64 = team.iter().map(|member| member.style.attack_bonus()).sum();

        let team_crit: f64 = team.iter().map(|member| member.style.crit_damage_bonus()).sum();
        let crit_factor = CRIT_BASE
            + CRIT_BONUS_CAP.min(main.style.crit_damage_bonus() + team_crit * TEAM_CRIT_SHARE);

        let total_support_layers = self.support_layers(team);
        let total_debuff_layers = self.debuff_layers(team);

        let mut break_phase_factor = 1.0;
        if phase_has_dp {
            let breaker_mult = main
                .breaker_skill
                .map_or(skill_mult, |skill| skill.multiplier)
                .max(0.5);
            break_phase_factor += BREAK_PHASE_CAP.min(
                breaker_mult * BREAKER_MULT_WEIGHT + total_debuff_layers * BREAK_DEBUFF_WEIGHT,
            );
        }

        Some(DamageBreakdown {
            skill_mult,
            weakness,
            total_atk_bonus,
            total_support_layers,
            total_debuff_layers,
            crit_factor,
            break_phase_factor,
        })
    }

    fn support_layers(&self, team: &[StyleScore<'_>]) -> f64 {
        let mut layers = 0.0;
        for member in team {
            if let Some(skill) = member.support_skill {
                layers += SUPPORT_LAYER_WEIGHTS
                    .iter()
                    .map(|(kind, weight)| self.knowledge.buff(*kind).get(&skill.skill_name) * weight)
                    .sum::<f64>();
            }
            if member.role == Role::Buffer || member.support_score >= LAYER_ROLE_SCORE {
                layers += ROLE_SUPPORT_LAYER;
            }
        }
        layers.min(SUPPORT_LAYER_CAP)
    }

    fn debuff_layers(&self, team: &[StyleScore<'_>]) -> f64 {
        let mut layers = 0.0;
        for member in team {
            if member
                .debuff_skill
                .is_some_and(|skill| self.knowledge.has_debuff_trait(&skill.skill_name))
            {
                layers += TRAIT_DEBUFF_LAYER;
            }
            if member.role == Role::Debuffer || member.debuff_score >= LAYER_ROLE_SCORE {
                layers += ROLE_DEBUFF_LAYER;
            }
        }
        layers.min(DEBUFF_LAYER_CAP)
    }
}
