//! Team recommendation: resolve queries, score the candidate pool, assemble a
//! six-slot team, then estimate its damage and script the opening turns.

pub mod damage;
pub mod query;
pub mod selection;
pub mod skill_score;
pub mod style_score;
pub mod turn_plan;

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::data::knowledge::KnowledgeIndex;
use crate::data::loader::AdvisorData;
use crate::data::model::{Element, Enemy, Style, Weapon};

pub use damage::{DamageBreakdown, DamageEstimator, BASE_DAMAGE};
pub use query::{split_style_input, MatchTier, Resolution, SequenceRatio, Similarity, StyleQueryResolver};
pub use selection::{select_team, Selection};
pub use skill_score::{AttackScore, Preferences, SkillScorer};
pub use style_score::{classify_role, matching_role_rule, Role, RoleEvidence, SkillCatalog, StyleScore, StyleScorer};
pub use turn_plan::build_turn_plan;

pub const DEFAULT_TEAM_SIZE: usize = 6;
/// Added to a wanted style's total score before the selection passes.
pub const WANTED_BONUS: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendRequest {
    pub owned: Vec<String>,
    pub wanted: Vec<String>,
    pub enemy: Option<String>,
    pub weapon: Option<Weapon>,
    pub element: Option<Element>,
    pub team_size: usize,
}

impl Default for RecommendRequest {
    fn default() -> Self {
        Self {
            owned: Vec::new(),
            wanted: Vec::new(),
            enemy: None,
            weapon: None,
            element: None,
            team_size: DEFAULT_TEAM_SIZE,
        }
    }
}

impl RecommendRequest {
    fn preferences(&self) -> Preferences {
        Preferences {
            weapon: self.weapon,
            element: self.element,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamPlan<'a> {
    pub team: Vec<StyleScore<'a>>,
    pub main_attacker: Option<StyleScore<'a>>,
    pub enemy: Option<&'a Enemy>,
    pub estimated_damage: f64,
    pub relative_score: f64,
    pub turn_plan: Vec<String>,
    pub unmatched_owned: Vec<String>,
    pub unmatched_wanted: Vec<String>,
}

pub struct BattleAdvisor<'a> {
    data: &'a AdvisorData,
    knowledge: KnowledgeIndex,
    catalog: SkillCatalog<'a>,
    resolver: StyleQueryResolver<'a>,
}

impl<'a> BattleAdvisor<'a> {
    pub fn new(data: &'a AdvisorData) -> Self {
        Self::with_similarity(data, SequenceRatio)
    }

    /// Same as [BattleAdvisor::new] with a custom fuzzy matcher.
    pub fn with_similarity(
        data: &'a AdvisorData,
        similarity: impl Similarity + Send + Sync + 'static,
    ) -> Self {
        Self {
            data,
            knowledge: KnowledgeIndex::from_tables(&data.knowledge),
            catalog: SkillCatalog::new(&data.skills),
            resolver: StyleQueryResolver::with_similarity(&data.styles, similarity),
        }
    }

    /// Exact name, else the first enemy whose name contains `name`.
    pub fn find_enemy(&self, name: &str) -> Option<&'a Enemy> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let enemies = &self.data.enemies;
        enemies
            .iter()
            .find(|enemy| enemy.name == name)
            .or_else(|| enemies.iter().find(|enemy| enemy.name.contains(name)))
    }

    pub fn resolve_style_queries<Q: AsRef<str>>(&self, queries: &[Q]) -> Resolution<'a> {
        self.resolver.resolve(queries)
    }

    pub fn score_style(
        &self,
        style: &'a Style,
        enemy: Option<&Enemy>,
        prefs: &Preferences,
    ) -> StyleScore<'a> {
        StyleScorer::new(&self.catalog, &self.knowledge).score_style(style, enemy, prefs)
    }

    pub fn recommend(&self, request: &RecommendRequest) -> TeamPlan<'a> {
        let team_size = request.team_size.max(1);
        let owned = self.resolve_style_queries(&request.owned);
        let wanted = self.resolve_style_queries(&request.wanted);

        let pool = build_pool(&owned.styles, &wanted.styles, &self.data.styles);
        let enemy = request
            .enemy
            .as_deref()
            .and_then(|name| self.find_enemy(name));
        debug!(
            pool = pool.len(),
            enemy = enemy.map(|enemy| enemy.name.as_str()),
            "candidate pool built"
        );

        let prefs = request.preferences();
        let scorer = StyleScorer::new(&self.catalog, &self.knowledge);
        let mut scores: Vec<StyleScore<'a>> = pool
            .iter()
            .map(|style| scorer.score_style(style, enemy, &prefs))
            .collect();

        let pool_index: HashMap<&str, usize> = pool
            .iter()
            .enumerate()
            .map(|(index, style)| (style.style_name.as_str(), index))
            .collect();
        let wanted_indices: Vec<usize> = wanted
            .styles
            .iter()
            .filter_map(|style| pool_index.get(style.style_name.as_str()).copied())
            .collect();
        for &index in &wanted_indices {
            scores[index].total_score += WANTED_BONUS;
        }

        let selection = select_team(&scores, &wanted_indices, team_size);
        let team: Vec<StyleScore<'a>> = selection
            .ordered_team(team_size)
            .into_iter()
            .map(|index| scores[index].clone())
            .collect();
        let main_attacker = selection.main_attacker.map(|index| scores[index].clone());

        // Damage and the opening script see every selected member, including
        // wanted styles cut from `team` by the size limit.
        let selected: Vec<StyleScore<'a>> = selection
            .members
            .iter()
            .map(|&index| scores[index].clone())
            .collect();
        let breakdown = DamageEstimator::new(&self.knowledge).breakdown(
            &selected,
            main_attacker.as_ref(),
            enemy,
        );
        let estimated_damage = breakdown.map_or(0.0, |breakdown| breakdown.estimated_damage());
        let relative_score = breakdown.map_or(0.0, |breakdown| breakdown.relative_score());
        let turn_plan = build_turn_plan(&selected, main_attacker.as_ref(), enemy);

        info!(
            team = team.len(),
            selected = selected.len(),
            main_attacker = main_attacker.as_ref().map(StyleScore::style_name),
            estimated_damage,
            unmatched_owned = owned.unresolved.len(),
            unmatched_wanted = wanted.unresolved.len(),
            "recommendation ready"
        );

        TeamPlan {
            team,
            main_attacker,
            enemy,
            estimated_damage,
            relative_score,
            turn_plan,
            unmatched_owned: owned.unresolved,
            unmatched_wanted: wanted.unresolved,
        }
    }
}

/// Matched owned styles, or the full roster when none matched, with wanted styles
/// merged in. A style already in the pool keeps its position.
fn build_pool<'a>(owned: &[&'a Style], wanted: &[&'a Style], roster: &'a [Style]) -> Vec<&'a Style> {
    let mut pool: Vec<&'a Style> = if owned.is_empty() {
        roster.iter().collect()
    } else {
        owned.to_vec()
    };
    for &style in wanted {
        match pool
            .iter()
            .position(|candidate| candidate.style_name == style.style_name)
        {
            Some(position) => pool[position] = style,
            None => pool.push(style),
        }
    }
    pool
}
