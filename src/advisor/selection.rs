//! Greedy six-slot roster assembly under the one-style-per-character rule.
//!
//! Passes run in a fixed order, each with its own ranking, admission threshold and
//! stopping condition:
//!
//! 1. wanted styles, forced in query order
//! 2. main attacker, best attack score that fits
//! 3. debuffer, until a debuffer-role member exists
//! 4. buffer, until a buffer-role member exists
//! 5. secondary layer, until two strong supporters and two strong debuffers exist
//! 6. fill, by total score

use std::collections::HashSet;

use tracing::debug;

use crate::advisor::style_score::{Role, StyleScore};
use crate::data::model::Style;

pub const ROLE_PASS_THRESHOLD: f64 = 0.4;
pub const LAYER_SCORE: f64 = 2.0;
pub const LAYER_TARGET: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPass {
    Wanted,
    MainAttacker,
    Debuffer,
    Buffer,
    SecondaryLayer,
    Fill,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub members: Vec<usize>,
    pub main_attacker: Option<usize>,
}

struct Roster<'s, 'a> {
    scores: &'s [StyleScore<'a>],
    members: Vec<usize>,
    characters: HashSet<&'a str>,
    team_size: usize,
}

impl<'s, 'a> Roster<'s, 'a> {
    fn new(scores: &'s [StyleScore<'a>], team_size: usize) -> Self {
        Self {
            scores,
            members: Vec::with_capacity(team_size),
            characters: HashSet::new(),
            team_size,
        }
    }

    /// Admit `index` unless its character is already on the roster.
    fn try_add(&mut self, index: usize, pass: SelectionPass) -> bool {
        let style: &'a Style = self.scores[index].style;
        if !self.characters.insert(style.character.as_str()) {
            return false;
        }
        debug!(?pass, style = %style.style_name, role = %self.scores[index].role, "style selected");
        self.members.push(index);
        true
    }

    fn is_full(&self) -> bool {
        self.members.len() >= self.team_size
    }

    fn count(&self, predicate: impl Fn(&StyleScore<'a>) -> bool) -> usize {
        self.members
            .iter()
            .filter(|&&index| predicate(&self.scores[index]))
            .count()
    }

    fn has_role(&self, role: Role) -> bool {
        self.count(|score| score.role == role) > 0
    }

    /// Highest attack score on the roster; ties keep the earlier member.
    fn strongest_attacker(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for &index in &self.members {
            let better = best.map_or(true, |current| {
                self.scores[index].attack_score > self.scores[current].attack_score
            });
            if better {
                best = Some(index);
            }
        }
        best
    }
}

/// Pool indices ordered by descending `key`; equal keys keep pool order.
fn ranked_by(scores: &[StyleScore<'_>], key: impl Fn(&StyleScore<'_>) -> f64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&left, &right| {
        key(&scores[right]).total_cmp(&key(&scores[left]))
    });
    order
}

fn wanted_pass(roster: &mut Roster<'_, '_>, wanted: &[usize]) {
    for &index in wanted {
        roster.try_add(index, SelectionPass::Wanted);
    }
}

fn main_attacker_pass(roster: &mut Roster<'_, '_>) -> Option<usize> {
    ranked_by(roster.scores, |score| score.attack_score)
        .into_iter()
        .find(|&index| roster.try_add(index, SelectionPass::MainAttacker))
}

fn role_pass(
    roster: &mut Roster<'_, '_>,
    pass: SelectionPass,
    role: Role,
    key: fn(&StyleScore<'_>) -> f64,
) {
    for index in ranked_by(roster.scores, key) {
        if roster.is_full() || key(&roster.scores[index]) <= ROLE_PASS_THRESHOLD {
            break;
        }
        if roster.try_add(index, pass) && roster.has_role(role) {
            break;
        }
    }
}

fn secondary_layer_pass(roster: &mut Roster<'_, '_>) {
    for index in ranked_by(roster.scores, |score| score.support_score.max(score.debuff_score)) {
        if roster.is_full() {
            break;
        }
        if roster.try_add(index, SelectionPass::SecondaryLayer) {
            let supporters = roster.count(|score| score.support_score >= LAYER_SCORE);
            let debuffers = roster.count(|score| score.debuff_score >= LAYER_SCORE);
            if supporters >= LAYER_TARGET && debuffers >= LAYER_TARGET {
                break;
            }
        }
    }
}

fn fill_pass(roster: &mut Roster<'_, '_>) {
    for index in ranked_by(roster.scores, |score| score.total_score) {
        if roster.is_full() {
            break;
        }
        roster.try_add(index, SelectionPass::Fill);
    }
}

/// Run every pass over `scores`. `wanted` holds pool indices in query order.
///
/// Wanted styles and the main attacker are admitted even when that overflows
/// `team_size`; the caller truncates after moving the main attacker to the front.
pub fn select_team(scores: &[StyleScore<'_>], wanted: &[usize], team_size: usize) -> Selection {
    let mut roster = Roster::new(scores, team_size);

    wanted_pass(&mut roster, wanted);
    let mut main_attacker = main_attacker_pass(&mut roster);
    if main_attacker.is_none() {
        main_attacker = roster.strongest_attacker();
    }

    role_pass(&mut roster, SelectionPass::Debuffer, Role::Debuffer, |score| {
        score.debuff_score
    });
    role_pass(&mut roster, SelectionPass::Buffer, Role::Buffer, |score| {
        score.support_score
    });
    secondary_layer_pass(&mut roster);
    fill_pass(&mut roster);

    if main_attacker.is_none() {
        main_attacker = roster.strongest_attacker();
    }

    Selection {
        members: roster.members,
        main_attacker,
    }
}

impl Selection {
    /// Main attacker first, the rest in selection order, cut to `team_size`.
    pub fn ordered_team(&self, team_size: usize) -> Vec<usize> {
        let mut team = Vec::with_capacity(self.members.len());
        if let Some(main) = self.main_attacker {
            team.push(main);
        }
        team.extend(
            self.members
                .iter()
                .copied()
                .filter(|&index| Some(index) != self.main_attacker),
        );
        team.truncate(team_size);
        team
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(name: &str, character: &str) -> Style {
        Style {
            style_name: name.to_string(),
            character: character.to_string(),
            ..Style::default()
        }
    }

    fn score(style: &Style, role: Role, attack: f64, support: f64, debuff: f64) -> StyleScore<'_> {
        StyleScore {
            style,
            role,
            total_score: attack + support * 0.7 + debuff * 0.7,
            attack_score: attack,
            support_score: support,
            debuff_score: debuff,
            breaker_skill: None,
            finisher_skill: None,
            support_skill: None,
            debuff_skill: None,
            weakness_factor: 1.0,
        }
    }

    fn names(scores: &[StyleScore<'_>], indices: &[usize]) -> Vec<String> {
        indices
            .iter()
            .map(|&index| scores[index].style_name().to_string())
            .collect()
    }

    #[test]
    fn one_style_per_character() {
        let styles = [style("A1", "A"), style("A2", "A"), style("B1", "B")];
        let scores = vec![
            score(&styles[0], Role::Attacker, 10.0, 0.0, 0.0),
            score(&styles[1], Role::Attacker, 9.0, 0.0, 0.0),
            score(&styles[2], Role::Attacker, 1.0, 0.0, 0.0),
        ];
        let selection = select_team(&scores, &[], 6);
        assert_eq!(names(&scores, &selection.members), vec!["A1", "B1"]);
        assert_eq!(selection.main_attacker, Some(0));
    }

    #[test]
    fn wanted_first_then_main_attacker_leads_the_team() {
        let styles = [style("A1", "A"), style("B1", "B"), style("C1", "C")];
        let scores = vec![
            score(&styles[0], Role::Attacker, 1.0, 0.0, 0.0),
            score(&styles[1], Role::Attacker, 8.0, 0.0, 0.0),
            score(&styles[2], Role::Attacker, 3.0, 0.0, 0.0),
        ];
        let selection = select_team(&scores, &[0], 6);
        assert_eq!(names(&scores, &selection.members), vec!["A1", "B1", "C1"]);
        assert_eq!(names(&scores, &selection.ordered_team(6)), vec!["B1", "A1", "C1"]);
        assert_eq!(names(&scores, &selection.ordered_team(1)), vec!["B1"]);
    }

    #[test]
    fn main_attacker_falls_back_to_strongest_selected() {
        let styles = [style("A1", "A"), style("B1", "B")];
        let scores = vec![
            score(&styles[0], Role::Attacker, 2.0, 0.0, 0.0),
            score(&styles[1], Role::Attacker, 5.0, 0.0, 0.0),
        ];
        let selection = select_team(&scores, &[0, 1], 6);
        assert_eq!(selection.main_attacker, Some(1));
    }

    #[test]
    fn role_pass_may_admit_several_before_a_role_holder() {
        let styles = [
            style("Main", "M"),
            style("Hybrid", "H"),
            style("Hexer", "X"),
            style("Spare", "S"),
        ];
        let scores = vec![
            score(&styles[0], Role::Attacker, 10.0, 0.0, 0.0),
            // Strong debuff score but classified as an attacker.
            score(&styles[1], Role::Attacker, 1.0, 0.0, 3.0),
            score(&styles[2], Role::Debuffer, 0.5, 0.0, 2.5),
            score(&styles[3], Role::Attacker, 0.1, 0.0, 0.0),
        ];
        let mut roster = Roster::new(&scores, 6);
        roster.try_add(0, SelectionPass::MainAttacker);
        role_pass(&mut roster, SelectionPass::Debuffer, Role::Debuffer, |score| {
            score.debuff_score
        });
        assert_eq!(names(&scores, &roster.members), vec!["Main", "Hybrid", "Hexer"]);
    }

    #[test]
    fn role_pass_stops_at_threshold() {
        let styles = [style("Main", "M"), style("Weak", "W")];
        let scores = vec![
            score(&styles[0], Role::Attacker, 10.0, 0.0, 0.0),
            score(&styles[1], Role::Debuffer, 0.0, 0.0, 0.4),
        ];
        let mut roster = Roster::new(&scores, 6);
        roster.try_add(0, SelectionPass::MainAttacker);
        role_pass(&mut roster, SelectionPass::Debuffer, Role::Debuffer, |score| {
            score.debuff_score
        });
        assert_eq!(roster.members, vec![0]);
    }

    #[test]
    fn secondary_layer_takes_open_slots_until_layers_exist() {
        let styles: Vec<Style> = (0..8)
            .map(|i| style(&format!("S{i}"), &format!("C{i}")))
            .collect();
        let scores: Vec<StyleScore<'_>> = styles
            .iter()
            .enumerate()
            .map(|(i, style)| score(style, Role::Attacker, i as f64, 0.0, 0.0))
            .collect();
        // No member reaches the layer score, so the unthresholded secondary pass fills
        // the roster in pool order after the main attacker.
        let selection = select_team(&scores, &[], 3);
        assert_eq!(names(&scores, &selection.members), vec!["S7", "S0", "S1"]);
        assert_eq!(selection.main_attacker, Some(7));
    }

    #[test]
    fn fill_ranks_by_total_once_layers_are_met() {
        let styles = [
            style("Main", "M"),
            style("Hybrid1", "H1"),
            style("Hybrid2", "H2"),
            style("Low", "L1"),
            style("Mid", "L2"),
            style("High", "L3"),
        ];
        let scores = vec![
            score(&styles[0], Role::Attacker, 10.0, 0.0, 0.0),
            score(&styles[1], Role::Attacker, 0.0, 3.0, 3.0),
            score(&styles[2], Role::Attacker, 0.0, 3.0, 3.0),
            score(&styles[3], Role::Attacker, 0.0, 0.0, 0.0),
            score(&styles[4], Role::Attacker, 4.0, 0.0, 0.0),
            score(&styles[5], Role::Attacker, 5.0, 0.0, 0.0),
        ];
        let selection = select_team(&scores, &[], 5);
        assert_eq!(
            names(&scores, &selection.members),
            vec!["Main", "Hybrid1", "Hybrid2", "Low", "High"]
        );
    }

    #[test]
    fn equal_keys_keep_pool_order() {
        let styles = [style("First", "A"), style("Second", "B"), style("Third", "C")];
        let scores = vec![
            score(&styles[0], Role::Attacker, 1.0, 0.0, 0.0),
            score(&styles[1], Role::Attacker, 1.0, 0.0, 0.0),
            score(&styles[2], Role::Attacker, 1.0, 0.0, 0.0),
        ];
        assert_eq!(ranked_by(&scores, |score| score.attack_score), vec![0, 1, 2]);
        let selection = select_team(&scores, &[], 2);
        assert_eq!(names(&scores, &selection.members), vec!["First", "Second"]);
    }
}
