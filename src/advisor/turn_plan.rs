//! Three-turn opening script for a selected team.

use crate::advisor::style_score::StyleScore;
use crate::data::model::Enemy;

const SETUP_SLOTS: usize = 2;

/// Turn 1 set-up, turn 2 break or refresh, turn 3 finish.
///
/// The main attacker never takes a set-up action.
pub fn build_turn_plan(
    team: &[StyleScore<'_>],
    main: Option<&StyleScore<'_>>,
    enemy: Option<&Enemy>,
) -> Vec<String> {
    let phase_has_dp = enemy.is_some_and(Enemy::has_dp_phase);
    vec![
        format!("Turn1: {}", setup_turn(team, main).join(" / ")),
        format!("Turn2: {}", break_turn(main, enemy, phase_has_dp).join(" / ")),
        format!("Turn3: {}", finish_turn(main, phase_has_dp)),
    ]
}

fn is_main(member: &StyleScore<'_>, main: Option<&StyleScore<'_>>) -> bool {
    main.is_some_and(|main| main.style_name() == member.style_name())
}

fn setup_turn(team: &[StyleScore<'_>], main: Option<&StyleScore<'_>>) -> Vec<String> {
    let others: Vec<&StyleScore<'_>> = team.iter().filter(|member| !is_main(member, main)).collect();
    let debuffers = others.iter().copied().filter_map(|member| {
        member
            .debuff_skill
            .map(|skill| (member.style_name(), skill.skill_name.as_str()))
    });
    let buffers = others.iter().copied().filter_map(|member| {
        member
            .support_skill
            .map(|skill| (member.style_name(), skill.skill_name.as_str()))
    });

    let mut listed: Vec<&str> = Vec::new();
    let mut actions = Vec::new();
    for (style_name, skill_name) in debuffers.take(SETUP_SLOTS).chain(buffers.take(SETUP_SLOTS)) {
        if listed.contains(&style_name) {
            continue;
        }
        listed.push(style_name);
        actions.push(format!("{style_name} -> {skill_name}"));
    }

    if actions.is_empty() {
        actions.push("prepare with buff/debuff role".to_string());
    }
    actions
}

fn break_turn(main: Option<&StyleScore<'_>>, enemy: Option<&Enemy>, phase_has_dp: bool) -> Vec<String> {
    let mut actions = Vec::new();
    if let Some(enemy) = enemy {
        actions.push(format!(
            "adjust element/weapon to the weakness multipliers of enemy {}",
            enemy.name
        ));
    }
    let breaker = main
        .filter(|_| phase_has_dp)
        .and_then(|main| main.breaker_skill.map(|skill| (main, skill)));
    match breaker {
        Some((main, skill)) => actions.push(format!(
            "{} -> {} to aim for a DP break",
            main.style_name(),
            skill.skill_name
        )),
        None => actions.push("prioritize SP recovery and buff refresh".to_string()),
    }
    actions
}

fn finish_turn(main: Option<&StyleScore<'_>>, phase_has_dp: bool) -> String {
    let Some(main) = main else {
        return "highest-damage role finishes".to_string();
    };
    match main.finisher_skill {
        Some(skill) if phase_has_dp => format!(
            "{} -> {} to finish the HP phase",
            main.style_name(),
            skill.skill_name
        ),
        Some(skill) => format!("{} -> {} to finish", main.style_name(), skill.skill_name),
        None => format!("{} uses its highest-multiplier skill", main.style_name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::style_score::Role;
    use crate::data::model::{Skill, Style};

    fn style(name: &str) -> Style {
        Style {
            style_name: name.to_string(),
            character: name.to_string(),
            ..Style::default()
        }
    }

    fn skill(name: &str) -> Skill {
        Skill {
            skill_name: name.to_string(),
            ..Skill::default()
        }
    }

    fn member<'a>(style: &'a Style, support: Option<&'a Skill>, debuff: Option<&'a Skill>) -> StyleScore<'a> {
        StyleScore {
            style,
            role: Role::Attacker,
            total_score: 0.0,
            attack_score: 0.0,
            support_score: 0.0,
            debuff_score: 0.0,
            breaker_skill: None,
            finisher_skill: None,
            support_skill: support,
            debuff_skill: debuff,
            weakness_factor: 1.0,
        }
    }

    #[test]
    fn empty_team_uses_generic_lines() {
        let plan = build_turn_plan(&[], None, None);
        assert_eq!(
            plan,
            vec![
                "Turn1: prepare with buff/debuff role".to_string(),
                "Turn2: prioritize SP recovery and buff refresh".to_string(),
                "Turn3: highest-damage role finishes".to_string(),
            ]
        );
    }

    #[test]
    fn setup_lists_debuffers_then_buffers_once_each() {
        let (lead, a, b, c) = (style("Lead"), style("A"), style("B"), style("C"));
        let (hex, rally, cheer, shout) = (skill("Hex"), skill("Rally"), skill("Cheer"), skill("Shout"));
        let finisher = skill("Blaze");
        let mut main = member(&lead, Some(&shout), Some(&hex));
        main.finisher_skill = Some(&finisher);
        let team = vec![
            main.clone(),
            member(&a, Some(&rally), Some(&hex)),
            member(&b, Some(&cheer), None),
            member(&c, Some(&shout), None),
        ];

        let plan = build_turn_plan(&team, Some(&main), None);
        // A is both a debuffer and a buffer; it is listed once, and the buffer slice
        // stops at B because only the first two buffers are considered.
        assert_eq!(plan[0], "Turn1: A -> Hex / B -> Cheer");
        assert_eq!(plan[2], "Turn3: Lead -> Blaze to finish");
    }

    #[test]
    fn dp_enemy_gets_break_and_hp_finish() {
        let lead = style("Lead");
        let (crack, blaze) = (skill("Crack"), skill("Blaze"));
        let mut main = member(&lead, None, None);
        main.breaker_skill = Some(&crack);
        main.finisher_skill = Some(&blaze);
        let golem = Enemy {
            name: "Golem".to_string(),
            dp: 100.0,
            ..Enemy::default()
        };

        let plan = build_turn_plan(std::slice::from_ref(&main), Some(&main), Some(&golem));
        assert_eq!(
            plan[1],
            "Turn2: adjust element/weapon to the weakness multipliers of enemy Golem / Lead -> Crack to aim for a DP break"
        );
        assert_eq!(plan[2], "Turn3: Lead -> Blaze to finish the HP phase");
    }

    #[test]
    fn main_without_finisher_uses_top_multiplier_line() {
        let lead = style("Lead");
        let main = member(&lead, None, None);
        let slime = Enemy {
            name: "Slime".to_string(),
            ..Enemy::default()
        };
        let plan = build_turn_plan(std::slice::from_ref(&main), Some(&main), Some(&slime));
        assert_eq!(
            plan[1],
            "Turn2: adjust element/weapon to the weakness multipliers of enemy Slime / prioritize SP recovery and buff refresh"
        );
        assert_eq!(plan[2], "Turn3: Lead uses its highest-multiplier skill");
    }
}
