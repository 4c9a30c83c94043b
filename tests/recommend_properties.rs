use std::collections::HashSet;

use hbr_advisor::advisor::{BattleAdvisor, RecommendRequest};
use hbr_advisor::data::{AdvisorData, Skill, Style};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct StyleSeed {
    character: usize,
    multiplier: f64,
    attack_bonus: f64,
    notes: &'static str,
}

fn arb_notes() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just(""),
        Just("対HPダメージ+20%"),
        Just("対DPダメージ+50%"),
        Just("味方にバフ"),
        Just("敵に防御ダウン"),
        Just("脆弱 付与"),
    ]
}

fn arb_seed() -> impl Strategy<Value = StyleSeed> {
    (0usize..6, 0.0f64..8.0, 0.0f64..0.5, arb_notes()).prop_map(
        |(character, multiplier, attack_bonus, notes)| StyleSeed {
            character,
            multiplier,
            attack_bonus,
            notes,
        },
    )
}

fn build_dataset(seeds: &[StyleSeed]) -> AdvisorData {
    let mut data = AdvisorData::default();
    for (index, seed) in seeds.iter().enumerate() {
        let style_name = format!("Style {index}");
        let character = format!("Character {}", seed.character);
        data.styles.push(Style {
            style_name: style_name.clone(),
            character: character.clone(),
            rarity: "S".to_string(),
            attack_bonus_no_lb: seed.attack_bonus,
            ..Style::default()
        });
        data.skills.push(Skill {
            skill_name: format!("Skill {index}"),
            owner_character: character,
            owner_style_hint: style_name,
            multiplier: seed.multiplier,
            notes: seed.notes.to_string(),
            ..Skill::default()
        });
    }
    data
}

proptest! {
    #[test]
    fn team_respects_size_and_character_uniqueness(
        seeds in prop::collection::vec(arb_seed(), 1..24),
        team_size in 1usize..=6,
    ) {
        let data = build_dataset(&seeds);
        let advisor = BattleAdvisor::new(&data);
        let plan = advisor.recommend(&RecommendRequest {
            team_size,
            ..RecommendRequest::default()
        });

        prop_assert!(!plan.team.is_empty());
        prop_assert!(plan.team.len() <= team_size);
        let characters: HashSet<&str> = plan.team.iter().map(|member| member.character()).collect();
        prop_assert_eq!(characters.len(), plan.team.len());

        let main = plan.main_attacker.as_ref().expect("non-empty pool has a main attacker");
        prop_assert_eq!(plan.team[0].style_name(), main.style_name());
    }

    #[test]
    fn recommendation_is_deterministic(
        seeds in prop::collection::vec(arb_seed(), 1..24),
        wanted in prop::collection::vec(0usize..24, 0..3),
    ) {
        let data = build_dataset(&seeds);
        let advisor = BattleAdvisor::new(&data);
        let request = RecommendRequest {
            wanted: wanted.iter().map(|index| format!("Style {index}")).collect(),
            ..RecommendRequest::default()
        };
        let first = advisor.recommend(&request);
        let second = advisor.recommend(&request);
        prop_assert_eq!(
            serde_json::to_string(&first).expect("serializes"),
            serde_json::to_string(&second).expect("serializes")
        );
    }
}
