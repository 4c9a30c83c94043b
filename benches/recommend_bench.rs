//! Recommendation throughput over synthetic rosters.
//!
//! Run with: `cargo bench`

use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hbr_advisor::advisor::{BattleAdvisor, RecommendRequest};
use hbr_advisor::data::{AdvisorData, Enemy, Skill, Style};

const WEAPONS: [&str; 3] = ["斬", "突", "打"];
const ELEMENTS: [&str; 6] = ["火", "氷", "雷", "光", "闇", "無"];
const NOTES: [&str; 4] = ["対HPダメージ+20%", "対DPダメージ+40%", "味方にバフ", "敵に防御ダウン"];

fn synthetic_roster(styles: usize, skills_per_style: usize) -> AdvisorData {
    let mut data = AdvisorData::default();
    for index in 0..styles {
        let style_name = format!("Style {index}");
        let character = format!("Character {}", index / 3);
        data.styles.push(Style {
            style_name: style_name.clone(),
            character: character.clone(),
            rarity: if index % 4 == 0 { "SS" } else { "S" }.to_string(),
            attack_bonus_no_lb: (index % 5) as f64 * 0.05,
            ..Style::default()
        });
        for slot in 0..skills_per_style {
            data.skills.push(Skill {
                skill_name: format!("Skill {index}-{slot}"),
                owner_character: character.clone(),
                owner_style_hint: style_name.clone(),
                weapon: WEAPONS[(index + slot) % WEAPONS.len()].to_string(),
                element: ELEMENTS[(index + slot) % ELEMENTS.len()].to_string(),
                multiplier: 1.0 + (slot % 7) as f64 * 0.5,
                notes: NOTES[(index + slot) % NOTES.len()].to_string(),
                ..Skill::default()
            });
        }
    }
    data.enemies.push(Enemy {
        name: "Bench Boss".to_string(),
        dp: 10_000.0,
        weapon_mult: BTreeMap::from([("斬".to_string(), 1.5)]),
        element_mult: BTreeMap::from([("火".to_string(), 2.0), ("氷".to_string(), 0.5)]),
        ..Enemy::default()
    });
    data
}

fn bench_recommend(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend");
    group.sample_size(50);

    for styles in [30usize, 120, 480] {
        let data = synthetic_roster(styles, 6);
        let advisor = BattleAdvisor::new(&data);
        let request = RecommendRequest {
            enemy: Some("Bench Boss".to_string()),
            ..RecommendRequest::default()
        };
        group.throughput(Throughput::Elements(styles as u64));
        group.bench_with_input(BenchmarkId::new("full_roster", styles), &request, |b, request| {
            b.iter(|| black_box(advisor.recommend(request)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_recommend);
criterion_main!(benches);
