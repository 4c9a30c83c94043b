//! Knowledge tables: curated per-skill buff magnitudes and debuff traits from the workbook.
//!
//! Each table is indexed independently by skill name. A skill may appear in several
//! tables (an attack buff that also raises crit damage), and each table carries its
//! own weighting downstream, so the maps are never merged.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{debug, warn};

pub const DEBUFF_TRAITS_TABLE: &str = "debuff_traits";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuffKind {
    SkillAttack,
    ElementAttack,
    Charge,
    CritDamage,
    CritRate,
    Field,
    MindEye,
    Penetration,
}

impl BuffKind {
    pub const ALL: [BuffKind; 8] = [
        BuffKind::SkillAttack,
        BuffKind::ElementAttack,
        BuffKind::Charge,
        BuffKind::CritDamage,
        BuffKind::CritRate,
        BuffKind::Field,
        BuffKind::MindEye,
        BuffKind::Penetration,
    ];

    /// Buff families that mark a support skill as a dedicated buffer.
    pub const TEAM_BUFFS: [BuffKind; 6] = [
        BuffKind::SkillAttack,
        BuffKind::ElementAttack,
        BuffKind::Charge,
        BuffKind::Field,
        BuffKind::CritDamage,
        BuffKind::CritRate,
    ];

    pub fn table_key(&self) -> &'static str {
        match self {
            Self::SkillAttack => "skill_attack_buffs",
            Self::ElementAttack => "element_attack_buffs",
            Self::Charge => "charge_buffs",
            Self::CritDamage => "crit_damage_buffs",
            Self::CritRate => "crit_rate_buffs",
            Self::Field => "field_buffs",
            Self::MindEye => "mind_eye_buffs",
            Self::Penetration => "penetration_skills",
        }
    }

    pub fn value_column(&self) -> &'static str {
        match self {
            Self::CritDamage | Self::Field | Self::Penetration => "value",
            _ => "max_value",
        }
    }
}

pub fn is_known_table(key: &str) -> bool {
    key == DEBUFF_TRAITS_TABLE || BuffKind::ALL.iter().any(|kind| kind.table_key() == key)
}

/// Skill name -> normalized magnitude. Unknown names read as 0.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuffMap {
    values: HashMap<String, f64>,
}

impl BuffMap {
    pub fn get(&self, skill_name: &str) -> f64 {
        self.values.get(skill_name).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, skill_name: &str) -> bool {
        self.values.contains_key(skill_name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn insert(&mut self, skill_name: impl Into<String>, value: f64) {
        self.values.insert(skill_name.into(), value);
    }
}

#[derive(Debug, Clone, Default)]
pub struct KnowledgeIndex {
    skill_attack: BuffMap,
    element_attack: BuffMap,
    charge: BuffMap,
    crit_damage: BuffMap,
    crit_rate: BuffMap,
    field: BuffMap,
    mind_eye: BuffMap,
    penetration: BuffMap,
    debuff_traits: HashMap<String, String>,
}

impl KnowledgeIndex {
    pub fn from_tables(knowledge: &Map<String, Value>) -> Self {
        let mut index = KnowledgeIndex::default();
        for kind in BuffKind::ALL {
            let map = build_buff_map(kind, knowledge.get(kind.table_key()));
            debug!(table = kind.table_key(), entries = map.len(), "knowledge table indexed");
            *index.buff_mut(kind) = map;
        }
        index.debuff_traits = build_debuff_trait_map(knowledge.get(DEBUFF_TRAITS_TABLE));
        index
    }

    pub fn buff(&self, kind: BuffKind) -> &BuffMap {
        match kind {
            BuffKind::SkillAttack => &self.skill_attack,
            BuffKind::ElementAttack => &self.element_attack,
            BuffKind::Charge => &self.charge,
            BuffKind::CritDamage => &self.crit_damage,
            BuffKind::CritRate => &self.crit_rate,
            BuffKind::Field => &self.field,
            BuffKind::MindEye => &self.mind_eye,
            BuffKind::Penetration => &self.penetration,
        }
    }

    pub fn buff_mut(&mut self, kind: BuffKind) -> &mut BuffMap {
        match kind {
            BuffKind::SkillAttack => &mut self.skill_attack,
            BuffKind::ElementAttack => &mut self.element_attack,
            BuffKind::Charge => &mut self.charge,
            BuffKind::CritDamage => &mut self.crit_damage,
            BuffKind::CritRate => &mut self.crit_rate,
            BuffKind::Field => &mut self.field,
            BuffKind::MindEye => &mut self.mind_eye,
            BuffKind::Penetration => &mut self.penetration,
        }
    }

    /// `"{effect_type} {resistance}"` for the skill, or "" when it has no trait row.
    pub fn debuff_trait(&self, skill_name: &str) -> &str {
        self.debuff_traits
            .get(skill_name)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn has_debuff_trait(&self, skill_name: &str) -> bool {
        self.debuff_traits.contains_key(skill_name)
    }

    pub fn insert_debuff_trait(&mut self, skill_name: impl Into<String>, text: impl Into<String>) {
        self.debuff_traits.insert(skill_name.into(), text.into());
    }

    pub fn is_team_buff(&self, skill_name: &str) -> bool {
        BuffKind::TEAM_BUFFS
            .iter()
            .any(|kind| self.buff(*kind).contains(skill_name))
    }
}

/// Workbook values are often percent-like (30 for 30%); anything above 2.0 is scaled down.
pub fn percentize(value: f64) -> f64 {
    if value > 2.0 {
        value / 100.0
    } else {
        value
    }
}

fn table_rows(table: Option<&Value>) -> &[Value] {
    match table {
        Some(Value::Array(rows)) => rows,
        _ => &[],
    }
}

fn row_skill_name(row: &Map<String, Value>) -> Option<String> {
    let name = match row.get("skill_name")? {
        Value::String(text) => text.trim().to_string(),
        Value::Null => return None,
        other => other.to_string(),
    };
    (!name.is_empty()).then_some(name)
}

fn row_text(row: &Map<String, Value>, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn row_number(row: &Map<String, Value>, column: &str) -> f64 {
    match row.get(column) {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(Value::String(text)) => text.trim().parse::<f64>().unwrap_or(0.0),
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    }
}

/// Object rows with a usable skill name. Skipped rows are reported once per table.
fn named_rows<'v>(table_key: &str, table: Option<&'v Value>) -> Vec<(String, &'v Map<String, Value>)> {
    let rows = table_rows(table);
    let named: Vec<_> = rows
        .iter()
        .filter_map(|row| match row {
            Value::Object(row) => row_skill_name(row).map(|name| (name, row)),
            _ => None,
        })
        .collect();
    let skipped = rows.len() - named.len();
    if skipped > 0 {
        warn!(table = table_key, skipped, "skipped malformed knowledge rows");
    }
    named
}

fn build_buff_map(kind: BuffKind, table: Option<&Value>) -> BuffMap {
    let mut map = BuffMap::default();
    for (skill_name, row) in named_rows(kind.table_key(), table) {
        map.insert(skill_name, percentize(row_number(row, kind.value_column())));
    }
    map
}

fn build_debuff_trait_map(table: Option<&Value>) -> HashMap<String, String> {
    named_rows(DEBUFF_TRAITS_TABLE, table)
        .into_iter()
        .map(|(skill_name, row)| {
            let effect = row_text(row, "effect_type");
            let resistance = row_text(row, "resistance");
            (skill_name, format!("{effect} {resistance}").trim().to_string())
        })
        .collect()
}
