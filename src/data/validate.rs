use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::data::knowledge::is_known_table;
use crate::data::loader::AdvisorData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

/// Check dataset invariants the advisor relies on. Never alters the data.
pub fn validate_dataset(data: &AdvisorData) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_styles(&mut report, data);
    validate_skills(&mut report, data);
    validate_enemies(&mut report, data);
    validate_knowledge(&mut report, data);
    report
}

fn validate_styles(report: &mut ValidationReport, data: &AdvisorData) {
    let mut seen = HashSet::new();
    for (index, style) in data.styles.iter().enumerate() {
        let context = format!("styles[{index}]");
        if style.style_name.trim().is_empty() {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.style_name"),
                "missing non-empty 'style_name'",
            );
            continue;
        }
        if !seen.insert(style.style_name.as_str()) {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.style_name"),
                format!("duplicate style_name '{}'", style.style_name),
            );
        }
        if style.character.trim().is_empty() {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.character"),
                format!("style '{}' has no character", style.style_name),
            );
        }
    }
}

fn validate_skills(report: &mut ValidationReport, data: &AdvisorData) {
    let characters: HashSet<&str> = data.styles.iter().map(|s| s.character.as_str()).collect();
    let mut first_index_by_name: HashMap<&str, usize> = HashMap::new();

    for (index, skill) in data.skills.iter().enumerate() {
        let context = format!("skills[{index}]");
        if skill.skill_name.trim().is_empty() {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.skill_name"),
                "missing non-empty 'skill_name'",
            );
        } else if let Some(first) = first_index_by_name.get(skill.skill_name.as_str()) {
            let earlier = &data.skills[*first];
            if earlier != skill {
                report.push(
                    ValidationSeverity::Warning,
                    format!("{context}.skill_name"),
                    format!(
                        "skill_name '{}' also used by skills[{first}]; knowledge lookups will merge them",
                        skill.skill_name
                    ),
                );
            }
        } else {
            first_index_by_name.insert(skill.skill_name.as_str(), index);
        }

        if !characters.contains(skill.owner_character.as_str()) {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.owner_character"),
                format!(
                    "owner_character '{}' matches no style; skill is never scored",
                    skill.owner_character
                ),
            );
        }
    }
}

fn validate_enemies(report: &mut ValidationReport, data: &AdvisorData) {
    for (index, enemy) in data.enemies.iter().enumerate() {
        if enemy.name.trim().is_empty() {
            report.push(
                ValidationSeverity::Error,
                format!("enemies[{index}].name"),
                "missing non-empty 'name'",
            );
        }
    }
}

fn validate_knowledge(report: &mut ValidationReport, data: &AdvisorData) {
    let mut keys: Vec<&String> = data.knowledge.keys().collect();
    keys.sort();
    for key in keys {
        let context = format!("knowledge.{key}");
        if !is_known_table(key) {
            report.push(
                ValidationSeverity::Info,
                context,
                format!("table '{key}' is not used by the advisor"),
            );
            continue;
        }
        if !matches!(data.knowledge.get(key), Some(Value::Array(_))) {
            report.push(
                ValidationSeverity::Warning,
                context,
                "expected array; table treated as empty",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_dataset;

    #[test]
    fn clean_dataset_has_no_diagnostics() {
        let data = parse_dataset(
            r#"{
                "styles": [{"style_name": "Flame", "character": "Ruka"}],
                "skills": [{"skill_name": "Blaze", "owner_character": "Ruka"}],
                "enemies": [{"name": "Boss"}],
                "knowledge": {"field_buffs": []}
            }"#,
        )
        .expect("dataset");
        let report = validate_dataset(&data);
        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    }

    #[test]
    fn duplicate_style_name_is_an_error() {
        let data = parse_dataset(
            r#"{"styles": [
                {"style_name": "Flame", "character": "Ruka"},
                {"style_name": "Flame", "character": "Yuki"}
            ]}"#,
        )
        .expect("dataset");
        let report = validate_dataset(&data);
        assert!(report.has_errors());
        assert!(report.diagnostics[0].message.contains("duplicate style_name"));
    }

    #[test]
    fn shared_skill_name_and_orphan_owner_are_warnings() {
        let data = parse_dataset(
            r#"{
                "styles": [{"style_name": "Flame", "character": "Ruka"}],
                "skills": [
                    {"skill_name": "Blaze", "owner_character": "Ruka", "multiplier": 2.0},
                    {"skill_name": "Blaze", "owner_character": "Ruka", "multiplier": 3.0},
                    {"skill_name": "Frost", "owner_character": "Nobody"}
                ],
                "knowledge": {"charge_buffs": {"bad": true}, "extras": []}
            }"#,
        )
        .expect("dataset");
        let report = validate_dataset(&data);
        assert!(!report.has_errors());
        assert_eq!(report.count(ValidationSeverity::Warning), 3);
        assert_eq!(report.count(ValidationSeverity::Info), 1);
    }
}
