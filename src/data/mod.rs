pub mod knowledge;
pub mod loader;
pub mod model;
pub mod validate;

pub use knowledge::{BuffKind, BuffMap, KnowledgeIndex};
pub use loader::{load_dataset, parse_dataset, AdvisorData, DataError, DEFAULT_DATA_PATH};
pub use model::{
    extract_percent_values, rarity_score, Element, Enemy, ParseSymbolError, Skill, Style, Weapon,
};
