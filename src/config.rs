//! Runtime configuration read from the environment. Command-line flags win over
//! these values.

use std::env;
use std::path::PathBuf;

use crate::advisor::DEFAULT_TEAM_SIZE;
use crate::data::DEFAULT_DATA_PATH;

pub const DATA_PATH_VAR: &str = "HBR_ADVISOR_DATA";
pub const TEAM_SIZE_VAR: &str = "HBR_ADVISOR_TEAM_SIZE";
pub const LOG_FILTER_VAR: &str = "RUST_LOG";
pub const DEFAULT_LOG_FILTER: &str = "hbr_advisor=info";
pub const MAX_TEAM_SIZE: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorConfig {
    pub data_path: PathBuf,
    pub team_size: usize,
    pub log_filter: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            team_size: DEFAULT_TEAM_SIZE,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AdvisorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unset or unparsable values fall back
    /// to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let data_path = lookup(DATA_PATH_VAR)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);
        let team_size = lookup(TEAM_SIZE_VAR)
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(defaults.team_size);
        let log_filter = lookup(LOG_FILTER_VAR)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.log_filter);
        Self {
            data_path,
            team_size,
            log_filter,
        }
    }
}

pub fn clamp_team_size(team_size: usize) -> usize {
    team_size.clamp(1, MAX_TEAM_SIZE)
}
