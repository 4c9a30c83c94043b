//! Team recommendation engine for Heaven Burns Red styles.
//!
//! Load a dataset with [data::loader::load_dataset], build a
//! [advisor::BattleAdvisor] over it, and call
//! [advisor::BattleAdvisor::recommend] to get a [advisor::TeamPlan].

pub mod advisor;
pub mod cli;
pub mod config;
pub mod data;
