use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::advisor::{split_style_input, BattleAdvisor, RecommendRequest};
use crate::config::{clamp_team_size, AdvisorConfig};
use crate::data::validate::{validate_dataset, ValidationSeverity};
use crate::data::{load_dataset, AdvisorData, Element, Weapon};

#[derive(Debug, Parser)]
#[command(name = "hbr-advisor", about = "Recommend Heaven Burns Red teams from owned styles")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Recommend a team and print it as JSON.
    Recommend(RecommendArgs),
    /// Check the dataset for problems.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct RecommendArgs {
    /// Dataset path; defaults to HBR_ADVISOR_DATA or data/hbr_data.json.
    #[arg(long)]
    pub data: Option<PathBuf>,
    /// Owned styles, separated by commas, 、 or newlines. Repeatable.
    #[arg(long)]
    pub owned: Vec<String>,
    /// Styles that must be considered. Repeatable.
    #[arg(long)]
    pub wanted: Vec<String>,
    #[arg(long)]
    pub enemy: Option<String>,
    /// 斬, 突, 打 or slash, pierce, blunt.
    #[arg(long)]
    pub weapon: Option<Weapon>,
    /// 火, 氷, 雷, 光, 闇, 無 or their English names.
    #[arg(long)]
    pub element: Option<Element>,
    /// Capped to 1..=6.
    #[arg(long)]
    pub team_size: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long)]
    pub data: Option<PathBuf>,
}

pub fn run_with_args(args: &[String]) -> i32 {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            err.print().ok();
            return err.exit_code();
        }
    };
    let config = AdvisorConfig::from_env();

    match cli.command {
        Command::Recommend(args) => handle_recommend(args, &config),
        Command::Validate(args) => handle_validate(args, &config),
    }
}

fn load(data: Option<PathBuf>, config: &AdvisorConfig) -> Option<AdvisorData> {
    let path = data.unwrap_or_else(|| config.data_path.clone());
    match load_dataset(&path) {
        Ok(data) => Some(data),
        Err(err) => {
            eprintln!("{err}");
            None
        }
    }
}

fn split_all(raw: &[String]) -> Vec<String> {
    raw.iter().flat_map(|text| split_style_input(text)).collect()
}

fn handle_recommend(args: RecommendArgs, config: &AdvisorConfig) -> i32 {
    let Some(data) = load(args.data, config) else {
        return 1;
    };
    let request = RecommendRequest {
        owned: split_all(&args.owned),
        wanted: split_all(&args.wanted),
        enemy: args.enemy,
        weapon: args.weapon,
        element: args.element,
        team_size: clamp_team_size(args.team_size.unwrap_or(config.team_size)),
    };

    let advisor = BattleAdvisor::new(&data);
    let plan = advisor.recommend(&request);
    match serde_json::to_string_pretty(&plan) {
        Ok(json) => {
            println!("{json}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize team plan: {err}");
            1
        }
    }
}

fn handle_validate(args: ValidateArgs, config: &AdvisorConfig) -> i32 {
    let Some(data) = load(args.data, config) else {
        return 1;
    };
    let report = validate_dataset(&data);
    for diag in &report.diagnostics {
        println!("[{}] {}: {}", diag.severity, diag.context, diag.message);
    }

    let errors = report.count(ValidationSeverity::Error);
    let warnings = report.count(ValidationSeverity::Warning);
    if report.has_errors() {
        eprintln!("validation failed: {errors} error(s), {warnings} warning(s)");
        1
    } else {
        eprintln!("validation passed: {warnings} warning(s)");
        0
    }
}
