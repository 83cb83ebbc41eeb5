//! Layered exam configuration: defaults, then an optional TOML file, then CLI
//! flags (which clap already merges with the environment).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use exam_core::model::{
    ExamSettings, QuestionId, ScoringWeights, SpecialQuestionSettings, TimeLimit,
};

pub const DEFAULT_BANK: &str = "preguntas.json";

/// Contents of the `--config` file. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub bank: Option<PathBuf>,
    pub exam_size: Option<u32>,
    pub time_limit: Option<String>,
    pub scoring: Option<ScoringSection>,
    pub special: Option<SpecialSection>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringSection {
    pub correct: Option<f64>,
    pub incorrect: Option<f64>,
    pub skipped: Option<f64>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SpecialSection {
    pub enabled: Option<bool>,
    pub sentinel_id: Option<u64>,
    pub probability: Option<f64>,
}

/// Values taken from the command line or environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub bank: Option<PathBuf>,
    pub exam_size: Option<u32>,
    pub time_limit: Option<TimeLimit>,
    pub no_special: bool,
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub bank: PathBuf,
    pub settings: ExamSettings,
}

/// Read and parse a TOML config file.
///
/// # Errors
///
/// Fails if the file cannot be read or is not valid config TOML.
pub fn load_file(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_file(&content).with_context(|| format!("failed to parse config: {}", path.display()))
}

fn parse_file(content: &str) -> Result<FileConfig> {
    Ok(toml::from_str(content)?)
}

/// Merge the file layer and the overrides on top of the defaults.
///
/// # Errors
///
/// Fails if any merged value is rejected by settings validation.
pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<ResolvedConfig> {
    let defaults = ExamSettings::default();

    let time_limit = match (overrides.time_limit, file.time_limit) {
        (Some(limit), _) => limit,
        (None, Some(raw)) => raw
            .parse::<TimeLimit>()
            .with_context(|| format!("invalid time_limit in config: {raw}"))?,
        (None, None) => defaults.time_limit(),
    };

    let scoring = match file.scoring {
        Some(section) => {
            let base = defaults.scoring();
            ScoringWeights::new(
                section.correct.unwrap_or(base.correct()),
                section.incorrect.unwrap_or(base.incorrect()),
                section.skipped.unwrap_or(base.skipped()),
            )
            .context("invalid [scoring] section")?
        }
        None => defaults.scoring(),
    };

    let special = resolve_special(file.special, overrides.no_special)?;

    let settings = ExamSettings::new(
        overrides
            .exam_size
            .or(file.exam_size)
            .unwrap_or(defaults.exam_size()),
        time_limit,
        scoring,
        special,
    )
    .context("invalid exam settings")?;

    let bank = overrides
        .bank
        .or(file.bank)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BANK));

    Ok(ResolvedConfig { bank, settings })
}

fn resolve_special(
    section: Option<SpecialSection>,
    no_special: bool,
) -> Result<Option<SpecialQuestionSettings>> {
    if no_special {
        return Ok(None);
    }
    let Some(section) = section else {
        return Ok(Some(SpecialQuestionSettings::default()));
    };
    if section.enabled == Some(false) {
        return Ok(None);
    }
    let sentinel = QuestionId::new(
        section
            .sentinel_id
            .unwrap_or(SpecialQuestionSettings::DEFAULT_SENTINEL),
    );
    let probability = section
        .probability
        .unwrap_or(SpecialQuestionSettings::DEFAULT_PROBABILITY);
    let settings =
        SpecialQuestionSettings::new(sentinel, probability).context("invalid [special] section")?;
    Ok(Some(settings))
}
