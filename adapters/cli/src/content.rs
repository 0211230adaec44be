//! Campaign content loading.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use runebound_core::{CombatTuning, ContentTables, LevelGeometry};
use serde::Deserialize;

const BUILTIN_CAMPAIGN: &str = include_str!("../content/campaign.toml");

/// Content tables plus the layout and tuning sections of a campaign file.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Campaign {
    #[serde(flatten)]
    pub(crate) content: ContentTables,
    #[serde(default)]
    pub(crate) geometry: LevelGeometry,
    #[serde(default)]
    pub(crate) tuning: CombatTuning,
}

/// Reads and validates a campaign file from disk.
pub(crate) fn load(path: &Path) -> Result<Campaign> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read campaign file {}", path.display()))?;
    parse(&text).with_context(|| format!("invalid campaign file {}", path.display()))
}

/// Parses the campaign bundled with the binary.
pub(crate) fn builtin() -> Result<Campaign> {
    parse(BUILTIN_CAMPAIGN).context("bundled campaign is invalid")
}

fn parse(text: &str) -> Result<Campaign> {
    let campaign: Campaign = toml::from_str(text).context("failed to parse campaign TOML")?;
    campaign
        .content
        .validate()
        .context("campaign content failed validation")?;
    Ok(campaign)
}

#[cfg(test)]
mod tests {
    use super::*;
    use runebound_core::{EncounterKind, LevelId};

    #[test]
    fn builtin_campaign_is_valid() {
        let campaign = builtin().expect("bundled campaign parses");
        let level = LevelId::new(1);
        assert_eq!(campaign.content.enemies_for(level).count(), 3);
        assert!(campaign.content.boss_for(level).is_ok());
        assert!(campaign.content.start_encounter(level, false).is_ok());
        let kinds: Vec<EncounterKind> = campaign
            .content
            .allocatable_encounters(level)
            .map(|entry| entry.kind)
            .collect();
        assert_eq!(kinds.len(), 6);
        assert_eq!(campaign.geometry.front_line, 4.5);
        assert_eq!(campaign.tuning.player_max_health, 100);
    }

    #[test]
    fn invalid_content_is_rejected_with_context() {
        let text = r#"
            [[levels]]
            level = 1

            [[levels]]
            level = 1
        "#;
        let error = parse(text).expect_err("duplicate levels are rejected");
        let message = format!("{error:#}");
        assert!(message.contains("failed validation"));
        assert!(message.contains("defined more than once"));
    }

    #[test]
    fn missing_sections_use_defaults() {
        let campaign = parse("").expect("empty campaign parses");
        assert!(campaign.content.levels.is_empty());
        assert_eq!(campaign.geometry, LevelGeometry::default());
    }
}
