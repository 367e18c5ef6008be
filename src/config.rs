use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct RenderDefaults {
    pub source: Option<String>,
    pub wide: bool,
    pub color: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct PodgridConfigFile {
    #[serde(default)]
    wide: bool,
    #[serde(default)]
    color: bool,
}

pub fn load() -> Result<RenderDefaults> {
    let Some(path) = discover_config_path() else {
        return Ok(RenderDefaults::default());
    };

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let parsed: PodgridConfigFile = serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;

    Ok(RenderDefaults {
        source: Some(path.display().to_string()),
        wide: parsed.wide,
        color: parsed.color,
    })
}

fn discover_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("PODGRID_CONFIG")
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }

    let cwd_candidates = [
        PathBuf::from("podgrid.yaml"),
        PathBuf::from("podgrid.yml"),
        PathBuf::from(".podgrid.yaml"),
    ];
    for candidate in cwd_candidates {
        if candidate.exists() {
            return Some(candidate);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let user_candidates = [
            PathBuf::from(&home).join(".config/podgrid/config.yaml"),
            PathBuf::from(&home).join(".config/podgrid/config.yml"),
            PathBuf::from(&home).join(".podgrid.yaml"),
        ];
        for candidate in user_candidates {
            if candidate.exists() {
                return Some(candidate);
            }
        }
    }

    None
}
