// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Finsheet", "finsheet"));

pub const ENV_WORKBOOK: &str = "FINSHEET_WORKBOOK";
pub const ENV_BACKEND: &str = "FINSHEET_BACKEND";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    Csv,
}

impl Backend {
    pub fn parse(s: &str) -> Result<Backend> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(Backend::Sqlite),
            "csv" => Ok(Backend::Csv),
            other => Err(anyhow!("Unknown backend '{}' (use sqlite|csv)", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend: Backend,
    pub workbook: Option<PathBuf>,
    pub currency_symbol: String,
    pub income_category: String,
    pub default_categories: Vec<String>,
    pub top_expenses: usize,
    pub ledger_sheet: String,
    pub cards_sheet: String,
    pub categories_sheet: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: Backend::Sqlite,
            workbook: None,
            currency_symbol: "R$".into(),
            income_category: "Salário".into(),
            default_categories: [
                "Salário",
                "Alimentação",
                "Transporte",
                "Lazer",
                "Gastos Fixos",
                "Outros",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            top_expenses: 5,
            ledger_sheet: "Transactions".into(),
            cards_sheet: "Cards".into(),
            categories_sheet: "Categories".into(),
        }
    }
}

impl Settings {
    /// Defaults, then `config.json`, then environment overrides. CLI flags go
    /// through `apply_overrides` afterwards.
    pub fn load() -> Result<Settings> {
        let mut settings = match config_path() {
            Some(path) if path.exists() => Settings::from_file(&path)?,
            _ => Settings::default(),
        };
        settings.apply_overrides(
            std::env::var(ENV_WORKBOOK).ok(),
            std::env::var(ENV_BACKEND).ok(),
        )?;
        Ok(settings)
    }

    pub fn from_file(path: &std::path::Path) -> Result<Settings> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Read config {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn apply_overrides(
        &mut self,
        workbook: Option<String>,
        backend: Option<String>,
    ) -> Result<()> {
        if let Some(w) = workbook.filter(|w| !w.trim().is_empty()) {
            self.workbook = Some(PathBuf::from(w.trim()));
        }
        if let Some(b) = backend.filter(|b| !b.trim().is_empty()) {
            self.backend = Backend::parse(&b)?;
        }
        Ok(())
    }

    /// Explicit location or the platform data dir default for the backend.
    pub fn workbook_location(&self) -> Result<PathBuf> {
        if let Some(p) = &self.workbook {
            return Ok(p.clone());
        }
        let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
            .context("Could not determine platform-specific data dir")?;
        let data_dir = proj.data_dir();
        fs::create_dir_all(data_dir).context("Failed to create data dir")?;
        Ok(match self.backend {
            Backend::Sqlite => data_dir.join("finsheet.sqlite"),
            Backend::Csv => data_dir.join("workbook"),
        })
    }
}

pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from(APP.0, APP.1, APP.2).map(|p| p.config_dir().join("config.json"))
}
