use crate::model::{CategoryDefinition, SortBy};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to the template catalog (JSON or YAML)
    pub templates_path: String,
    /// Overrides the default favorites file location
    #[serde(default)]
    pub favorites_path: Option<String>,
    #[serde(default)]
    pub default_sort: SortBy,
    /// Known categories in sidebar order
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryDefinition>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            templates_path: String::new(),
            favorites_path: None,
            default_sort: SortBy::Popular,
            categories: default_categories(),
        }
    }
}

/// The four built-in engineering disciplines
pub fn default_categories() -> Vec<CategoryDefinition> {
    vec![
        CategoryDefinition::new(
            "structural",
            "Estructural",
            &[
                ("beams", "Vigas"),
                ("columns", "Columnas"),
                ("foundations", "Cimentaciones"),
                ("slabs", "Losas"),
                ("seismic", "Sismorresistencia"),
            ],
        ),
        CategoryDefinition::new(
            "electrical",
            "Eléctrica",
            &[
                ("loads", "Cargas"),
                ("wiring", "Conductores"),
                ("lighting", "Iluminación"),
                ("protection", "Protecciones"),
            ],
        ),
        CategoryDefinition::new(
            "architectural",
            "Arquitectónica",
            &[
                ("areas", "Áreas"),
                ("stairs", "Escaleras"),
                ("ventilation", "Ventilación"),
            ],
        ),
        CategoryDefinition::new(
            "hydraulic",
            "Hidrosanitaria",
            &[
                ("water_supply", "Agua potable"),
                ("drainage", "Drenaje"),
                ("pumps", "Bombeo"),
            ],
        ),
    ]
}

impl CatalogConfig {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".calc-templates"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn load() -> Option<CatalogConfig> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return None;
        }

        let contents = fs::read_to_string(&config_path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Favorites file: the override if set, otherwise next to the config
    pub fn favorites_file(&self) -> Option<PathBuf> {
        match &self.favorites_path {
            Some(path) => Some(PathBuf::from(path)),
            None => Self::config_dir().map(|dir| dir.join("template-favorites.json")),
        }
    }
}
