use std::env;
use std::path::PathBuf;

use image::Rgba;

use crate::packer::Packer;

#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    pub app_name: String,
    pub export_dir: PathBuf,
    /// Logical pixels per grid cell
    pub cell_size: u32,
    /// Logical pixels between cells and around the border
    pub gap: u32,
    pub scale: u32,
    pub background: Rgba<u8>,
    pub max_dimension: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub packer: Packer,
    pub orientation_aware: bool,
    pub export: ExportConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let strategy = var("COLLAGE_STRATEGY", "mosaic");
        let packer = strategy
            .trim()
            .parse::<Packer>()
            .map_err(|_| format!("Unknown packing strategy: {}", strategy))?;

        Ok(Config {
            packer,
            orientation_aware: var("COLLAGE_ORIENTATION_AWARE", "false").trim().parse()?,
            export: ExportConfig {
                app_name: var("COLLAGE_APP_NAME", "photo"),
                export_dir: PathBuf::from(var("COLLAGE_EXPORT_DIR", "./exports")),
                cell_size: non_zero("COLLAGE_CELL_SIZE", &var("COLLAGE_CELL_SIZE", "240"))?,
                gap: var("COLLAGE_GAP", "4").trim().parse()?,
                scale: non_zero("COLLAGE_EXPORT_SCALE", &var("COLLAGE_EXPORT_SCALE", "2"))?,
                background: parse_hex_color(&var("COLLAGE_BACKGROUND", "#ffffff"))?,
                max_dimension: var("COLLAGE_MAX_EXPORT_DIMENSION", "16384").trim().parse()?,
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            packer: Packer::Mosaic,
            orientation_aware: false,
            export: ExportConfig {
                app_name: "photo".to_string(),
                export_dir: PathBuf::from("./exports"),
                cell_size: 240,
                gap: 4,
                scale: 2,
                background: Rgba([255, 255, 255, 255]),
                max_dimension: 16384,
            },
        }
    }
}

fn non_zero(key: &str, value: &str) -> Result<u32, Box<dyn std::error::Error>> {
    let parsed: u32 = value.trim().parse()?;
    if parsed == 0 {
        return Err(format!("{} must be greater than zero", key).into());
    }
    Ok(parsed)
}

/// Parses `#rrggbb` into an opaque colour
fn parse_hex_color(value: &str) -> Result<Rgba<u8>, Box<dyn std::error::Error>> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(format!("Invalid colour '{}', expected #rrggbb", value).into());
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16);
    Ok(Rgba([channel(0..2)?, channel(2..4)?, channel(4..6)?, 255]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_default_impl() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("COLLAGE_STRATEGY", "fixed"),
            ("COLLAGE_APP_NAME", "snapbooth"),
            ("COLLAGE_EXPORT_SCALE", "3"),
            ("COLLAGE_BACKGROUND", "#102030"),
            ("COLLAGE_ORIENTATION_AWARE", "true"),
        ]))
        .unwrap();

        assert_eq!(config.packer, Packer::FixedStepGrid);
        assert!(config.orientation_aware);
        assert_eq!(config.export.app_name, "snapbooth");
        assert_eq!(config.export.scale, 3);
        assert_eq!(config.export.background, Rgba([0x10, 0x20, 0x30, 255]));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(Config::from_lookup(lookup(&[("COLLAGE_STRATEGY", "spiral")])).is_err());
        assert!(Config::from_lookup(lookup(&[("COLLAGE_CELL_SIZE", "big")])).is_err());
        assert!(Config::from_lookup(lookup(&[("COLLAGE_BACKGROUND", "white")])).is_err());
    }

    #[test]
    fn test_zero_scale_and_cell_size_are_errors() {
        assert!(Config::from_lookup(lookup(&[("COLLAGE_EXPORT_SCALE", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("COLLAGE_CELL_SIZE", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("COLLAGE_GAP", "0")])).is_ok());
    }
}
