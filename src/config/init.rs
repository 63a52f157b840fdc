use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use super::{get_config_path, get_default_log_path, Config};
use crate::inputs::TravelMode;
use crate::scoring::{validate_scoring, EmissionFactors, ScoringConfig};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Keep asking until the answer is a finite, non-negative number.
fn prompt_constant(message: &str, default: f64) -> Result<f64> {
    loop {
        let input = prompt_with_default(message, &default.to_string())?;
        match input.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => return Ok(v),
            Ok(_) => println!("  Invalid: must be non-negative. Try again."),
            Err(_) => println!("  Invalid: must be a non-negative number. Try again."),
        }
    }
}

fn prompt_scoring() -> Result<ScoringConfig> {
    let defaults = ScoringConfig::default();

    println!();
    println!("Screen time is turned into energy use per device.");
    let per_device_kwh_per_hour = prompt_constant(
        "kWh per device per hour of screen time",
        defaults.per_device_kwh_per_hour(),
    )?;

    println!();
    println!("AI usage is estimated in kg of CO2 per hour, then weighted in the eco score.");
    let ai_kg_co2_per_hour =
        prompt_constant("kg CO2 per hour of AI usage", defaults.ai_kg_co2_per_hour())?;
    let ai_weight = prompt_constant("Weight of AI emissions in the eco score", defaults.ai_weight())?;

    println!();
    let gadget_penalty = prompt_constant(
        "Eco score points lost per discarded gadget",
        defaults.gadget_penalty(),
    )?;

    println!();
    let emission_factors = if prompt_yes_no(
        "Commute emission factors - use defaults? (bus 0.08, petrol bike 0.10, e-scooter 0.02 kg/km)",
        true,
    )? {
        EmissionFactors::default()
    } else {
        let mut factors = EmissionFactors::default();
        for mode in TravelMode::ALL {
            let value = prompt_constant(
                &format!("  {} (kg CO2 per km)", mode),
                defaults.emission_factor(mode),
            )?;
            match mode {
                TravelMode::Walk => factors.walk = Some(value),
                TravelMode::Cycle => factors.cycle = Some(value),
                TravelMode::Bus => factors.bus = Some(value),
                TravelMode::PetrolBike => factors.petrol_bike = Some(value),
                TravelMode::ElectricScooter => factors.electric_scooter = Some(value),
            }
        }
        factors
    };

    Ok(ScoringConfig {
        per_device_kwh_per_hour: Some(per_device_kwh_per_hour),
        ai_kg_co2_per_hour: Some(ai_kg_co2_per_hour),
        ai_weight: Some(ai_weight),
        gadget_penalty: Some(gadget_penalty),
        emission_factors: Some(emission_factors),
    })
}

/// Write `config` as YAML to `path` atomically, creating parent directories.
///
/// Returns `false` without touching the file if it already exists and
/// `force` is not set.
pub fn write_config(path: &Path, config: &Config, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }

    if let Some(ref scoring) = config.scoring {
        if let Err(errors) = validate_scoring(scoring) {
            anyhow::bail!("Refusing to write invalid scoring config: {}", errors.join("; "));
        }
    }

    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    info!(path = %path.display(), "wrote config");
    Ok(true)
}

/// Create a config file, interactively unless `accept_defaults` is set.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, the default config path is used (and offered in the prompt).
pub fn run_init_wizard(default_path: Option<PathBuf>, accept_defaults: bool, force: bool) -> Result<()> {
    let default_config_path = default_path.unwrap_or_else(get_config_path);

    if accept_defaults {
        let config = Config {
            log_path: Some(get_default_log_path()),
            scoring: Some(ScoringConfig::default()),
        };
        if write_config(&default_config_path, &config, force)? {
            println!("Config written to {}", default_config_path.display());
        } else {
            println!(
                "Config already exists at {}. Use --force to overwrite.",
                default_config_path.display()
            );
        }
        return Ok(());
    }

    println!();
    println!("EcoLoop Configuration Wizard");
    println!("============================");

    // 1. Scoring constants
    println!();
    let scoring = if prompt_yes_no("Configure scoring constants? (n accepts defaults)", false)? {
        prompt_scoring()?
    } else {
        ScoringConfig::default()
    };

    // 2. Daily log location
    println!();
    let log_path = PathBuf::from(prompt_with_default(
        "Where should the daily log be kept?",
        &get_default_log_path().display().to_string(),
    )?);

    // 3. Config path
    println!();
    let config_path = PathBuf::from(prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?);

    let mut overwrite = force;
    if config_path.exists() && !force {
        overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 4. Write config
    let config = Config {
        log_path: Some(log_path),
        scoring: Some(scoring),
    };
    write_config(&config_path, &config, overwrite)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `ecoloop score` to log your first day.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use std::env;
    use std::fs;

    #[test]
    fn test_write_config_roundtrip() {
        let path = env::temp_dir().join("ecoloop_test_init_roundtrip.yaml");
        let _ = fs::remove_file(&path);

        let config = Config {
            log_path: Some(PathBuf::from("/tmp/ecoloop/eco_data.csv")),
            scoring: Some(ScoringConfig {
                gadget_penalty: Some(3.0),
                ..ScoringConfig::default()
            }),
        };
        assert!(write_config(&path, &config, false).unwrap());

        let loaded = load_config(Some(path.clone())).unwrap();
        assert_eq!(loaded, config);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_write_config_refuses_overwrite_without_force() {
        let path = env::temp_dir().join("ecoloop_test_init_overwrite.yaml");
        fs::write(&path, "log_path: /keep/me.csv\n").unwrap();

        let replacement = Config {
            log_path: None,
            scoring: Some(ScoringConfig::default()),
        };
        assert!(!write_config(&path, &replacement, false).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "log_path: /keep/me.csv\n");

        assert!(write_config(&path, &replacement, true).unwrap());
        let loaded = load_config(Some(path.clone())).unwrap();
        assert!(loaded.log_path.is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_write_config_rejects_invalid_scoring() {
        let path = env::temp_dir().join("ecoloop_test_init_invalid.yaml");
        let _ = fs::remove_file(&path);

        let config = Config {
            log_path: None,
            scoring: Some(ScoringConfig {
                ai_weight: Some(-1.0),
                ..ScoringConfig::default()
            }),
        };
        let err = write_config(&path, &config, false).unwrap_err();
        assert!(err.to_string().contains("scoring.ai_weight"));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_config_creates_parent_dirs() {
        let dir = env::temp_dir().join("ecoloop_test_init_dir");
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("config.yaml");

        let config = Config {
            log_path: Some(dir.join("eco_data.csv")),
            scoring: None,
        };
        assert!(write_config(&path, &config, false).unwrap());
        assert!(path.exists());

        let _ = fs::remove_dir_all(&dir);
    }
}
