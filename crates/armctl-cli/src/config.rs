//! Configuration vault: reads and writes `~/.armctl/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use armctl_types::{ArmConfig, ArmError};

/// Return the path to `~/.armctl/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".armctl").join("config.toml")
}

/// Load the config from a specific path.  Returns `None` if the file does not
/// exist.  Environment overrides are applied to whatever was read.
pub fn load_from(path: &Path) -> Result<Option<ArmConfig>, ArmError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|e| {
        ArmError::Config(format!("failed to read config at {}: {}", path.display(), e))
    })?;
    let mut cfg: ArmConfig = toml::from_str(&raw)
        .map_err(|e| ArmError::Config(format!("failed to parse {}: {}", path.display(), e)))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Load from `path`, or from the defaults with overrides applied when the
/// file is missing.
pub fn load_or_default(path: &Path) -> Result<ArmConfig, ArmError> {
    match load_from(path)? {
        Some(cfg) => Ok(cfg),
        None => {
            let mut cfg = ArmConfig::default();
            apply_env_overrides(&mut cfg);
            Ok(cfg)
        }
    }
}

/// Apply `ARMCTL_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `ARMCTL_REFLECTION_LIMIT` | `sensors.reflection_limit` |
/// | `ARMCTL_MOTOR_PERIOD_MS` | `periods.motor_ms` |
/// | `ARMCTL_REALTIME` | `scheduling.realtime` |
///
/// Values that do not parse are ignored.
pub fn apply_env_overrides(cfg: &mut ArmConfig) {
    if let Ok(v) = std::env::var("ARMCTL_REFLECTION_LIMIT")
        && let Ok(limit) = v.trim().parse::<i32>()
    {
        cfg.sensors.reflection_limit = limit;
    }
    if let Ok(v) = std::env::var("ARMCTL_MOTOR_PERIOD_MS")
        && let Ok(ms) = v.trim().parse::<u64>()
        && ms > 0
    {
        cfg.periods.motor_ms = ms;
    }
    if let Ok(v) = std::env::var("ARMCTL_REALTIME")
        && let Some(on) = parse_switch(&v)
    {
        cfg.scheduling.realtime = on;
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Save the config, creating the parent directory if necessary.
pub fn save_to(cfg: &ArmConfig, path: &Path) -> Result<(), ArmError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| ArmError::Config(format!("failed to create config directory: {}", e)))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700)).map_err(|e| {
                ArmError::Config(format!("failed to set config directory permissions: {}", e))
            })?;
        }
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| ArmError::Config(format!("failed to serialize config: {}", e)))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| {
                use std::io::Write;
                f.write_all(raw.as_bytes())
            })
            .map_err(|e| {
                ArmError::Config(format!("failed to write config at {}: {}", path.display(), e))
            })?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw).map_err(|e| {
        ArmError::Config(format!("failed to write config at {}: {}", path.display(), e))
    })?;
    Ok(())
}
