use crate::domain::Tuning;
use std::{env, io, path::Path, time::Duration};

// Runtime constants and env lookups (not gameplay tuning).

pub const DEFAULT_TICK_HZ: u32 = 90;
pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const UPDATE_BROADCAST_CAPACITY: usize = 128;

pub fn tick_interval() -> Duration {
    let hz = env::var("SIM_TICK_HZ")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|hz| *hz > 0)
        .unwrap_or(DEFAULT_TICK_HZ);
    Duration::from_secs_f64(1.0 / f64::from(hz))
}

pub fn input_channel_capacity() -> usize {
    env::var("SIM_INPUT_CHANNEL_CAPACITY")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|n| *n > 0)
        .unwrap_or(INPUT_CHANNEL_CAPACITY)
}

pub fn update_broadcast_capacity() -> usize {
    env::var("SIM_UPDATE_CHANNEL_CAPACITY")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|n| *n > 0)
        .unwrap_or(UPDATE_BROADCAST_CAPACITY)
}

pub fn tuning_path() -> Option<String> {
    env::var("SIM_TUNING_PATH").ok().filter(|p| !p.is_empty())
}

/// Loads gameplay tuning from `SIM_TUNING_PATH`, or defaults when unset.
pub fn load_tuning() -> io::Result<Tuning> {
    match tuning_path() {
        Some(path) => load_tuning_file(Path::new(&path)),
        None => Ok(Tuning::default()),
    }
}

pub fn load_tuning_file(path: &Path) -> io::Result<Tuning> {
    let text = std::fs::read_to_string(path)?;
    parse_tuning(&text).map_err(|e| {
        io::Error::other(format!("invalid tuning file {}: {e}", path.display()))
    })
}

/// Parses a TOML tuning document; missing keys keep their defaults.
pub fn parse_tuning(text: &str) -> Result<Tuning, toml::de::Error> {
    toml::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn when_document_is_empty_then_defaults_are_used() {
        let tuning = parse_tuning("").expect("empty document parses");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn when_document_overrides_some_keys_then_others_keep_defaults() {
        let tuning = parse_tuning(
            r#"
            [firearm]
            fire_cooldown_secs = 0.25
            eject_impulse = [0.5, -2.0, 0.0]

            [slide]
            charge_threshold = 0.8

            [magazine]
            one_at_a_time = false
            "#,
        )
        .expect("document parses");

        assert_eq!(tuning.firearm.fire_cooldown_secs, 0.25);
        assert_eq!(tuning.firearm.dry_cooldown_secs, 0.1);
        assert_eq!(tuning.firearm.eject_impulse, Vec3::new(0.5, -2.0, 0.0));
        assert_eq!(tuning.slide.charge_threshold, 0.8);
        assert_eq!(tuning.slide.blowback_depth, 0.65);
        assert!(!tuning.magazine.one_at_a_time);
        assert_eq!(tuning.magazine.capacity, 15);
    }

    #[test]
    fn when_value_has_wrong_type_then_parsing_fails() {
        assert!(parse_tuning("[magazine]\ncapacity = \"many\"\n").is_err());
    }

    #[test]
    fn when_tuning_file_is_missing_then_io_error_is_returned() {
        let result = load_tuning_file(Path::new("/nonexistent/sidearm-tuning.toml"));
        assert!(result.is_err());
    }
}
