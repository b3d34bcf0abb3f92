use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tallgrass_core::{GameState, Rules, SetupError, REFERENCE_LAYOUT};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to access {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse rules: {0}")]
    Rules(#[from] ron::error::SpannedError),
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error("failed to start logging: {0}")]
    Logging(String),
}

impl From<ConfigError> for io::Error {
    fn from(error: ConfigError) -> Self {
        io::Error::other(error.to_string())
    }
}

/// Parses a RON rules document such as `(encounter_rate: 0.5)`. Missing
/// fields keep their defaults.
pub fn parse_rules(text: &str) -> Result<Rules, ConfigError> {
    Ok(ron::de::from_str(text)?)
}

/// Builds the opening session from optional layout and rules files.
pub fn load_session(layout: Option<&Path>, rules: Option<&Path>) -> Result<GameState, ConfigError> {
    let rules = match rules {
        Some(path) => parse_rules(&read_file(path)?)?,
        None => Rules::default(),
    };
    let session = match layout {
        Some(path) => GameState::with_rules(&read_file(path)?, rules)?,
        None => GameState::with_rules(REFERENCE_LAYOUT, rules)?,
    };
    Ok(session)
}

/// Sends `log` output to `path`. Without a path nothing is initialised, so
/// the alternate screen is never written to.
pub fn init_logging(path: Option<&Path>) -> Result<(), ConfigError> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|e| ConfigError::Logging(e.to_string()))
}

pub fn seed_from_time() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    (now.as_secs() << 32) ^ now.subsec_nanos() as u64
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tallgrass_core::{DamageRange, Position};

    #[test]
    fn partial_rules_keep_defaults() {
        let rules = parse_rules("(encounter_rate: 0.5, counter_damage: (min: 1, max: 3))")
            .expect("rules");
        assert_eq!(rules.counter_damage, DamageRange::new(1, 3));
        assert_eq!(rules.spawn, Position::new(2, 2));
        assert_eq!(rules.log_capacity, 4);
        assert!((rules.encounter_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_rules_fail_session_setup() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("rules.ron");
        std::fs::write(&path, "(log_capacity: 0)").expect("write rules");

        let err = load_session(None, Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Setup(SetupError::Rules(_))));
    }

    #[test]
    fn bundled_assets_load() {
        let assets = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
        let session = load_session(
            Some(&assets.join("lakeside.txt")),
            Some(&assets.join("gentle.ron")),
        )
        .expect("bundled session");
        assert_eq!(session.world().width(), 16);
        assert_eq!(session.world().height(), 10);
        assert_eq!(session.rules().counter_damage, DamageRange::new(2, 6));
    }

    #[test]
    fn missing_layout_file_is_reported() {
        let err = load_session(Some(Path::new("/nonexistent/route.txt")), None).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
