//! Config file discovery.

use std::path::{Path, PathBuf};

/// Where the config file is expected, and whether the user asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub path: PathBuf,
    /// Named on the command line or in `ROTATO_CONFIG_PATH`. A missing
    /// explicit file is an error; a missing default file means defaults.
    pub explicit: bool,
}

pub fn resolve_config_path(explicit: Option<PathBuf>, home: Option<&Path>) -> ConfigLocation {
    if let Some(path) = explicit {
        return ConfigLocation {
            path,
            explicit: true,
        };
    }

    let path = match home {
        Some(home) => home.join(".rotato").join("config.yaml"),
        None => PathBuf::from("rotato-config.yaml"),
    };
    ConfigLocation {
        path,
        explicit: false,
    }
}

pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}
