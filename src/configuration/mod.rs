use config::{Config, ConfigError, File};
use notify::{recommended_watcher, Event, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::sync::mpsc::{channel, Receiver};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::topology::{Member, NodeRole, Snapshot};

#[derive(Debug, Deserialize)]
pub struct RawSettings {
    pub seeds: Vec<RawSeed>,
}

#[derive(Debug, Deserialize)]
pub struct RawSeed {
    pub node_id: String,
    pub addr: Option<String>,
    #[serde(default = "default_role")]
    pub role: NodeRole,
}

fn default_role() -> NodeRole {
    NodeRole::Primary
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load configuration")]
    Load(#[from] ConfigError),
    #[error("Seed {node_id} has an invalid address {addr:?}, expected host:port")]
    InvalidSeed { node_id: String, addr: String },
    #[error("Failed to watch configuration file")]
    Watch(#[from] notify::Error),
}

/// Seed members to bootstrap selection from before the first topology refresh.
#[derive(Debug, Clone)]
pub struct Settings {
    pub seeds: Vec<Member>,
}

impl Settings {
    /// Loads layered configuration from the working directory: `cluster.toml`
    /// as the base (mandatory in production), overlaid by an optional
    /// `<RUN_MODE>.toml`.
    pub fn new() -> Result<Self, SettingsError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let builder = Config::builder()
            .add_source(File::with_name("cluster").required(run_mode == "production"))
            .add_source(File::with_name(&run_mode).required(false))
            .build()?;

        let raw: RawSettings = builder.try_deserialize()?;
        raw.into_settings()
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let builder = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?;

        let raw: RawSettings = builder.try_deserialize()?;
        raw.into_settings()
    }

    /// Snapshot built from the configured seeds, for publishing before the
    /// first refresh lands.
    pub fn initial_snapshot(&self) -> Snapshot {
        Snapshot::new(self.seeds.clone())
    }

    /// Re-reads `path` on every file event and delivers each successfully
    /// parsed version on the returned channel. Failed reloads are logged and
    /// the previous settings stay in effect.
    pub fn watch(path: impl AsRef<Path>) -> Result<SettingsWatch, SettingsError> {
        let path = path.as_ref().to_path_buf();
        let (tx, rx) = channel();

        let reload_path = path.clone();
        let mut watcher: RecommendedWatcher =
            recommended_watcher(move |res: notify::Result<Event>| match res {
                Ok(_) => match Settings::from_file(&reload_path) {
                    Ok(new_settings) => {
                        info!("Reloaded configuration with {} seeds", new_settings.seeds.len());
                        if let Err(e) = tx.send(new_settings) {
                            warn!("Dropping configuration update: {:?}", e);
                        }
                    }
                    Err(e) => error!("Failed to reload configuration: {:?}", e),
                },
                Err(e) => error!("Configuration watch error: {:?}", e),
            })?;

        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        Ok(SettingsWatch {
            rx,
            _watcher: watcher,
        })
    }
}

impl RawSettings {
    fn into_settings(self) -> Result<Settings, SettingsError> {
        let mut seeds = Vec::with_capacity(self.seeds.len());
        for seed in self.seeds {
            // A seed may omit its address (a node still joining), but an
            // address that is present must carry a port.
            if let Some(addr) = &seed.addr {
                if addr.is_empty() || !addr.contains(':') {
                    return Err(SettingsError::InvalidSeed {
                        node_id: seed.node_id,
                        addr: addr.clone(),
                    });
                }
            }
            seeds.push(Member::new(seed.node_id, seed.addr, seed.role));
        }

        Ok(Settings { seeds })
    }
}

/// Live-reload handle. Dropping it stops the underlying file watcher, so keep
/// it alive for as long as updates should flow.
pub struct SettingsWatch {
    rx: Receiver<Settings>,
    _watcher: RecommendedWatcher,
}

impl SettingsWatch {
    pub fn updates(&self) -> &Receiver<Settings> {
        &self.rx
    }
}
