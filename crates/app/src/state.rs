//! Application state management

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use techsolutions_core::{
    Config, ContractLog, CredentialTable, Database, Error, Result, ServiceCatalog, SessionGuard,
    SystemClock,
};

/// Main application state
pub struct AppState {
    db: Database,
    config: Config,
    credentials: CredentialTable,
    clock: SystemClock,
    data_dir: PathBuf,
}

impl AppState {
    /// Open the data directory (platform default unless overridden) and
    /// start a fresh session scope
    pub fn new(data_dir: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => Self::data_path()?,
        };
        let config_path = config_path.unwrap_or_else(|| data_dir.join("config.toml"));
        let config = Config::load_or_default(&config_path)?;

        let state = Self::open_at(&data_dir, config)?;
        state.db.reset_session_scope()?;
        Ok(state)
    }

    /// Open with an explicit directory and config. Fails on account entries
    /// whose password hash does not parse.
    pub fn open_at(data_dir: &Path, config: Config) -> Result<Self> {
        let credentials = CredentialTable::from_accounts(&config.accounts)?;
        std::fs::create_dir_all(data_dir)?;

        let db_path = config
            .storage
            .path
            .clone()
            .unwrap_or_else(|| data_dir.join("techsolutions.db"));
        let db = Database::open(&db_path)?;
        tracing::info!(path = %db_path.display(), "Database opened");

        Ok(Self {
            db,
            credentials,
            config,
            clock: SystemClock,
            data_dir: data_dir.to_path_buf(),
        })
    }

    fn data_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("co", "techsolutions", "admin").ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine data directory",
            ))
        })?;

        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn clock(&self) -> &SystemClock {
        &self.clock
    }

    pub fn guard(&self) -> Result<SessionGuard<'_, Database>> {
        SessionGuard::open(
            &self.db,
            &self.credentials,
            &self.clock,
            self.config.auth.clone(),
        )
    }

    pub fn catalog(&self) -> Result<ServiceCatalog<'_, Database>> {
        ServiceCatalog::load(&self.db)
    }

    pub fn contracts(&self) -> ContractLog<'_, Database> {
        ContractLog::new(&self.db)
    }
}
