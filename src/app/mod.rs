use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    config::{AppConfig, NetConfig},
    database::DbManager,
    Result,
};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener) -> Self {
        App {
            app_state,
            listener,
        }
    }

    pub async fn build_from_config(config: &AppConfig) -> Result<Self> {
        let dm = DbManager::init(config).await?;
        let app_state = AppState::new(dm, &config.net_config);

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        let app = App::new(app_state, listener);
        Ok(app)
    }
}

pub struct InternalState {
    pub database_mgr: DbManager,
    pub static_dir: PathBuf,
    pub cors_allow_origins: Vec<String>,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(database_mgr: DbManager, net_config: &NetConfig) -> Self {
        AppState(Arc::new(InternalState {
            database_mgr,
            static_dir: PathBuf::from(&net_config.static_dir),
            cors_allow_origins: net_config.cors_allow_origins.clone(),
        }))
    }
}
