use std::sync::Arc;

use educonnect_auth::AuthContext;
use educonnect_config::{ApiConfig, TimetableConfig};

use crate::api::{HttpTimetableApi, TimetableApi};

/// Everything a timetable view needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub api_config: ApiConfig,
    pub timetable_config: TimetableConfig,
    pub auth: AuthContext,
    pub api: Arc<dyn TimetableApi>,
}

impl AppState {
    /// Wire the HTTP client to a shared auth context.
    pub fn new(
        api_config: ApiConfig,
        timetable_config: TimetableConfig,
        auth: AuthContext,
    ) -> Result<Self, reqwest::Error> {
        let api = HttpTimetableApi::new(api_config.clone(), auth.clone())?;
        Ok(Self {
            api_config,
            timetable_config,
            auth,
            api: Arc::new(api),
        })
    }
}

/// Build state from `EDUCONNECT_*` environment variables.
pub fn init_app_state() -> Result<AppState, reqwest::Error> {
    AppState::new(
        ApiConfig::from_env(),
        TimetableConfig::from_env(),
        AuthContext::new(),
    )
}
