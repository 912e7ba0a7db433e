//! Shared application state for all routes.

use crate::service::ScriptService;

#[derive(Clone)]
pub struct AppState {
    pub scripts: ScriptService,
}

impl AppState {
    pub fn new(scripts: ScriptService) -> Self {
        AppState { scripts }
    }
}
