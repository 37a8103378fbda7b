use std::sync::Arc;

use crate::auth::keys::ApiKeys;
use crate::store::ConfigStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub keys: ApiKeys,
    pub store: ConfigStore,
}
