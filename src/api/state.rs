use std::sync::Arc;

use crate::upstream::StatsSource;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn StatsSource>,
}
