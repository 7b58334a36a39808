use std::sync::Arc;

use mockable::Clock;

use crate::store::Store;

/// Built once in `main` and shared with every worker through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Source of "today" for the period auto-approval rule.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}
