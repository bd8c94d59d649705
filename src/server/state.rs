use std::sync::Arc;
use std::time::Instant;

use crate::client::AdminBackend;
use crate::config::Settings;
use crate::template::{TemplateProvisioner, TemplateStore};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub backend: Arc<dyn AdminBackend>,
    pub template_store: Arc<TemplateStore>,
    pub provisioner: Arc<TemplateProvisioner>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(settings: Settings, backend: Arc<dyn AdminBackend>) -> Self {
        let template_store = Arc::new(TemplateStore::new(backend.clone()));
        let provisioner = Arc::new(TemplateProvisioner::new(backend.clone()));

        Self {
            settings: Arc::new(settings),
            backend,
            template_store,
            provisioner,
            start_time: Instant::now(),
        }
    }
}
