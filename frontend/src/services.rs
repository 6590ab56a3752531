use crate::categories::manager::{category_backend, CategoryBackend};
use crate::config::AppConfig;
use crate::storage::preferences::{snapshot_backend, SnapshotBackend};
use crate::storage::DeviceStorage;
use std::rc::Rc;

/// Backends picked once at startup and shared through a yew context.
#[derive(Clone)]
pub struct AppServices {
    pub storage: DeviceStorage,
    pub snapshots: Rc<dyn SnapshotBackend>,
    pub categories: Rc<dyn CategoryBackend>,
}

impl PartialEq for AppServices {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.snapshots, &other.snapshots)
            && Rc::ptr_eq(&self.categories, &other.categories)
    }
}

impl AppServices {
    pub fn from_config(config: &AppConfig) -> Self {
        let storage = DeviceStorage::detect();
        log::info!("Persistence mode: {:?}", config.persistence);
        Self {
            snapshots: snapshot_backend(config.persistence, storage.clone()),
            categories: category_backend(config.persistence, storage.clone()),
            storage,
        }
    }
}
