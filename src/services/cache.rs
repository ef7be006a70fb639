//! Read-through fleet cache, refetched after every mutation

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard};

use crate::{
    error::AppResult,
    models::{
        equipment::Equipment,
        fleet::FleetEvents,
        project::ProjectShort,
        request::EquipmentRequest,
        LifecycleStage,
    },
    repository::FleetBackend,
};

/// Last fetched copy of the collections behind the fleet views
#[derive(Debug, Clone, Default)]
pub struct FleetSnapshot {
    /// Projects past the estimation stage
    pub projects: Vec<ProjectShort>,
    pub equipment: Vec<Equipment>,
    pub events: FleetEvents,
    pub requests: Vec<EquipmentRequest>,
    pub loaded: bool,
}

impl FleetSnapshot {
    pub fn equipment_by_id(&self, id: i32) -> Option<&Equipment> {
        self.equipment.iter().find(|e| e.id == id)
    }

    pub fn project_by_id(&self, id: i32) -> Option<&ProjectShort> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn request_by_id(&self, id: i32) -> Option<&EquipmentRequest> {
        self.requests.iter().find(|r| r.id == id)
    }
}

/// Which collections to refetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refresh {
    pub projects: bool,
    pub equipment: bool,
    pub events: bool,
    pub requests: bool,
}

impl Refresh {
    pub const ALL: Refresh = Refresh { projects: true, equipment: true, events: true, requests: true };
    pub const PROJECTS: Refresh = Refresh { projects: true, equipment: false, events: false, requests: false };
    pub const FLEET: Refresh = Refresh { projects: false, equipment: true, events: true, requests: false };
    pub const REQUESTS: Refresh = Refresh { projects: false, equipment: false, events: false, requests: true };
    pub const DECISIONS: Refresh = Refresh { projects: false, equipment: true, events: true, requests: true };
}

#[derive(Clone)]
pub struct FleetCache {
    backend: Arc<dyn FleetBackend>,
    snapshot: Arc<RwLock<FleetSnapshot>>,
}

impl FleetCache {
    pub fn new(backend: Arc<dyn FleetBackend>) -> Self {
        Self {
            backend,
            snapshot: Arc::new(RwLock::new(FleetSnapshot::default())),
        }
    }

    pub fn backend(&self) -> &dyn FleetBackend {
        self.backend.as_ref()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, FleetSnapshot> {
        self.snapshot.read().await
    }

    /// Refetch the selected collections; the snapshot is left untouched if any fetch fails
    pub async fn refresh(&self, what: Refresh) -> AppResult<()> {
        let backend = self.backend.as_ref();
        let (projects, equipment, events, requests) = tokio::try_join!(
            async {
                if what.projects {
                    backend.list_projects().await.map(Some)
                } else {
                    Ok(None)
                }
            },
            async {
                if what.equipment {
                    backend.list_equipment().await.map(Some)
                } else {
                    Ok(None)
                }
            },
            async {
                if what.events {
                    backend.fleet_events().await.map(Some)
                } else {
                    Ok(None)
                }
            },
            async {
                if what.requests {
                    backend.list_requests().await.map(Some)
                } else {
                    Ok(None)
                }
            },
        )?;

        let mut snapshot = self.snapshot.write().await;
        if let Some(projects) = projects {
            snapshot.projects = projects
                .into_iter()
                .filter(|p| p.lifecycle_stage != LifecycleStage::Estimation)
                .map(ProjectShort::from)
                .collect();
        }
        if let Some(equipment) = equipment {
            snapshot.equipment = equipment;
        }
        if let Some(events) = events {
            snapshot.events = events;
        }
        if let Some(requests) = requests {
            snapshot.requests = requests;
        }
        if what == Refresh::ALL {
            snapshot.loaded = true;
        }

        tracing::debug!(
            "Fleet cache refreshed: {} projects, {} equipment, {} assignments, {} services, {} movements, {} requests",
            snapshot.projects.len(),
            snapshot.equipment.len(),
            snapshot.events.assignments.len(),
            snapshot.events.services.len(),
            snapshot.events.movements.len(),
            snapshot.requests.len()
        );
        Ok(())
    }

    /// Refetch after a change the backend already accepted. A failed refetch
    /// keeps the previous snapshot and is only logged.
    pub async fn refresh_after_write(&self, what: Refresh) {
        if let Err(e) = self.refresh(what).await {
            tracing::warn!("Fleet cache refresh failed after update: {}", e);
        }
    }

    /// Load everything on first use
    pub async fn ensure_loaded(&self) -> AppResult<()> {
        if self.snapshot.read().await.loaded {
            return Ok(());
        }
        self.refresh(Refresh::ALL).await
    }
}
