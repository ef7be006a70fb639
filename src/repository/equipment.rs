//! Equipment fleet endpoints

use super::Repository;
use crate::{
    error::AppResult,
    models::equipment::{CreateEquipment, Equipment, UpdateEquipment},
};

impl Repository {
    /// List all equipment
    pub async fn equipment_list(&self) -> AppResult<Vec<Equipment>> {
        self.fetch(self.get("/equipment"), "fetch equipment").await
    }

    pub async fn equipment_create(&self, data: &CreateEquipment) -> AppResult<()> {
        self.execute(self.post("/equipment").json(data), "create equipment")
            .await
    }

    pub async fn equipment_update(&self, id: i32, data: &UpdateEquipment) -> AppResult<()> {
        self.execute(self.put(&format!("/equipment/{}", id)).json(data), "update equipment")
            .await
    }

    pub async fn equipment_delete(&self, id: i32) -> AppResult<()> {
        self.execute(self.delete(&format!("/equipment/{}", id)), "delete equipment")
            .await
    }
}
