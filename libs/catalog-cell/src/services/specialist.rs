use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use shared_database::{StoreClient, StoreError};

use crate::models::{
    CatalogError, Specialist, SpecialistJoinedRow, SpecialistView, UpsertSpecialistRequest,
    DEFAULT_CONSULTATION_PRICE,
};

pub struct SpecialistService {
    store: Arc<StoreClient>,
}

impl SpecialistService {
    pub fn new(store: Arc<StoreClient>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<SpecialistView>, CatalogError> {
        let rows: Vec<SpecialistJoinedRow> = self
            .store
            .select("/specialists?select=*,user:users(username)&order=name.asc")
            .await
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(SpecialistView::from).collect())
    }

    pub async fn create(&self, req: UpsertSpecialistRequest) -> Result<Specialist, CatalogError> {
        let (name, title) = validate_upsert(&req)?;

        let specialist: Specialist = self
            .store
            .insert(
                "specialists",
                json!({
                    "name": name,
                    "title": title,
                    "specialty": req.specialty,
                    "description": req.description,
                    "photo_url": req.photo_url,
                    "user_id": req.user_id,
                    "price": req.price.unwrap_or(DEFAULT_CONSULTATION_PRICE),
                }),
            )
            .await
            .map_err(map_link_conflict)?;

        info!("Created specialist {} ({})", specialist.name, specialist.id);
        Ok(specialist)
    }

    pub async fn update(
        &self,
        id: Uuid,
        req: UpsertSpecialistRequest,
    ) -> Result<Specialist, CatalogError> {
        let (name, title) = validate_upsert(&req)?;

        let mut updated: Vec<Specialist> = self
            .store
            .update(
                &format!("/specialists?id=eq.{}", id),
                json!({
                    "name": name,
                    "title": title,
                    "specialty": req.specialty,
                    "description": req.description,
                    "photo_url": req.photo_url,
                    "user_id": req.user_id,
                    "price": req.price.unwrap_or(DEFAULT_CONSULTATION_PRICE),
                }),
            )
            .await
            .map_err(map_link_conflict)?;

        if updated.is_empty() {
            return Err(CatalogError::NotFound("Specialist"));
        }
        Ok(updated.remove(0))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), CatalogError> {
        let removed = self
            .store
            .delete(&format!("/specialists?id=eq.{}", id))
            .await
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))?;

        if removed == 0 {
            return Err(CatalogError::NotFound("Specialist"));
        }
        info!("Deleted specialist {}", id);
        Ok(())
    }
}

/// Name and title are the only required fields on both create and update.
fn validate_upsert(req: &UpsertSpecialistRequest) -> Result<(String, String), CatalogError> {
    let name = req.name.as_deref().unwrap_or("").trim();
    let title = req.title.as_deref().unwrap_or("").trim();

    if name.is_empty() || title.is_empty() {
        return Err(CatalogError::ValidationError(
            "Name and title are required".to_string(),
        ));
    }
    Ok((name.to_string(), title.to_string()))
}

/// The store enforces at most one specialist per linked user; surface its
/// unique-constraint rejection as the linking conflict.
fn map_link_conflict(err: StoreError) -> CatalogError {
    match err {
        StoreError::Conflict(_) => CatalogError::UserAlreadyLinked,
        other => CatalogError::DatabaseError(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> UpsertSpecialistRequest {
        UpsertSpecialistRequest {
            name: Some("Dr. Ananya".to_string()),
            title: Some("Psychiatrist".to_string()),
            specialty: None,
            description: None,
            photo_url: None,
            user_id: None,
            price: None,
        }
    }

    #[test]
    fn test_validate_requires_name_and_title() {
        let mut req = base_request();
        req.title = Some("   ".to_string());
        assert!(validate_upsert(&req).is_err());

        let mut req = base_request();
        req.name = None;
        assert!(validate_upsert(&req).is_err());

        let (name, title) = validate_upsert(&base_request()).unwrap();
        assert_eq!(name, "Dr. Ananya");
        assert_eq!(title, "Psychiatrist");
    }

    #[test]
    fn test_store_conflict_maps_to_link_conflict() {
        let mapped = map_link_conflict(StoreError::Conflict("unique".to_string()));
        assert!(matches!(mapped, CatalogError::UserAlreadyLinked));
    }
}
