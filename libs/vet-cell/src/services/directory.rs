// libs/vet-cell/src/services/directory.rs
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{VetDirectoryEntry, VetError, VetProfile, VetSearchFilters};
use crate::services::availability::{has_weekly_availability, is_currently_available, next_available_day};
use crate::services::schedule::ScheduleService;

/// Public veterinarian directory: verified profiles plus a live
/// availability summary for the browse page.
pub struct DirectoryService {
    supabase: SupabaseClient,
    schedule_service: ScheduleService,
}

impl DirectoryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            schedule_service: ScheduleService::new(config),
        }
    }

    pub async fn search_vets(&self, filters: VetSearchFilters) -> Result<Vec<VetProfile>, VetError> {
        let mut path = "/rest/v1/profiles?role=eq.veterinarian&order=created_at.desc".to_string();

        // Public searches only surface verified vets unless explicitly asked.
        if filters.verified_only.unwrap_or(true) {
            path.push_str("&verification_status=eq.verified");
        }
        if let Some(ref specialization) = filters.specialization {
            path.push_str(&format!("&specialization=ilike.*{}*", specialization));
        }
        if let Some(ref region) = filters.region {
            path.push_str(&format!("&service_regions=ilike.*{}*", region));
        }
        if let Some(limit) = filters.limit {
            path.push_str(&format!("&limit={}", limit));
        }
        if let Some(offset) = filters.offset {
            path.push_str(&format!("&offset={}", offset));
        }

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|e| VetError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<VetProfile>, _>>()
            .map_err(|e| VetError::DatabaseError(format!("Malformed profile row: {}", e)))
    }

    pub async fn get_vet(&self, vet_id: &str) -> Result<VetProfile, VetError> {
        let path = format!("/rest/v1/profiles?id=eq.{}&role=eq.veterinarian", vet_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|e| VetError::DatabaseError(e.to_string()))?;

        let row = result.into_iter().next().ok_or(VetError::NotFound)?;
        serde_json::from_value(row)
            .map_err(|e| VetError::DatabaseError(format!("Malformed profile row: {}", e)))
    }

    /// Directory entries with the availability summary computed from each
    /// vet's current week.
    pub async fn list_with_availability(
        &self,
        filters: VetSearchFilters,
        now: DateTime<Utc>,
    ) -> Result<Vec<VetDirectoryEntry>, VetError> {
        let vets = self.search_vets(filters).await?;
        debug!("Building availability summary for {} vets", vets.len());

        let mut entries = Vec::with_capacity(vets.len());
        for profile in vets {
            let week = self
                .schedule_service
                .get_week(&profile.id.to_string(), None)
                .await?;

            entries.push(VetDirectoryEntry {
                currently_available: is_currently_available(&week, now),
                has_weekly_availability: has_weekly_availability(&week),
                next_available_day: next_available_day(&week, now),
                profile,
            });
        }

        Ok(entries)
    }
}
