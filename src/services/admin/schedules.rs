use tracing::info;

use super::AdminService;
use crate::errors::{Result, SimsError};
use crate::models::{
    accounts::entities::Role,
    auth::Identity,
    schedules::{
        entities::{ScheduleSlot, ScheduleSlotListItem},
        requests::CreateScheduleSlotRequest,
    },
};
use crate::utils::validate::validate_required;

pub async fn list_schedule_slots(
    service: &AdminService,
    identity: &Identity,
) -> Result<Vec<ScheduleSlotListItem>> {
    identity.require_role(Role::Admin)?;
    service.storage().list_schedule_slots().await
}

pub async fn create_schedule_slot(
    service: &AdminService,
    identity: &Identity,
    mut request: CreateScheduleSlotRequest,
) -> Result<ScheduleSlot> {
    identity.require_role(Role::Admin)?;

    request.day = request.day.trim().to_string();
    request.time_range = request.time_range.trim().to_string();
    validate_required("Day", &request.day).map_err(SimsError::validation)?;
    validate_required("Time range", &request.time_range).map_err(SimsError::validation)?;

    if service
        .storage()
        .get_class_section(request.class_section_id)
        .await?
        .is_none()
    {
        return Err(SimsError::validation(format!(
            "Class section {} does not exist",
            request.class_section_id
        )));
    }

    let slot = service.storage().create_schedule_slot(request).await?;
    info!(
        "Schedule slot {} {} added to class section {}",
        slot.day, slot.time_range, slot.class_section_id
    );
    Ok(slot)
}

pub async fn delete_schedule_slot(
    service: &AdminService,
    identity: &Identity,
    id: i64,
) -> Result<()> {
    identity.require_role(Role::Admin)?;

    if service.storage().delete_schedule_slot(id).await? {
        Ok(())
    } else {
        Err(SimsError::not_found("Schedule slot not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{admin, admin_service};
    use super::*;

    #[tokio::test]
    async fn test_schedule_slot_lifecycle() {
        let service = admin_service().await;
        let section = service.list_class_sections(&admin()).await.unwrap()[0].clone();

        let slot = service
            .create_schedule_slot(
                &admin(),
                CreateScheduleSlotRequest {
                    class_section_id: section.id,
                    day: " Wednesday ".to_string(),
                    time_range: "13:00-15:00".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(slot.day, "Wednesday");

        let slots = service.list_schedule_slots(&admin()).await.unwrap();
        assert_eq!(slots.len(), 2);
        assert!(slots.iter().all(|s| s.class_section_name == section.name));

        service.delete_schedule_slot(&admin(), slot.id).await.unwrap();
        let err = service
            .delete_schedule_slot(&admin(), slot.id)
            .await
            .unwrap_err();
        assert!(matches!(err, SimsError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_slot_requires_existing_section() {
        let service = admin_service().await;
        let err = service
            .create_schedule_slot(
                &admin(),
                CreateScheduleSlotRequest {
                    class_section_id: 999,
                    day: "Friday".to_string(),
                    time_range: "10:00-12:00".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SimsError::Validation(_)));

        let err = service
            .create_schedule_slot(
                &admin(),
                CreateScheduleSlotRequest {
                    class_section_id: 1,
                    day: String::new(),
                    time_range: "10:00-12:00".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SimsError::Validation(_)));
    }
}
