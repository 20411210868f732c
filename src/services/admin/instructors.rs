use tracing::info;

use super::AdminService;
use crate::errors::{Result, SimsError};
use crate::models::{
    accounts::entities::Role,
    auth::Identity,
    instructors::{
        entities::InstructorRecord,
        requests::{CreateInstructorRequest, UpdateInstructorRequest},
    },
};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_password_simple, validate_required, validate_username};

pub async fn list_instructors(
    service: &AdminService,
    identity: &Identity,
) -> Result<Vec<InstructorRecord>> {
    identity.require_role(Role::Admin)?;
    service.storage().list_instructors().await
}

pub async fn get_instructor(
    service: &AdminService,
    identity: &Identity,
    id: i64,
) -> Result<InstructorRecord> {
    identity.require_role(Role::Admin)?;
    service
        .storage()
        .get_instructor(id)
        .await?
        .ok_or_else(|| SimsError::not_found("Instructor not found"))
}

pub async fn create_instructor(
    service: &AdminService,
    identity: &Identity,
    mut request: CreateInstructorRequest,
) -> Result<InstructorRecord> {
    identity.require_role(Role::Admin)?;

    request.username = request.username.trim().to_string();
    validate_username(&request.username).map_err(SimsError::validation)?;
    validate_password_simple(&request.password).map_err(SimsError::validation)?;
    validate_required("Display name", &request.display_name).map_err(SimsError::validation)?;
    validate_required("Instructor number", &request.instructor_number)
        .map_err(SimsError::validation)?;

    request.password = hash_password(&request.password)?;

    let instructor = service.storage().create_instructor(request).await?;
    info!("Instructor {} created", instructor.username);
    Ok(instructor)
}

pub async fn update_instructor(
    service: &AdminService,
    identity: &Identity,
    id: i64,
    mut request: UpdateInstructorRequest,
) -> Result<InstructorRecord> {
    identity.require_role(Role::Admin)?;

    if let Some(display_name) = &request.display_name {
        validate_required("Display name", display_name).map_err(SimsError::validation)?;
    }
    if let Some(instructor_number) = &request.instructor_number {
        validate_required("Instructor number", instructor_number)
            .map_err(SimsError::validation)?;
    }
    if let Some(password) = request.password.take() {
        validate_password_simple(&password).map_err(SimsError::validation)?;
        request.password = Some(hash_password(&password)?);
    }

    service
        .storage()
        .update_instructor(id, request)
        .await?
        .ok_or_else(|| SimsError::not_found("Instructor not found"))
}

/// 删除教师，其任教的教学班保留但不再有任课教师
pub async fn delete_instructor(
    service: &AdminService,
    identity: &Identity,
    id: i64,
) -> Result<()> {
    identity.require_role(Role::Admin)?;

    if service.storage().delete_instructor(id).await? {
        info!("Instructor {} deleted", id);
        Ok(())
    } else {
        Err(SimsError::not_found("Instructor not found"))
    }
}
