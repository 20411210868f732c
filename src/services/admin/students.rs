use tracing::info;

use super::AdminService;
use crate::errors::{Result, SimsError};
use crate::models::{
    accounts::entities::Role,
    auth::Identity,
    students::{
        entities::StudentRecord,
        requests::{CreateStudentRequest, UpdateStudentRequest},
    },
};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_password_simple, validate_required, validate_username};

pub async fn list_students(
    service: &AdminService,
    identity: &Identity,
) -> Result<Vec<StudentRecord>> {
    identity.require_role(Role::Admin)?;
    service.storage().list_students().await
}

pub async fn get_student(
    service: &AdminService,
    identity: &Identity,
    id: i64,
) -> Result<StudentRecord> {
    identity.require_role(Role::Admin)?;
    service
        .storage()
        .get_student(id)
        .await?
        .ok_or_else(|| SimsError::not_found("Student not found"))
}

pub async fn create_student(
    service: &AdminService,
    identity: &Identity,
    mut request: CreateStudentRequest,
) -> Result<StudentRecord> {
    identity.require_role(Role::Admin)?;

    request.username = request.username.trim().to_string();
    validate_username(&request.username).map_err(SimsError::validation)?;
    validate_password_simple(&request.password).map_err(SimsError::validation)?;
    validate_required("Display name", &request.display_name).map_err(SimsError::validation)?;
    validate_required("Student number", &request.student_number)
        .map_err(SimsError::validation)?;

    // 存储层只接收摘要
    request.password = hash_password(&request.password)?;

    let student = service.storage().create_student(request).await?;
    info!(
        "Student {} ({}) created",
        student.username, student.student_number
    );
    Ok(student)
}

pub async fn update_student(
    service: &AdminService,
    identity: &Identity,
    id: i64,
    mut request: UpdateStudentRequest,
) -> Result<StudentRecord> {
    identity.require_role(Role::Admin)?;

    if let Some(display_name) = &request.display_name {
        validate_required("Display name", display_name).map_err(SimsError::validation)?;
    }
    if let Some(student_number) = &request.student_number {
        validate_required("Student number", student_number).map_err(SimsError::validation)?;
    }
    if let Some(password) = request.password.take() {
        validate_password_simple(&password).map_err(SimsError::validation)?;
        request.password = Some(hash_password(&password)?);
    }

    service
        .storage()
        .update_student(id, request)
        .await?
        .ok_or_else(|| SimsError::not_found("Student not found"))
}

/// 删除学生及其选课、成绩
pub async fn delete_student(service: &AdminService, identity: &Identity, id: i64) -> Result<()> {
    identity.require_role(Role::Admin)?;

    if service.storage().delete_student(id).await? {
        info!("Student {} deleted with enrollments and grades", id);
        Ok(())
    } else {
        Err(SimsError::not_found("Student not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{admin, admin_service};
    use super::*;
    use crate::utils::password::verify_password;

    fn request(username: &str, password: &str) -> CreateStudentRequest {
        CreateStudentRequest {
            username: username.to_string(),
            password: password.to_string(),
            display_name: "Siti Student".to_string(),
            student_number: "20231002".to_string(),
            address: String::new(),
            phone: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_hashes_password() {
        let service = admin_service().await;
        let created = service
            .create_student(&admin(), request("student2", "secret12"))
            .await
            .unwrap();

        let account = service
            .storage()
            .get_account_by_id(created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.role, Role::Student);
        assert_ne!(account.password_hash, "secret12");
        assert!(verify_password("secret12", &account.password_hash));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let service = admin_service().await;

        let err = service
            .create_student(&admin(), request("x", "secret12"))
            .await
            .unwrap_err();
        assert!(matches!(err, SimsError::Validation(_)));

        let err = service
            .create_student(&admin(), request("student2", "short"))
            .await
            .unwrap_err();
        assert!(matches!(err, SimsError::Validation(_)));

        let err = service
            .create_student(&admin(), request("student1", "secret12"))
            .await
            .unwrap_err();
        assert!(matches!(err, SimsError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_password_reset_keeps_role() {
        let service = admin_service().await;
        let student = service
            .storage()
            .get_account_by_username("student1")
            .await
            .unwrap()
            .unwrap();

        let updated = service
            .update_student(
                &admin(),
                student.id,
                UpdateStudentRequest {
                    password: Some("newpass1".to_string()),
                    address: Some("Jl. Sudirman 2".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.address, "Jl. Sudirman 2");

        let account = service
            .storage()
            .get_account_by_id(student.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.role, Role::Student);
        assert!(verify_password("newpass1", &account.password_hash));
        assert!(!verify_password("student123", &account.password_hash));
    }

    #[tokio::test]
    async fn test_delete_student_scenario() {
        let service = admin_service().await;
        let student = service
            .storage()
            .get_account_by_username("student1")
            .await
            .unwrap()
            .unwrap();
        let section = service.storage().list_class_sections().await.unwrap()[0].clone();
        let enrollment_id = service
            .storage()
            .list_class_roster(section.id)
            .await
            .unwrap()[0]
            .enrollment_id;

        // 同一教学班的另一名学生
        let classmate = service
            .create_student(&admin(), request("student2", "secret12"))
            .await
            .unwrap();
        let classmate_enrollment = service
            .storage()
            .enroll_student(classmate.id, section.id)
            .await
            .unwrap();
        service
            .storage()
            .upsert_grade(classmate_enrollment.id, 77.0)
            .await
            .unwrap();

        service.delete_student(&admin(), student.id).await.unwrap();

        let storage = service.storage();
        assert!(storage.get_account_by_id(student.id).await.unwrap().is_none());
        assert!(storage.get_student(student.id).await.unwrap().is_none());
        assert!(storage.get_enrollment(enrollment_id).await.unwrap().is_none());
        assert!(
            storage
                .get_grade_by_enrollment(enrollment_id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(storage.get_class_section(section.id).await.unwrap().is_some());
        assert!(storage.get_course(section.course_id).await.unwrap().is_some());

        // 其他学生的选课与成绩不受影响
        assert!(storage.get_student(classmate.id).await.unwrap().is_some());
        let roster = storage.list_class_roster(section.id).await.unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].student_id, classmate.id);
        assert_eq!(roster[0].score, Some(77.0));

        let err = service.delete_student(&admin(), student.id).await.unwrap_err();
        assert!(matches!(err, SimsError::NotFound(_)));
    }
}
