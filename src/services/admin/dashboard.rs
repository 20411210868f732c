use super::AdminService;
use crate::errors::Result;
use crate::models::{accounts::entities::Role, auth::Identity, dashboard::responses::AdminOverview};

pub async fn overview(service: &AdminService, identity: &Identity) -> Result<AdminOverview> {
    identity.require_role(Role::Admin)?;
    let storage = service.storage();

    Ok(AdminOverview {
        students: storage.count_students().await?,
        instructors: storage.count_instructors().await?,
        courses: storage.count_courses().await?,
        class_sections: storage.count_class_sections().await?,
    })
}
