//! 教学班存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, write_error};
use crate::entity::accounts::{Column as AccountColumn, Entity as Accounts};
use crate::entity::class_sections::{ActiveModel, Column, Entity as ClassSections, Model};
use crate::entity::courses::{Entity as Courses, Model as CourseModel};
use crate::errors::{Result, SimsError};
use crate::models::class_sections::{
    entities::{ClassSection, ClassSectionSummary},
    requests::{CreateClassSectionRequest, UpdateClassSectionRequest},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_class_section_impl(
        &self,
        req: CreateClassSectionRequest,
    ) -> Result<ClassSection> {
        let model = ActiveModel {
            name: Set(req.name),
            course_id: Set(req.course_id),
            instructor_id: Set(req.instructor_id),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error("创建教学班失败", "Class section already exists", e))?;

        Ok(result.into_class_section())
    }

    pub async fn get_class_section_impl(&self, id: i64) -> Result<Option<ClassSection>> {
        let result = ClassSections::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询教学班失败: {e}")))?;

        Ok(result.map(|m| m.into_class_section()))
    }

    pub async fn get_class_section_summary_impl(
        &self,
        id: i64,
    ) -> Result<Option<ClassSectionSummary>> {
        let row = ClassSections::find_by_id(id)
            .find_also_related(Courses)
            .one(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询教学班失败: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(summarize(&self.db, vec![row]).await?.pop())
    }

    /// 列出教学班概要，可按任课教师筛选
    pub async fn list_class_sections_impl(
        &self,
        instructor_id: Option<i64>,
    ) -> Result<Vec<ClassSectionSummary>> {
        let mut select = ClassSections::find();
        if let Some(instructor_id) = instructor_id {
            select = select.filter(Column::InstructorId.eq(instructor_id));
        }

        let rows = select
            .find_also_related(Courses)
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询教学班列表失败: {e}")))?;

        summarize(&self.db, rows).await
    }

    pub async fn update_class_section_impl(
        &self,
        id: i64,
        update: UpdateClassSectionRequest,
    ) -> Result<Option<ClassSection>> {
        if self.get_class_section_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Unchanged(id),
            ..Default::default()
        };
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(course_id) = update.course_id {
            model.course_id = Set(course_id);
        }
        if update.clear_instructor {
            model.instructor_id = Set(None);
        } else if let Some(instructor_id) = update.instructor_id {
            model.instructor_id = Set(Some(instructor_id));
        }
        if !model.is_changed() {
            return self.get_class_section_impl(id).await;
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| write_error("更新教学班失败", "Class section already exists", e))?;

        Ok(Some(result.into_class_section()))
    }

    pub async fn count_class_sections_impl(&self) -> Result<u64> {
        ClassSections::find()
            .count(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询教学班数量失败: {e}")))
    }
}

/// 补全课程与任课教师姓名
pub(super) async fn summarize<C: ConnectionTrait>(
    db: &C,
    rows: Vec<(Model, Option<CourseModel>)>,
) -> Result<Vec<ClassSectionSummary>> {
    let instructor_ids: Vec<i64> = rows.iter().filter_map(|(s, _)| s.instructor_id).collect();
    let instructor_names: HashMap<i64, String> = if instructor_ids.is_empty() {
        HashMap::new()
    } else {
        Accounts::find()
            .filter(AccountColumn::Id.is_in(instructor_ids))
            .all(db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询教师失败: {e}")))?
            .into_iter()
            .map(|a| (a.id, a.display_name))
            .collect()
    };

    Ok(rows
        .into_iter()
        .map(|(section, course)| {
            let (course_code, course_name) = course
                .map(|c| (c.code, c.name))
                .unwrap_or_default();
            ClassSectionSummary {
                instructor_name: section
                    .instructor_id
                    .and_then(|id| instructor_names.get(&id).cloned()),
                id: section.id,
                name: section.name,
                course_id: section.course_id,
                course_code,
                course_name,
                instructor_id: section.instructor_id,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{fixture, instructor_request};
    use super::*;

    #[tokio::test]
    async fn test_summary_carries_course_and_instructor() {
        let fx = fixture().await;
        let summary = fx
            .storage
            .get_class_section_summary_impl(fx.class_section_id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(summary.course_code, "NET101");
        assert_eq!(summary.course_name, "Computer Networks");
        assert_eq!(summary.instructor_id, Some(fx.instructor_id));
        assert_eq!(summary.instructor_name.as_deref(), Some("Dr. instructor1"));
    }

    #[tokio::test]
    async fn test_list_by_instructor_only_returns_own_sections() {
        let fx = fixture().await;
        let other = fx
            .storage
            .create_instructor_impl(instructor_request("instructor2", "NIDN2"))
            .await
            .unwrap();

        assert_eq!(
            fx.storage
                .list_class_sections_impl(Some(fx.instructor_id))
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(
            fx.storage
                .list_class_sections_impl(Some(other.id))
                .await
                .unwrap()
                .is_empty()
        );
        assert_eq!(fx.storage.list_class_sections_impl(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reassign_and_clear_instructor() {
        let fx = fixture().await;
        let other = fx
            .storage
            .create_instructor_impl(instructor_request("instructor2", "NIDN2"))
            .await
            .unwrap();

        let moved = fx
            .storage
            .update_class_section_impl(
                fx.class_section_id,
                UpdateClassSectionRequest {
                    instructor_id: Some(other.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(moved.instructor_id, Some(other.id));

        let cleared = fx
            .storage
            .update_class_section_impl(
                fx.class_section_id,
                UpdateClassSectionRequest {
                    clear_instructor: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cleared.instructor_id, None);
        assert_eq!(cleared.name, "Networks - Morning");
    }

    #[tokio::test]
    async fn test_unknown_course_is_rejected() {
        let fx = fixture().await;
        let err = fx
            .storage
            .create_class_section_impl(CreateClassSectionRequest {
                name: "Ghost".to_string(),
                course_id: 9999,
                instructor_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SimsError::Conflict(_)));
    }
}
