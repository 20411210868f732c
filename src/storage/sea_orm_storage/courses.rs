//! 课程存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, write_error};
use crate::entity::accounts::{Column as AccountColumn, Entity as Accounts};
use crate::entity::class_sections::{Column as SectionColumn, Entity as ClassSections};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::errors::{Result, SimsError};
use crate::models::courses::{
    entities::{Course, CourseOverview, CourseSectionBrief},
    requests::{CreateCourseRequest, UpdateCourseRequest},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        let model = ActiveModel {
            code: Set(req.code),
            name: Set(req.name),
            credit_units: Set(req.credit_units),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error("创建课程失败", "Course already exists", e))?;

        Ok(result.into_course())
    }

    pub async fn get_course_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn list_courses_impl(&self) -> Result<Vec<Course>> {
        let rows = Courses::find()
            .order_by_asc(Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_course()).collect())
    }

    /// 课程总览：每门课程及其教学班、任课教师姓名
    pub async fn list_course_overview_impl(&self) -> Result<Vec<CourseOverview>> {
        let courses = self.list_courses_impl().await?;
        if courses.is_empty() {
            return Ok(Vec::new());
        }

        let course_ids: Vec<i64> = courses.iter().map(|c| c.id).collect();
        let sections = ClassSections::find()
            .filter(SectionColumn::CourseId.is_in(course_ids))
            .order_by_asc(SectionColumn::Name)
            .all(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询教学班失败: {e}")))?;

        // 批量查询任课教师姓名
        let instructor_ids: Vec<i64> = sections.iter().filter_map(|s| s.instructor_id).collect();
        let instructor_names: HashMap<i64, String> = if instructor_ids.is_empty() {
            HashMap::new()
        } else {
            Accounts::find()
                .filter(AccountColumn::Id.is_in(instructor_ids))
                .all(&self.db)
                .await
                .map_err(|e| SimsError::database_operation(format!("查询教师失败: {e}")))?
                .into_iter()
                .map(|a| (a.id, a.display_name))
                .collect()
        };

        let mut sections_by_course: HashMap<i64, Vec<CourseSectionBrief>> = HashMap::new();
        for section in sections {
            let instructor_name = section
                .instructor_id
                .and_then(|id| instructor_names.get(&id).cloned());
            sections_by_course
                .entry(section.course_id)
                .or_default()
                .push(CourseSectionBrief {
                    id: section.id,
                    name: section.name,
                    instructor_name,
                });
        }

        Ok(courses
            .into_iter()
            .map(|course| CourseOverview {
                sections: sections_by_course.remove(&course.id).unwrap_or_default(),
                course,
            })
            .collect())
    }

    pub async fn update_course_impl(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        if self.get_course_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Unchanged(id),
            ..Default::default()
        };
        if let Some(code) = update.code {
            model.code = Set(code);
        }
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(credit_units) = update.credit_units {
            model.credit_units = Set(credit_units);
        }
        if !model.is_changed() {
            return self.get_course_impl(id).await;
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| write_error("更新课程失败", "Course already exists", e))?;

        Ok(Some(result.into_course()))
    }

    /// 删除课程，仍有教学班引用时由外键约束拒绝
    pub async fn delete_course_impl(&self, id: i64) -> Result<bool> {
        let result = Courses::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_error("删除课程失败", "Course is still in use", e))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_courses_impl(&self) -> Result<u64> {
        Courses::find()
            .count(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询课程数量失败: {e}")))
    }

    pub async fn count_class_sections_of_course_impl(&self, course_id: i64) -> Result<u64> {
        ClassSections::find()
            .filter(SectionColumn::CourseId.eq(course_id))
            .count(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询教学班数量失败: {e}")))
    }
}
