//! 选课存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, class_sections::summarize, write_error};
use crate::entity::accounts::{Column as AccountColumn, Entity as Accounts};
use crate::entity::class_sections::{Column as SectionColumn, Entity as ClassSections};
use crate::entity::courses::Entity as Courses;
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments};
use crate::entity::grades::{Column as GradeColumn, Entity as Grades};
use crate::entity::schedule_slots::{Column as SlotColumn, Entity as ScheduleSlots};
use crate::entity::student_profiles::{Column as ProfileColumn, Entity as StudentProfiles};
use crate::errors::{Result, SimsError};
use crate::models::{
    enrollments::entities::{Enrollment, EnrollmentOwnership, RosterEntry, StudentEnrollmentView},
    schedules::entities::ScheduleSlot,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 选课，同一学生在同一教学班只能有一条选课记录
    pub async fn enroll_student_impl(
        &self,
        student_id: i64,
        class_section_id: i64,
    ) -> Result<Enrollment> {
        let model = ActiveModel {
            student_id: Set(student_id),
            class_section_id: Set(class_section_id),
            enrolled_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            write_error(
                "选课失败",
                "Student is already enrolled in this class section",
                e,
            )
        })?;

        Ok(result.into_enrollment())
    }

    pub async fn get_enrollment_impl(&self, id: i64) -> Result<Option<Enrollment>> {
        let result = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 选课记录连同教学班的任课教师
    pub async fn get_enrollment_ownership_impl(
        &self,
        id: i64,
    ) -> Result<Option<EnrollmentOwnership>> {
        let result = Enrollments::find_by_id(id)
            .find_also_related(ClassSections)
            .one(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(result.map(|(enrollment, section)| EnrollmentOwnership {
            enrollment: enrollment.into_enrollment(),
            instructor_id: section.and_then(|s| s.instructor_id),
        }))
    }

    /// 教学班学生名单（含成绩），按学号排序
    pub async fn list_class_roster_impl(&self, class_section_id: i64) -> Result<Vec<RosterEntry>> {
        let enrollments = Enrollments::find()
            .filter(Column::ClassSectionId.eq(class_section_id))
            .all(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询选课记录失败: {e}")))?;
        if enrollments.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<i64> = enrollments.iter().map(|e| e.student_id).collect();
        let enrollment_ids: Vec<i64> = enrollments.iter().map(|e| e.id).collect();

        let profiles: HashMap<i64, String> = StudentProfiles::find()
            .filter(ProfileColumn::Id.is_in(student_ids.clone()))
            .all(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询学生档案失败: {e}")))?
            .into_iter()
            .map(|p| (p.id, p.student_number))
            .collect();

        let accounts: HashMap<i64, (String, String)> = Accounts::find()
            .filter(AccountColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询学生账号失败: {e}")))?
            .into_iter()
            .map(|a| (a.id, (a.username, a.display_name)))
            .collect();

        let scores = self.scores_by_enrollment(enrollment_ids).await?;

        let mut roster: Vec<RosterEntry> = enrollments
            .into_iter()
            .map(|e| {
                let (username, display_name) =
                    accounts.get(&e.student_id).cloned().unwrap_or_default();
                RosterEntry {
                    enrollment_id: e.id,
                    student_id: e.student_id,
                    username,
                    display_name,
                    student_number: profiles.get(&e.student_id).cloned().unwrap_or_default(),
                    score: scores.get(&e.id).copied(),
                }
            })
            .collect();
        roster.sort_by(|a, b| a.student_number.cmp(&b.student_number));

        Ok(roster)
    }

    /// 学生的全部选课：课程、教学班、任课教师、课表与成绩
    pub async fn list_student_enrollments_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentEnrollmentView>> {
        let enrollments = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::EnrolledAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询选课记录失败: {e}")))?;
        if enrollments.is_empty() {
            return Ok(Vec::new());
        }

        let section_ids: Vec<i64> = enrollments.iter().map(|e| e.class_section_id).collect();
        let enrollment_ids: Vec<i64> = enrollments.iter().map(|e| e.id).collect();

        let section_rows = ClassSections::find()
            .filter(SectionColumn::Id.is_in(section_ids.clone()))
            .find_also_related(Courses)
            .all(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询教学班失败: {e}")))?;
        let credit_units: HashMap<i64, i32> = section_rows
            .iter()
            .filter_map(|(s, c)| c.as_ref().map(|c| (s.id, c.credit_units)))
            .collect();
        let summaries: HashMap<i64, _> = summarize(&self.db, section_rows)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let mut schedules: HashMap<i64, Vec<ScheduleSlot>> = HashMap::new();
        for slot in ScheduleSlots::find()
            .filter(SlotColumn::ClassSectionId.is_in(section_ids))
            .order_by_asc(SlotColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询课表失败: {e}")))?
        {
            schedules
                .entry(slot.class_section_id)
                .or_default()
                .push(slot.into_schedule_slot());
        }

        let scores = self.scores_by_enrollment(enrollment_ids).await?;

        Ok(enrollments
            .into_iter()
            .filter_map(|e| {
                let summary = summaries.get(&e.class_section_id)?;
                Some(StudentEnrollmentView {
                    enrollment_id: e.id,
                    course_code: summary.course_code.clone(),
                    course_name: summary.course_name.clone(),
                    credit_units: credit_units.get(&e.class_section_id).copied().unwrap_or(0),
                    class_section_id: summary.id,
                    class_section_name: summary.name.clone(),
                    instructor_name: summary.instructor_name.clone(),
                    schedule: schedules.get(&e.class_section_id).cloned().unwrap_or_default(),
                    score: scores.get(&e.id).copied(),
                })
            })
            .collect())
    }

    async fn scores_by_enrollment(&self, enrollment_ids: Vec<i64>) -> Result<HashMap<i64, f64>> {
        Ok(Grades::find()
            .filter(GradeColumn::EnrollmentId.is_in(enrollment_ids))
            .all(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询成绩失败: {e}")))?
            .into_iter()
            .map(|g| (g.enrollment_id, g.score))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{fixture, student_request};
    use super::*;

    #[tokio::test]
    async fn test_double_enrollment_is_conflict() {
        let fx = fixture().await;
        let err = fx
            .storage
            .enroll_student_impl(fx.student_id, fx.class_section_id)
            .await
            .unwrap_err();
        assert!(matches!(err, SimsError::Conflict(_)));
        assert_eq!(
            fx.storage
                .list_class_roster_impl(fx.class_section_id)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_ownership_names_section_instructor() {
        let fx = fixture().await;
        let ownership = fx
            .storage
            .get_enrollment_ownership_impl(fx.enrollment_id)
            .await
            .unwrap()
            .unwrap();
        assert!(ownership.is_taught_by(fx.instructor_id));
        assert!(!ownership.is_taught_by(fx.student_id));
        assert!(
            fx.storage
                .get_enrollment_ownership_impl(9999)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_roster_includes_ungraded_students() {
        let fx = fixture().await;
        let second = fx
            .storage
            .create_student_impl(student_request("student2", "20231002"))
            .await
            .unwrap();
        fx.storage
            .enroll_student_impl(second.id, fx.class_section_id)
            .await
            .unwrap();

        let roster = fx
            .storage
            .list_class_roster_impl(fx.class_section_id)
            .await
            .unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].student_number, "20231001");
        assert_eq!(roster[0].score, Some(85.0));
        assert_eq!(roster[1].username, "student2");
        assert_eq!(roster[1].score, None);
    }

    #[tokio::test]
    async fn test_student_enrollment_view() {
        let fx = fixture().await;
        let views = fx
            .storage
            .list_student_enrollments_impl(fx.student_id)
            .await
            .unwrap();

        assert_eq!(views.len(), 1);
        let view = &views[0];
        assert_eq!(view.course_code, "NET101");
        assert_eq!(view.credit_units, 3);
        assert_eq!(view.class_section_name, "Networks - Morning");
        assert_eq!(view.instructor_name.as_deref(), Some("Dr. instructor1"));
        assert_eq!(view.schedule.len(), 1);
        assert_eq!(view.schedule[0].time_range, "08:00-10:00");
        assert_eq!(view.score, Some(85.0));
    }
}
