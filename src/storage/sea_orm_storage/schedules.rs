//! 课表存储操作

use super::{SeaOrmStorage, write_error};
use crate::entity::class_sections::Entity as ClassSections;
use crate::entity::schedule_slots::{ActiveModel, Column, Entity as ScheduleSlots};
use crate::errors::{Result, SimsError};
use crate::models::schedules::{
    entities::{ScheduleSlot, ScheduleSlotListItem},
    requests::CreateScheduleSlotRequest,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_schedule_slot_impl(
        &self,
        req: CreateScheduleSlotRequest,
    ) -> Result<ScheduleSlot> {
        let model = ActiveModel {
            class_section_id: Set(req.class_section_id),
            day: Set(req.day),
            time_range: Set(req.time_range),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error("创建课表失败", "Schedule slot already exists", e))?;

        Ok(result.into_schedule_slot())
    }

    /// 列出全部课表，附带教学班名称
    pub async fn list_schedule_slots_impl(&self) -> Result<Vec<ScheduleSlotListItem>> {
        let rows = ScheduleSlots::find()
            .find_also_related(ClassSections)
            .order_by_asc(Column::ClassSectionId)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询课表失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(slot, section)| ScheduleSlotListItem {
                class_section_name: section.map(|s| s.name).unwrap_or_default(),
                slot: slot.into_schedule_slot(),
            })
            .collect())
    }

    pub async fn list_schedule_slots_by_class_section_impl(
        &self,
        class_section_id: i64,
    ) -> Result<Vec<ScheduleSlot>> {
        let rows = ScheduleSlots::find()
            .filter(Column::ClassSectionId.eq(class_section_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("查询课表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_schedule_slot()).collect())
    }

    pub async fn delete_schedule_slot_impl(&self, id: i64) -> Result<bool> {
        let result = ScheduleSlots::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SimsError::database_operation(format!("删除课表失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::fixture;
    use super::*;

    #[tokio::test]
    async fn test_list_slots_with_section_names() {
        let fx = fixture().await;
        fx.storage
            .create_schedule_slot_impl(CreateScheduleSlotRequest {
                class_section_id: fx.class_section_id,
                day: "Wednesday".to_string(),
                time_range: "13:00-15:00".to_string(),
            })
            .await
            .unwrap();

        let all = fx.storage.list_schedule_slots_impl().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|s| s.class_section_name == "Networks - Morning"));

        let own = fx
            .storage
            .list_schedule_slots_by_class_section_impl(fx.class_section_id)
            .await
            .unwrap();
        assert_eq!(own[0].day, "Monday");
        assert_eq!(own[1].day, "Wednesday");
    }

    #[tokio::test]
    async fn test_delete_slot() {
        let fx = fixture().await;
        assert!(fx.storage.delete_schedule_slot_impl(fx.schedule_slot_id).await.unwrap());
        assert!(!fx.storage.delete_schedule_slot_impl(fx.schedule_slot_id).await.unwrap());
        assert!(fx.storage.list_schedule_slots_impl().await.unwrap().is_empty());
    }
}
