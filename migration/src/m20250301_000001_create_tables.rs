use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建账号表
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Accounts::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Accounts::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Accounts::Role).string().not_null())
                    .col(ColumnDef::new(Accounts::DisplayName).string().not_null())
                    .col(ColumnDef::new(Accounts::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Accounts::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Accounts::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 学生档案表（主键即账号 ID）
        manager
            .create_table(
                Table::create()
                    .table(StudentProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentProfiles::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudentProfiles::StudentNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentProfiles::Address).string().not_null())
                    .col(ColumnDef::new(StudentProfiles::Phone).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentProfiles::Table, StudentProfiles::Id)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 教师档案表（主键即账号 ID）
        manager
            .create_table(
                Table::create()
                    .table(InstructorProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InstructorProfiles::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InstructorProfiles::InstructorNumber)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(InstructorProfiles::Table, InstructorProfiles::Id)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 课程表
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::Code).string().not_null())
                    .col(ColumnDef::new(Courses::Name).string().not_null())
                    .col(
                        ColumnDef::new(Courses::CreditUnits)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // 教学班表
        manager
            .create_table(
                Table::create()
                    .table(ClassSections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassSections::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClassSections::Name).string().not_null())
                    .col(
                        ColumnDef::new(ClassSections::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassSections::InstructorId)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassSections::Table, ClassSections::CourseId)
                            .to(Courses::Table, Courses::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassSections::Table, ClassSections::InstructorId)
                            .to(InstructorProfiles::Table, InstructorProfiles::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 课表
        manager
            .create_table(
                Table::create()
                    .table(ScheduleSlots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScheduleSlots::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ScheduleSlots::ClassSectionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScheduleSlots::Day).string().not_null())
                    .col(ColumnDef::new(ScheduleSlots::TimeRange).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(ScheduleSlots::Table, ScheduleSlots::ClassSectionId)
                            .to(ClassSections::Table, ClassSections::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 选课表
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::ClassSectionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::EnrolledAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(StudentProfiles::Table, StudentProfiles::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::ClassSectionId)
                            .to(ClassSections::Table, ClassSections::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 成绩表，每个选课记录至多一条
        manager
            .create_table(
                Table::create()
                    .table(Grades::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Grades::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Grades::EnrollmentId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Grades::Score).double().not_null())
                    .col(ColumnDef::new(Grades::GradedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Grades::Table, Grades::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_accounts_role")
                    .table(Accounts::Table)
                    .col(Accounts::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_sections_instructor_id")
                    .table(ClassSections::Table)
                    .col(ClassSections::InstructorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_schedule_slots_class_section_id")
                    .table(ScheduleSlots::Table)
                    .col(ScheduleSlots::ClassSectionId)
                    .to_owned(),
            )
            .await?;

        // 同一学生不能重复选同一教学班
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("idx_enrollments_student_class_section")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::ClassSectionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enrollments_class_section_id")
                    .table(Enrollments::Table)
                    .col(Enrollments::ClassSectionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Grades::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ScheduleSlots::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClassSections::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InstructorProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Accounts {
    #[sea_orm(iden = "accounts")]
    Table,
    Id,
    Username,
    PasswordHash,
    Role,
    DisplayName,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StudentProfiles {
    #[sea_orm(iden = "student_profiles")]
    Table,
    Id,
    StudentNumber,
    Address,
    Phone,
}

#[derive(DeriveIden)]
enum InstructorProfiles {
    #[sea_orm(iden = "instructor_profiles")]
    Table,
    Id,
    InstructorNumber,
}

#[derive(DeriveIden)]
enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    Code,
    Name,
    CreditUnits,
}

#[derive(DeriveIden)]
enum ClassSections {
    #[sea_orm(iden = "class_sections")]
    Table,
    Id,
    Name,
    CourseId,
    InstructorId,
}

#[derive(DeriveIden)]
enum ScheduleSlots {
    #[sea_orm(iden = "schedule_slots")]
    Table,
    Id,
    ClassSectionId,
    Day,
    TimeRange,
}

#[derive(DeriveIden)]
enum Enrollments {
    #[sea_orm(iden = "enrollments")]
    Table,
    Id,
    StudentId,
    ClassSectionId,
    EnrolledAt,
}

#[derive(DeriveIden)]
enum Grades {
    #[sea_orm(iden = "grades")]
    Table,
    Id,
    EnrollmentId,
    Score,
    GradedAt,
}
