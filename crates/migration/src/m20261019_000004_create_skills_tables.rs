use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Skills::Table)
                    .if_not_exists()
                    .col(pk_auto(Skills::Id))
                    .col(string_len_uniq(Skills::Name, 100))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmployeeSkills::Table)
                    .if_not_exists()
                    .col(pk_auto(EmployeeSkills::Id))
                    .col(integer(EmployeeSkills::EmployeeId))
                    .col(integer(EmployeeSkills::SkillId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_skills_employee_id")
                            .from(EmployeeSkills::Table, EmployeeSkills::EmployeeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_skills_skill_id")
                            .from(EmployeeSkills::Table, EmployeeSkills::SkillId)
                            .to(Skills::Table, Skills::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employee_skills_employee_skill_unique")
                    .table(EmployeeSkills::Table)
                    .col(EmployeeSkills::EmployeeId)
                    .col(EmployeeSkills::SkillId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmployeeSkills::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Skills::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Skills {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub enum EmployeeSkills {
    Table,
    Id,
    EmployeeId,
    SkillId,
}

#[derive(DeriveIden)]
pub enum Employees {
    Table,
    Id,
}
