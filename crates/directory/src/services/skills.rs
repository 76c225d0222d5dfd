//! Skill catalogue and employee skill sets.

use auth::{Caller, Permission, SkillAction};
use entity::{
    employee_skills,
    skills::{self, Column as SkillColumn},
    EmployeeSkills,
    Skills,
};
use error::{AppError, OptionExt, Result};
use permissions_macro::with_permission;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use tracing::info;

use super::{
    employees::{employee_response, find_employee},
    fetch_page,
    FieldErrors,
};
use crate::{
    dto::{
        employees::EmployeeResponse,
        skills::{CreateSkillRequest, SetSkillsRequest},
        ListQuery,
        Page,
    },
    utils::{dedup_ids, format_ids, icontains},
    Directory,
};

/// Replace the skill set of an employee with `skill_ids`
pub(crate) async fn replace_skills<C: ConnectionTrait>(db: &C, employee_id: i32, skill_ids: &[i32]) -> Result<()> {
    let skill_ids = dedup_ids(skill_ids);

    if !skill_ids.is_empty() {
        let found = Skills::find()
            .filter(SkillColumn::Id.is_in(skill_ids.clone()))
            .all(db)
            .await?;
        let missing: Vec<i32> = skill_ids
            .iter()
            .copied()
            .filter(|id| !found.iter().any(|s| s.id == *id))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::field(
                "skill_ids",
                format!("Skills not found: {}", format_ids(&missing)),
            ));
        }
    }

    EmployeeSkills::delete_many()
        .filter(employee_skills::Column::EmployeeId.eq(employee_id))
        .exec(db)
        .await?;

    if !skill_ids.is_empty() {
        EmployeeSkills::insert_many(skill_ids.iter().map(|skill_id| {
            employee_skills::ActiveModel {
                employee_id: Set(employee_id),
                skill_id: Set(*skill_id),
                ..Default::default()
            }
        }))
        .exec(db)
        .await?;
    }

    Ok(())
}

impl Directory {
    #[with_permission(Permission::Skills(SkillAction::Create))]
    pub async fn create_skill(&self, caller: &Caller, req: CreateSkillRequest) -> Result<skills::Model> {
        let mut errors = FieldErrors::validate(&req);
        let name = req.name.trim().to_string();
        if !errors.has("name") &&
            Skills::find()
                .filter(SkillColumn::Name.eq(name.as_str()))
                .one(&self.db)
                .await?
                .is_some()
        {
            errors.push("name", "A skill with this name already exists");
        }
        errors.into_result()?;

        let skill = skills::ActiveModel {
            name: Set(name),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!(skill_id = skill.id, name = %skill.name, caller_id = caller.employee_id, "Skill created");
        Ok(skill)
    }

    #[with_permission(Permission::Skills(SkillAction::Read))]
    pub async fn list_skills(&self, caller: &Caller, query: &ListQuery) -> Result<Page<skills::Model>> {
        let mut select = Skills::find();
        if let Some(search) = query.search() {
            select = select.filter(icontains(SkillColumn::Name, search));
        }
        fetch_page(select.order_by_asc(SkillColumn::Name), &self.db, query).await
    }

    /// Delete a skill; it disappears from every employee's set
    #[with_permission(Permission::Skills(SkillAction::Delete))]
    pub async fn delete_skill(&self, caller: &Caller, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        let skill = Skills::find_by_id(id)
            .one(&txn)
            .await?
            .or_not_found(format_args!("Skill {}", id))?;

        EmployeeSkills::delete_many()
            .filter(employee_skills::Column::SkillId.eq(id))
            .exec(&txn)
            .await?;
        Skills::delete_by_id(skill.id).exec(&txn).await?;
        txn.commit().await?;

        info!(skill_id = id, caller_id = caller.employee_id, "Skill deleted");
        Ok(())
    }

    /// Replace the skills of an employee. Employees may set their own.
    pub async fn set_employee_skills(
        &self,
        caller: &Caller,
        employee_id: i32,
        req: SetSkillsRequest,
    ) -> Result<EmployeeResponse> {
        caller.require_on(&Permission::Skills(SkillAction::Assign), employee_id)?;

        let txn = self.db.begin().await?;
        let employee = find_employee(&txn, employee_id).await?;
        replace_skills(&txn, employee_id, &req.skill_ids).await?;
        let response = employee_response(&txn, employee).await?;
        txn.commit().await?;

        info!(
            employee_id,
            skills = ?response.skills,
            caller_id = caller.employee_id,
            "Employee skills replaced"
        );
        Ok(response)
    }
}
