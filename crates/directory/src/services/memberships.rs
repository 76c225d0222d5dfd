//! # Team Membership
//!
//! Adding and removing team members is all-or-nothing: every id is checked
//! before the first row is written. Affected employees are notified by email
//! through the outbox once the transaction commits. A manager who leaves the
//! team or loses the manager role stops being its manager.

use auth::{Caller, Permission, TeamAction};
use chrono::Utc;
use entity::{
    employees,
    team_members::{self, Column as MemberColumn, MANAGER_ROLE},
    Employees,
    TeamMembers,
};
use error::{AppError, Result};
use logging::log_membership_event;
use permissions_macro::with_permission;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};
use tracing::info;

use super::{
    employees::find_employees,
    teams::{find_team, release_manager},
    FieldErrors,
};
use crate::{
    dto::teams::{AddTeamMembersRequest, ChangeRoleRequest, RemoveTeamMembersRequest, TeamMemberResponse},
    outbox,
    utils::dedup_ids,
    Directory,
};

pub fn added_subject(team: &str) -> String { format!("Вас добавили в команду {}", team) }

pub fn removed_subject(team: &str) -> String { format!("Вас исключили из команды {}", team) }

/// Memberships of `team_id` among `employee_ids`
async fn memberships_of<C: ConnectionTrait>(
    db: &C,
    team_id: i32,
    employee_ids: &[i32],
) -> Result<Vec<team_members::Model>> {
    Ok(TeamMembers::find()
        .filter(MemberColumn::TeamId.eq(team_id))
        .filter(MemberColumn::EmployeeId.is_in(employee_ids.to_vec()))
        .all(db)
        .await?)
}

fn describe(employees: &[&employees::Model]) -> String {
    employees
        .iter()
        .map(|e| format!("{} ({})", e.full_name, e.id))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Directory {
    /// Add employees to a team under one role
    #[with_permission(Permission::Teams(TeamAction::MembersAdd))]
    pub async fn add_team_members(
        &self,
        caller: &Caller,
        team_id: i32,
        req: AddTeamMembersRequest,
    ) -> Result<Vec<TeamMemberResponse>> {
        FieldErrors::validate(&req).into_result()?;
        let ids = dedup_ids(&req.employee_ids);

        let txn = self.db.begin().await?;
        let team = find_team(&txn, team_id).await?;
        let employees = find_employees(&txn, &ids).await?;

        let existing = memberships_of(&txn, team_id, &ids).await?;
        if !existing.is_empty() {
            let already: Vec<&employees::Model> = employees
                .iter()
                .filter(|e| existing.iter().any(|m| m.employee_id == e.id))
                .collect();
            return Err(AppError::field(
                "employee_ids",
                format!("Already a member: {}", describe(&already)),
            ));
        }

        let joined_at = Utc::now();
        TeamMembers::insert_many(employees.iter().map(|employee| {
            team_members::ActiveModel {
                team_id: Set(team_id),
                employee_id: Set(employee.id),
                role: Set(req.role.clone()),
                joined_at: Set(joined_at),
                ..Default::default()
            }
        }))
        .exec(&txn)
        .await?;

        let memberships = memberships_of(&txn, team_id, &ids).await?;
        let subject = added_subject(&team.name);
        outbox::enqueue(
            &txn,
            subject.clone(),
            subject,
            employees.iter().map(|e| e.email.clone()).collect(),
        )
        .await?;
        txn.commit().await?;
        self.notifier.notify();

        log_membership_event!("team", team_id, "added", &ids);
        Ok(employees
            .iter()
            .filter_map(|employee| {
                memberships
                    .iter()
                    .find(|m| m.employee_id == employee.id)
                    .map(|m| TeamMemberResponse::new(m, employee))
            })
            .collect())
    }

    /// Remove employees from a team. Fails naming the ids that are not members.
    #[with_permission(Permission::Teams(TeamAction::MembersRemove))]
    pub async fn remove_team_members(&self, caller: &Caller, team_id: i32, req: RemoveTeamMembersRequest) -> Result<()> {
        FieldErrors::validate(&req).into_result()?;
        let ids = dedup_ids(&req.employee_ids);

        let txn = self.db.begin().await?;
        let team = find_team(&txn, team_id).await?;
        let existing = memberships_of(&txn, team_id, &ids).await?;

        let non_members: Vec<i32> = ids
            .iter()
            .copied()
            .filter(|id| !existing.iter().any(|m| m.employee_id == *id))
            .collect();
        if !non_members.is_empty() {
            return Err(AppError::field(
                "employee_ids",
                format!(
                    "Not members of team {}: {}",
                    team.name,
                    crate::utils::format_ids(&non_members)
                ),
            ));
        }

        TeamMembers::delete_many()
            .filter(MemberColumn::TeamId.eq(team_id))
            .filter(MemberColumn::EmployeeId.is_in(ids.clone()))
            .exec(&txn)
            .await?;
        release_manager(&txn, &team, &ids).await?;

        let recipients: Vec<String> = Employees::find()
            .filter(employees::Column::Id.is_in(ids.clone()))
            .all(&txn)
            .await?
            .into_iter()
            .map(|e| e.email)
            .collect();
        let subject = removed_subject(&team.name);
        outbox::enqueue(&txn, subject.clone(), subject, recipients).await?;
        txn.commit().await?;
        self.notifier.notify();

        log_membership_event!("team", team_id, "removed", &ids);
        Ok(())
    }

    /// Change the role of an existing member in place
    #[with_permission(Permission::Teams(TeamAction::MembersUpdate))]
    pub async fn change_member_role(
        &self,
        caller: &Caller,
        team_id: i32,
        employee_id: i32,
        req: ChangeRoleRequest,
    ) -> Result<TeamMemberResponse> {
        FieldErrors::validate(&req).into_result()?;

        let txn = self.db.begin().await?;
        let membership = TeamMembers::find()
            .filter(MemberColumn::TeamId.eq(team_id))
            .filter(MemberColumn::EmployeeId.eq(employee_id))
            .find_also_related(Employees)
            .one(&txn)
            .await?;
        let Some((membership, Some(employee))) = membership
        else {
            return Err(AppError::not_found(format!(
                "Employee {} is not a member of team {}",
                employee_id, team_id
            )));
        };

        if req.role != MANAGER_ROLE {
            let team = find_team(&txn, team_id).await?;
            release_manager(&txn, &team, &[employee_id]).await?;
        }

        let mut active: team_members::ActiveModel = membership.into();
        active.role = Set(req.role);
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(
            team_id,
            employee_id,
            role = %updated.role,
            caller_id = caller.employee_id,
            "Member role changed"
        );
        Ok(TeamMemberResponse::new(&updated, &employee))
    }

    /// Members of a team in the order they joined
    #[with_permission(Permission::Teams(TeamAction::MembersRead))]
    pub async fn list_team_members(&self, caller: &Caller, team_id: i32) -> Result<Vec<TeamMemberResponse>> {
        find_team(&self.db, team_id).await?;

        let rows = TeamMembers::find()
            .filter(MemberColumn::TeamId.eq(team_id))
            .find_also_related(Employees)
            .order_by_asc(MemberColumn::JoinedAt)
            .order_by_asc(MemberColumn::Id)
            .all(&self.db)
            .await?;

        Ok(rows
            .iter()
            .filter_map(|(membership, employee)| {
                employee
                    .as_ref()
                    .map(|e| TeamMemberResponse::new(membership, e))
            })
            .collect())
    }
}
