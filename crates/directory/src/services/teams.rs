//! # Team Operations
//!
//! Team CRUD. A team's manager always holds a membership with the manager
//! role; [`sync_manager_membership`] keeps that true inside the same
//! transaction that assigns the manager, and [`release_manager`] clears the
//! manager when that membership goes away.

use std::collections::HashMap;

use auth::{Caller, Permission, TeamAction};
use chrono::Utc;
use entity::{
    team_members::{self, Column as MemberColumn, MANAGER_ROLE},
    teams::{self, Column as TeamColumn},
    Products,
    TeamMembers,
    Teams,
};
use error::{AppError, OptionExt, Result};
use permissions_macro::with_permission;
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    ConnectionTrait,
    EntityTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    Set,
    TransactionTrait,
};
use tracing::{debug, info};

use super::{
    attachments::{delete_for_owner, AttachmentOwner},
    employees::check_employee_ref,
    fetch_page,
    FieldErrors,
};
use crate::{
    dto::{
        teams::{CreateTeamRequest, TeamListQuery, TeamResponse, UpdateTeamRequest},
        Page,
    },
    utils::icontains,
    Directory,
};

pub(crate) async fn find_team<C: ConnectionTrait>(db: &C, id: i32) -> Result<teams::Model> {
    Teams::find_by_id(id)
        .one(db)
        .await?
        .or_not_found(format_args!("Team {}", id))
}

async fn name_taken<C: ConnectionTrait>(db: &C, name: &str, exclude: Option<i32>) -> Result<bool> {
    let mut query = Teams::find().filter(TeamColumn::Name.eq(name));
    if let Some(id) = exclude {
        query = query.filter(TeamColumn::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

async fn check_product_ref<C: ConnectionTrait>(db: &C, errors: &mut FieldErrors, id: Option<i32>) -> Result<()> {
    if let Some(id) = id {
        if Products::find_by_id(id).one(db).await?.is_none() {
            errors.push("product_id", format!("Product {} does not exist", id));
        }
    }
    Ok(())
}

async fn member_counts<C: ConnectionTrait>(db: &C, team_ids: &[i32]) -> Result<HashMap<i32, u64>> {
    let rows: Vec<(i32, i64)> = TeamMembers::find()
        .select_only()
        .column(MemberColumn::TeamId)
        .column_as(MemberColumn::Id.count(), "member_count")
        .filter(MemberColumn::TeamId.is_in(team_ids.to_vec()))
        .group_by(MemberColumn::TeamId)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, count)| (id, u64::try_from(count).unwrap_or_default()))
        .collect())
}

pub(crate) async fn to_team_responses<C: ConnectionTrait>(db: &C, teams: Vec<teams::Model>) -> Result<Vec<TeamResponse>> {
    let ids: Vec<i32> = teams.iter().map(|t| t.id).collect();
    let counts = member_counts(db, &ids).await?;
    Ok(teams
        .into_iter()
        .map(|t| {
            let count = counts.get(&t.id).copied().unwrap_or(0);
            TeamResponse::from_model(t, count)
        })
        .collect())
}

async fn to_team_response<C: ConnectionTrait>(db: &C, team: teams::Model) -> Result<TeamResponse> {
    let mut responses = to_team_responses(db, vec![team]).await?;
    responses
        .pop()
        .ok_or_else(|| AppError::internal("Team response missing"))
}

/// Give `manager_id` the manager role in the team, creating the membership if needed
pub(crate) async fn sync_manager_membership<C: ConnectionTrait>(
    db: &C,
    team_id: i32,
    manager_id: i32,
) -> Result<team_members::Model> {
    let existing = TeamMembers::find()
        .filter(MemberColumn::TeamId.eq(team_id))
        .filter(MemberColumn::EmployeeId.eq(manager_id))
        .one(db)
        .await?;

    let membership = match existing {
        Some(membership) if membership.role == MANAGER_ROLE => membership,
        Some(membership) => {
            let mut active: team_members::ActiveModel = membership.into();
            active.role = Set(MANAGER_ROLE.to_string());
            active.update(db).await?
        },
        None => {
            team_members::ActiveModel {
                team_id: Set(team_id),
                employee_id: Set(manager_id),
                role: Set(MANAGER_ROLE.to_string()),
                joined_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(db)
            .await?
        },
    };

    debug!(team_id, manager_id, "Manager membership synced");
    Ok(membership)
}

/// Clear the team's manager when it is one of `employee_ids`.
///
/// Called in the transaction that removes or demotes those memberships.
pub(crate) async fn release_manager<C: ConnectionTrait>(
    db: &C,
    team: &teams::Model,
    employee_ids: &[i32],
) -> Result<Option<i32>> {
    let Some(manager_id) = team.manager_id.filter(|id| employee_ids.contains(id))
    else {
        return Ok(None);
    };

    let mut active: teams::ActiveModel = team.clone().into();
    active.manager_id = Set(None);
    active.update(db).await?;

    debug!(team_id = team.id, manager_id, "Manager released");
    Ok(Some(manager_id))
}

impl Directory {
    /// Create a team. The manager, if any, becomes a member with the manager role.
    #[with_permission(Permission::Teams(TeamAction::Create))]
    pub async fn create_team(&self, caller: &Caller, req: CreateTeamRequest) -> Result<TeamResponse> {
        let mut errors = FieldErrors::validate(&req);

        let txn = self.db.begin().await?;
        if !errors.has("name") && name_taken(&txn, &req.name, None).await? {
            errors.push("name", "A team with this name already exists");
        }
        check_employee_ref(&txn, &mut errors, "manager_id", req.manager_id).await?;
        check_product_ref(&txn, &mut errors, req.product_id).await?;
        errors.into_result()?;

        let team = teams::ActiveModel {
            name: Set(req.name),
            manager_id: Set(req.manager_id),
            product_id: Set(req.product_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if let Some(manager_id) = team.manager_id {
            sync_manager_membership(&txn, team.id, manager_id).await?;
        }

        let response = to_team_response(&txn, team).await?;
        txn.commit().await?;

        info!(
            team_id = response.id,
            manager_id = ?response.manager_id,
            caller_id = caller.employee_id,
            "Team created"
        );
        Ok(response)
    }

    #[with_permission(Permission::Teams(TeamAction::Read))]
    pub async fn get_team(&self, caller: &Caller, id: i32) -> Result<TeamResponse> {
        let team = find_team(&self.db, id).await?;
        to_team_response(&self.db, team).await
    }

    /// List teams, optionally of one product, searching over name
    #[with_permission(Permission::Teams(TeamAction::Read))]
    pub async fn list_teams(&self, caller: &Caller, query: &TeamListQuery) -> Result<Page<TeamResponse>> {
        let mut select = Teams::find();
        if let Some(product_id) = query.product_id {
            select = select.filter(TeamColumn::ProductId.eq(product_id));
        }
        if let Some(search) = query.list.search() {
            select = select.filter(icontains(TeamColumn::Name, search));
        }

        let page = fetch_page(select.order_by_asc(TeamColumn::Name), &self.db, &query.list).await?;
        let items = to_team_responses(&self.db, page.items).await?;
        Ok(Page {
            items,
            pagination: page.pagination,
        })
    }

    /// Partial update. A newly assigned manager gets the manager membership.
    #[with_permission(Permission::Teams(TeamAction::Update))]
    pub async fn update_team(&self, caller: &Caller, id: i32, req: UpdateTeamRequest) -> Result<TeamResponse> {
        let mut errors = FieldErrors::validate(&req);

        let txn = self.db.begin().await?;
        let team = find_team(&txn, id).await?;
        if let Some(name) = &req.name {
            if !errors.has("name") && name_taken(&txn, name, Some(id)).await? {
                errors.push("name", "A team with this name already exists");
            }
        }
        check_employee_ref(&txn, &mut errors, "manager_id", req.manager_id.flatten()).await?;
        check_product_ref(&txn, &mut errors, req.product_id.flatten()).await?;
        errors.into_result()?;

        let mut active: teams::ActiveModel = team.into();
        if let Some(name) = req.name {
            active.name = Set(name);
        }
        if let Some(manager_id) = req.manager_id {
            active.manager_id = Set(manager_id);
        }
        if let Some(product_id) = req.product_id {
            active.product_id = Set(product_id);
        }
        let updated = active.update(&txn).await?;

        if let Some(Some(manager_id)) = req.manager_id {
            sync_manager_membership(&txn, id, manager_id).await?;
        }

        let response = to_team_response(&txn, updated).await?;
        txn.commit().await?;

        info!(team_id = id, caller_id = caller.employee_id, "Team updated");
        Ok(response)
    }

    /// Delete a team together with its memberships and attachments
    #[with_permission(Permission::Teams(TeamAction::Delete))]
    pub async fn delete_team(&self, caller: &Caller, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        find_team(&txn, id).await?;

        let members = TeamMembers::delete_many()
            .filter(MemberColumn::TeamId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        delete_for_owner(&txn, AttachmentOwner::Team(id)).await?;
        Teams::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(
            team_id = id,
            removed_members = members,
            caller_id = caller.employee_id,
            "Team deleted"
        );
        Ok(())
    }
}
