//! # Component Operations
//!
//! Components have up to two owners, who must be different employees.

use auth::{Caller, ComponentAction, Permission};
use entity::{
    components::{self, Column as ComponentColumn},
    employees::Column as EmployeeColumn,
    product_components,
    Components,
    Employees,
    ProductComponents,
};
use error::{AppError, OptionExt, Result};
use permissions_macro::with_permission;
use sea_orm::{
    sea_query::Query,
    ActiveModelTrait,
    ColumnTrait,
    Condition,
    ConnectionTrait,
    EntityTrait,
    QueryFilter,
    QueryOrder,
    Set,
    TransactionTrait,
};
use tracing::info;
use validator::ValidateUrl;

use super::{
    attachments::{delete_for_owner, AttachmentOwner},
    employees::check_employee_ref,
    fetch_page,
    FieldErrors,
};
use crate::{
    dto::{
        components::{ComponentListQuery, ComponentResponse, CreateComponentRequest, UpdateComponentRequest},
        Page,
    },
    utils::{format_ids, icontains},
    Directory,
};

const MAX_LINK_LENGTH: usize = 200;

async fn find_component<C: ConnectionTrait>(db: &C, id: i32) -> Result<components::Model> {
    Components::find_by_id(id)
        .one(db)
        .await?
        .or_not_found(format_args!("Component {}", id))
}

/// Load the given components, failing with NotFound naming the missing ids
pub(crate) async fn find_components<C: ConnectionTrait>(db: &C, ids: &[i32]) -> Result<Vec<components::Model>> {
    let found = Components::find()
        .filter(ComponentColumn::Id.is_in(ids.to_vec()))
        .order_by_asc(ComponentColumn::Id)
        .all(db)
        .await?;

    let missing: Vec<i32> = ids
        .iter()
        .copied()
        .filter(|id| !found.iter().any(|c| c.id == *id))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::not_found(format!(
            "Components not found: {}",
            format_ids(&missing)
        )));
    }

    Ok(found)
}

async fn name_taken<C: ConnectionTrait>(db: &C, name: &str, exclude: Option<i32>) -> Result<bool> {
    let mut query = Components::find().filter(ComponentColumn::Name.eq(name));
    if let Some(id) = exclude {
        query = query.filter(ComponentColumn::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

fn check_owners(errors: &mut FieldErrors, owner_id: Option<i32>, second_owner_id: Option<i32>) {
    if owner_id.is_some() && owner_id == second_owner_id {
        errors.push(
            "second_owner_id",
            "The second owner must be a different employee",
        );
    }
}

impl Directory {
    #[with_permission(Permission::Components(ComponentAction::Create))]
    pub async fn create_component(&self, caller: &Caller, req: CreateComponentRequest) -> Result<ComponentResponse> {
        let mut errors = FieldErrors::validate(&req);

        let txn = self.db.begin().await?;
        if !errors.has("name") && name_taken(&txn, &req.name, None).await? {
            errors.push("name", "A component with this name already exists");
        }
        check_employee_ref(&txn, &mut errors, "owner_id", req.owner_id).await?;
        check_employee_ref(&txn, &mut errors, "second_owner_id", req.second_owner_id).await?;
        check_owners(&mut errors, req.owner_id, req.second_owner_id);
        errors.into_result()?;

        let component = components::ActiveModel {
            name: Set(req.name),
            component_type: Set(req.component_type),
            link: Set(req.link),
            owner_id: Set(req.owner_id),
            second_owner_id: Set(req.second_owner_id),
            description: Set(req.description),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(
            component_id = component.id,
            component_type = %component.component_type,
            caller_id = caller.employee_id,
            "Component created"
        );
        Ok(component.into())
    }

    #[with_permission(Permission::Components(ComponentAction::Read))]
    pub async fn get_component(&self, caller: &Caller, id: i32) -> Result<ComponentResponse> {
        Ok(find_component(&self.db, id).await?.into())
    }

    /// List components by type, searching over name, description and owner name
    #[with_permission(Permission::Components(ComponentAction::Read))]
    pub async fn list_components(&self, caller: &Caller, query: &ComponentListQuery) -> Result<Page<ComponentResponse>> {
        let mut select = Components::find();
        if let Some(component_type) = &query.component_type {
            select = select.filter(ComponentColumn::ComponentType.eq(component_type.as_str()));
        }
        if let Some(search) = query.list.search() {
            select = select.filter(
                Condition::any()
                    .add(icontains(ComponentColumn::Name, search))
                    .add(icontains(ComponentColumn::Description, search))
                    .add(
                        ComponentColumn::OwnerId.in_subquery(
                            Query::select()
                                .column((Employees, EmployeeColumn::Id))
                                .from(Employees)
                                .and_where(icontains(EmployeeColumn::FullName, search))
                                .to_owned(),
                        ),
                    ),
            );
        }

        Ok(fetch_page(select.order_by_asc(ComponentColumn::Name), &self.db, &query.list)
            .await?
            .map(ComponentResponse::from))
    }

    /// Partial update. The owner check runs against the merged state.
    #[with_permission(Permission::Components(ComponentAction::Update))]
    pub async fn update_component(
        &self,
        caller: &Caller,
        id: i32,
        req: UpdateComponentRequest,
    ) -> Result<ComponentResponse> {
        let mut errors = FieldErrors::validate(&req);
        if let Some(Some(link)) = &req.link {
            if !link.validate_url() {
                errors.push("link", "Link must be a valid URL");
            }
            else if link.chars().count() > MAX_LINK_LENGTH {
                errors.push("link", "Link must not exceed 200 characters");
            }
        }

        let txn = self.db.begin().await?;
        let component = find_component(&txn, id).await?;
        if let Some(name) = &req.name {
            if !errors.has("name") && name_taken(&txn, name, Some(id)).await? {
                errors.push("name", "A component with this name already exists");
            }
        }
        check_employee_ref(&txn, &mut errors, "owner_id", req.owner_id.flatten()).await?;
        check_employee_ref(&txn, &mut errors, "second_owner_id", req.second_owner_id.flatten()).await?;
        check_owners(
            &mut errors,
            req.owner_id.unwrap_or(component.owner_id),
            req.second_owner_id.unwrap_or(component.second_owner_id),
        );
        errors.into_result()?;

        let mut active: components::ActiveModel = component.into();
        if let Some(name) = req.name {
            active.name = Set(name);
        }
        if let Some(component_type) = req.component_type {
            active.component_type = Set(component_type);
        }
        if let Some(link) = req.link {
            active.link = Set(link);
        }
        if let Some(owner_id) = req.owner_id {
            active.owner_id = Set(owner_id);
        }
        if let Some(second_owner_id) = req.second_owner_id {
            active.second_owner_id = Set(second_owner_id);
        }
        if let Some(description) = req.description {
            active.description = Set(description);
        }
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(component_id = id, caller_id = caller.employee_id, "Component updated");
        Ok(updated.into())
    }

    /// Delete a component, unlinking it from every product
    #[with_permission(Permission::Components(ComponentAction::Delete))]
    pub async fn delete_component(&self, caller: &Caller, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        find_component(&txn, id).await?;

        ProductComponents::delete_many()
            .filter(product_components::Column::ComponentId.eq(id))
            .exec(&txn)
            .await?;
        delete_for_owner(&txn, AttachmentOwner::Component(id)).await?;
        Components::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(component_id = id, caller_id = caller.employee_id, "Component deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owners_must_differ() {
        let mut errors = FieldErrors::default();
        check_owners(&mut errors, Some(3), Some(3));
        assert!(errors.has("second_owner_id"));
    }

    #[test]
    fn test_owners_may_be_absent() {
        let mut errors = FieldErrors::default();
        check_owners(&mut errors, None, None);
        check_owners(&mut errors, Some(1), None);
        check_owners(&mut errors, Some(1), Some(2));
        assert!(errors.into_result().is_ok());
    }
}
