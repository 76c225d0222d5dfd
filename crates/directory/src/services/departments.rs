//! # Department Operations
//!
//! Department tree maintenance and department membership. An employee belongs
//! to at most one department through `employees.department_id`.

use std::collections::HashMap;

use auth::{Caller, DepartmentAction, Permission};
use entity::{
    departments::{self, Column as DepartmentColumn},
    employees::Column as EmployeeColumn,
    Departments,
    Employees,
};
use error::{AppError, OptionExt, Result};
use logging::log_membership_event;
use permissions_macro::with_permission;
use sea_orm::{
    sea_query::Expr,
    ActiveModelTrait,
    ColumnTrait,
    Condition,
    ConnectionTrait,
    EntityTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    Set,
    TransactionTrait,
};
use tracing::info;

use super::{
    attachments::{delete_for_owner, AttachmentOwner},
    employees::{check_employee_ref, find_employees},
    fetch_page,
    hierarchy,
    FieldErrors,
};
use crate::{
    dto::{
        departments::{CreateDepartmentRequest, DepartmentEmployeesRequest, DepartmentResponse, UpdateDepartmentRequest},
        employees::EmployeeSummary,
        ListQuery,
        Page,
    },
    utils::{dedup_ids, format_ids, icontains},
    Directory,
};

async fn find_department<C: ConnectionTrait>(db: &C, id: i32) -> Result<departments::Model> {
    Departments::find_by_id(id)
        .one(db)
        .await?
        .or_not_found(format_args!("Department {}", id))
}

async fn name_taken<C: ConnectionTrait>(db: &C, name: &str, exclude: Option<i32>) -> Result<bool> {
    let mut query = Departments::find().filter(DepartmentColumn::Name.eq(name));
    if let Some(id) = exclude {
        query = query.filter(DepartmentColumn::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

/// Employee counts keyed by department id; departments without employees are absent
async fn employee_counts<C: ConnectionTrait>(db: &C, ids: &[i32]) -> Result<HashMap<i32, u64>> {
    let rows: Vec<(Option<i32>, i64)> = Employees::find()
        .select_only()
        .column(EmployeeColumn::DepartmentId)
        .column_as(EmployeeColumn::Id.count(), "employee_count")
        .filter(EmployeeColumn::DepartmentId.is_in(ids.to_vec()))
        .group_by(EmployeeColumn::DepartmentId)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(id, count)| id.map(|id| (id, u64::try_from(count).unwrap_or_default())))
        .collect())
}

async fn to_responses<C: ConnectionTrait>(db: &C, models: Vec<departments::Model>) -> Result<Vec<DepartmentResponse>> {
    let ids: Vec<i32> = models.iter().map(|d| d.id).collect();
    let counts = employee_counts(db, &ids).await?;
    Ok(models
        .into_iter()
        .map(|d| {
            let count = counts.get(&d.id).copied().unwrap_or(0);
            DepartmentResponse::from_model(d, count)
        })
        .collect())
}

async fn to_response<C: ConnectionTrait>(db: &C, model: departments::Model) -> Result<DepartmentResponse> {
    let count = employee_counts(db, &[model.id])
        .await?
        .get(&model.id)
        .copied()
        .unwrap_or(0);
    Ok(DepartmentResponse::from_model(model, count))
}

/// Point the given employees at `department_id` (or clear it with `None`)
async fn set_department<C: ConnectionTrait>(db: &C, employee_ids: &[i32], department_id: Option<i32>) -> Result<u64> {
    let result = Employees::update_many()
        .col_expr(EmployeeColumn::DepartmentId, Expr::value(department_id))
        .filter(EmployeeColumn::Id.is_in(employee_ids.to_vec()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

impl Directory {
    /// Create a department. The owner, if any, is moved into it.
    #[with_permission(Permission::Departments(DepartmentAction::Create))]
    pub async fn create_department(&self, caller: &Caller, req: CreateDepartmentRequest) -> Result<DepartmentResponse> {
        let mut errors = FieldErrors::validate(&req);

        let txn = self.db.begin().await?;
        if !errors.has("name") && name_taken(&txn, &req.name, None).await? {
            errors.push("name", "A department with this name already exists");
        }
        check_employee_ref(&txn, &mut errors, "owner_id", req.owner_id).await?;
        errors.into_result()?;
        hierarchy::validate_parent::<Departments, _>(&txn, None, req.parent_id).await?;

        let department = departments::ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            owner_id: Set(req.owner_id),
            parent_id: Set(req.parent_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if let Some(owner_id) = department.owner_id {
            set_department(&txn, &[owner_id], Some(department.id)).await?;
        }

        let response = to_response(&txn, department).await?;
        txn.commit().await?;

        info!(
            department_id = response.id,
            parent_id = ?response.parent_id,
            caller_id = caller.employee_id,
            "Department created"
        );
        Ok(response)
    }

    #[with_permission(Permission::Departments(DepartmentAction::Read))]
    pub async fn get_department(&self, caller: &Caller, id: i32) -> Result<DepartmentResponse> {
        let department = find_department(&self.db, id).await?;
        to_response(&self.db, department).await
    }

    /// List departments, searching over name and description
    #[with_permission(Permission::Departments(DepartmentAction::Read))]
    pub async fn list_departments(&self, caller: &Caller, query: &ListQuery) -> Result<Page<DepartmentResponse>> {
        let mut select = Departments::find();
        if let Some(search) = query.search() {
            select = select.filter(
                Condition::any()
                    .add(icontains(DepartmentColumn::Name, search))
                    .add(icontains(DepartmentColumn::Description, search)),
            );
        }

        let page = fetch_page(select.order_by_asc(DepartmentColumn::Name), &self.db, query).await?;
        let items = to_responses(&self.db, page.items).await?;
        Ok(Page {
            items,
            pagination: page.pagination,
        })
    }

    /// Partial update; the new parent is validated against the whole ancestor chain
    #[with_permission(Permission::Departments(DepartmentAction::Update))]
    pub async fn update_department(
        &self,
        caller: &Caller,
        id: i32,
        req: UpdateDepartmentRequest,
    ) -> Result<DepartmentResponse> {
        let mut errors = FieldErrors::validate(&req);

        let txn = self.db.begin().await?;
        let department = hierarchy::find_for_update::<Departments, _>(&txn, id)
            .await?
            .or_not_found(format_args!("Department {}", id))?;

        if let Some(name) = &req.name {
            if !errors.has("name") && name_taken(&txn, name, Some(id)).await? {
                errors.push("name", "A department with this name already exists");
            }
        }
        check_employee_ref(&txn, &mut errors, "owner_id", req.owner_id.flatten()).await?;
        errors.into_result()?;
        if let Some(parent_id) = req.parent_id {
            hierarchy::validate_parent::<Departments, _>(&txn, Some(id), parent_id).await?;
        }

        let mut active: departments::ActiveModel = department.into();
        if let Some(name) = req.name {
            active.name = Set(name);
        }
        if let Some(description) = req.description {
            active.description = Set(description);
        }
        if let Some(owner_id) = req.owner_id {
            active.owner_id = Set(owner_id);
        }
        if let Some(parent_id) = req.parent_id {
            active.parent_id = Set(parent_id);
        }
        let updated = active.update(&txn).await?;

        if let Some(Some(owner_id)) = req.owner_id {
            set_department(&txn, &[owner_id], Some(id)).await?;
        }

        let response = to_response(&txn, updated).await?;
        txn.commit().await?;

        info!(department_id = id, caller_id = caller.employee_id, "Department updated");
        Ok(response)
    }

    /// Delete a leaf department. Its employees are left without a department.
    #[with_permission(Permission::Departments(DepartmentAction::Delete))]
    pub async fn delete_department(&self, caller: &Caller, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        let department = hierarchy::find_for_update::<Departments, _>(&txn, id)
            .await?
            .or_not_found(format_args!("Department {}", id))?;
        hierarchy::ensure_leaf::<Departments, _>(&txn, id).await?;

        let released = Employees::update_many()
            .col_expr(EmployeeColumn::DepartmentId, Expr::value(Option::<i32>::None))
            .filter(EmployeeColumn::DepartmentId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        delete_for_owner(&txn, AttachmentOwner::Department(id)).await?;
        Departments::delete_by_id(department.id).exec(&txn).await?;
        txn.commit().await?;

        info!(
            department_id = id,
            released_employees = released,
            caller_id = caller.employee_id,
            "Department deleted"
        );
        Ok(())
    }

    /// Direct children of a department
    #[with_permission(Permission::Departments(DepartmentAction::Read))]
    pub async fn department_children(&self, caller: &Caller, id: i32) -> Result<Vec<DepartmentResponse>> {
        find_department(&self.db, id).await?;
        let children = hierarchy::children::<Departments, _>(&self.db, id).await?;
        to_responses(&self.db, children).await
    }

    /// Departments without a parent
    #[with_permission(Permission::Departments(DepartmentAction::Read))]
    pub async fn root_departments(&self, caller: &Caller) -> Result<Vec<DepartmentResponse>> {
        let roots = hierarchy::roots::<Departments, _>(&self.db).await?;
        to_responses(&self.db, roots).await
    }

    /// Move employees into the department, leaving whatever department they were in
    #[with_permission(Permission::Departments(DepartmentAction::EmployeesAdd))]
    pub async fn add_department_employees(
        &self,
        caller: &Caller,
        id: i32,
        req: DepartmentEmployeesRequest,
    ) -> Result<Vec<EmployeeSummary>> {
        FieldErrors::validate(&req).into_result()?;
        let ids = dedup_ids(&req.employee_ids);

        let txn = self.db.begin().await?;
        find_department(&txn, id).await?;
        find_employees(&txn, &ids).await?;
        set_department(&txn, &ids, Some(id)).await?;
        let moved = find_employees(&txn, &ids).await?;
        txn.commit().await?;

        log_membership_event!("department", id, "added", &ids);
        Ok(moved.into_iter().map(EmployeeSummary::from).collect())
    }

    /// Take employees out of the department. All of them must belong to it.
    #[with_permission(Permission::Departments(DepartmentAction::EmployeesRemove))]
    pub async fn remove_department_employees(
        &self,
        caller: &Caller,
        id: i32,
        req: DepartmentEmployeesRequest,
    ) -> Result<()> {
        FieldErrors::validate(&req).into_result()?;
        let ids = dedup_ids(&req.employee_ids);

        let txn = self.db.begin().await?;
        let department = find_department(&txn, id).await?;
        let employees = find_employees(&txn, &ids).await?;

        let outsiders: Vec<i32> = employees
            .iter()
            .filter(|e| e.department_id != Some(id))
            .map(|e| e.id)
            .collect();
        if !outsiders.is_empty() {
            return Err(AppError::field(
                "employee_ids",
                format!(
                    "Not in department {}: {}",
                    department.name,
                    format_ids(&outsiders)
                ),
            ));
        }

        set_department(&txn, &ids, None).await?;
        txn.commit().await?;

        log_membership_event!("department", id, "removed", &ids);
        Ok(())
    }

    #[with_permission(Permission::Departments(DepartmentAction::EmployeesRead))]
    pub async fn list_department_employees(
        &self,
        caller: &Caller,
        id: i32,
        query: &ListQuery,
    ) -> Result<Page<EmployeeSummary>> {
        find_department(&self.db, id).await?;

        let mut select = Employees::find().filter(EmployeeColumn::DepartmentId.eq(id));
        if let Some(search) = query.search() {
            select = select.filter(icontains(EmployeeColumn::FullName, search));
        }
        let select = select
            .order_by_asc(EmployeeColumn::FullName)
            .order_by_asc(EmployeeColumn::Id);

        Ok(fetch_page(select, &self.db, query)
            .await?
            .map(EmployeeSummary::from))
    }
}
