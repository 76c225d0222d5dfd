//! # Employee Records
//!
//! Create, read, update and soft-delete employees, the caller's own profile
//! and avatar references. Superusers may edit any field; an employee editing
//! their own record is limited to the self-service fields.

use auth::{Caller, EmployeeAction, Permission};
use chrono::{Datelike, NaiveDate, Utc};
use entity::{
    departments,
    employee_skills,
    employees::{self, Column as EmployeeColumn},
    products,
    sea_orm_active_enums::EmployeeStatus,
    skills,
    team_members,
    teams,
    Departments,
    EmployeeSkills,
    Employees,
    Products,
    Skills,
    TeamMembers,
    Teams,
};
use error::{AppError, OptionExt, Result};
use permissions_macro::with_permission;
use sea_orm::{
    sea_query::{Expr, Query},
    ActiveModelTrait,
    ColumnTrait,
    Condition,
    ConnectionTrait,
    EntityTrait,
    ModelTrait,
    QueryFilter,
    QueryOrder,
    Set,
    TransactionTrait,
};
use tracing::info;

use super::{fetch_page, skills::replace_skills, FieldErrors};
use crate::{
    dto::{
        employees::{
            CreateEmployeeRequest,
            EmployeeListQuery,
            EmployeeResponse,
            EmployeeSummary,
            SetAvatarRequest,
            UpdateEmployeeRequest,
        },
        Page,
    },
    utils::icontains,
    Directory,
};

/// Year the company was founded; no hire date can precede it
pub const FOUNDING_YEAR: i32 = 1989;
pub const MIN_BIRTH_YEAR: i32 = 1900;

/// Load an employee or fail with NotFound
pub(crate) async fn find_employee<C: ConnectionTrait>(db: &C, id: i32) -> Result<employees::Model> {
    Employees::find_by_id(id)
        .one(db)
        .await?
        .or_not_found(format_args!("Employee {}", id))
}

/// Load the given employees, failing with NotFound naming the ids that do not exist
pub(crate) async fn find_employees<C: ConnectionTrait>(db: &C, ids: &[i32]) -> Result<Vec<employees::Model>> {
    let found = Employees::find()
        .filter(EmployeeColumn::Id.is_in(ids.to_vec()))
        .order_by_asc(EmployeeColumn::Id)
        .all(db)
        .await?;

    let missing: Vec<i32> = ids
        .iter()
        .copied()
        .filter(|id| !found.iter().any(|e| e.id == *id))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::not_found(format!(
            "Employees not found: {}",
            crate::utils::format_ids(&missing)
        )));
    }

    Ok(found)
}

/// Check a reference to an employee given as request field `field`
pub(crate) async fn check_employee_ref<C: ConnectionTrait>(
    db: &C,
    errors: &mut FieldErrors,
    field: &str,
    id: Option<i32>,
) -> Result<()> {
    if let Some(id) = id {
        if Employees::find_by_id(id).one(db).await?.is_none() {
            errors.push(field, format!("Employee {} does not exist", id));
        }
    }
    Ok(())
}

/// `+` followed by 10 to 15 digits
pub fn is_valid_phone(phone: &str) -> bool {
    phone
        .strip_prefix('+')
        .is_some_and(|digits| (10 ..= 15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit()))
}

fn check_profile_values(
    errors: &mut FieldErrors,
    telephone: Option<&str>,
    birth_date: Option<NaiveDate>,
    hire_date: Option<NaiveDate>,
) {
    let today = Utc::now().date_naive();

    if let Some(phone) = telephone {
        if !is_valid_phone(phone) {
            errors.push(
                "telephone",
                "Phone number must start with + and contain 10 to 15 digits",
            );
        }
    }
    if let Some(date) = birth_date {
        if date > today {
            errors.push("birth_date", "Birth date cannot be in the future");
        }
        else if date.year() < MIN_BIRTH_YEAR {
            errors.push("birth_date", "Birth year cannot be earlier than 1900");
        }
    }
    if let Some(date) = hire_date {
        if date > today {
            errors.push("hire_date", "Hire date cannot be in the future");
        }
        else if date.year() < FOUNDING_YEAR {
            errors.push(
                "hire_date",
                "Hire year cannot be earlier than the company founding year (1989)",
            );
        }
    }
}

/// Report email, phone and telegram values already used by another employee
async fn check_unique_contacts<C: ConnectionTrait>(
    db: &C,
    errors: &mut FieldErrors,
    exclude: Option<i32>,
    email: Option<&str>,
    telephone: Option<&str>,
    telegram: Option<&str>,
) -> Result<()> {
    let checks = [
        ("email", EmployeeColumn::Email, email, "An employee with this email already exists"),
        (
            "telephone",
            EmployeeColumn::Telephone,
            telephone,
            "An employee with this phone number already exists",
        ),
        (
            "telegram",
            EmployeeColumn::Telegram,
            telegram,
            "An employee with this telegram handle already exists",
        ),
    ];

    for (field, column, value, message) in checks {
        let Some(value) = value
        else {
            continue;
        };
        if errors.has(field) {
            continue;
        }

        let mut query = Employees::find().filter(column.eq(value));
        if let Some(id) = exclude {
            query = query.filter(EmployeeColumn::Id.ne(id));
        }
        if query.one(db).await?.is_some() {
            errors.push(field, message);
        }
    }
    Ok(())
}

async fn check_department_ref<C: ConnectionTrait>(db: &C, errors: &mut FieldErrors, id: Option<i32>) -> Result<()> {
    if let Some(id) = id {
        if Departments::find_by_id(id).one(db).await?.is_none() {
            errors.push("department_id", format!("Department {} does not exist", id));
        }
    }
    Ok(())
}

/// Employee record with skill names sorted alphabetically
pub(crate) async fn employee_response<C: ConnectionTrait>(db: &C, employee: employees::Model) -> Result<EmployeeResponse> {
    let skills = employee
        .find_related(Skills)
        .order_by_asc(skills::Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(|s| s.name)
        .collect();

    Ok(EmployeeResponse {
        employee,
        skills,
    })
}

impl Directory {
    /// Create an employee record. The new employee has no password until a reset.
    #[with_permission(Permission::Employees(EmployeeAction::Create))]
    pub async fn create_employee(&self, caller: &Caller, req: CreateEmployeeRequest) -> Result<EmployeeResponse> {
        let mut errors = FieldErrors::validate(&req);
        check_profile_values(
            &mut errors,
            Some(req.telephone.as_str()),
            Some(req.birth_date),
            req.hire_date,
        );

        let txn = self.db.begin().await?;
        check_unique_contacts(
            &txn,
            &mut errors,
            None,
            Some(req.email.as_str()),
            Some(req.telephone.as_str()),
            req.telegram.as_deref(),
        )
        .await?;
        check_department_ref(&txn, &mut errors, req.department_id).await?;
        errors.into_result()?;

        let employee = employees::ActiveModel {
            full_name: Set(req.full_name),
            email: Set(req.email),
            password_hash: Set(None),
            position: Set(req.position),
            birth_date: Set(req.birth_date),
            hire_date: Set(req.hire_date),
            avatar: Set(None),
            telegram: Set(req.telegram),
            telephone: Set(req.telephone),
            employment_type: Set(req.employment_type),
            status: Set(req.status),
            location: Set(req.location),
            grade: Set(req.grade),
            bio: Set(req.bio),
            is_outsource: Set(req.is_outsource),
            is_superuser: Set(req.is_superuser),
            department_id: Set(req.department_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if !req.skill_ids.is_empty() {
            replace_skills(&txn, employee.id, &req.skill_ids).await?;
        }

        let response = employee_response(&txn, employee).await?;
        txn.commit().await?;

        info!(
            employee_id = response.employee.id,
            caller_id = caller.employee_id,
            "Employee created"
        );
        Ok(response)
    }

    #[with_permission(Permission::Employees(EmployeeAction::Read))]
    pub async fn get_employee(&self, caller: &Caller, id: i32) -> Result<EmployeeResponse> {
        let employee = find_employee(&self.db, id).await?;
        employee_response(&self.db, employee).await
    }

    /// The caller's own record
    pub async fn me(&self, caller: &Caller) -> Result<EmployeeResponse> {
        let employee = find_employee(&self.db, caller.employee_id).await?;
        employee_response(&self.db, employee).await
    }

    /// List employees with exact-match filters and a free-text search
    #[with_permission(Permission::Employees(EmployeeAction::Read))]
    pub async fn list_employees(&self, caller: &Caller, query: &EmployeeListQuery) -> Result<Page<EmployeeSummary>> {
        let mut select = Employees::find();

        if let Some(position) = &query.position {
            select = select.filter(EmployeeColumn::Position.eq(position.as_str()));
        }
        if let Some(grade) = query.grade {
            select = select.filter(EmployeeColumn::Grade.eq(grade));
        }
        if let Some(employment_type) = query.employment_type {
            select = select.filter(EmployeeColumn::EmploymentType.eq(employment_type));
        }
        if let Some(is_outsource) = query.is_outsource {
            select = select.filter(EmployeeColumn::IsOutsource.eq(is_outsource));
        }
        if let Some(location) = &query.location {
            select = select.filter(EmployeeColumn::Location.eq(location.as_str()));
        }
        if let Some(status) = query.status {
            select = select.filter(EmployeeColumn::Status.eq(status));
        }
        if let Some(department) = &query.department {
            select = select.filter(
                EmployeeColumn::DepartmentId.in_subquery(
                    Query::select()
                        .column((Departments, departments::Column::Id))
                        .from(Departments)
                        .and_where(Expr::col((Departments, departments::Column::Name)).eq(department.as_str()))
                        .to_owned(),
                ),
            );
        }
        if !query.skills.is_empty() {
            select = select.filter(
                EmployeeColumn::Id.in_subquery(
                    Query::select()
                        .column((EmployeeSkills, employee_skills::Column::EmployeeId))
                        .from(EmployeeSkills)
                        .inner_join(
                            Skills,
                            Expr::col((Skills, skills::Column::Id))
                                .equals((EmployeeSkills, employee_skills::Column::SkillId)),
                        )
                        .and_where(Expr::col((Skills, skills::Column::Name)).is_in(query.skills.clone()))
                        .to_owned(),
                ),
            );
        }
        if let Some(team) = &query.team {
            select = select.filter(
                EmployeeColumn::Id.in_subquery(
                    Query::select()
                        .column((TeamMembers, team_members::Column::EmployeeId))
                        .from(TeamMembers)
                        .inner_join(
                            Teams,
                            Expr::col((Teams, teams::Column::Id)).equals((TeamMembers, team_members::Column::TeamId)),
                        )
                        .and_where(Expr::col((Teams, teams::Column::Name)).eq(team.as_str()))
                        .to_owned(),
                ),
            );
        }
        if let Some(product) = &query.product {
            select = select.filter(
                EmployeeColumn::Id.in_subquery(
                    Query::select()
                        .column((TeamMembers, team_members::Column::EmployeeId))
                        .from(TeamMembers)
                        .inner_join(
                            Teams,
                            Expr::col((Teams, teams::Column::Id)).equals((TeamMembers, team_members::Column::TeamId)),
                        )
                        .inner_join(
                            Products,
                            Expr::col((Products, products::Column::Id)).equals((Teams, teams::Column::ProductId)),
                        )
                        .and_where(Expr::col((Products, products::Column::Name)).eq(product.as_str()))
                        .to_owned(),
                ),
            );
        }
        if let Some(search) = query.list.search() {
            select = select.filter(
                Condition::any()
                    .add(icontains(EmployeeColumn::FullName, search))
                    .add(icontains(EmployeeColumn::Position, search))
                    .add(icontains(EmployeeColumn::Email, search)),
            );
        }

        let select = select
            .order_by_asc(EmployeeColumn::FullName)
            .order_by_asc(EmployeeColumn::Id);

        Ok(fetch_page(select, &self.db, &query.list)
            .await?
            .map(EmployeeSummary::from))
    }

    /// Partial update. Superusers may change anything; employees may change
    /// the self-service fields of their own record.
    pub async fn update_employee(&self, caller: &Caller, id: i32, req: UpdateEmployeeRequest) -> Result<EmployeeResponse> {
        caller.require_on(&Permission::Employees(EmployeeAction::Update), id)?;
        if !caller.is_superuser {
            let restricted = req.restricted_fields();
            if !restricted.is_empty() {
                return Err(AppError::forbidden(format!(
                    "Only an administrator can change: {}",
                    restricted.join(", ")
                )));
            }
        }

        let mut errors = FieldErrors::validate(&req);
        check_profile_values(
            &mut errors,
            req.telephone.as_deref(),
            req.birth_date,
            req.hire_date.flatten(),
        );

        let txn = self.db.begin().await?;
        let employee = find_employee(&txn, id).await?;
        check_unique_contacts(
            &txn,
            &mut errors,
            Some(id),
            req.email.as_deref(),
            req.telephone.as_deref(),
            req.telegram.as_ref().and_then(|t| t.as_deref()),
        )
        .await?;
        check_department_ref(&txn, &mut errors, req.department_id.flatten()).await?;
        errors.into_result()?;

        let mut active: employees::ActiveModel = employee.into();
        if let Some(full_name) = req.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(email) = req.email {
            active.email = Set(email);
        }
        if let Some(position) = req.position {
            active.position = Set(position);
        }
        if let Some(birth_date) = req.birth_date {
            active.birth_date = Set(birth_date);
        }
        if let Some(hire_date) = req.hire_date {
            active.hire_date = Set(hire_date);
        }
        if let Some(telegram) = req.telegram {
            active.telegram = Set(telegram);
        }
        if let Some(telephone) = req.telephone {
            active.telephone = Set(telephone);
        }
        if let Some(employment_type) = req.employment_type {
            active.employment_type = Set(employment_type);
        }
        if let Some(status) = req.status {
            active.status = Set(status);
        }
        if let Some(location) = req.location {
            active.location = Set(location);
        }
        if let Some(grade) = req.grade {
            active.grade = Set(grade);
        }
        if let Some(bio) = req.bio {
            active.bio = Set(bio);
        }
        if let Some(is_outsource) = req.is_outsource {
            active.is_outsource = Set(is_outsource);
        }
        if let Some(is_superuser) = req.is_superuser {
            active.is_superuser = Set(is_superuser);
        }
        if let Some(department_id) = req.department_id {
            active.department_id = Set(department_id);
        }

        let updated = active.update(&txn).await?;
        if let Some(skill_ids) = &req.skill_ids {
            replace_skills(&txn, id, skill_ids).await?;
        }

        let response = employee_response(&txn, updated).await?;
        txn.commit().await?;

        info!(employee_id = id, caller_id = caller.employee_id, "Employee updated");
        Ok(response)
    }

    /// Soft delete: the employee is marked fired and the record stays readable
    #[with_permission(Permission::Employees(EmployeeAction::Delete))]
    pub async fn delete_employee(&self, caller: &Caller, id: i32) -> Result<EmployeeSummary> {
        let employee = find_employee(&self.db, id).await?;

        let mut active: employees::ActiveModel = employee.into();
        active.status = Set(EmployeeStatus::Fired);
        let updated = active.update(&self.db).await?;

        info!(employee_id = id, caller_id = caller.employee_id, "Employee fired");
        Ok(updated.into())
    }

    /// Store a new avatar reference for the employee
    pub async fn set_avatar(&self, caller: &Caller, employee_id: i32, req: SetAvatarRequest) -> Result<EmployeeSummary> {
        caller.require_on(&Permission::Employees(EmployeeAction::AvatarUpdate), employee_id)?;
        FieldErrors::validate(&req).into_result()?;

        let employee = find_employee(&self.db, employee_id).await?;
        let mut active: employees::ActiveModel = employee.into();
        active.avatar = Set(Some(req.avatar));
        let updated = active.update(&self.db).await?;

        info!(employee_id, caller_id = caller.employee_id, "Avatar updated");
        Ok(updated.into())
    }

    /// Drop the avatar reference. Removing the stored file is up to the caller.
    pub async fn delete_avatar(&self, caller: &Caller, employee_id: i32) -> Result<EmployeeSummary> {
        caller.require_on(&Permission::Employees(EmployeeAction::AvatarUpdate), employee_id)?;

        let employee = find_employee(&self.db, employee_id).await?;
        if employee.avatar.is_none() {
            return Err(AppError::not_found("Employee has no avatar"));
        }

        let mut active: employees::ActiveModel = employee.into();
        active.avatar = Set(None);
        let updated = active.update(&self.db).await?;

        info!(employee_id, caller_id = caller.employee_id, "Avatar removed");
        Ok(updated.into())
    }
}
