//! Employee records: creation rules, soft delete, self-service limits,
//! skills, list filters, caller resolution and password reset.

mod common;

use std::sync::Arc;

use auth::secrecy::SecretString;
use chrono::NaiveDate;
use common::{EmployeeFixture, RecordingMailer, TestDb};
use directory::{
    dto::{
        departments::CreateDepartmentRequest,
        employees::{
            CreateEmployeeRequest,
            EmployeeListQuery,
            PasswordResetRequest,
            SetAvatarRequest,
            UpdateEmployeeRequest,
        },
        skills::{CreateSkillRequest, SetSkillsRequest},
        teams::{AddTeamMembersRequest, CreateTeamRequest},
        ListQuery,
    },
    Dispatcher,
    DispatcherConfig,
};
use entity::{
    sea_orm_active_enums::{EmployeeStatus, EmploymentType, Grade, OutboxStatus},
    Employees,
    NotificationOutbox,
};
use sea_orm::EntityTrait;

fn new_employee(name: &str, email: &str, telephone: &str) -> CreateEmployeeRequest {
    CreateEmployeeRequest {
        full_name:       name.to_string(),
        email:           email.to_string(),
        position:        "Developer".to_string(),
        birth_date:      NaiveDate::from_ymd_opt(1992, 3, 4).unwrap(),
        hire_date:       NaiveDate::from_ymd_opt(2021, 6, 1),
        telegram:        None,
        telephone:       telephone.to_string(),
        employment_type: EmploymentType::FullTime,
        status:          EmployeeStatus::Working,
        location:        "Kazan".to_string(),
        grade:           Some(Grade::G3),
        bio:             String::new(),
        is_outsource:    false,
        is_superuser:    false,
        department_id:   None,
        skill_ids:       vec![],
    }
}

#[tokio::test]
async fn test_create_and_get_employee() {
    let db = TestDb::new().await;
    let admin = db.admin().await;
    let dir = &db.directory;

    let created = dir
        .create_employee(&admin, new_employee("Ivan", "ivan@example.com", "+79001112233"))
        .await
        .unwrap();
    let fetched = dir.get_employee(&admin, created.employee.id).await.unwrap();
    assert_eq!(fetched.employee.email, "ivan@example.com");
    assert_eq!(fetched.employee.grade, Some(Grade::G3));
    assert!(fetched.skills.is_empty());
}

#[tokio::test]
async fn test_create_reports_every_field_problem() {
    let db = TestDb::new().await;
    let admin = db.admin().await;
    let dir = &db.directory;
    dir.create_employee(&admin, new_employee("Ivan", "ivan@example.com", "+79001112233"))
        .await
        .unwrap();

    let mut req = new_employee("Copy", "ivan@example.com", "8-900");
    req.hire_date = NaiveDate::from_ymd_opt(1980, 1, 1);
    let err = dir.create_employee(&admin, req).await.unwrap_err();

    let fields: Vec<&str> = err.field_errors().iter().map(|f| f.field.as_str()).collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"telephone"));
    assert!(fields.contains(&"hire_date"));
}

#[tokio::test]
async fn test_unique_phone_is_a_field_error() {
    let db = TestDb::new().await;
    let admin = db.admin().await;
    let dir = &db.directory;
    dir.create_employee(&admin, new_employee("Ivan", "ivan@example.com", "+79001112233"))
        .await
        .unwrap();

    let err = dir
        .create_employee(&admin, new_employee("Petr", "petr@example.com", "+79001112233"))
        .await
        .unwrap_err();
    assert_eq!(err.field_errors().len(), 1);
    assert_eq!(err.field_errors()[0].field, "telephone");
}

#[tokio::test]
async fn test_delete_marks_fired_and_keeps_row() {
    let db = TestDb::new().await;
    let admin = db.admin().await;
    let dir = &db.directory;
    let e = db.employee("Leaving").await;

    let summary = dir.delete_employee(&admin, e.id).await.unwrap();
    assert_eq!(summary.status, EmployeeStatus::Fired);

    let fetched = dir.get_employee(&admin, e.id).await.unwrap();
    assert_eq!(fetched.employee.status, EmployeeStatus::Fired);
    assert!(Employees::find_by_id(e.id).one(&db.conn).await.unwrap().is_some());
}

#[tokio::test]
async fn test_fired_employee_cannot_act() {
    let db = TestDb::new().await;
    let fired = EmployeeFixture::new("Gone")
        .status(EmployeeStatus::Fired)
        .insert(&db.conn)
        .await;

    let err = db.directory.caller(fired.id).await.unwrap_err();
    assert_eq!(err.code(), "UNAUTHORIZED");
    assert_eq!(db.directory.caller(9999).await.unwrap_err().code(), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_caller_carries_superuser_flag() {
    let db = TestDb::new().await;
    let admin = EmployeeFixture::new("Root").superuser().insert(&db.conn).await;

    let caller = db.directory.caller(admin.id).await.unwrap();
    assert!(caller.is_superuser);
    assert_eq!(caller.employee_id, admin.id);
}

#[tokio::test]
async fn test_self_service_update() {
    let db = TestDb::new().await;
    let me = db.regular_caller("Self").await;
    let dir = &db.directory;

    let updated = dir
        .update_employee(
            &me,
            me.employee_id,
            UpdateEmployeeRequest {
                location: Some("Remote".into()),
                bio: Some("Rustacean".into()),
                status: Some(EmployeeStatus::Vacation),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.employee.location, "Remote");
    assert_eq!(updated.employee.status, EmployeeStatus::Vacation);

    let err = dir
        .update_employee(
            &me,
            me.employee_id,
            UpdateEmployeeRequest {
                position: Some("CTO".into()),
                is_superuser: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");
    assert!(err.message().contains("position"));
    assert!(err.message().contains("is_superuser"));
}

#[tokio::test]
async fn test_cannot_edit_someone_else() {
    let db = TestDb::new().await;
    let me = db.regular_caller("Self").await;
    let other = db.employee("Other").await;

    let err = db
        .directory
        .update_employee(
            &me,
            other.id,
            UpdateEmployeeRequest {
                bio: Some("hacked".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");
}

#[tokio::test]
async fn test_mutations_require_superuser() {
    let db = TestDb::new().await;
    let me = db.regular_caller("Self").await;

    let err = db
        .directory
        .create_department(
            &me,
            CreateDepartmentRequest {
                name: "Shadow IT".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");

    // Reads are open to everyone
    assert!(db.directory.root_departments(&me).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_avatar_lifecycle() {
    let db = TestDb::new().await;
    let me = db.regular_caller("Self").await;
    let dir = &db.directory;

    let err = dir.delete_avatar(&me, me.employee_id).await.unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");

    let summary = dir
        .set_avatar(
            &me,
            me.employee_id,
            SetAvatarRequest {
                avatar: "avatars/self.png".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(summary.avatar.as_deref(), Some("avatars/self.png"));
    assert_eq!(
        dir.me(&me).await.unwrap().employee.avatar.as_deref(),
        Some("avatars/self.png")
    );

    let cleared = dir.delete_avatar(&me, me.employee_id).await.unwrap();
    assert_eq!(cleared.avatar, None);
}

#[tokio::test]
async fn test_skills_replace_set() {
    let db = TestDb::new().await;
    let admin = db.admin().await;
    let dir = &db.directory;
    let e = db.employee("Skilled").await;

    let rust = dir
        .create_skill(&admin, CreateSkillRequest { name: "Rust".into() })
        .await
        .unwrap();
    let sql = dir
        .create_skill(&admin, CreateSkillRequest { name: "SQL".into() })
        .await
        .unwrap();
    assert!(dir
        .create_skill(&admin, CreateSkillRequest { name: "Rust".into() })
        .await
        .unwrap_err()
        .is_validation());

    let response = dir
        .set_employee_skills(
            &admin,
            e.id,
            SetSkillsRequest {
                skill_ids: vec![sql.id, rust.id],
            },
        )
        .await
        .unwrap();
    assert_eq!(response.skills, vec!["Rust", "SQL"]);

    let response = dir
        .set_employee_skills(
            &admin,
            e.id,
            SetSkillsRequest {
                skill_ids: vec![rust.id],
            },
        )
        .await
        .unwrap();
    assert_eq!(response.skills, vec!["Rust"]);

    let err = dir
        .set_employee_skills(
            &admin,
            e.id,
            SetSkillsRequest {
                skill_ids: vec![rust.id, 404],
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.field_errors()[0].field, "skill_ids");
    assert_eq!(dir.get_employee(&admin, e.id).await.unwrap().skills, vec!["Rust"]);
}

#[tokio::test]
async fn test_list_filters_and_search() {
    let db = TestDb::new().await;
    let admin = db.admin().await;
    let dir = &db.directory;
    let alice = EmployeeFixture::new("Alice Backend").position("Backend").insert(&db.conn).await;
    let bob = EmployeeFixture::new("Bob Frontend").position("Frontend").insert(&db.conn).await;

    let rust = dir
        .create_skill(&admin, CreateSkillRequest { name: "Rust".into() })
        .await
        .unwrap();
    dir.set_employee_skills(
        &admin,
        alice.id,
        SetSkillsRequest {
            skill_ids: vec![rust.id],
        },
    )
    .await
    .unwrap();

    let team = dir
        .create_team(
            &admin,
            CreateTeamRequest {
                name: "Web".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    dir.add_team_members(
        &admin,
        team.id,
        AddTeamMembersRequest {
            employee_ids: vec![bob.id],
            role:         "Developer".into(),
        },
    )
    .await
    .unwrap();

    let by_position = dir
        .list_employees(
            &admin,
            &EmployeeListQuery {
                position: Some("Backend".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_position.items.iter().map(|e| e.id).collect::<Vec<_>>(), vec![alice.id]);

    let by_skill = dir
        .list_employees(
            &admin,
            &EmployeeListQuery {
                skills: vec!["Rust".into(), "Go".into()],
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_skill.items.iter().map(|e| e.id).collect::<Vec<_>>(), vec![alice.id]);

    let by_team = dir
        .list_employees(
            &admin,
            &EmployeeListQuery {
                team: Some("Web".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_team.items.iter().map(|e| e.id).collect::<Vec<_>>(), vec![bob.id]);

    let searched = dir
        .list_employees(
            &admin,
            &EmployeeListQuery {
                list: ListQuery::new().with_search("FRONT"),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(searched.items.iter().map(|e| e.id).collect::<Vec<_>>(), vec![bob.id]);

    let paged = dir
        .list_employees(
            &admin,
            &EmployeeListQuery {
                list: ListQuery::new().with_page(1, 2),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(paged.items.len(), 2);
    assert_eq!(paged.pagination.total, 3);
    assert_eq!(paged.pagination.total_pages, 2);
}

#[tokio::test]
async fn test_password_reset_for_unknown_email() {
    let db = TestDb::new().await;

    let err = db
        .directory
        .reset_password(PasswordResetRequest {
            email: "nobody@example.com".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.field_errors()[0].field, "email");
    assert_eq!(
        err.field_errors()[0].message,
        "Пользователя с таким email нет в системе."
    );
}

#[tokio::test]
async fn test_password_reset_mails_a_working_password() {
    let db = TestDb::new().await;
    let e = db.employee("Forgetful").await;
    let dir = &db.directory;

    dir.reset_password(PasswordResetRequest {
        email: e.email.clone(),
    })
    .await
    .unwrap();

    let stored = Employees::find_by_id(e.id).one(&db.conn).await.unwrap().unwrap();
    let hash = stored.password_hash.unwrap();
    assert!(hash.starts_with("$argon2id$"));

    let mailer = RecordingMailer::default();
    Dispatcher::new(
        db.conn.clone(),
        Arc::new(mailer.clone()),
        dir.notifier.clone(),
        DispatcherConfig::default(),
    )
    .run_pending()
    .await
    .unwrap();

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Восстановление пароля");
    assert_eq!(sent[0].to, vec![e.email.clone()]);

    let password = sent[0]
        .body
        .strip_prefix("Ваш новый пароль: ")
        .unwrap()
        .to_string();
    assert_eq!(password.len(), 8);
    assert!(!hash.contains(&password));

    let caller = dir
        .authenticate(&e.email, &SecretString::from(password))
        .await
        .unwrap();
    assert_eq!(caller.employee_id, e.id);
    assert!(dir
        .authenticate(&e.email, &SecretString::from("wrong-password".to_string()))
        .await
        .is_err());
}

#[tokio::test]
async fn test_reset_email_is_delivered_alone() {
    let db = TestDb::new().await;
    let admin = db.admin().await;
    let dir = &db.directory;
    let e = db.employee("Forgetful").await;

    let team = dir
        .create_team(
            &admin,
            CreateTeamRequest {
                name: "Core".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    dir.add_team_members(
        &admin,
        team.id,
        AddTeamMembersRequest {
            employee_ids: vec![e.id],
            role:         "Developer".into(),
        },
    )
    .await
    .unwrap();

    let outbox_id = dir
        .reset_password(PasswordResetRequest {
            email: e.email.clone(),
        })
        .await
        .unwrap();

    let mailer = RecordingMailer::default();
    let dispatcher = Dispatcher::new(
        db.conn.clone(),
        Arc::new(mailer.clone()),
        dir.notifier.clone(),
        DispatcherConfig::default(),
    );
    let report = dispatcher.deliver_id(outbox_id).await.unwrap();
    assert_eq!(report.sent, 1);
    assert_eq!(mailer.sent().len(), 1);
    assert_eq!(mailer.sent()[0].subject, "Восстановление пароля");

    let rows = NotificationOutbox::find().all(&db.conn).await.unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        let expected = if row.id == outbox_id { OutboxStatus::Sent } else { OutboxStatus::Pending };
        assert_eq!(row.status, expected);
    }

    // Already sent, nothing more to do
    assert_eq!(dispatcher.deliver_id(outbox_id).await.unwrap().sent, 0);
}
