//! # Common Test Utilities
//!
//! In-memory database setup, employee fixtures and a recording mailer shared
//! by the directory integration tests.

#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
    Mutex,
    Once,
};

use async_trait::async_trait;
use auth::Caller;
use chrono::NaiveDate;
use directory::{Directory, Mailer, OutgoingEmail};
use entity::{
    employees,
    sea_orm_active_enums::{EmployeeStatus, EmploymentType},
};
use migration::{connect_to_database, Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Initialize test logging (run once per test session)
static INIT: Once = Once::new();

/// Keeps fixture emails and phone numbers unique
static COUNTER: AtomicU32 = AtomicU32::new(1);

/// Initialize test environment including structured logging
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Migrated in-memory SQLite database with a directory on top
pub struct TestDb {
    pub conn:      DatabaseConnection,
    pub directory: Directory,
}

impl TestDb {
    /// A single connection keeps every query on the same in-memory database
    pub async fn new() -> Self {
        init_test_env();
        let conn = connect_to_database("sqlite::memory:", 1)
            .await
            .expect("connect to sqlite");
        Migrator::up(&conn, None).await.expect("apply migrations");

        Self {
            directory: Directory::new(conn.clone()),
            conn,
        }
    }

    /// Insert a superuser and return it as a caller
    pub async fn admin(&self) -> Caller {
        let admin = EmployeeFixture::new("Admin").superuser().insert(&self.conn).await;
        Caller::new(admin.id, true)
    }

    pub async fn employee(&self, name: &str) -> employees::Model { EmployeeFixture::new(name).insert(&self.conn).await }

    /// Insert a regular employee and return it as a caller
    pub async fn regular_caller(&self, name: &str) -> Caller {
        let employee = self.employee(name).await;
        Caller::new(employee.id, false)
    }
}

/// Builder for employee rows inserted directly into the store
pub struct EmployeeFixture {
    pub full_name:    String,
    pub email:        String,
    pub telephone:    String,
    pub position:     String,
    pub location:     String,
    pub is_superuser: bool,
    pub status:       EmployeeStatus,
}

impl EmployeeFixture {
    pub fn new(full_name: &str) -> Self {
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        Self {
            full_name:    full_name.to_string(),
            email:        format!("employee{}@example.com", n),
            telephone:    format!("+7900{:07}", n),
            position:     "Engineer".to_string(),
            location:     "Moscow".to_string(),
            is_superuser: false,
            status:       EmployeeStatus::Working,
        }
    }

    pub fn superuser(mut self) -> Self {
        self.is_superuser = true;
        self
    }

    pub fn position(mut self, position: &str) -> Self {
        self.position = position.to_string();
        self
    }

    pub fn status(mut self, status: EmployeeStatus) -> Self {
        self.status = status;
        self
    }

    pub async fn insert(self, db: &DatabaseConnection) -> employees::Model {
        employees::ActiveModel {
            full_name: Set(self.full_name),
            email: Set(self.email),
            password_hash: Set(None),
            position: Set(self.position),
            birth_date: Set(NaiveDate::from_ymd_opt(1990, 5, 17).unwrap()),
            hire_date: Set(NaiveDate::from_ymd_opt(2020, 1, 9)),
            avatar: Set(None),
            telegram: Set(None),
            telephone: Set(self.telephone),
            employment_type: Set(EmploymentType::FullTime),
            status: Set(self.status),
            location: Set(self.location),
            grade: Set(None),
            bio: Set(String::new()),
            is_outsource: Set(false),
            is_superuser: Set(self.is_superuser),
            department_id: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("insert employee fixture")
    }
}

/// Mailer that keeps every email it was asked to send
#[derive(Clone, Default)]
pub struct RecordingMailer {
    pub sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    /// Fail every delivery when set
    pub fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> { self.sent.lock().unwrap().clone() }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> error::Result<()> {
        if self.fail {
            return Err(error::AppError::internal("smtp unavailable"));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}
