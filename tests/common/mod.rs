//! Shared fixtures for the database-backed integration tests.
//!
//! Each test gets its own throwaway file-backed SQLite database with the full
//! migration set applied, so tests never share state and need no external
//! Postgres instance.

use std::ops::Deref;
use std::path::PathBuf;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use worknest_backend::db;
use worknest_backend::models::jobs::{self, CreateJob};
use worknest_backend::models::proposals::{self, SubmitProposal};
use worknest_backend::models::users::{self, CreateUser, Roles};

/// A per-test database whose backing file is removed on drop.
pub struct TestDb {
    conn: DatabaseConnection,
    path: PathBuf,
}

impl Deref for TestDb {
    type Target = DatabaseConnection;

    fn deref(&self) -> &DatabaseConnection {
        &self.conn
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // Unlinking an open SQLite file is fine; the journal may exist too.
        let _ = std::fs::remove_file(&self.path);
        for suffix in ["-wal", "-shm"] {
            let mut sidecar = self.path.clone().into_os_string();
            sidecar.push(suffix);
            let _ = std::fs::remove_file(sidecar);
        }
    }
}

pub async fn setup_db() -> TestDb {
    let path = std::env::temp_dir().join(format!("worknest-test-{}.sqlite", Uuid::new_v4()));
    let url = format!("sqlite://{}?mode=rwc", path.display());
    let conn = Database::connect(&url).await.expect("connect sqlite");
    Migrator::up(&conn, None).await.expect("run migrations");
    TestDb { conn, path }
}

pub async fn seed_user(db: &DatabaseConnection, role: Roles) -> users::Model {
    let id = Uuid::new_v4();
    db::users::insert_user(
        db,
        CreateUser {
            id,
            username: format!("user-{id}"),
            email: format!("{id}@example.com"),
            role,
            display_name: None,
        },
    )
    .await
    .expect("insert user")
}

pub async fn seed_client(db: &DatabaseConnection) -> users::Model {
    seed_user(db, Roles::Client).await
}

pub async fn seed_freelancer(db: &DatabaseConnection) -> users::Model {
    seed_user(db, Roles::Freelancer).await
}

pub async fn post_job(db: &DatabaseConnection, client: &users::Model) -> jobs::Model {
    db::jobs::insert_job(
        db,
        CreateJob {
            title: "Build a landing page".to_string(),
            description: "We need a responsive landing page with a contact form \
                          and basic analytics wired up."
                .to_string(),
            budget: 500.0,
            deadline: None,
        },
        client.id,
    )
    .await
    .expect("insert job")
}

pub async fn submit(
    db: &DatabaseConnection,
    job: &jobs::Model,
    freelancer: &users::Model,
) -> proposals::Model {
    db::proposals::submit_proposal(
        db,
        job.id,
        freelancer.id,
        SubmitProposal {
            cover_letter: "I have shipped a dozen of these.".to_string(),
            propose_rate: 450.0,
        },
    )
    .await
    .expect("submit proposal")
}
