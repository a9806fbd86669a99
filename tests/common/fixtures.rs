use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;

use auditable::audit::error::Result as AuditResult;
use auditable::audit::{
    AuditError, AuditOptions, AuditRegistry, AuditStore, Auditable, DisplayTransform,
    EntityLoader, Model, SchemaInspector, Snapshot,
};
use auditable::models::{AuditRecord, NewAuditRecord};

pub const CUSTOMER_COLUMNS: [&str; 7] = [
    "id",
    "name",
    "email",
    "status",
    "profile_id",
    "vip",
    "password_hash",
];

static STATUS_LABELS: LazyLock<DisplayTransform> = LazyLock::new(|| {
    DisplayTransform::lookup([("a", "Active"), ("s", "Suspended"), ("c", "Closed")])
});

static COUNTRY_CODE: LazyLock<DisplayTransform> = LazyLock::new(|| DisplayTransform::Uppercase);

// ── Host entities ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct CustomerRow {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub status: String,
    pub profile_id: Option<i64>,
    pub vip: bool,
    pub password_hash: Option<String>,
}

impl CustomerRow {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            email: None,
            status: "a".to_string(),
            profile_id: None,
            vip: false,
            password_hash: Some("$argon2id$secret".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Profile {
    pub id: i64,
    pub display_name: String,
    pub country: String,
}

impl Model for Profile {
    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::from(self.id)),
            "display_name" => Some(Value::from(self.display_name.clone())),
            "country" => Some(Value::from(self.country.clone())),
            _ => None,
        }
    }

    fn display_transform(&self, attribute: &str) -> Option<&DisplayTransform> {
        match attribute {
            "country" => Some(&*COUNTRY_CODE),
            _ => None,
        }
    }
}

/// A customer as seen by one lifecycle event.
pub struct Customer {
    pub row: CustomerRow,
    snapshot: Snapshot,
    profile: Option<Profile>,
    audit_key: Option<String>,
}

impl Customer {
    pub fn created(row: CustomerRow) -> Self {
        let snapshot = Snapshot::created(&row).unwrap();
        Self::with_snapshot(row, snapshot)
    }

    pub fn updated(before: &CustomerRow, after: CustomerRow) -> Self {
        let snapshot = Snapshot::updated(before, &after).unwrap();
        Self::with_snapshot(after, snapshot)
    }

    pub fn persisted(row: CustomerRow) -> Self {
        let snapshot = Snapshot::persisted(&row).unwrap();
        Self::with_snapshot(row, snapshot)
    }

    fn with_snapshot(row: CustomerRow, snapshot: Snapshot) -> Self {
        Self {
            row,
            snapshot,
            profile: None,
            audit_key: None,
        }
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_audit_key(mut self, key: &str) -> Self {
        self.audit_key = Some(key.to_string());
        self
    }
}

impl Model for Customer {
    fn attribute(&self, name: &str) -> Option<Value> {
        self.snapshot.current(name)
    }

    fn relation(&self, name: &str) -> Option<&dyn Model> {
        match name {
            "profile" => self.profile.as_ref().map(|p| p as &dyn Model),
            _ => None,
        }
    }

    fn display_transform(&self, attribute: &str) -> Option<&DisplayTransform> {
        match attribute {
            "status" => Some(&*STATUS_LABELS),
            _ => None,
        }
    }
}

impl Auditable for Customer {
    fn auditable_type(&self) -> &str {
        "customer"
    }

    fn table_name(&self) -> &str {
        "customers"
    }

    fn primary_key(&self) -> i64 {
        self.row.id
    }

    fn original(&self, column: &str) -> Option<Value> {
        self.snapshot.original(column)
    }

    fn audit_key(&self) -> Option<&str> {
        self.audit_key.as_deref()
    }
}

/// An entity that is never registered for auditing.
pub struct Untracked;

impl Model for Untracked {
    fn attribute(&self, _name: &str) -> Option<Value> {
        None
    }
}

impl Auditable for Untracked {
    fn auditable_type(&self) -> &str {
        "untracked"
    }

    fn table_name(&self) -> &str {
        "untracked"
    }

    fn primary_key(&self) -> i64 {
        1
    }

    fn original(&self, _column: &str) -> Option<Value> {
        None
    }
}

pub fn customer_options() -> AuditOptions {
    AuditOptions::new()
        .with_columns(["*"])
        .avoiding(["password_hash"])
        .format_column("name", "Full name")
        .format_column("profile_id", "Profile")
        .mean_column("profile_id", "profile.display_name")
        .mean_column("status", "status")
}

pub fn customer_registry() -> AuditRegistry {
    let mut registry = AuditRegistry::new();
    registry
        .register("customer", customer_options())
        .register_loader("customer", Arc::new(CustomerLoader));
    registry
}

// ── Host persistence ────────────────────────────────────────────

pub async fn create_host_tables(pool: &PgPool) {
    sqlx::query(
        "CREATE TABLE profiles (
            id BIGSERIAL PRIMARY KEY,
            display_name TEXT NOT NULL,
            country TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .expect("Failed to create profiles table");

    sqlx::query(
        "CREATE TABLE customers (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT,
            status TEXT NOT NULL DEFAULT 'a',
            profile_id BIGINT REFERENCES profiles(id),
            vip BOOLEAN NOT NULL DEFAULT false,
            password_hash TEXT
        )",
    )
    .execute(pool)
    .await
    .expect("Failed to create customers table");
}

pub async fn insert_profile(pool: &PgPool, display_name: &str, country: &str) -> Profile {
    sqlx::query_as::<_, Profile>(
        "INSERT INTO profiles (display_name, country) VALUES ($1, $2) RETURNING *",
    )
    .bind(display_name)
    .bind(country)
    .fetch_one(pool)
    .await
    .expect("insert profile failed")
}

pub async fn insert_customer(pool: &PgPool, name: &str, profile_id: Option<i64>) -> CustomerRow {
    sqlx::query_as::<_, CustomerRow>(
        "INSERT INTO customers (name, profile_id, password_hash) VALUES ($1, $2, 'hash') RETURNING *",
    )
    .bind(name)
    .bind(profile_id)
    .fetch_one(pool)
    .await
    .expect("insert customer failed")
}

pub async fn update_customer(pool: &PgPool, row: &CustomerRow) -> CustomerRow {
    sqlx::query_as::<_, CustomerRow>(
        "UPDATE customers SET name = $2, email = $3, status = $4, profile_id = $5, vip = $6
         WHERE id = $1 RETURNING *",
    )
    .bind(row.id)
    .bind(&row.name)
    .bind(&row.email)
    .bind(&row.status)
    .bind(row.profile_id)
    .bind(row.vip)
    .fetch_one(pool)
    .await
    .expect("update customer failed")
}

pub async fn delete_customer(pool: &PgPool, id: i64) {
    sqlx::query("DELETE FROM customers WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .expect("delete customer failed");
}

pub struct CustomerLoader;

#[async_trait]
impl EntityLoader for CustomerLoader {
    async fn load(&self, pool: &PgPool, id: i64) -> AuditResult<Option<Box<dyn Model>>> {
        let Some(row) =
            sqlx::query_as::<_, CustomerRow>("SELECT * FROM customers WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?
        else {
            return Ok(None);
        };

        let mut customer = Customer::persisted(row);
        if let Some(profile_id) = customer.row.profile_id {
            let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
                .bind(profile_id)
                .fetch_optional(pool)
                .await?;
            if let Some(profile) = profile {
                customer = customer.with_profile(profile);
            }
        }
        Ok(Some(Box::new(customer)))
    }
}

// ── Collaborator doubles ────────────────────────────────────────

/// Audit store that keeps records in memory.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryStore {
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn insert(&self, record: NewAuditRecord) -> AuditResult<AuditRecord> {
        let mut records = self.records.lock().unwrap();
        let now = Utc::now();
        let saved = AuditRecord {
            id: records.len() as i64 + 1,
            auditable_type: record.auditable_type,
            auditable_id: record.auditable_id,
            user_id: record.user_id,
            key: record.key,
            old_value: record.old_value,
            new_value: record.new_value,
            created_at: now,
            updated_at: now,
        };
        records.push(saved.clone());
        Ok(saved)
    }
}

/// Audit store whose backend is always unavailable.
pub struct FailingStore;

#[async_trait]
impl AuditStore for FailingStore {
    async fn insert(&self, _record: NewAuditRecord) -> AuditResult<AuditRecord> {
        Err(AuditError::Persistence(sqlx::Error::PoolTimedOut))
    }
}

/// Schema inspector over a fixed table → columns map.
pub struct StaticSchema(pub HashMap<String, Vec<String>>);

impl StaticSchema {
    pub fn customers() -> Self {
        let mut tables = HashMap::new();
        tables.insert(
            "customers".to_string(),
            CUSTOMER_COLUMNS.iter().map(|c| c.to_string()).collect(),
        );
        StaticSchema(tables)
    }
}

#[async_trait]
impl SchemaInspector for StaticSchema {
    async fn list_columns(&self, table: &str) -> AuditResult<Vec<String>> {
        Ok(self.0.get(table).cloned().unwrap_or_default())
    }
}
