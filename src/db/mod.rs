//! Farmer registration store
//!
//! A single SQLite file accessed through an r2d2 pool. Writes are
//! serialised by a process-wide lock; reads go straight to the pool.

pub mod models;
pub mod schema;

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use parking_lot::Mutex;
use tracing::{debug, info};

pub use models::{Farmer, FarmerForm, NewFarmer};

use crate::utils::error::{AgriAssistError, Result};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

#[derive(Debug)]
pub struct FarmerStore {
    pool: SqlitePool,
    write_lock: Mutex<()>,
}

impl FarmerStore {
    /// Open (or create) the database at `database_url` and apply pending migrations
    pub fn open(database_url: &str) -> Result<Self> {
        info!("Opening farmer database: {}", database_url);
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = Pool::builder().max_size(5).build(manager)?;

        let store = Self {
            pool,
            write_lock: Mutex::new(()),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let _lock = self.write_lock.lock();
        let mut conn = self.get_conn()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| AgriAssistError::Migration(e.to_string()))?;
        for version in applied {
            debug!("Applied migration {}", version);
        }
        Ok(())
    }

    pub fn get_conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Performs a write operation on the database, guarded by the write lock.
    pub fn do_write<F, T>(&self, operation: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> std::result::Result<T, diesel::result::Error>,
    {
        let _lock = self.write_lock.lock();
        let mut conn = self.get_conn()?;
        Ok(operation(&mut conn)?)
    }

    /// Performs a read operation on the database.
    pub fn do_read<F, T>(&self, operation: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> std::result::Result<T, diesel::result::Error>,
    {
        let mut conn = self.get_conn()?;
        Ok(operation(&mut conn)?)
    }

    /// Insert one registration and return the stored row
    pub fn register(&self, new_farmer: &NewFarmer) -> Result<Farmer> {
        let farmer = self.do_write(|conn| {
            diesel::insert_into(schema::farmers::table)
                .values(new_farmer)
                .returning(Farmer::as_returning())
                .get_result(conn)
        })?;
        info!("Registered farmer #{} ({})", farmer.id, farmer.name);
        Ok(farmer)
    }

    /// All registrations in insertion order
    pub fn list(&self) -> Result<Vec<Farmer>> {
        use schema::farmers::dsl::*;

        self.do_read(|conn| {
            farmers
                .order(id.asc())
                .select(Farmer::as_select())
                .load(conn)
        })
    }

    pub fn count(&self) -> Result<i64> {
        use schema::farmers::dsl::*;

        self.do_read(|conn| farmers.count().get_result(conn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn temp_store() -> (TempDir, FarmerStore) {
        let dir = tempdir().unwrap();
        let url = dir.path().join("farmers.db");
        let store = FarmerStore::open(url.to_str().unwrap()).unwrap();
        (dir, store)
    }

    fn new_farmer(name: &str) -> NewFarmer {
        NewFarmer {
            name: name.to_string(),
            farm_type: "Dairy".to_string(),
            soil_type: "black".to_string(),
            area: "5".to_string(),
            region: "West".to_string(),
            state: "Maharashtra".to_string(),
            district: "Pune".to_string(),
        }
    }

    #[test]
    fn test_open_creates_empty_table() {
        let (_dir, store) = temp_store();
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_register_returns_stored_row() {
        let (_dir, store) = temp_store();

        let farmer = store.register(&new_farmer("Ravi")).unwrap();
        assert_eq!(farmer.name, "Ravi");
        assert_eq!(farmer.district, "Pune");
        assert!(farmer.id > 0);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_ids_are_distinct_and_listed_in_order() {
        let (_dir, store) = temp_store();

        let a = store.register(&new_farmer("A")).unwrap();
        let b = store.register(&new_farmer("B")).unwrap();
        assert_ne!(a.id, b.id);

        let names: Vec<String> = store.list().unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_reopen_keeps_rows_and_skips_applied_migrations() {
        let dir = tempdir().unwrap();
        let url = dir.path().join("farmers.db");
        let url = url.to_str().unwrap();

        {
            let store = FarmerStore::open(url).unwrap();
            store.register(&new_farmer("Persisted")).unwrap();
        }

        let store = FarmerStore::open(url).unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.list().unwrap()[0].name, "Persisted");
    }
}
