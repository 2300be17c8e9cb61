//! SQLite sink for the shop dataset.
//!
//! The schema mirrors the shop model one table per record type, with
//! foreign keys enforced by SQLite itself (`PRAGMA foreign_keys = ON`).
//! Each table is written in its own transaction, in dependency order.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Statement};
use tracing::{debug, info};

use crate::config::redact_url;
use crate::error::{Result, ShopGenError};
use crate::shop::ShopDataset;
use crate::types::Table;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS customers (
    id      INTEGER PRIMARY KEY,
    name    TEXT NOT NULL,
    email   TEXT NOT NULL,
    phone   TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS products (
    id          INTEGER PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT,
    price       REAL NOT NULL
);
CREATE TABLE IF NOT EXISTS shopping_carts (
    id           INTEGER PRIMARY KEY,
    customer_id  INTEGER REFERENCES customers(id),
    created_at   DATETIME,
    completed_at DATETIME
);
CREATE TABLE IF NOT EXISTS shopping_cart_items (
    id         INTEGER PRIMARY KEY,
    cart_id    INTEGER REFERENCES shopping_carts(id),
    product_id INTEGER REFERENCES products(id),
    quantity   INTEGER NOT NULL DEFAULT 1
);
CREATE TABLE IF NOT EXISTS support_agents (
    id    INTEGER PRIMARY KEY,
    name  TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS support_requests (
    id          INTEGER PRIMARY KEY,
    customer_id INTEGER REFERENCES customers(id),
    agent_id    INTEGER REFERENCES support_agents(id),
    message     TEXT NOT NULL,
    created_at  DATETIME
);
";

// ---------------------------------------------------------------------------
// DatabaseTarget
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    Memory,
    File(PathBuf),
}

impl DatabaseTarget {
    /// Parse a sqlite connection URL.
    ///
    /// `sqlite://` is in-memory, `sqlite://name` and `sqlite:///name` open
    /// `name` relative to the working directory, `sqlite:////abs/path` opens
    /// an absolute path. Credentials or a host (`user:pw@host/...`) are
    /// rejected rather than read as a path.
    pub fn from_url(url: &str) -> Result<Self> {
        let Some(rest) = url.strip_prefix("sqlite://") else {
            return Err(ShopGenError::UnsupportedDatabase(
                url.split("://").next().unwrap_or(url).to_string(),
            ));
        };
        let authority = rest.split('/').next().unwrap_or_default();
        if authority.contains('@') {
            return Err(ShopGenError::InvalidDatabaseUrl(redact_url(url)));
        }
        let path = rest.strip_prefix('/').unwrap_or(rest);
        if path.is_empty() || path == ":memory:" {
            return Ok(Self::Memory);
        }
        Ok(Self::File(PathBuf::from(path)))
    }
}

/// `YYYY-MM-DD HH:MM:SS.ffffff`, the text form SQLite date functions accept.
fn sql_timestamp(t: &DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

// ---------------------------------------------------------------------------
// ShopStore
// ---------------------------------------------------------------------------

pub struct ShopStore {
    conn: Connection,
}

impl ShopStore {
    pub fn open(target: &DatabaseTarget) -> Result<Self> {
        let conn = match target {
            DatabaseTarget::Memory => Connection::open_in_memory()?,
            DatabaseTarget::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                Connection::open(path)?
            }
        };
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        debug!(?target, "opened shop store");
        Ok(Self { conn })
    }

    pub fn open_url(url: &str) -> Result<Self> {
        Self::open(&DatabaseTarget::from_url(url)?)
    }

    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(&DatabaseTarget::File(path.to_path_buf()))
    }

    pub fn count(&self, table: Table) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.as_str());
        let n: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(n as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        for table in Table::all() {
            if self.count(*table)? > 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Delete every row, children before parents.
    pub fn clear(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        for table in Table::all().iter().rev() {
            tx.execute(&format!("DELETE FROM {}", table.as_str()), [])?;
        }
        tx.commit()?;
        info!("cleared shop store");
        Ok(())
    }

    pub fn write_dataset(&mut self, ds: &ShopDataset) -> Result<()> {
        self.insert_rows(
            Table::Customers,
            "INSERT INTO customers (id, name, email, phone) VALUES (?1, ?2, ?3, ?4)",
            &ds.customers,
            |stmt, c| stmt.execute(params![c.id as i64, c.name, c.email, c.phone]),
        )?;
        self.insert_rows(
            Table::Products,
            "INSERT INTO products (id, name, description, price) VALUES (?1, ?2, ?3, ?4)",
            &ds.products,
            |stmt, p| stmt.execute(params![p.id as i64, p.name, p.description, p.price]),
        )?;
        self.insert_rows(
            Table::ShoppingCarts,
            "INSERT INTO shopping_carts (id, customer_id, created_at, completed_at) \
             VALUES (?1, ?2, ?3, ?4)",
            &ds.carts,
            |stmt, c| {
                stmt.execute(params![
                    c.id as i64,
                    c.customer_id as i64,
                    sql_timestamp(&c.created_at),
                    c.completed_at.as_ref().map(sql_timestamp),
                ])
            },
        )?;
        self.insert_rows(
            Table::ShoppingCartItems,
            "INSERT INTO shopping_cart_items (id, cart_id, product_id, quantity) \
             VALUES (?1, ?2, ?3, ?4)",
            &ds.items,
            |stmt, i| {
                stmt.execute(params![
                    i.id as i64,
                    i.cart_id as i64,
                    i.product_id as i64,
                    i.quantity
                ])
            },
        )?;
        self.insert_rows(
            Table::SupportAgents,
            "INSERT INTO support_agents (id, name, email) VALUES (?1, ?2, ?3)",
            &ds.agents,
            |stmt, a| stmt.execute(params![a.id as i64, a.name, a.email]),
        )?;
        self.insert_rows(
            Table::SupportRequests,
            "INSERT INTO support_requests (id, customer_id, agent_id, message, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            &ds.requests,
            |stmt, r| {
                stmt.execute(params![
                    r.id as i64,
                    r.customer_id as i64,
                    r.agent_id as i64,
                    r.message,
                    sql_timestamp(&r.created_at),
                ])
            },
        )?;
        Ok(())
    }

    fn insert_rows<T, F>(&mut self, table: Table, sql: &str, rows: &[T], mut insert: F) -> Result<()>
    where
        F: FnMut(&mut Statement<'_>, &T) -> rusqlite::Result<usize>,
    {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(sql)?;
            for row in rows {
                insert(&mut stmt, row)?;
            }
        }
        tx.commit()?;
        info!(table = %table, rows = rows.len(), "committed");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
