//! Toy repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `toys` plus the catalogue queries: age-range search,
//!   best toy within a budget, bulk cost increase, delete by name.
//!
//! # Invariants
//! - A toy matches an age query when its stored half-open interval contains
//!   the inclusive query range: `age_lower <= lower AND age_upper >= upper + 1`.
//! - Create and update persist `AgeRange` through the same `to_storage`
//!   conversion.
//! - Cost comparisons and arithmetic run on parsed `Money`, never on the raw
//!   column, so currency-formatted text costs behave like integer ones.
//! - The bulk cost increase is all-or-nothing and writes integer costs back.

use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::db::ConnectionProvider;
use crate::model::age_range::AgeRange;
use crate::model::money::Money;
use crate::model::toy::Toy;
use crate::model::EntityId;
use log::{debug, info};
use rusqlite::types::FromSql;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const TOY_SELECT_SQL: &str = "SELECT id, name, cost, quantity, age_lower, age_upper FROM toys";
const ID_ORDER_SQL: &str = "ORDER BY id";
const AGE_CONTAINS_SQL: &str = "age_lower <= ?1 AND age_upper >= ?2";
const ENTITY: &str = "toy";

/// Sort key accepted by `find_by_age_range`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToyOrder {
    Cost,
    Name,
    Quantity,
}

impl ToyOrder {
    /// Parses an ordering name, ignoring anything unknown.
    ///
    /// Unknown or blank input yields `None`, which means "no ordering".
    pub fn parse_lenient(value: &str) -> Option<Self> {
        let parsed = value.parse().ok();
        if parsed.is_none() && !value.trim().is_empty() {
            debug!("event=toy_order_ignored module=repo status=ok");
        }
        parsed
    }

    fn column(self) -> &'static str {
        match self {
            Self::Cost => "cost",
            Self::Name => "name",
            Self::Quantity => "quantity",
        }
    }

    /// Stable sort, so rows that tie keep their id order.
    fn sort(self, toys: &mut [Toy]) {
        match self {
            Self::Cost => toys.sort_by_key(|toy| toy.cost),
            Self::Name => toys.sort_by(|left, right| left.name.cmp(&right.name)),
            Self::Quantity => toys.sort_by_key(|toy| toy.quantity),
        }
    }
}

impl FromStr for ToyOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cost" => Ok(Self::Cost),
            "name" => Ok(Self::Name),
            "quantity" => Ok(Self::Quantity),
            other => Err(format!(
                "unsupported toy order `{other}`; expected cost|name|quantity"
            )),
        }
    }
}

impl Display for ToyOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// Repository interface for catalogue toys.
pub trait ToyRepository {
    fn create(&self, name: &str, cost: Money, quantity: u32, age: AgeRange) -> RepoResult<Toy>;
    fn update(&self, toy: &Toy) -> RepoResult<()>;
    fn delete(&self, toy: &mut Toy) -> RepoResult<()>;
    /// Deletes every toy named exactly `name`; returns how many went away.
    fn delete_by_name(&self, name: &str) -> RepoResult<usize>;
    fn find_by_age_range(&self, ages: AgeRange, order_by: Option<ToyOrder>)
        -> RepoResult<Vec<Toy>>;
    /// Highest-cost toy suitable for `ages` that costs at most `max_cost`.
    fn find_most_expensive_within_budget(
        &self,
        ages: AgeRange,
        max_cost: Money,
    ) -> RepoResult<Option<Toy>>;
    /// Multiplies cost by `percentage / 100` for toys suitable for `ages`.
    fn increase_cost_for_age_range(&self, ages: AgeRange, percentage: u32) -> RepoResult<usize>;
    fn find_by_id(&self, id: EntityId) -> RepoResult<Toy>;
    fn find_all(&self) -> RepoResult<Vec<Toy>>;

    /// Inserts an unsaved toy or rewrites a saved one.
    fn save(&self, toy: &mut Toy) -> RepoResult<()> {
        if toy.is_saved() {
            return self.update(toy);
        }
        let created = self.create(&toy.name, toy.cost, toy.quantity, toy.age)?;
        toy.mark_saved(created.id()?);
        Ok(())
    }
}

/// SQLite-backed toy repository.
pub struct SqliteToyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteToyRepository<'conn> {
    /// Builds a repository over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["toys"])?;
        Ok(Self { conn })
    }

    /// Builds a repository over the provider's connection.
    pub fn from_provider(provider: &'conn ConnectionProvider) -> RepoResult<Self> {
        Self::try_new(provider.get()?)
    }

    /// Toys whose stored interval contains `ages`, in id order.
    fn query_by_ages(&self, ages: AgeRange) -> RepoResult<Vec<Toy>> {
        let (lower, upper_exclusive) = ages.to_storage();
        self.query_toys(
            &format!("{TOY_SELECT_SQL} WHERE {AGE_CONTAINS_SQL} {ID_ORDER_SQL};"),
            params![lower, upper_exclusive],
        )
    }

    fn query_toys(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<Toy>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut toys = Vec::new();
        while let Some(row) = rows.next()? {
            toys.push(parse_toy_row(row)?);
        }
        Ok(toys)
    }
}

impl ToyRepository for SqliteToyRepository<'_> {
    fn create(&self, name: &str, cost: Money, quantity: u32, age: AgeRange) -> RepoResult<Toy> {
        let (age_lower, age_upper) = age.to_storage();
        let id: EntityId = self.conn.query_row(
            "INSERT INTO toys (name, cost, quantity, age_lower, age_upper)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id;",
            params![name, cost, quantity, age_lower, age_upper],
            |row| row.get(0),
        )?;
        debug!("event=toy_create module=repo status=ok id={id}");
        Ok(Toy::with_id(id, name, cost, quantity, age))
    }

    fn update(&self, toy: &Toy) -> RepoResult<()> {
        let id = toy.id()?;
        let (age_lower, age_upper) = toy.age.to_storage();
        let changed = self.conn.execute(
            "UPDATE toys
             SET name = ?1, cost = ?2, quantity = ?3, age_lower = ?4, age_upper = ?5
             WHERE id = ?6;",
            params![toy.name, toy.cost, toy.quantity, age_lower, age_upper, id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: ENTITY, id });
        }
        Ok(())
    }

    fn delete(&self, toy: &mut Toy) -> RepoResult<()> {
        let Ok(id) = toy.id() else {
            return Ok(());
        };

        let removed = self.conn.execute("DELETE FROM toys WHERE id = ?1;", [id])?;
        debug!("event=toy_delete module=repo status=ok id={id} removed={removed}");
        toy.mark_unsaved();
        Ok(())
    }

    fn delete_by_name(&self, name: &str) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM toys WHERE name = ?1;", [name])?;
        info!("event=toy_delete_by_name module=repo status=ok removed={removed}");
        Ok(removed)
    }

    fn find_by_age_range(
        &self,
        ages: AgeRange,
        order_by: Option<ToyOrder>,
    ) -> RepoResult<Vec<Toy>> {
        let mut toys = self.query_by_ages(ages)?;
        if let Some(order) = order_by {
            order.sort(&mut toys);
        }
        Ok(toys)
    }

    fn find_most_expensive_within_budget(
        &self,
        ages: AgeRange,
        max_cost: Money,
    ) -> RepoResult<Option<Toy>> {
        // Rows arrive in id order; only a strictly higher cost replaces the
        // current pick, so ties resolve to the lowest id.
        let best = self
            .query_by_ages(ages)?
            .into_iter()
            .filter(|toy| toy.cost <= max_cost)
            .fold(None, |best: Option<Toy>, toy| match best {
                Some(current) if current.cost >= toy.cost => Some(current),
                _ => Some(toy),
            });
        Ok(best)
    }

    fn increase_cost_for_age_range(&self, ages: AgeRange, percentage: u32) -> RepoResult<usize> {
        let (lower, upper_exclusive) = ages.to_storage();
        let tx = self.conn.unchecked_transaction()?;

        let mut scaled_costs = Vec::new();
        {
            let mut stmt = tx.prepare(&format!(
                "SELECT id, cost FROM toys WHERE {AGE_CONTAINS_SQL} {ID_ORDER_SQL};"
            ))?;
            let mut rows = stmt.query(params![lower, upper_exclusive])?;
            while let Some(row) = rows.next()? {
                let id: EntityId = row.get("id")?;
                let scaled = read_cost(row, id)?
                    .checked_scaled_by_percentage(percentage)
                    .ok_or(RepoError::CostOverflow { id, percentage })?;
                scaled_costs.push((id, scaled));
            }
        }
        {
            let mut update = tx.prepare("UPDATE toys SET cost = ?1 WHERE id = ?2;")?;
            for (id, cost) in &scaled_costs {
                update.execute(params![cost, id])?;
            }
        }
        tx.commit()?;

        info!(
            "event=toy_cost_increase module=repo status=ok percentage={percentage} changed={}",
            scaled_costs.len()
        );
        Ok(scaled_costs.len())
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Toy> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TOY_SELECT_SQL} WHERE id = ?1;"))?;
        let toy = stmt
            .query_row([id], |row| Ok(parse_toy_row(row)))
            .optional()?;
        toy.unwrap_or(Err(RepoError::NotFound { entity: ENTITY, id }))
    }

    fn find_all(&self) -> RepoResult<Vec<Toy>> {
        self.query_toys(&format!("{TOY_SELECT_SQL} {ID_ORDER_SQL};"), [])
    }
}

fn parse_toy_row(row: &Row<'_>) -> RepoResult<Toy> {
    let id: EntityId = row.get("id")?;
    let cost = read_cost(row, id)?;

    let quantity_value: i64 = row.get("quantity")?;
    let quantity = u32::try_from(quantity_value).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid quantity `{quantity_value}` in toys.quantity for id {id}"
        ))
    })?;

    let age = AgeRange::from_storage(row.get("age_lower")?, row.get("age_upper")?)
        .map_err(|err| RepoError::InvalidData(format!("toys.age for id {id}: {err}")))?;

    Ok(Toy::with_id(
        id,
        row.get::<_, String>("name")?,
        cost,
        quantity,
        age,
    ))
}

/// Reads `toys.cost`, which holds integer minor units or legacy money text.
fn read_cost(row: &Row<'_>, id: EntityId) -> RepoResult<Money> {
    Money::column_result(row.get_ref("cost")?).map_err(|err| {
        RepoError::InvalidData(format!("invalid cost in toys.cost for id {id}: {err}"))
    })
}
