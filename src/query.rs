use std::fmt::Write;
use std::marker::PhantomData;

use crate::entity::Entity;
use crate::predicate::{Predicate, SqlValue};

/// Sort direction for one ordering column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn sql(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// Ordered sequence of (column, direction) pairs.
#[derive(Debug, Clone, Default)]
pub struct SortSpec {
    orders: Vec<(String, SortDirection)>,
}

impl SortSpec {
    pub fn by(column: &str, direction: SortDirection) -> Self {
        Self {
            orders: vec![(column.to_string(), direction)],
        }
    }

    pub fn asc(column: &str) -> Self {
        Self::by(column, SortDirection::Ascending)
    }

    pub fn desc(column: &str) -> Self {
        Self::by(column, SortDirection::Descending)
    }

    /// Append a further ordering column, applied after the existing ones.
    pub fn then_by(mut self, column: &str, direction: SortDirection) -> Self {
        self.orders.push((column.to_string(), direction));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    fn to_sql(&self) -> String {
        let orders: Vec<String> = self
            .orders
            .iter()
            .map(|(column, direction)| format!("{} {}", column, direction.sql()))
            .collect();
        orders.join(", ")
    }
}

/// One select over an entity's table with optional filter, ordering and window.
///
/// Every part may be omitted; an omitted window is unbounded.
///
/// ```ignore
/// let page = repo
///     .list(Query::new()
///         .filter(Predicate::eq("status", "open"))
///         .order_by(SortSpec::asc("name"))
///         .offset(20)
///         .limit(10))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Query<T: Entity> {
    predicate: Option<Predicate>,
    sort: Option<SortSpec>,
    offset: Option<u64>,
    limit: Option<u64>,
    _entity: PhantomData<T>,
}

impl<T: Entity> Default for Query<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Query<T> {
    pub fn new() -> Self {
        Self {
            predicate: None,
            sort: None,
            offset: None,
            limit: None,
            _entity: PhantomData,
        }
    }

    /// Restrict to rows matching `predicate`. Calling this again
    /// narrows further (both predicates must hold).
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
        self
    }

    pub fn order_by(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Skip the first `offset` matching rows.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Return at most `limit` rows.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn select_sql(&self) -> (String, Vec<SqlValue>) {
        let mut params = Vec::new();
        let mut next_param = 1;
        let mut sql = format!("SELECT {} FROM {}", select_columns::<T>(), T::TABLE);
        self.push_where(&mut sql, &mut next_param, &mut params);
        if let Some(sort) = self.sort.as_ref().filter(|sort| !sort.is_empty()) {
            let _ = write!(sql, " ORDER BY {}", sort.to_sql());
        }
        if let Some(limit) = self.limit {
            let _ = write!(sql, " LIMIT {}", limit);
        }
        if let Some(offset) = self.offset {
            let _ = write!(sql, " OFFSET {}", offset);
        }
        (sql, params)
    }

    /// Count of matching rows; ordering and windowing do not apply.
    pub(crate) fn count_sql(&self) -> (String, Vec<SqlValue>) {
        let mut params = Vec::new();
        let mut next_param = 1;
        let mut sql = format!("SELECT COUNT(*) FROM {}", T::TABLE);
        self.push_where(&mut sql, &mut next_param, &mut params);
        (sql, params)
    }

    fn push_where(&self, sql: &mut String, next_param: &mut usize, params: &mut Vec<SqlValue>) {
        if let Some(predicate) = self.predicate.as_ref().filter(|p| !p.is_empty()) {
            let _ = write!(sql, " WHERE {}", predicate.to_sql(next_param, params));
        }
    }
}

pub(crate) fn select_columns<T: Entity>() -> String {
    let mut columns = vec![T::ID_COLUMN];
    columns.extend_from_slice(T::columns());
    columns.join(", ")
}
