use std::marker::PhantomData;

use sqlx::Row;

use crate::entity::{Entity, EntityId};
use crate::error::{DataAccessError, DataAccessResult};
use crate::predicate::Predicate;
use crate::query::{select_columns, Query};
use crate::session::Session;

/// CRUD and query façade for one entity type.
///
/// A repository does not own a connection; every operation goes through
/// the session handle it was built with. Built from a pool session its
/// statements commit individually; built from a
/// [`UnitOfWork`](crate::UnitOfWork) session they share that
/// transaction. The repository cannot tell the difference.
pub struct Repository<T: Entity> {
    session: Session,
    _entity: PhantomData<T>,
}

impl<T: Entity> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Repository<T> {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            _entity: PhantomData,
        }
    }

    /// Fetch by identifier. Absence is `Ok(None)`.
    pub async fn get(&self, id: T::Id) -> DataAccessResult<Option<T>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = $1",
            select_columns::<T>(),
            T::TABLE,
            T::ID_COLUMN
        );
        match self.session.fetch_optional(&sql, vec![id.to_value()]).await? {
            Some(row) => Ok(Some(T::from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Fetch the single entity matching `predicate`.
    ///
    /// No match is `Ok(None)`; more than one match is
    /// [`DataAccessError::NonUniqueResult`].
    pub async fn find(&self, predicate: Predicate) -> DataAccessResult<Option<T>> {
        // Fetch at most two rows: one to return, one to detect ambiguity.
        let (sql, params) = Query::<T>::new().filter(predicate).limit(2).select_sql();
        let rows = self.session.fetch_all(&sql, params).await?;
        if rows.len() > 1 {
            return Err(DataAccessError::NonUniqueResult { table: T::TABLE });
        }
        Ok(rows.first().map(T::from_row).transpose()?)
    }

    /// Number of rows in the table.
    pub async fn count(&self) -> DataAccessResult<i64> {
        self.count_with(Query::new()).await
    }

    /// Number of rows matching `predicate`.
    pub async fn count_where(&self, predicate: Predicate) -> DataAccessResult<i64> {
        self.count_with(Query::new().filter(predicate)).await
    }

    async fn count_with(&self, query: Query<T>) -> DataAccessResult<i64> {
        let (sql, params) = query.count_sql();
        let row = self.session.fetch_one(&sql, params).await?;
        Ok(row.try_get(0)?)
    }

    /// Entities matching `query`, in its order and window.
    pub async fn list(&self, query: Query<T>) -> DataAccessResult<Vec<T>> {
        let (sql, params) = query.select_sql();
        let rows = self.session.fetch_all(&sql, params).await?;
        rows.iter()
            .map(|row| T::from_row(row).map_err(DataAccessError::from))
            .collect()
    }

    /// Every entity in the table.
    pub async fn list_all(&self) -> DataAccessResult<Vec<T>> {
        self.list(Query::new()).await
    }

    /// Insert a transient entity or update a persistent one.
    ///
    /// Returns the entity as persisted, with the generated identifier
    /// populated on insert. An update matching no row is
    /// [`DataAccessError::StaleEntity`].
    pub async fn save_or_update(&self, mut entity: T) -> DataAccessResult<T> {
        let columns = T::columns();
        match entity.id() {
            None => {
                let placeholders: Vec<String> =
                    (1..=columns.len()).map(|i| format!("${}", i)).collect();
                let sql = format!(
                    "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
                    T::TABLE,
                    columns.join(", "),
                    placeholders.join(", "),
                    T::ID_COLUMN
                );
                let row = self.session.fetch_one(&sql, entity.values()).await?;
                entity.set_id(row.try_get(0)?);
                Ok(entity)
            }
            Some(id) => {
                let assignments: Vec<String> = columns
                    .iter()
                    .enumerate()
                    .map(|(i, column)| format!("{} = ${}", column, i + 1))
                    .collect();
                let sql = format!(
                    "UPDATE {} SET {} WHERE {} = ${}",
                    T::TABLE,
                    assignments.join(", "),
                    T::ID_COLUMN,
                    columns.len() + 1
                );
                let mut params = entity.values();
                params.push(id.to_value());
                let affected = self.session.execute(&sql, params).await?;
                if affected == 0 {
                    return Err(DataAccessError::StaleEntity { table: T::TABLE });
                }
                Ok(entity)
            }
        }
    }

    /// Delete a persistent entity by its identifier.
    ///
    /// Deleting a transient entity is
    /// [`DataAccessError::TransientEntity`].
    pub async fn delete(&self, entity: &T) -> DataAccessResult<()> {
        let id = entity
            .id()
            .ok_or(DataAccessError::TransientEntity { table: T::TABLE })?;
        let sql = format!(
            "DELETE FROM {} WHERE {} = $1",
            T::TABLE,
            T::ID_COLUMN
        );
        self.session.execute(&sql, vec![id.to_value()]).await?;
        Ok(())
    }
}
