use sqlx::postgres::PgArguments;
use sqlx::Postgres;
use uuid::Uuid;

/// Owned parameter value bound into generated SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i32),
    BigInt(i64),
    Double(f64),
    Text(String),
    Uuid(Uuid),
}

impl SqlValue {
    pub(crate) fn bind_to<'q>(
        self,
        query: sqlx::query::Query<'q, Postgres, PgArguments>,
    ) -> sqlx::query::Query<'q, Postgres, PgArguments> {
        match self {
            SqlValue::Null => query.bind(Option::<String>::None),
            SqlValue::Bool(value) => query.bind(value),
            SqlValue::Int(value) => query.bind(value),
            SqlValue::BigInt(value) => query.bind(value),
            SqlValue::Double(value) => query.bind(value),
            SqlValue::Text(value) => query.bind(value),
            SqlValue::Uuid(value) => query.bind(value),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::BigInt(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Double(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<Uuid> for SqlValue {
    fn from(value: Uuid) -> Self {
        SqlValue::Uuid(value)
    }
}

impl<V: Into<SqlValue>> From<Option<V>> for SqlValue {
    fn from(value: Option<V>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// Comparison operator of a single predicate term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    IsNull,
    IsNotNull,
}

impl Comparison {
    fn sql(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Ne => "<>",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
            Comparison::Like => "LIKE",
            Comparison::IsNull => "IS NULL",
            Comparison::IsNotNull => "IS NOT NULL",
        }
    }
}

#[derive(Debug, Clone)]
enum Term {
    Cmp {
        column: String,
        op: Comparison,
        value: Option<SqlValue>,
    },
    AnyOf(Vec<Predicate>),
}

/// Filter over an entity's columns.
///
/// Terms combine with `AND`; [`any_of`](Self::any_of) groups
/// alternatives with `OR`. Columns are named as they appear in the
/// table, matching [`Entity::columns`](crate::Entity::columns).
///
/// ```ignore
/// let overdue = Predicate::eq("status", "open")
///     .and(Predicate::lt("due_date", cutoff));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Predicate {
    terms: Vec<Term>,
}

impl Predicate {
    fn term(column: &str, op: Comparison, value: Option<SqlValue>) -> Self {
        Self {
            terms: vec![Term::Cmp {
                column: column.to_string(),
                op,
                value,
            }],
        }
    }

    pub fn eq(column: &str, value: impl Into<SqlValue>) -> Self {
        Self::term(column, Comparison::Eq, Some(value.into()))
    }

    pub fn ne(column: &str, value: impl Into<SqlValue>) -> Self {
        Self::term(column, Comparison::Ne, Some(value.into()))
    }

    pub fn lt(column: &str, value: impl Into<SqlValue>) -> Self {
        Self::term(column, Comparison::Lt, Some(value.into()))
    }

    pub fn le(column: &str, value: impl Into<SqlValue>) -> Self {
        Self::term(column, Comparison::Le, Some(value.into()))
    }

    pub fn gt(column: &str, value: impl Into<SqlValue>) -> Self {
        Self::term(column, Comparison::Gt, Some(value.into()))
    }

    pub fn ge(column: &str, value: impl Into<SqlValue>) -> Self {
        Self::term(column, Comparison::Ge, Some(value.into()))
    }

    /// SQL `LIKE` with the usual `%`/`_` wildcards in the pattern.
    pub fn like(column: &str, pattern: impl Into<SqlValue>) -> Self {
        Self::term(column, Comparison::Like, Some(pattern.into()))
    }

    pub fn is_null(column: &str) -> Self {
        Self::term(column, Comparison::IsNull, None)
    }

    pub fn is_not_null(column: &str) -> Self {
        Self::term(column, Comparison::IsNotNull, None)
    }

    /// Require both this predicate and `other`.
    pub fn and(mut self, other: Predicate) -> Self {
        self.terms.extend(other.terms);
        self
    }

    /// Require at least one of the alternatives.
    pub fn any_of(alternatives: Vec<Predicate>) -> Self {
        Self {
            terms: vec![Term::AnyOf(alternatives)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Render as a WHERE fragment. Placeholders continue from
    /// `next_param`; bound values are appended to `params`.
    pub(crate) fn to_sql(&self, next_param: &mut usize, params: &mut Vec<SqlValue>) -> String {
        let rendered: Vec<String> = self
            .terms
            .iter()
            .map(|term| match term {
                Term::Cmp { column, op, value } => match value {
                    Some(value) => {
                        let placeholder = *next_param;
                        *next_param += 1;
                        params.push(value.clone());
                        format!("{} {} ${}", column, op.sql(), placeholder)
                    }
                    None => format!("{} {}", column, op.sql()),
                },
                Term::AnyOf(alternatives) => {
                    let inner: Vec<String> = alternatives
                        .iter()
                        .filter(|alternative| !alternative.is_empty())
                        .map(|alternative| alternative.to_sql(next_param, params))
                        .collect();
                    format!("({})", inner.join(" OR "))
                }
            })
            .collect();
        rendered.join(" AND ")
    }
}
