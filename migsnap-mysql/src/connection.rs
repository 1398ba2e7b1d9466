//! MySQL connection wrapper.

use mysql_async::prelude::*;
use mysql_async::{Conn, Params};
use tracing::debug;

use crate::error::MysqlResult;

/// A wrapper around a MySQL connection.
pub struct MysqlConnection {
    conn: Conn,
}

impl MysqlConnection {
    /// Create a new connection wrapper.
    pub fn new(conn: Conn) -> Self {
        Self { conn }
    }

    /// Execute a query with parameters and return all rows.
    pub async fn query_params<T, P>(&mut self, query: &str, params: P) -> MysqlResult<Vec<T>>
    where
        T: FromRow + Send + 'static,
        P: Into<Params> + Send,
    {
        debug!(query = %query.trim(), "Executing parameterized query");
        let rows: Vec<T> = self.conn.exec(query, params).await?;
        Ok(rows)
    }

    /// Execute a query with parameters and return an optional row.
    pub async fn query_optional_params<T, P>(
        &mut self,
        query: &str,
        params: P,
    ) -> MysqlResult<Option<T>>
    where
        T: FromRow + Send + 'static,
        P: Into<Params> + Send,
    {
        debug!(query = %query.trim(), "Executing parameterized query_optional");
        let row: Option<T> = self.conn.exec_first(query, params).await?;
        Ok(row)
    }

    /// Execute a statement through the text protocol.
    ///
    /// Used for DDL, which the binary protocol does not accept everywhere.
    pub async fn execute(&mut self, query: &str) -> MysqlResult<()> {
        debug!(query = %query, "Executing statement");
        self.conn.query_drop(query).await?;
        Ok(())
    }
}
