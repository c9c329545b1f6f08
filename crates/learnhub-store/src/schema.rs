use sea_orm::sea_query::{
    MysqlQueryBuilder, PostgresQueryBuilder, SchemaStatementBuilder, SqliteQueryBuilder,
};
use sea_orm::{ConnectionTrait, DbBackend, EntityTrait, Schema};
use tracing::debug;

use crate::entity::{access_request, course, enrollment, progress, user};
use crate::error::StoreError;

/// Render a schema statement for the given backend.
pub fn build_schema_statement<T: SchemaStatementBuilder>(stmt: &T, backend: DbBackend) -> String {
    match backend {
        DbBackend::Postgres => stmt.to_string(PostgresQueryBuilder),
        DbBackend::MySql => stmt.to_string(MysqlQueryBuilder),
        DbBackend::Sqlite => stmt.to_string(SqliteQueryBuilder),
        _ => unreachable!("unsupported database backend"),
    }
}

fn create_table_sql<E: EntityTrait>(schema: &Schema, backend: DbBackend, entity: E) -> String {
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    build_schema_statement(&stmt, backend)
}

/// `CREATE TABLE IF NOT EXISTS` for every collection.
pub fn create_table_statements(backend: DbBackend) -> Vec<String> {
    let schema = Schema::new(backend);
    vec![
        create_table_sql(&schema, backend, user::Entity),
        create_table_sql(&schema, backend, course::Entity),
        create_table_sql(&schema, backend, enrollment::Entity),
        create_table_sql(&schema, backend, access_request::Entity),
        create_table_sql(&schema, backend, progress::Entity),
    ]
}

/// Create any missing tables. Existing tables are left as they are.
pub async fn create_tables<C: ConnectionTrait>(db: &C) -> Result<(), StoreError> {
    for sql in create_table_statements(db.get_database_backend()) {
        debug!(%sql, "ensure table");
        db.execute_unprepared(&sql).await?;
    }
    Ok(())
}
