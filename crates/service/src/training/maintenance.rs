//! Identity-column maintenance. Statements differ per backend, so each helper
//! picks its SQL from the connection's `DatabaseBackend`.

use sea_orm::{ConnectionTrait, DatabaseBackend, DbErr, Statement};

use super::types::IdStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Table {
    TrainingData,
    TrainedModels,
}

impl Table {
    pub(crate) const ALL: [Table; 2] = [Table::TrainingData, Table::TrainedModels];

    pub(crate) fn name(self) -> &'static str {
        match self {
            Table::TrainingData => "training_data",
            Table::TrainedModels => "trained_models",
        }
    }
}

fn unsupported(backend: DatabaseBackend) -> DbErr {
    DbErr::Custom(format!("identity maintenance is not supported on {backend:?}"))
}

pub(crate) async fn id_stats<C: ConnectionTrait>(conn: &C, table: Table) -> Result<IdStats, DbErr> {
    let backend = conn.get_database_backend();
    let sql = format!(
        "SELECT CAST(MIN(id) AS BIGINT) AS min_id, CAST(MAX(id) AS BIGINT) AS max_id, \
         CAST(COUNT(*) AS BIGINT) AS row_count FROM {}",
        table.name()
    );
    let row = conn
        .query_one(Statement::from_string(backend, sql))
        .await?
        .ok_or_else(|| DbErr::Custom(format!("no id stats for {}", table.name())))?;
    Ok(IdStats {
        min_id: row.try_get("", "min_id")?,
        max_id: row.try_get("", "max_id")?,
        count: row.try_get("", "row_count")?,
    })
}

/// Value the identity column will hand to the next insert.
pub(crate) async fn next_id<C: ConnectionTrait>(conn: &C, table: Table) -> Result<i64, DbErr> {
    let backend = conn.get_database_backend();
    let name = table.name();
    let sql = match backend {
        DatabaseBackend::Postgres => format!(
            "SELECT CAST(CASE WHEN is_called THEN last_value + 1 ELSE last_value END AS BIGINT) AS next_id \
             FROM {name}_id_seq"
        ),
        DatabaseBackend::Sqlite => format!(
            "SELECT CAST(MAX(COALESCE((SELECT seq FROM sqlite_sequence WHERE name = '{name}'), 0), \
             COALESCE((SELECT MAX(id) FROM {name}), 0)) + 1 AS BIGINT) AS next_id"
        ),
        other => return Err(unsupported(other)),
    };
    let row = conn
        .query_one(Statement::from_string(backend, sql))
        .await?
        .ok_or_else(|| DbErr::Custom(format!("no sequence state for {name}")))?;
    row.try_get("", "next_id")
}

/// Point the identity counter at `max(id) + 1`, which is 1 for an empty table.
pub(crate) async fn restart_identity<C: ConnectionTrait>(conn: &C, table: Table) -> Result<(), DbErr> {
    let name = table.name();
    let sql = match conn.get_database_backend() {
        DatabaseBackend::Postgres => format!(
            "SELECT setval(pg_get_serial_sequence('{name}', 'id'), \
             COALESCE((SELECT MAX(id) FROM {name}), 0) + 1, false)"
        ),
        DatabaseBackend::Sqlite => format!(
            "UPDATE sqlite_sequence SET seq = (SELECT COALESCE(MAX(id), 0) FROM {name}) WHERE name = '{name}'"
        ),
        other => return Err(unsupported(other)),
    };
    conn.execute_unprepared(&sql).await?;
    Ok(())
}

/// Restart the counter only when the table holds no rows.
pub(crate) async fn restart_identity_if_empty<C: ConnectionTrait>(conn: &C, table: Table) -> Result<bool, DbErr> {
    if id_stats(conn, table).await?.count != 0 {
        return Ok(false);
    }
    restart_identity(conn, table).await?;
    Ok(true)
}

const COMPACT_COPY: &str = "training_data_compact";
const COPY_ROWS: &str = "SELECT type, label, features, created_at, id AS old_id FROM training_data";

/// Rewrite `training_data` so ids run 1..=n ordered by
/// `(created_at, type, label, old id)`. Run inside a transaction.
pub(crate) async fn compact_training_data<C: ConnectionTrait>(conn: &C) -> Result<(), DbErr> {
    let reinsert = format!(
        "INSERT INTO training_data (type, label, features, created_at) \
         SELECT type, label, features, created_at FROM {COMPACT_COPY} \
         ORDER BY created_at, type, label, old_id"
    );
    match conn.get_database_backend() {
        DatabaseBackend::Postgres => {
            conn.execute_unprepared(&format!("CREATE TEMP TABLE {COMPACT_COPY} ON COMMIT DROP AS {COPY_ROWS}"))
                .await?;
            conn.execute_unprepared("TRUNCATE TABLE training_data RESTART IDENTITY").await?;
            conn.execute_unprepared(&reinsert).await?;
        }
        DatabaseBackend::Sqlite => {
            conn.execute_unprepared(&format!("DROP TABLE IF EXISTS temp.{COMPACT_COPY}")).await?;
            conn.execute_unprepared(&format!("CREATE TEMP TABLE {COMPACT_COPY} AS {COPY_ROWS}")).await?;
            conn.execute_unprepared("DELETE FROM training_data").await?;
            conn.execute_unprepared("UPDATE sqlite_sequence SET seq = 0 WHERE name = 'training_data'")
                .await?;
            conn.execute_unprepared(&reinsert).await?;
            conn.execute_unprepared(&format!("DROP TABLE temp.{COMPACT_COPY}")).await?;
        }
        other => return Err(unsupported(other)),
    }
    Ok(())
}
