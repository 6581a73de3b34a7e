use anyhow::{Context, Result};

use super::connection::DbConn;

const SCHEMA_SQL: &str = include_str!("schema.sql");
const TABLES: [&str; 3] = ["game_themes", "player_votes", "games"];

/// Create any missing tables and indexes
pub fn initialize(conn: &mut DbConn) -> Result<()> {
    execute_statements(conn, SCHEMA_SQL)?;
    log::info!("Database schema ready");
    Ok(())
}

/// Drop and recreate the full schema
pub fn reset(conn: &mut DbConn) -> Result<()> {
    for table in TABLES {
        conn.execute(&format!("DROP TABLE IF EXISTS {}", table), [])
            .with_context(|| format!("Failed to drop table {}", table))?;
    }

    execute_statements(conn, SCHEMA_SQL)?;
    log::info!("Database schema reset");
    Ok(())
}

fn execute_statements(conn: &mut DbConn, sql: &str) -> Result<()> {
    for (idx, statement) in split_sql_statements(sql).iter().enumerate() {
        conn.execute(statement, [])
            .with_context(|| format!("Failed to execute schema statement {}", idx + 1))?;
    }
    Ok(())
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::create_memory_pool;

    #[test]
    fn initialize_creates_all_tables() {
        let pool = create_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        initialize(&mut conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('games', 'player_votes', 'game_themes')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn reset_is_idempotent() {
        let pool = create_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        initialize(&mut conn).unwrap();
        reset(&mut conn).unwrap();
        reset(&mut conn).unwrap();
    }
}
