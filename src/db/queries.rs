use rusqlite::{params, Connection, OptionalExtension};

// ── Key–value store ──

pub fn get_value(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM kv_store WHERE key = ?1",
        [key],
        |row| row.get(0),
    )
    .optional()
}

pub fn set_value(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value],
    )?;
    Ok(())
}

pub fn delete_value(conn: &Connection, key: &str) -> rusqlite::Result<bool> {
    let removed = conn.execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
    Ok(removed > 0)
}
