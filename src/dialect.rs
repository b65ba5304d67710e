//! Database dialect adapters.
//!
//! A [`Dialect`] supplies the engine-specific fragments the templating engine
//! and its collaborators need: identifier quotes, boolean keyword support, the
//! string escape, and a handful of ready-made SQL expressions.

use alloc::string::String;

/// Engine-specific SQL syntax.
pub trait Dialect {
    /// Identifier quote characters, one or two characters.
    fn identifier_quotes(&self) -> &'static str;

    /// Whether `TRUE` / `FALSE` keywords are available.
    fn supports_boolean(&self) -> bool;

    /// Escapes text for inclusion between single quotes.
    fn escape(&self, raw: &str) -> String;

    /// Expression for the current date.
    fn current_date(&self) -> &'static str;

    /// Expression for the current time.
    fn current_time(&self) -> &'static str;

    /// Expression for the current timestamp.
    fn current_timestamp(&self) -> &'static str;

    /// Expression for the last generated row id.
    fn last_insert_id(&self) -> &'static str;

    /// Prefix and suffix of an insert that skips conflicting rows.
    fn insert_ignore(&self) -> (&'static str, &'static str);

    /// Query listing table names, optionally filtered.
    ///
    /// A `table_like` without `%` at either end is matched as a substring.
    fn show_tables(&self, table_like: &str, schema: &str, dbname: &str) -> String;
}

/// Escapes by doubling single quotes, as standard SQL strings require.
#[must_use]
pub fn escape_standard(raw: &str) -> String {
    raw.replace('\'', "''")
}

/// Escapes the way MySQL's `mysql_real_escape_string` does.
#[must_use]
pub fn escape_backslash(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\x1a' => out.push_str("\\Z"),
            _ => out.push(c),
        }
    }
    out
}

fn like_pattern(table_like: &str) -> String {
    if table_like.starts_with('%') || table_like.ends_with('%') {
        table_like.into()
    } else {
        alloc::format!("%{table_like}%")
    }
}

/// MySQL and MariaDB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MySql;

impl Dialect for MySql {
    fn identifier_quotes(&self) -> &'static str {
        "`"
    }

    fn supports_boolean(&self) -> bool {
        false
    }

    fn escape(&self, raw: &str) -> String {
        escape_backslash(raw)
    }

    fn current_date(&self) -> &'static str {
        "CURRENT_DATE"
    }

    fn current_time(&self) -> &'static str {
        "CURRENT_TIME"
    }

    fn current_timestamp(&self) -> &'static str {
        "NOW()"
    }

    fn last_insert_id(&self) -> &'static str {
        "LAST_INSERT_ID()"
    }

    fn insert_ignore(&self) -> (&'static str, &'static str) {
        ("INSERT IGNORE INTO ", "")
    }

    fn show_tables(&self, table_like: &str, _schema: &str, dbname: &str) -> String {
        let mut sql = String::from("SHOW TABLES");
        if !dbname.is_empty() {
            sql.push_str(" FROM `");
            sql.push_str(&dbname.replace('`', "``"));
            sql.push('`');
        }
        if !table_like.is_empty() {
            sql.push_str(" LIKE '");
            sql.push_str(&self.escape(&like_pattern(table_like)));
            sql.push('\'');
        }
        sql
    }
}

/// PostgreSQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Postgres;

impl Dialect for Postgres {
    fn identifier_quotes(&self) -> &'static str {
        "\""
    }

    fn supports_boolean(&self) -> bool {
        true
    }

    fn escape(&self, raw: &str) -> String {
        escape_standard(raw)
    }

    fn current_date(&self) -> &'static str {
        "CURRENT_DATE"
    }

    fn current_time(&self) -> &'static str {
        "CURRENT_TIME"
    }

    fn current_timestamp(&self) -> &'static str {
        "CURRENT_TIMESTAMP"
    }

    fn last_insert_id(&self) -> &'static str {
        "lastval()"
    }

    fn insert_ignore(&self) -> (&'static str, &'static str) {
        ("INSERT INTO ", " ON CONFLICT DO NOTHING")
    }

    /// An empty `schema` means `public`.
    fn show_tables(&self, table_like: &str, schema: &str, _dbname: &str) -> String {
        let schema = if schema.is_empty() { "public" } else { schema };
        let mut sql = alloc::format!(
            "SELECT tablename FROM pg_catalog.pg_tables WHERE schemaname LIKE '{}'",
            self.escape(schema)
        );
        if !table_like.is_empty() {
            sql.push_str(" AND tablename LIKE '");
            sql.push_str(&self.escape(&like_pattern(table_like)));
            sql.push('\'');
        }
        sql
    }
}

/// SQLite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn identifier_quotes(&self) -> &'static str {
        "`"
    }

    fn supports_boolean(&self) -> bool {
        false
    }

    fn escape(&self, raw: &str) -> String {
        escape_standard(raw)
    }

    fn current_date(&self) -> &'static str {
        "date('now')"
    }

    fn current_time(&self) -> &'static str {
        "time('now')"
    }

    fn current_timestamp(&self) -> &'static str {
        "datetime('now')"
    }

    fn last_insert_id(&self) -> &'static str {
        "last_insert_rowid()"
    }

    fn insert_ignore(&self) -> (&'static str, &'static str) {
        ("INSERT OR IGNORE INTO ", "")
    }

    fn show_tables(&self, table_like: &str, _schema: &str, _dbname: &str) -> String {
        let mut sql = String::from("SELECT name FROM sqlite_schema WHERE type = 'table'");
        if !table_like.is_empty() {
            sql.push_str(" AND name LIKE '");
            sql.push_str(&self.escape(&like_pattern(table_like)));
            sql.push('\'');
        }
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_standard() {
        assert_eq!(escape_standard("it's"), "it''s");
        assert_eq!(escape_standard("plain"), "plain");
    }

    #[test]
    fn test_escape_backslash() {
        assert_eq!(escape_backslash("it's"), "it\\'s");
        assert_eq!(escape_backslash("a\\b\nc"), "a\\\\b\\nc");
        assert_eq!(escape_backslash("\0\x1a\""), "\\0\\Z\\\"");
    }

    #[test]
    fn test_show_tables_like_wrapping() {
        assert_eq!(
            Sqlite.show_tables("user", "", ""),
            "SELECT name FROM sqlite_schema WHERE type = 'table' AND name LIKE '%user%'"
        );
        assert_eq!(
            MySql.show_tables("user%", "", "shop"),
            "SHOW TABLES FROM `shop` LIKE 'user%'"
        );
        assert_eq!(
            Postgres.show_tables("", "", ""),
            "SELECT tablename FROM pg_catalog.pg_tables WHERE schemaname LIKE 'public'"
        );
    }

    #[test]
    fn test_insert_ignore_pairs() {
        assert_eq!(Sqlite.insert_ignore().0, "INSERT OR IGNORE INTO ");
        assert_eq!(Postgres.insert_ignore().1, " ON CONFLICT DO NOTHING");
    }
}
