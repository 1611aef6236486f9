use crate::error::Result;
use crate::models::{Tag, TagWithCount};
use crate::Database;
use rusqlite::{Connection, OptionalExtension};

/// Get-or-create access to the `tags` table, keyed by exact name.
#[derive(Clone)]
pub struct TagStore {
    db: Database,
}

impl TagStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn find_by_name(&self, name: &str) -> Result<Option<Tag>> {
        let conn = self.db.get()?;
        find_tag_by_name(&conn, name)
    }

    /// Returns the tag named `name`, inserting it first when it does not exist.
    /// An existing row is returned untouched.
    pub fn get_or_create(&self, name: &str) -> Result<Tag> {
        let conn = self.db.get()?;
        get_or_create_tag(&conn, name)
    }

    /// Tags attached to a post, in the order they were attached.
    pub fn find_by_post_id(&self, post_id: i64) -> Result<Vec<Tag>> {
        let conn = self.db.get()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT t.id, t.name
            FROM tags t
            JOIN post_tags pt ON t.id = pt.tag_id
            WHERE pt.post_id = ?
            ORDER BY pt.rowid
            "#,
        )?;
        let tags = stmt
            .query_map([post_id], row_to_tag)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tags)
    }

    pub fn list(&self) -> Result<Vec<TagWithCount>> {
        let conn = self.db.get()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT t.id, t.name, COUNT(pt.post_id) as count
            FROM tags t
            LEFT JOIN post_tags pt ON t.id = pt.tag_id
            GROUP BY t.id
            ORDER BY count DESC, t.name
            "#,
        )?;
        let tags = stmt
            .query_map([], |row| {
                Ok(TagWithCount {
                    tag: row_to_tag(row)?,
                    count: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tags)
    }
}

fn find_tag_by_name(conn: &Connection, name: &str) -> Result<Option<Tag>> {
    let tag = conn
        .query_row("SELECT id, name FROM tags WHERE name = ?", [name], row_to_tag)
        .optional()?;
    Ok(tag)
}

// Check-then-insert: two callers racing on the same new name will see the
// UNIQUE index reject the second insert as a constraint violation.
pub(crate) fn get_or_create_tag(conn: &Connection, name: &str) -> Result<Tag> {
    if let Some(existing) = find_tag_by_name(conn, name)? {
        return Ok(existing);
    }

    conn.execute("INSERT INTO tags (name) VALUES (?)", [name])?;
    let id = conn.last_insert_rowid();
    tracing::debug!("Created tag '{}' with id={}", name, id);

    Ok(Tag {
        id,
        name: name.to_string(),
    })
}

fn row_to_tag(row: &rusqlite::Row) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

/// Splits a comma-separated tag string as typed into a post form.
/// Entries are trimmed and blanks dropped.
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => raw
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

/// Joins tag names back into the form used by the edit view.
pub fn format_tags(tags: &[Tag]) -> String {
    tags.iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
