use crate::error::{BlogError, Result};
use crate::models::{Comment, ANONYMOUS_AUTHOR};
use crate::Database;
use rusqlite::OptionalExtension;

#[derive(Clone)]
pub struct CommentStore {
    db: Database,
}

impl CommentStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn find_by_id(&self, id: i64) -> Result<Option<Comment>> {
        let conn = self.db.get()?;
        let comment = conn
            .query_row(
                "SELECT id, post_id, author, content, created_at FROM comments WHERE id = ?",
                [id],
                row_to_comment,
            )
            .optional()?;
        Ok(comment)
    }

    /// Comments of a post, oldest first.
    pub fn find_by_post_id(&self, post_id: i64) -> Result<Vec<Comment>> {
        let conn = self.db.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, post_id, author, content, created_at FROM comments WHERE post_id = ? ORDER BY id",
        )?;
        let comments = stmt
            .query_map([post_id], row_to_comment)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(comments)
    }

    pub fn count_by_post_id(&self, post_id: i64) -> Result<i64> {
        let conn = self.db.get()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM comments WHERE post_id = ?",
            [post_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn create(&self, post_id: i64, author: Option<&str>, content: &str) -> Result<Comment> {
        let author = author
            .filter(|a| !a.trim().is_empty())
            .unwrap_or(ANONYMOUS_AUTHOR);
        let created_at = chrono::Utc::now().to_rfc3339();

        let conn = self.db.get()?;
        conn.execute(
            "INSERT INTO comments (post_id, author, content, created_at) VALUES (?, ?, ?, ?)",
            (post_id, author, content, &created_at),
        )?;

        Ok(Comment {
            id: conn.last_insert_rowid(),
            post_id,
            author: author.to_string(),
            content: content.to_string(),
            created_at,
        })
    }

    /// Replaces the content of an existing comment. Author, post and
    /// creation time are left alone.
    pub fn update(&self, id: i64, content: &str) -> Result<Comment> {
        let mut comment = self
            .find_by_id(id)?
            .ok_or_else(|| BlogError::comment_not_found(id))?;

        let conn = self.db.get()?;
        conn.execute(
            "UPDATE comments SET content = ? WHERE id = ?",
            (content, id),
        )?;

        comment.content = content.to_string();
        Ok(comment)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let conn = self.db.get()?;
        conn.execute("DELETE FROM comments WHERE id = ?", [id])?;
        Ok(())
    }
}

fn row_to_comment(row: &rusqlite::Row) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        post_id: row.get(1)?,
        author: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
    })
}
