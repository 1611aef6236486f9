use crate::error::{BlogError, Result};
use crate::models::Post;
use crate::Database;
use rusqlite::{Connection, OptionalExtension};

const POST_COLUMNS: &str = "p.id, p.title, p.preview, p.image_url, p.text, p.likes";

#[derive(Clone)]
pub struct PostStore {
    db: Database,
}

impl PostStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn find_by_id(&self, id: i64) -> Result<Option<Post>> {
        let conn = self.db.get()?;
        find_post_by_id(&conn, id)
    }

    pub fn find_all(&self) -> Result<Vec<Post>> {
        let conn = self.db.get()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM posts p ORDER BY p.id", POST_COLUMNS))?;
        let posts = stmt
            .query_map([], row_to_post)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(posts)
    }

    /// Case-insensitive substring match on the title, newest first. Folding
    /// is done in Rust because SQLite's `LIKE` only folds ASCII letters.
    pub fn find_by_title(&self, fragment: &str) -> Result<Vec<Post>> {
        let needle = fragment.to_lowercase();
        let conn = self.db.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM posts p ORDER BY p.id DESC",
            POST_COLUMNS
        ))?;
        let mut posts = Vec::new();
        for post in stmt.query_map([], row_to_post)? {
            let post = post?;
            if post.title.to_lowercase().contains(&needle) {
                posts.push(post);
            }
        }
        Ok(posts)
    }

    /// Posts carrying the tag, newest first.
    pub fn find_by_tag_name(&self, tag_name: &str) -> Result<Vec<Post>> {
        let conn = self.db.get()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {}
            FROM posts p
            JOIN post_tags pt ON p.id = pt.post_id
            JOIN tags t ON pt.tag_id = t.id
            WHERE t.name = ?
            ORDER BY p.id DESC
            "#,
            POST_COLUMNS
        ))?;
        let posts = stmt
            .query_map([tag_name], row_to_post)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(posts)
    }

    /// One page of posts, newest first. `page` is zero-based. Bounds on
    /// `page_size` are the caller's business.
    pub fn find_paginated(
        &self,
        page: usize,
        page_size: usize,
        tag: Option<&str>,
    ) -> Result<Vec<Post>> {
        // SQLite binds LIMIT and OFFSET as i64. An offset past that range
        // cannot reach any row.
        let limit = i64::try_from(page_size).unwrap_or(i64::MAX);
        let Some(offset) = i64::try_from(page)
            .ok()
            .and_then(|page| page.checked_mul(limit))
        else {
            return Ok(Vec::new());
        };
        let conn = self.db.get()?;

        let posts = match tag_filter(tag) {
            Some(tag) => {
                let mut stmt = conn.prepare(&format!(
                    r#"
                    SELECT {}
                    FROM posts p
                    JOIN post_tags pt ON p.id = pt.post_id
                    JOIN tags t ON t.id = pt.tag_id
                    WHERE t.name = ?
                    ORDER BY p.id DESC
                    LIMIT ? OFFSET ?
                    "#,
                    POST_COLUMNS
                ))?;
                let rows = stmt.query_map((tag, limit, offset), row_to_post)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM posts p ORDER BY p.id DESC LIMIT ? OFFSET ?",
                    POST_COLUMNS
                ))?;
                let rows = stmt.query_map((limit, offset), row_to_post)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };

        Ok(posts)
    }

    pub fn count_all(&self, tag: Option<&str>) -> Result<i64> {
        let conn = self.db.get()?;
        let count = match tag_filter(tag) {
            Some(tag) => conn.query_row(
                r#"
                SELECT COUNT(*)
                FROM posts p
                JOIN post_tags pt ON p.id = pt.post_id
                JOIN tags t ON t.id = pt.tag_id
                WHERE t.name = ?
                "#,
                [tag],
                |row| row.get(0),
            )?,
            None => conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?,
        };
        Ok(count)
    }

    /// Inserts a post without an id, updates one that has it.
    pub fn save(&self, post: &Post) -> Result<Post> {
        let conn = self.db.get()?;
        let id = save_post(&conn, post)?;
        Ok(Post {
            id: Some(id),
            ..post.clone()
        })
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let conn = self.db.get()?;
        conn.execute("DELETE FROM posts WHERE id = ?", [id])?;
        Ok(())
    }
}

fn find_post_by_id(conn: &Connection, id: i64) -> Result<Option<Post>> {
    let post = conn
        .query_row(
            &format!("SELECT {} FROM posts p WHERE p.id = ?", POST_COLUMNS),
            [id],
            row_to_post,
        )
        .optional()?;
    Ok(post)
}

/// Returns the id of the stored row.
pub(crate) fn save_post(conn: &Connection, post: &Post) -> Result<i64> {
    match post.id {
        None => {
            conn.execute(
                "INSERT INTO posts (title, preview, image_url, text, likes) VALUES (?, ?, ?, ?, ?)",
                (
                    &post.title,
                    &post.preview,
                    &post.image_url,
                    &post.text,
                    post.likes,
                ),
            )?;
            Ok(conn.last_insert_rowid())
        }
        Some(id) => {
            let updated = conn.execute(
                "UPDATE posts SET title = ?, preview = ?, image_url = ?, text = ?, likes = ? WHERE id = ?",
                (
                    &post.title,
                    &post.preview,
                    &post.image_url,
                    &post.text,
                    post.likes,
                    id,
                ),
            )?;
            if updated == 0 {
                return Err(BlogError::post_not_found(id));
            }
            Ok(id)
        }
    }
}

pub(crate) fn clear_post_tags(conn: &Connection, post_id: i64) -> Result<usize> {
    Ok(conn.execute("DELETE FROM post_tags WHERE post_id = ?", [post_id])?)
}

pub(crate) fn attach_tag(conn: &Connection, post_id: i64, tag_id: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO post_tags (post_id, tag_id) VALUES (?, ?)",
        (post_id, tag_id),
    )?;
    Ok(())
}

fn tag_filter(tag: Option<&str>) -> Option<&str> {
    tag.filter(|t| !t.trim().is_empty())
}

fn row_to_post(row: &rusqlite::Row) -> rusqlite::Result<Post> {
    Ok(Post {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        preview: row.get(2)?,
        image_url: row.get(3)?,
        text: row.get(4)?,
        likes: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn setup_store() -> PostStore {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db = Database::open_memory(&format!("posts_test_{}", id)).unwrap();
        db.migrate().unwrap();
        PostStore::new(db)
    }

    #[test]
    fn test_save_inserts_then_updates() {
        let store = setup_store();

        let saved = store.save(&Post::new("First", "pre", "body")).unwrap();
        let id = saved.id.expect("id assigned on insert");

        let mut edited = saved.clone();
        edited.title = "First, edited".to_string();
        edited.likes = 3;
        store.save(&edited).unwrap();

        let loaded = store.find_by_id(id).unwrap().unwrap();
        assert_eq!(loaded.title, "First, edited");
        assert_eq!(loaded.likes, 3);
        assert_eq!(store.count_all(None).unwrap(), 1);
    }

    #[test]
    fn test_save_with_stale_id_is_not_found() {
        let store = setup_store();
        let mut post = Post::new("Ghost", "", "");
        post.id = Some(999);

        let err = store.save(&post).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_find_paginated_newest_first() {
        let store = setup_store();
        for i in 1..=5 {
            store.save(&Post::new(format!("Post {}", i), "", "")).unwrap();
        }

        let page0 = store.find_paginated(0, 2, None).unwrap();
        let page2 = store.find_paginated(2, 2, None).unwrap();

        assert_eq!(page0.len(), 2);
        assert_eq!(page0[0].title, "Post 5");
        assert_eq!(page0[1].title, "Post 4");
        assert_eq!(page2.len(), 1);
        assert_eq!(page2[0].title, "Post 1");
    }

    #[test]
    fn test_blank_tag_filter_is_ignored() {
        let store = setup_store();
        store.save(&Post::new("Only", "", "")).unwrap();

        assert_eq!(store.find_paginated(0, 10, Some("  ")).unwrap().len(), 1);
        assert_eq!(store.count_all(Some("")).unwrap(), 1);
    }

    #[test]
    fn test_find_by_title_ignores_ascii_case() {
        let store = setup_store();
        store.save(&Post::new("Learning Rust", "", "")).unwrap();
        store.save(&Post::new("Spring tips", "", "")).unwrap();

        let found = store.find_by_title("rUsT").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Learning Rust");
    }

    #[test]
    fn test_find_by_title_treats_wildcards_literally() {
        let store = setup_store();
        store.save(&Post::new("100% done", "", "")).unwrap();
        store.save(&Post::new("1000 words", "", "")).unwrap();

        let found = store.find_by_title("0%").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "100% done");
    }

    #[test]
    fn test_find_by_title_folds_non_ascii_case() {
        let store = setup_store();
        store.save(&Post::new("Привет Мир", "", "")).unwrap();
        store.save(&Post::new("Crème Brûlée", "", "")).unwrap();
        store.save(&Post::new("Plain", "", "")).unwrap();

        let cyrillic = store.find_by_title("привет").unwrap();
        assert_eq!(cyrillic.len(), 1);
        assert_eq!(cyrillic[0].title, "Привет Мир");

        let accented = store.find_by_title("CRÈME").unwrap();
        assert_eq!(accented.len(), 1);
        assert_eq!(accented[0].title, "Crème Brûlée");
    }

    #[test]
    fn test_find_paginated_far_past_the_end_is_empty() {
        let store = setup_store();
        store.save(&Post::new("Only", "", "")).unwrap();

        assert!(store.find_paginated(usize::MAX / 2, 10, None).unwrap().is_empty());
        assert!(store.find_paginated(usize::MAX, usize::MAX, None).unwrap().is_empty());
        assert!(store
            .find_paginated(usize::MAX / 2, 10, Some("rust"))
            .unwrap()
            .is_empty());
        assert_eq!(store.find_paginated(0, usize::MAX, None).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_missing_post_is_ok() {
        let store = setup_store();
        store.delete(42).unwrap();
    }
}
