use crate::error::{BlogError, Result};
use crate::models::{Comment, Post, PostDetail, PostListing, Tag, TagWithCount, ANONYMOUS_AUTHOR};
use crate::services::comments::CommentStore;
use crate::services::posts::{self, PostStore};
use crate::services::tags::{self, TagStore};
use crate::Database;
use std::collections::{HashMap, HashSet};

/// Post, tag and comment operations that span more than one table.
#[derive(Clone)]
pub struct BlogService {
    db: Database,
    posts: PostStore,
    tags: TagStore,
    comments: CommentStore,
}

impl BlogService {
    pub fn new(db: Database) -> Self {
        Self {
            posts: PostStore::new(db.clone()),
            tags: TagStore::new(db.clone()),
            comments: CommentStore::new(db.clone()),
            db,
        }
    }

    /// Wires prebuilt stores. They must all be backed by `db`, which the
    /// transactional save path uses directly.
    pub fn from_stores(
        db: Database,
        posts: PostStore,
        tags: TagStore,
        comments: CommentStore,
    ) -> Self {
        Self {
            db,
            posts,
            tags,
            comments,
        }
    }

    pub fn posts(&self) -> &PostStore {
        &self.posts
    }

    pub fn tags(&self) -> &TagStore {
        &self.tags
    }

    pub fn comments(&self) -> &CommentStore {
        &self.comments
    }

    /// Saves the post and replaces its tag associations with `tag_names`.
    ///
    /// Existing associations are deleted before the new ones are inserted, so
    /// a concurrent reader may briefly see the post without tags. Use
    /// [`BlogService::save_post_with_tags_atomic`] to close that window.
    pub fn save_post_with_tags(&self, post: &Post, tag_names: &[String]) -> Result<Post> {
        let names = normalize_tag_names(tag_names);

        let conn = self.db.get()?;
        let post_id = posts::save_post(&conn, post)?;
        posts::clear_post_tags(&conn, post_id)?;
        drop(conn);

        for name in &names {
            let tag = self.tags.get_or_create(name)?;
            let conn = self.db.get()?;
            posts::attach_tag(&conn, post_id, tag.id)?;
        }

        tracing::info!("Saved post id={} with {} tag(s)", post_id, names.len());
        Ok(Post {
            id: Some(post_id),
            ..post.clone()
        })
    }

    /// Same steps as [`BlogService::save_post_with_tags`], run inside a single
    /// transaction. Nothing is persisted if any step fails.
    pub fn save_post_with_tags_atomic(&self, post: &Post, tag_names: &[String]) -> Result<Post> {
        let mut conn = self.db.get()?;
        let tx = conn.transaction()?;

        let post_id = posts::save_post(&tx, post)?;
        let names = normalize_tag_names(tag_names);

        posts::clear_post_tags(&tx, post_id)?;
        for name in &names {
            let tag = tags::get_or_create_tag(&tx, name)?;
            posts::attach_tag(&tx, post_id, tag.id)?;
        }

        tx.commit()?;
        tracing::info!(
            "Saved post id={} with {} tag(s) in one transaction",
            post_id,
            names.len()
        );
        Ok(Post {
            id: Some(post_id),
            ..post.clone()
        })
    }

    /// Saves the post with no tags. Any tags previously attached are detached.
    pub fn save_post_only(&self, post: &Post) -> Result<Post> {
        self.save_post_with_tags(post, &[])
    }

    pub fn list_posts(
        &self,
        page: usize,
        page_size: usize,
        tag: Option<&str>,
    ) -> Result<PostListing> {
        let items = self.posts.find_paginated(page, page_size, tag)?;
        let total = self.posts.count_all(tag)?;

        let mut tags_by_post_id = HashMap::with_capacity(items.len());
        let mut comment_count_by_post_id = HashMap::with_capacity(items.len());
        for id in items.iter().filter_map(|p| p.id) {
            tags_by_post_id.insert(id, self.tags.find_by_post_id(id)?);
            comment_count_by_post_id.insert(id, self.comments.count_by_post_id(id)?);
        }

        Ok(PostListing {
            items,
            total,
            tags_by_post_id,
            comment_count_by_post_id,
        })
    }

    pub fn get_post_detail(&self, id: i64) -> Result<Option<PostDetail>> {
        let Some(post) = self.posts.find_by_id(id)? else {
            return Ok(None);
        };

        Ok(Some(PostDetail {
            tags: self.tags.find_by_post_id(id)?,
            comments: self.comments.find_by_post_id(id)?,
            post,
        }))
    }

    /// Deletes the post. Its comments and tag associations go with it through
    /// the schema's cascading foreign keys.
    pub fn delete_post(&self, id: i64) -> Result<()> {
        self.posts.delete(id)?;
        tracing::info!("Deleted post id={}", id);
        Ok(())
    }

    pub fn add_comment(&self, post_id: i64, content: &str) -> Result<Comment> {
        if self.posts.find_by_id(post_id)?.is_none() {
            return Err(BlogError::post_not_found(post_id));
        }
        self.comments.create(post_id, Some(ANONYMOUS_AUTHOR), content)
    }

    pub fn update_comment(&self, comment_id: i64, content: &str) -> Result<Comment> {
        self.comments.update(comment_id, content)
    }

    pub fn delete_comment(&self, comment_id: i64) -> Result<()> {
        self.comments.delete(comment_id)
    }

    /// Adds or removes one like. The count never drops below zero. The post
    /// is stored through [`BlogService::save_post_only`], so its tags are
    /// detached as a side effect.
    pub fn set_like(&self, post_id: i64, increment: bool) -> Result<Post> {
        let mut post = self
            .posts
            .find_by_id(post_id)?
            .ok_or_else(|| BlogError::post_not_found(post_id))?;

        post.likes = if increment {
            post.likes.saturating_add(1)
        } else {
            post.likes.saturating_sub(1)
        };

        self.save_post_only(&post)
    }

    pub fn find_post(&self, id: i64) -> Result<Option<Post>> {
        self.posts.find_by_id(id)
    }

    pub fn find_all_posts(&self) -> Result<Vec<Post>> {
        self.posts.find_all()
    }

    pub fn find_posts_by_title(&self, fragment: &str) -> Result<Vec<Post>> {
        self.posts.find_by_title(fragment)
    }

    pub fn find_posts_by_tag_name(&self, tag_name: &str) -> Result<Vec<Post>> {
        self.posts.find_by_tag_name(tag_name)
    }

    pub fn find_tags_by_post_id(&self, post_id: i64) -> Result<Vec<Tag>> {
        self.tags.find_by_post_id(post_id)
    }

    pub fn find_comments_by_post_id(&self, post_id: i64) -> Result<Vec<Comment>> {
        self.comments.find_by_post_id(post_id)
    }

    pub fn comment_count_by_post_id(&self, post_id: i64) -> Result<i64> {
        self.comments.count_by_post_id(post_id)
    }

    pub fn list_tags(&self) -> Result<Vec<TagWithCount>> {
        self.tags.list()
    }
}

/// Trims names, drops blanks and repeats. First occurrence wins the order.
fn normalize_tag_names(tag_names: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    tag_names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(*name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_drops_blanks_and_repeats() {
        let input = names(&[" java ", "", "spring", "java", "   "]);
        assert_eq!(normalize_tag_names(&input), vec!["java", "spring"]);
    }

    #[test]
    fn test_normalize_keeps_case_distinct() {
        let input = names(&["Rust", "rust"]);
        assert_eq!(normalize_tag_names(&input), vec!["Rust", "rust"]);
    }

    fn setup_blog(name: &str) -> BlogService {
        let db = Database::open_memory(name).unwrap();
        db.migrate().unwrap();
        BlogService::from_stores(
            db.clone(),
            PostStore::new(db.clone()),
            TagStore::new(db.clone()),
            CommentStore::new(db),
        )
    }

    // Fails any save that reaches the tag named `forbidden`, after the post
    // row is written and its old associations are cleared.
    fn reject_tag_named_forbidden(blog: &BlogService) {
        let conn = blog.db.get().unwrap();
        conn.execute_batch(
            r#"
            CREATE TRIGGER reject_forbidden_tag BEFORE INSERT ON tags
            WHEN NEW.name = 'forbidden'
            BEGIN
                SELECT RAISE(ABORT, 'tag rejected');
            END;
            "#,
        )
        .unwrap();
    }

    fn tag_names_of(blog: &BlogService, post_id: i64) -> Vec<String> {
        blog.find_tags_by_post_id(post_id)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect()
    }

    #[test]
    fn test_from_stores_shares_one_database() {
        let blog = setup_blog("blog_from_stores");

        let saved = blog
            .save_post_with_tags_atomic(&Post::new("Wired", "", ""), &names(&["a"]))
            .unwrap();
        let id = saved.id.unwrap();

        assert_eq!(blog.posts().count_all(Some("a")).unwrap(), 1);
        assert_eq!(tag_names_of(&blog, id), vec!["a"]);
    }

    #[test]
    fn test_atomic_update_rolls_back_after_partial_write() {
        let blog = setup_blog("blog_atomic_update_rollback");
        let saved = blog
            .save_post_with_tags(&Post::new("Before", "", ""), &names(&["keep"]))
            .unwrap();
        let id = saved.id.unwrap();
        reject_tag_named_forbidden(&blog);

        let mut edited = saved.clone();
        edited.title = "After".to_string();
        let result =
            blog.save_post_with_tags_atomic(&edited, &names(&["fresh", "forbidden"]));

        assert!(result.is_err());
        assert_eq!(blog.find_post(id).unwrap().unwrap().title, "Before");
        assert_eq!(tag_names_of(&blog, id), vec!["keep"]);
        assert!(blog.tags().find_by_name("fresh").unwrap().is_none());
        assert_eq!(blog.list_tags().unwrap().len(), 1);
    }

    #[test]
    fn test_atomic_insert_rolls_back_after_partial_write() {
        let blog = setup_blog("blog_atomic_insert_rollback");
        reject_tag_named_forbidden(&blog);

        let result = blog.save_post_with_tags_atomic(
            &Post::new("Never stored", "", ""),
            &names(&["fresh", "forbidden"]),
        );

        assert!(result.is_err());
        assert!(blog.find_all_posts().unwrap().is_empty());
        assert!(blog.list_tags().unwrap().is_empty());
    }

    #[test]
    fn test_plain_save_keeps_partial_write_on_failure() {
        let blog = setup_blog("blog_plain_partial_write");
        let saved = blog
            .save_post_with_tags(&Post::new("Before", "", ""), &names(&["keep"]))
            .unwrap();
        let id = saved.id.unwrap();
        reject_tag_named_forbidden(&blog);

        let mut edited = saved.clone();
        edited.title = "After".to_string();
        let result = blog.save_post_with_tags(&edited, &names(&["fresh", "forbidden"]));

        assert!(result.is_err());
        assert_eq!(blog.find_post(id).unwrap().unwrap().title, "After");
        assert_eq!(tag_names_of(&blog, id), vec!["fresh"]);
    }
}
