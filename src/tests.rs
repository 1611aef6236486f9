#[cfg(test)]
mod tests {

    mod tag_parsing_tests {
        use crate::models::Tag;
        use crate::services::tags::{format_tags, parse_tags};

        #[test]
        fn test_parse_tags_basic() {
            assert_eq!(parse_tags(Some("java, spring")), vec!["java", "spring"]);
        }

        #[test]
        fn test_parse_tags_trims_and_drops_blanks() {
            assert_eq!(
                parse_tags(Some("  rust ,, ,web  ,")),
                vec!["rust", "web"]
            );
        }

        #[test]
        fn test_parse_tags_none_or_blank() {
            assert!(parse_tags(None).is_empty());
            assert!(parse_tags(Some("")).is_empty());
            assert!(parse_tags(Some("   ")).is_empty());
        }

        #[test]
        fn test_parse_tags_keeps_duplicates_for_the_service() {
            assert_eq!(parse_tags(Some("a,a")), vec!["a", "a"]);
        }

        #[test]
        fn test_format_tags() {
            let tags = vec![
                Tag {
                    id: 1,
                    name: "java".to_string(),
                },
                Tag {
                    id: 2,
                    name: "spring".to_string(),
                },
            ];
            assert_eq!(format_tags(&tags), "java, spring");
            assert_eq!(format_tags(&[]), "");
        }
    }

    mod config_tests {
        use crate::cli::init::DEFAULT_CONFIG;
        use crate::Config;

        #[test]
        fn test_default_config_is_valid() {
            let config = Config::from_toml(DEFAULT_CONFIG).unwrap();
            assert_eq!(config.server.port, 3000);
            assert_eq!(config.content.posts_per_page, 10);
            assert!(!config.content.transactional_saves);
            assert_eq!(config.media.max_upload_bytes().unwrap(), 10 * 1024 * 1024);
        }

        #[test]
        fn test_minimal_config_uses_defaults() {
            let config = Config::from_toml(
                r#"
                [database]
                path = "blog.db"

                [media]
                upload_dir = "uploads"
                "#,
            )
            .unwrap();
            assert_eq!(config.server.host, "127.0.0.1");
            assert_eq!(config.database.pool_size, 10);
            assert_eq!(config.content.max_page_size, 100);
            assert_eq!(config.media.max_upload_size, "10MB");
        }

        #[test]
        fn test_rejects_page_size_above_maximum() {
            let result = Config::from_toml(
                r#"
                [database]
                path = "blog.db"

                [content]
                posts_per_page = 50
                max_page_size = 20

                [media]
                upload_dir = "uploads"
                "#,
            );
            assert!(result.is_err());
        }

        #[test]
        fn test_rejects_unparseable_upload_size() {
            let result = Config::from_toml(
                r#"
                [database]
                path = "blog.db"

                [media]
                upload_dir = "uploads"
                max_upload_size = "huge"
                "#,
            );
            assert!(result.is_err());
        }

        #[test]
        fn test_missing_database_section_is_an_error() {
            let result = Config::from_toml(
                r#"
                [media]
                upload_dir = "uploads"
                "#,
            );
            assert!(result.is_err());
        }
    }

    mod error_tests {
        use crate::BlogError;

        #[test]
        fn test_constraint_failures_are_classified() {
            let conn = rusqlite::Connection::open_in_memory().unwrap();
            conn.execute_batch("CREATE TABLE t (name TEXT UNIQUE); INSERT INTO t VALUES ('x');")
                .unwrap();
            let err: BlogError = conn
                .execute("INSERT INTO t VALUES ('x')", [])
                .unwrap_err()
                .into();
            assert!(matches!(err, BlogError::ConstraintViolation(_)));
        }

        #[test]
        fn test_not_found_message() {
            assert_eq!(BlogError::comment_not_found(9).to_string(), "Comment 9 not found");
        }
    }
}
