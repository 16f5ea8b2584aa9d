#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{TimeZone, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction, Value};
    use serde_json::json;
    use uuid::Uuid;

    use crate::database::entity::post::{self, comment_document};
    use crate::database::entity::user;
    use crate::database::postgres_repo::{
        AUTHOR_STATS_SQL, EDIT_COMMENT_SQL, PUSH_COMMENT_SQL, PostgresPostRepository,
        PostgresUserRepository, REMOVE_COMMENT_SQL, TOGGLE_LIKE_SQL,
    };
    use forum_core::domain::{AuthorStats, Category, Comment, Post, PostChanges};
    use forum_core::error::RepoError;
    use forum_core::ports::{BaseRepository, PostRepository, UserRepository};

    fn row(id: Uuid) -> post::Model {
        let now = Utc::now();
        let comment_id = Uuid::new_v4();
        post::Model {
            id,
            title: "Best RPGs".to_owned(),
            content: "Looking for recs on RPGs".to_owned(),
            category: 1,
            author: "a@x.com".to_owned(),
            likes: 1,
            liked_by: json!(["b@x.com"]),
            comments: json!([{
                "id": comment_id,
                "text": "Nice list!",
                "author": "c@x.com",
                "postId": id,
                "createdAt": now,
            }]),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id_decodes_document() {
        let post_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(post_id)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let post: Post = repo.find_by_id(post_id).await.unwrap().unwrap();

        assert_eq!(post.id, post_id);
        assert_eq!(post.category, Category::PcGames);
        assert_eq!(post.liked_by, vec!["b@x.com".to_string()]);
        assert_eq!(post.likes as usize, post.liked_by.len());
        assert_eq!(post.comments.len(), 1);
        assert_eq!(post.comments[0].author, "c@x.com");
        assert_eq!(post.comments[0].post_id, post_id);
        assert!(post.comments[0].updated_at.is_none());
    }

    fn fixed_time() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn postgres(sql: &str, values: Vec<Value>) -> Transaction {
        Transaction::from_sql_and_values(DatabaseBackend::Postgres, sql, values)
    }

    #[tokio::test]
    async fn test_toggle_like_sends_one_conditional_update() {
        let post_id = Uuid::new_v4();
        let at = fixed_time();
        let mut liked = row(post_id);
        liked.likes = 2;
        liked.liked_by = json!(["b@x.com", "d@x.com"]);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![liked]])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let post = repo.toggle_like(post_id, "d@x.com", at).await.unwrap().unwrap();

        assert_eq!(post.likes, 2);
        assert!(post.is_liked_by("d@x.com"));
        assert_eq!(
            repo.db.into_transaction_log(),
            vec![postgres(
                TOGGLE_LIKE_SQL,
                vec![post_id.into(), "d@x.com".into(), at.into()]
            )]
        );
    }

    #[tokio::test]
    async fn test_toggle_like_on_missing_post_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let result = repo
            .toggle_like(Uuid::new_v4(), "b@x.com", fixed_time())
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_push_comment_appends_document() {
        let post_id = Uuid::new_v4();
        let comment = Comment::new(post_id, "c@x.com", "Nice list!".to_string());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(post_id)]])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let post = repo.push_comment(post_id, comment.clone()).await.unwrap();

        assert!(post.is_some());
        assert_eq!(
            repo.db.into_transaction_log(),
            vec![postgres(
                PUSH_COMMENT_SQL,
                vec![
                    post_id.into(),
                    comment_document(&comment).into(),
                    comment.created_at.into(),
                ]
            )]
        );
    }

    #[tokio::test]
    async fn test_remove_comment_binds_comment_id_and_author() {
        let (post_id, comment_id) = (Uuid::new_v4(), Uuid::new_v4());
        let at = fixed_time();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        // No row back: the comment is gone or belongs to someone else.
        let refused = repo
            .remove_comment(post_id, comment_id, "a@x.com", at)
            .await
            .unwrap();

        assert!(refused.is_none());
        assert_eq!(
            repo.db.into_transaction_log(),
            vec![postgres(
                REMOVE_COMMENT_SQL,
                vec![
                    post_id.into(),
                    comment_id.to_string().into(),
                    "a@x.com".into(),
                    at.into(),
                ]
            )]
        );
    }

    #[tokio::test]
    async fn test_edit_comment_binds_text_and_stamp() {
        let (post_id, comment_id) = (Uuid::new_v4(), Uuid::new_v4());
        let at = fixed_time();
        let stamp = serde_json::to_value(at).unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(post_id)]])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let post = repo
            .edit_comment(post_id, comment_id, "c@x.com", "Edited".to_string(), at)
            .await
            .unwrap();

        assert!(post.is_some());
        assert_eq!(
            repo.db.into_transaction_log(),
            vec![postgres(
                EDIT_COMMENT_SQL,
                vec![
                    post_id.into(),
                    comment_id.to_string().into(),
                    "c@x.com".into(),
                    "Edited".into(),
                    stamp.as_str().unwrap().into(),
                    at.into(),
                ]
            )]
        );
    }

    #[tokio::test]
    async fn test_edit_comment_by_other_author_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let result = repo
            .edit_comment(
                Uuid::new_v4(),
                Uuid::new_v4(),
                "a@x.com",
                "Hijack".to_string(),
                fixed_time(),
            )
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_author_stats_reads_both_counts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[BTreeMap::from([
                ("posts", Value::BigInt(Some(2))),
                ("comments", Value::BigInt(Some(5))),
            ])]])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let stats = repo.author_stats("a@x.com").await.unwrap();

        assert_eq!(stats, AuthorStats { posts: 2, comments: 5 });
        assert_eq!(
            repo.db.into_transaction_log(),
            vec![postgres(AUTHOR_STATS_SQL, vec!["a@x.com".into()])]
        );
    }

    #[tokio::test]
    async fn test_update_name_returns_updated_user() {
        let now = Utc::now();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user::Model {
                id: Uuid::new_v4(),
                email: "a@x.com".to_owned(),
                name: Some("Ada".to_owned()),
                password_hash: "$argon2id$hash".to_owned(),
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection();
        let repo = PostgresUserRepository::new(db);

        let user = repo
            .update_name("a@x.com", Some("Ada".to_string()), now)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(user.name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_negative_like_counter_is_a_decode_error() {
        let post_id = Uuid::new_v4();
        let mut bad = row(post_id);
        bad.likes = -1;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![bad]])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let result: Result<Option<Post>, RepoError> = repo.find_by_id(post_id).await;
        let err = result.unwrap_err();

        assert!(matches!(err, RepoError::Decode(msg) if msg.contains("likes")));
    }

    #[test]
    fn test_comment_document_matches_serde_form() {
        let mut comment = Comment::new(Uuid::new_v4(), "c@x.com", "Nice list!".to_string());
        assert_eq!(comment_document(&comment), serde_json::to_value(&comment).unwrap());

        comment.updated_at = Some(fixed_time());
        assert_eq!(comment_document(&comment), serde_json::to_value(&comment).unwrap());
    }

    #[tokio::test]
    async fn test_list_keeps_store_order() {
        let (newer, older) = (Uuid::new_v4(), Uuid::new_v4());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(newer), row(older)]])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let posts = repo.list(Some(Category::PcGames)).await.unwrap();

        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![newer, older]);
    }

    #[tokio::test]
    async fn test_unknown_category_code_is_a_decode_error() {
        let post_id = Uuid::new_v4();
        let mut bad = row(post_id);
        bad.category = 9;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![bad]])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let result: Result<Option<Post>, RepoError> = repo.find_by_id(post_id).await;
        let err = result.unwrap_err();

        assert!(matches!(err, RepoError::Decode(_)));
    }

    #[tokio::test]
    async fn test_update_fields_on_missing_post_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let changes = PostChanges {
            title: Some("Renamed".to_string()),
            content: None,
            category: None,
            updated_at: Utc::now(),
        };

        assert!(repo.update_fields(Uuid::new_v4(), changes).await.unwrap().is_none());
    }
}
