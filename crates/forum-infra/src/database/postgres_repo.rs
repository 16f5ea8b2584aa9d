//! PostgreSQL repository implementations.
//!
//! Like and comment mutations are single `UPDATE ... RETURNING` statements
//! whose conditions are evaluated against the row being written, so two
//! actors hitting the same post never lose each other's change.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbBackend, DbErr, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set, Statement, Value,
};
use uuid::Uuid;

use forum_core::domain::{AuthorStats, Category, Comment, Post, PostChanges, User, mask_email};
use forum_core::error::RepoError;
use forum_core::ports::{PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity, comment_document};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

pub(crate) const TOGGLE_LIKE_SQL: &str = r#"
UPDATE posts SET
    likes = CASE
        WHEN liked_by @> jsonb_build_array($2::text) THEN GREATEST(likes - 1, 0)
        ELSE likes + 1
    END,
    liked_by = CASE
        WHEN liked_by @> jsonb_build_array($2::text) THEN liked_by - $2::text
        ELSE liked_by || jsonb_build_array($2::text)
    END,
    updated_at = $3
WHERE id = $1
RETURNING *"#;

pub(crate) const PUSH_COMMENT_SQL: &str = r#"
UPDATE posts SET
    comments = comments || jsonb_build_array($2::jsonb),
    updated_at = $3
WHERE id = $1
RETURNING *"#;

pub(crate) const REMOVE_COMMENT_SQL: &str = r#"
UPDATE posts SET
    comments = (
        SELECT COALESCE(jsonb_agg(elem ORDER BY pos), '[]'::jsonb)
        FROM jsonb_array_elements(comments) WITH ORDINALITY AS t(elem, pos)
        WHERE elem->>'id' <> $2::text
    ),
    updated_at = $4
WHERE id = $1
  AND comments @> jsonb_build_array(jsonb_build_object('id', $2::text, 'author', $3::text))
RETURNING *"#;

pub(crate) const EDIT_COMMENT_SQL: &str = r#"
UPDATE posts SET
    comments = (
        SELECT jsonb_agg(
            CASE WHEN elem->>'id' = $2::text
                THEN elem || jsonb_build_object('text', $4::text, 'updatedAt', $5::text)
                ELSE elem
            END ORDER BY pos)
        FROM jsonb_array_elements(comments) WITH ORDINALITY AS t(elem, pos)
    ),
    updated_at = $6
WHERE id = $1
  AND comments @> jsonb_build_array(jsonb_build_object('id', $2::text, 'author', $3::text))
RETURNING *"#;

pub(crate) const AUTHOR_STATS_SQL: &str = r#"
SELECT
    (SELECT COUNT(*) FROM posts WHERE author = $1) AS posts,
    (SELECT COUNT(*)
        FROM posts, jsonb_array_elements(comments) AS c
        WHERE c->>'author' = $1) AS comments"#;

impl PostgresPostRepository {
    /// Run one of the document mutations above and decode the returned row.
    async fn mutate(
        &self,
        sql: &str,
        values: Vec<Value>,
    ) -> Result<Option<Post>, RepoError> {
        PostEntity::find()
            .from_raw_sql(Statement::from_sql_and_values(
                DbBackend::Postgres,
                sql,
                values,
            ))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .map(Post::try_from)
            .transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .map(User::try_from)
            .transpose()
    }

    async fn update_name(
        &self,
        email: &str,
        name: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, RepoError> {
        UserEntity::update_many()
            .col_expr(user::Column::Name, Expr::value(name))
            .col_expr(user::Column::UpdatedAt, Expr::value(at))
            .filter(user::Column::Email.eq(email))
            .exec_with_returning(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .next()
            .map(User::try_from)
            .transpose()
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(&self, category: Option<Category>) -> Result<Vec<Post>, RepoError> {
        let mut query = PostEntity::find();
        if let Some(category) = category {
            query = query.filter(post::Column::Category.eq(category.code()));
        }

        query
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(Post::try_from)
            .collect()
    }

    async fn author_stats(&self, author: &str) -> Result<AuthorStats, RepoError> {
        let row = self
            .db
            .query_one(Statement::from_sql_and_values(
                DbBackend::Postgres,
                AUTHOR_STATS_SQL,
                [author.into()],
            ))
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| RepoError::Query("author stats returned no row".to_string()))?;

        let count = |column: &str| -> Result<u64, RepoError> {
            let value: i64 = row.try_get("", column).map_err(map_db_err)?;
            u64::try_from(value).map_err(|e| RepoError::Decode(format!("{column}: {e}")))
        };

        Ok(AuthorStats {
            posts: count("posts")?,
            comments: count("comments")?,
        })
    }

    async fn update_fields(
        &self,
        id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, RepoError> {
        let active_model = post::ActiveModel {
            id: Set(id),
            title: changes.title.map_or(NotSet, Set),
            content: changes.content.map_or(NotSet, Set),
            category: changes.category.map_or(NotSet, |c| Set(c.code())),
            updated_at: Set(changes.updated_at.into()),
            ..Default::default()
        };

        match active_model.update(&self.db).await {
            Ok(model) => Post::try_from(model).map(Some),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(map_db_err(e)),
        }
    }

    async fn toggle_like(
        &self,
        id: Uuid,
        email: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Post>, RepoError> {
        self.mutate(TOGGLE_LIKE_SQL, vec![id.into(), email.into(), at.into()])
            .await
    }

    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<Option<Post>, RepoError> {
        self.mutate(
            PUSH_COMMENT_SQL,
            vec![
                id.into(),
                comment_document(&comment).into(),
                comment.created_at.into(),
            ],
        )
        .await
    }

    async fn remove_comment(
        &self,
        id: Uuid,
        comment_id: Uuid,
        author: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Post>, RepoError> {
        self.mutate(
            REMOVE_COMMENT_SQL,
            vec![
                id.into(),
                comment_id.to_string().into(),
                author.into(),
                at.into(),
            ],
        )
        .await
    }

    async fn edit_comment(
        &self,
        id: Uuid,
        comment_id: Uuid,
        author: &str,
        text: String,
        at: DateTime<Utc>,
    ) -> Result<Option<Post>, RepoError> {
        // Same RFC 3339 form serde writes for `Comment::updated_at`.
        let stamp = at.to_rfc3339_opts(SecondsFormat::AutoSi, true);

        self.mutate(
            EDIT_COMMENT_SQL,
            vec![
                id.into(),
                comment_id.to_string().into(),
                author.into(),
                text.into(),
                stamp.into(),
                at.into(),
            ],
        )
        .await
    }
}
