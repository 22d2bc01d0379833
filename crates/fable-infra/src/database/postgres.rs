//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, DbConn, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use fable_core::domain::{Comment, Post, User};
use fable_core::error::RepoError;
use fable_core::ports::{CommentRepository, PostRepository, UserRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};

fn query_err(e: sea_orm::DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.map(Into::into))
    }

    async fn find_published(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Published.eq(true))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn save(&self, saved: Post) -> Result<Post, RepoError> {
        // Whole-document upsert: last write wins, matching the
        // concurrency contract of the editor.
        let active: post::ActiveModel = saved.clone().into();
        PostEntity::insert(active)
            .on_conflict(
                OnConflict::column(post::Column::Id)
                    .update_columns([
                        post::Column::AuthorName,
                        post::Column::Title,
                        post::Column::Synopsis,
                        post::Column::Tags,
                        post::Column::Published,
                        post::Column::CoverImage,
                        post::Column::Images,
                        post::Column::Pages,
                        post::Column::Likes,
                        post::Column::Favorites,
                        post::Column::Views,
                        post::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        Ok(saved)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn increment_views(&self, id: Uuid) -> Result<(), RepoError> {
        PostEntity::update_many()
            .col_expr(post::Column::Views, Expr::col(post::Column::Views).add(1))
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        Ok(())
    }

    async fn update_author_name(&self, author_id: Uuid, name: &str) -> Result<u64, RepoError> {
        let result = PostEntity::update_many()
            .col_expr(post::Column::AuthorName, Expr::value(name))
            .filter(post::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.rows_affected)
    }
}

/// PostgreSQL comment repository.
pub struct PostgresCommentRepository {
    db: DbConn,
}

impl PostgresCommentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let result = CommentEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.map(Into::into))
    }

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_desc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn save(&self, saved: Comment) -> Result<Comment, RepoError> {
        let active: comment::ActiveModel = saved.clone().into();
        CommentEntity::insert(active)
            .on_conflict(
                OnConflict::column(comment::Column::Id)
                    .update_columns([
                        comment::Column::AuthorName,
                        comment::Column::Content,
                        comment::Column::Deleted,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        Ok(saved)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = CommentEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn update_author_name(&self, author_id: Uuid, name: &str) -> Result<u64, RepoError> {
        let result = CommentEntity::update_many()
            .col_expr(comment::Column::AuthorName, Expr::value(name))
            .filter(comment::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.rows_affected)
    }
}

/// PostgreSQL user repository.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.map(Into::into))
    }

    async fn save(&self, saved: User) -> Result<User, RepoError> {
        let active: user::ActiveModel = saved.clone().into();
        UserEntity::insert(active)
            .on_conflict(
                OnConflict::column(user::Column::Id)
                    .update_columns([
                        user::Column::Email,
                        user::Column::PasswordHash,
                        user::Column::AuthorName,
                        user::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| {
                let err_str = e.to_string();
                if err_str.contains("duplicate") || err_str.contains("unique") {
                    RepoError::Constraint("Email already registered".to_string())
                } else {
                    RepoError::Query(err_str)
                }
            })?;
        Ok(saved)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            if local.len() > 1 {
                format!("{}***{}", &local[..1], domain)
            } else {
                format!("***{domain}")
            }
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod unit_tests {
    use super::mask_email;

    #[test]
    fn emails_are_masked_for_logs() {
        assert_eq!(mask_email("writer@example.com"), "w***@example.com");
        assert_eq!(mask_email("w@example.com"), "***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
