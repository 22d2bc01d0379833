//! In-memory repositories for tests and database-less local runs.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use fable_core::domain::{Comment, Post, User};
use fable_core::error::RepoError;
use fable_core::ports::{CommentRepository, PostRepository, UserRepository};

/// In-memory post repository backed by a `HashMap`.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn find_published(&self) -> Result<Vec<Post>, RepoError> {
        let mut result: Vec<Post> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.published)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let mut result: Vec<Post> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.author.id == author_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        self.posts.write().await.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.posts
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }

    async fn increment_views(&self, id: Uuid) -> Result<(), RepoError> {
        if let Some(post) = self.posts.write().await.get_mut(&id) {
            post.record_view();
        }
        Ok(())
    }

    async fn update_author_name(&self, author_id: Uuid, name: &str) -> Result<u64, RepoError> {
        let mut changed = 0u64;
        for post in self.posts.write().await.values_mut() {
            if post.author.id == author_id {
                post.author.name = name.to_string();
                changed += 1;
            }
        }
        Ok(changed)
    }
}

/// In-memory comment repository.
#[derive(Default)]
pub struct InMemoryCommentRepository {
    comments: RwLock<HashMap<Uuid, Comment>>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.comments.read().await.get(&id).cloned())
    }

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let mut result: Vec<Comment> = self
            .comments
            .read()
            .await
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        self.comments
            .write()
            .await
            .insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.comments
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }

    async fn update_author_name(&self, author_id: Uuid, name: &str) -> Result<u64, RepoError> {
        let mut changed = 0u64;
        for comment in self.comments.write().await.values_mut() {
            if comment.author.id == author_id {
                comment.author.name = name.to_string();
                changed += 1;
            }
        }
        Ok(changed)
    }
}

/// In-memory user repository.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        let taken = users
            .values()
            .any(|u| u.email == user.email && u.id != user.id);
        if taken {
            return Err(RepoError::Constraint("Email already registered".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fable_core::domain::{AuthorRef, Page};

    fn make_post(author_id: Uuid, published: bool) -> Post {
        Post {
            id: Uuid::new_v4(),
            author: AuthorRef {
                id: author_id,
                name: "Writer".to_string(),
            },
            title: "Title".to_string(),
            synopsis: String::new(),
            tags: vec![],
            published,
            cover_image: None,
            images: vec![],
            pages: vec![Page {
                title: String::new(),
                content: String::new(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }],
            likes: vec![],
            favorites: vec![],
            views: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn published_listing_excludes_drafts_and_sorts_newest_first() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();

        let older = make_post(author, true);
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let newer = make_post(author, true);
        let draft = make_post(author, false);

        repo.save(older.clone()).await.unwrap();
        repo.save(newer.clone()).await.unwrap();
        repo.save(draft).await.unwrap();

        let listed = repo.find_published().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[1].id, older.id);
    }

    #[tokio::test]
    async fn author_rename_rewrites_only_their_posts() {
        let repo = InMemoryPostRepository::new();
        let renamed = Uuid::new_v4();
        let other = Uuid::new_v4();

        repo.save(make_post(renamed, true)).await.unwrap();
        repo.save(make_post(renamed, false)).await.unwrap();
        repo.save(make_post(other, true)).await.unwrap();

        let changed = repo.update_author_name(renamed, "New Pen Name").await.unwrap();
        assert_eq!(changed, 2);

        for post in repo.find_by_author(renamed).await.unwrap() {
            assert_eq!(post.author.name, "New Pen Name");
        }
        let untouched = repo.find_by_author(other).await.unwrap();
        assert_eq!(untouched[0].author.name, "Writer");
    }

    #[tokio::test]
    async fn increment_views_is_monotonic() {
        let repo = InMemoryPostRepository::new();
        let post = make_post(Uuid::new_v4(), true);
        let id = post.id;
        repo.save(post).await.unwrap();

        repo.increment_views(id).await.unwrap();
        repo.increment_views(id).await.unwrap();

        let stored = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.views, 2);
    }

    #[tokio::test]
    async fn duplicate_email_registration_is_rejected() {
        let repo = InMemoryUserRepository::new();
        let first = User::new(
            "writer@example.com".to_string(),
            "hash-a".to_string(),
            Some("Writer".to_string()),
        );
        repo.save(first).await.unwrap();

        let second = User::new(
            "writer@example.com".to_string(),
            "hash-b".to_string(),
            None,
        );
        let err = repo.save(second).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn comments_come_back_newest_first() {
        let repo = InMemoryCommentRepository::new();
        let post_id = Uuid::new_v4();
        let reader = Uuid::new_v4();

        let author = AuthorRef {
            id: reader,
            name: "Reader".to_string(),
        };
        let older = Comment::new(post_id, author.clone(), "First".to_string());
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let newer = Comment::new(post_id, author, "Second".to_string());

        repo.save(older).await.unwrap();
        repo.save(newer).await.unwrap();

        let listed = repo.find_by_post(post_id).await.unwrap();
        assert_eq!(listed[0].content, "Second");
        assert_eq!(listed[1].content, "First");
    }
}
