#[cfg(test)]
mod tests {
    use crate::database::entity::post;
    use crate::database::postgres::PostgresPostRepository;
    use fable_core::domain::Post;
    use fable_core::ports::PostRepository;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;

    fn post_row(post_id: uuid::Uuid, favorites: Option<serde_json::Value>) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id: post_id,
            author_id: uuid::Uuid::new_v4(),
            author_name: "Writer".to_owned(),
            title: "A Winter Tale".to_owned(),
            synopsis: "Short synopsis".to_owned(),
            tags: json!(["fantasy"]),
            published: true,
            cover_image: None,
            images: Some(json!([])),
            pages: json!([{
                "title": "Chapter 1",
                "content": "<p>Once upon a time</p>",
                "created_at": now,
                "updated_at": now,
            }]),
            likes: json!([]),
            favorites,
            views: 3,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let post_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_row(post_id, Some(json!([])))]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        assert!(result.is_some());
        let post = result.unwrap();
        assert_eq!(post.id, post_id);
        assert_eq!(post.title, "A Winter Tale");
        assert_eq!(post.views, 3);
        assert_eq!(post.pages.len(), 1);
    }

    #[tokio::test]
    async fn test_legacy_row_without_favorites_normalizes_to_empty() {
        let post_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_row(post_id, None)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let post = repo.find_by_id(post_id).await.unwrap().unwrap();
        assert!(post.favorites.is_empty());
    }

    #[tokio::test]
    async fn test_update_author_name_reports_rows_affected() {
        let author_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 4,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let changed = repo.update_author_name(author_id, "New Name").await.unwrap();
        assert_eq!(changed, 4);
    }
}
