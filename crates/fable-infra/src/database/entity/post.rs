//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use fable_core::domain::{AuthorRef, ImageRef, Page, Post};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub synopsis: String,
    pub tags: Json,
    pub published: bool,
    pub cover_image: Option<Json>,
    pub images: Option<Json>,
    pub pages: Json,
    pub likes: Json,
    /// Nullable: rows written before the favorites feature existed.
    pub favorites: Option<Json>,
    pub views: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to the domain aggregate.
///
/// This is the read-boundary normalization: legacy rows with NULL
/// `favorites`/`images`/`cover_image` come back as empty defaults, and
/// a corrupt JSON cell degrades to the empty value instead of failing
/// the whole fetch.
impl From<Model> for Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            author: AuthorRef {
                id: model.author_id,
                name: model.author_name,
            },
            title: model.title,
            synopsis: model.synopsis,
            tags: from_json(model.tags),
            published: model.published,
            cover_image: model
                .cover_image
                .and_then(|v| serde_json::from_value::<ImageRef>(v).ok()),
            images: model.images.map(from_json).unwrap_or_default(),
            pages: from_json::<Vec<Page>>(model.pages),
            likes: from_json(model.likes),
            favorites: model.favorites.map(from_json).unwrap_or_default(),
            views: model.views.max(0) as u64,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from the domain aggregate to a SeaORM ActiveModel.
impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Set(post.id),
            author_id: Set(post.author.id),
            author_name: Set(post.author.name),
            title: Set(post.title),
            synopsis: Set(post.synopsis),
            tags: Set(to_json(&post.tags)),
            published: Set(post.published),
            cover_image: Set(post.cover_image.as_ref().map(to_json)),
            images: Set(Some(to_json(&post.images))),
            pages: Set(to_json(&post.pages)),
            likes: Set(to_json(&post.likes)),
            favorites: Set(Some(to_json(&post.favorites))),
            views: Set(post.views.min(i64::MAX as u64) as i64),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}

fn from_json<T: serde::de::DeserializeOwned + Default>(value: Json) -> T {
    serde_json::from_value(value).unwrap_or_default()
}

fn to_json<T: serde::Serialize>(value: &T) -> Json {
    serde_json::to_value(value).unwrap_or(Json::Null)
}
