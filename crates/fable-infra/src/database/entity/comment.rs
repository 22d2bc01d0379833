//! Comment entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use fable_core::domain::{AuthorRef, Comment};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub deleted: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Comment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            author: AuthorRef {
                id: model.author_id,
                name: model.author_name,
            },
            content: model.content,
            created_at: model.created_at.into(),
            deleted: model.deleted,
        }
    }
}

impl From<Comment> for ActiveModel {
    fn from(comment: Comment) -> Self {
        Self {
            id: Set(comment.id),
            post_id: Set(comment.post_id),
            author_id: Set(comment.author.id),
            author_name: Set(comment.author.name),
            content: Set(comment.content),
            deleted: Set(comment.deleted),
            created_at: Set(comment.created_at.into()),
        }
    }
}
