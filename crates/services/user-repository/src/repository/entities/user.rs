//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::User;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "USER")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "ID")]
    pub id: i64,
    #[sea_orm(column_name = "FIRSTNAME")]
    pub first_name: String,
    #[sea_orm(column_name = "LASTNAME")]
    pub last_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: Some(model.id),
            first_name: Some(model.first_name),
            last_name: Some(model.last_name),
        }
    }
}
