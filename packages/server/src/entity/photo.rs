use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "photos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Name of the stored image, relative to the image directory.
    pub filename: String,

    /// External reference URL for the original picture.
    pub ori_link: String,
}

impl ActiveModelBehavior for ActiveModel {}
