use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryOrder, Set,
};
use thiserror::Error;

use crate::entity::photo;

/// Failures of the photo record store.
#[derive(Debug, Error)]
pub enum RecordError {
    /// No row matches the requested id.
    #[error("photo {0} not found")]
    NotFound(i32),
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Field values for a photo that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhoto {
    pub title: String,
    pub description: String,
    pub filename: String,
    pub ori_link: String,
}

/// Row operations on the `photos` table.
pub struct PhotoService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> PhotoService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Insert a new row and return it with its generated id.
    pub async fn create(&self, new: NewPhoto) -> Result<photo::Model, RecordError> {
        let model = photo::ActiveModel {
            title: Set(new.title),
            description: Set(new.description),
            filename: Set(new.filename),
            ori_link: Set(new.ori_link),
            ..Default::default()
        };

        Ok(model.insert(self.conn).await?)
    }

    /// Fetch a single row by id.
    pub async fn read(&self, id: i32) -> Result<photo::Model, RecordError> {
        photo::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or(RecordError::NotFound(id))
    }

    /// Overwrite every mutable column of the row matching `photo.id`.
    ///
    /// Callers confirm existence with [`Self::read`] first; a write that
    /// matches no row still surfaces as [`RecordError::NotFound`].
    pub async fn update(&self, photo: photo::Model) -> Result<photo::Model, RecordError> {
        let id = photo.id;
        let model = photo::ActiveModel {
            id: Unchanged(id),
            title: Set(photo.title),
            description: Set(photo.description),
            filename: Set(photo.filename),
            ori_link: Set(photo.ori_link),
        };

        match model.update(self.conn).await {
            Ok(updated) => Ok(updated),
            Err(DbErr::RecordNotUpdated) => Err(RecordError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the row matching `id`. Returns the number of rows removed;
    /// deleting a missing row is not an error.
    pub async fn delete(&self, id: i32) -> Result<u64, RecordError> {
        let result = photo::Entity::delete_by_id(id).exec(self.conn).await?;
        Ok(result.rows_affected)
    }

    /// All rows, ordered by id.
    pub async fn list(&self) -> Result<Vec<photo::Model>, RecordError> {
        Ok(photo::Entity::find()
            .order_by_asc(photo::Column::Id)
            .all(self.conn)
            .await?)
    }
}

/// Create a PhotoService with a DatabaseConnection.
pub fn photo_service(db: &DatabaseConnection) -> PhotoService<'_, DatabaseConnection> {
    PhotoService::new(db)
}
