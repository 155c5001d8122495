//! PostgreSQL Device Catalog

use sqlx::PgPool;

use crate::domain::entities::Device;
use crate::domain::repository::DeviceCatalog;
use crate::domain::value_objects::DeviceId;
use crate::error::{CartError, CartResult};

/// Reads devices from the `electronic` table
#[derive(Clone)]
pub struct PgDeviceCatalog {
    pool: PgPool,
}

impl PgDeviceCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DeviceCatalog for PgDeviceCatalog {
    async fn find_device(&self, id: DeviceId) -> CartResult<Option<Device>> {
        let row = sqlx::query_as::<_, DeviceRow>(
            r#"
            SELECT
                id,
                type1,
                brand,
                model
            FROM electronic
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(DeviceRow::into_device).transpose()
    }
}

#[derive(sqlx::FromRow)]
struct DeviceRow {
    id: i64,
    type1: String,
    brand: String,
    model: String,
}

impl DeviceRow {
    fn into_device(self) -> CartResult<Device> {
        let id = DeviceId::new(self.id)
            .ok_or_else(|| CartError::Internal(format!("Invalid device id in catalog: {}", self.id)))?;
        Ok(Device::new(id, self.type1, self.brand, self.model))
    }
}
