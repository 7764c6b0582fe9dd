use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use serde::Serialize;
use tracing::warn;

use crate::database::entities::{coating_categories, coatings};
use crate::errors::ApiError;
use crate::services::spreadsheet;

#[derive(Debug, Default, Serialize)]
pub struct CoatingImportSummary {
    pub categories_created: usize,
    pub coatings_created: usize,
    pub rows_skipped: usize,
}

/// Tabular coating import: one spreadsheet row per coating, with the
/// category resolved by name (created on first sight) so repeated
/// category names share a single record.
pub struct CoatingImportService {
    db: DatabaseConnection,
}

impl CoatingImportService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Import coatings from an uploaded .xlsx/.xls workbook. The whole
    /// upload runs in one transaction; nothing persists on failure.
    pub async fn import_workbook(&self, bytes: &[u8]) -> Result<CoatingImportSummary, ApiError> {
        let sheet = spreadsheet::read_first_sheet(bytes)?;

        let main_category_col = sheet.require_column("main_category")?;
        let sub_category_col = sheet.require_column("sub_category")?;
        let thickness_col = sheet.require_column("thickness")?;
        let color_col = sheet.require_column("color")?;

        let txn = self.db.begin().await?;
        let mut summary = CoatingImportSummary::default();
        // Category ids resolved so far in this batch, by exact name.
        let mut resolved: HashMap<String, i32> = HashMap::new();

        for (idx, row) in sheet.rows.iter().enumerate() {
            let category_name = row[main_category_col].trim();
            let sub_category = row[sub_category_col].trim();
            let thickness = row[thickness_col].trim();
            let color = row[color_col].trim();

            if category_name.is_empty()
                || sub_category.is_empty()
                || thickness.is_empty()
                || color.is_empty()
            {
                warn!(row = idx + 2, "skipping coating row with missing values");
                summary.rows_skipped += 1;
                continue;
            }

            let category_id = match resolved.get(category_name) {
                Some(id) => *id,
                None => {
                    let (id, created) = resolve_category(&txn, category_name).await?;
                    if created {
                        summary.categories_created += 1;
                    }
                    resolved.insert(category_name.to_string(), id);
                    id
                }
            };

            coatings::ActiveModel {
                sub_category: Set(sub_category.to_string()),
                thickness: Set(thickness.to_string()),
                color: Set(color.to_string()),
                category_id: Set(category_id),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            summary.coatings_created += 1;
        }

        txn.commit().await?;
        Ok(summary)
    }
}

/// Look a coating category up by exact name, creating it if absent.
/// The generated id is visible to the rest of the batch before commit.
async fn resolve_category<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<(i32, bool), ApiError> {
    if let Some(existing) = coating_categories::Entity::find()
        .filter(coating_categories::Column::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok((existing.id, false));
    }

    let created = coating_categories::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok((created.id, true))
}
