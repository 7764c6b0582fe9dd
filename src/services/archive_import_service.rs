use std::fs;
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};

use base64::Engine;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use serde::Serialize;
use tempfile::TempDir;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::database::entities::{
    coating_categories, images, material_categories, materials, shapes,
};
use crate::errors::ApiError;
use crate::services::spreadsheet;

const MACOS_METADATA_DIR: &str = "__MACOSX";
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls"];
/// Top-level folder names carrying this marker produce non-rare-earth
/// material categories; every other folder is treated as rare earth.
const NON_RARE_EARTH_MARKER: &str = "Non Rare Earth";

#[derive(Debug, Default, Serialize)]
pub struct ImageImportSummary {
    pub taxonomies_created: usize,
    pub images_created: usize,
    pub files_skipped: usize,
}

#[derive(Debug, Default, Serialize)]
pub struct MaterialImportSummary {
    pub categories_created: usize,
    pub materials_created: usize,
    pub rows_skipped: usize,
    pub files_skipped: usize,
}

/// Hierarchical archive import: the uploaded zip encodes a taxonomy as
/// top-level folders, each holding image files (shape / coating-category
/// variants) or grade spreadsheets (material variant).
///
/// Each upload is extracted into a scratch directory under the configured
/// working directory and processed inside a single transaction; the
/// scratch directory is removed on every exit path.
pub struct ArchiveImportService {
    db: DatabaseConnection,
    upload_dir: PathBuf,
}

impl ArchiveImportService {
    pub fn new(db: DatabaseConnection, upload_dir: PathBuf) -> Self {
        Self { db, upload_dir }
    }

    /// Import shape folders: each top-level directory becomes a shape,
    /// each image file inside it an image owned by that shape.
    pub async fn import_shape_images(&self, bytes: &[u8]) -> Result<ImageImportSummary, ApiError> {
        let scratch = self.extract_archive(bytes)?;
        let folders = first_level_dirs(scratch.path())?;

        let txn = self.db.begin().await?;
        let mut summary = ImageImportSummary::default();

        for folder in &folders {
            let name = folder_name(folder);
            let (shape_id, created) = resolve_shape(&txn, name).await?;
            if created {
                summary.taxonomies_created += 1;
            }

            for file in files_with_extension(folder, IMAGE_EXTENSIONS, &mut summary.files_skipped)? {
                let encoded = encode_image(&file)?;
                images::ActiveModel {
                    name: Set(sanitize_file_name(&file)),
                    base64_data: Set(encoded),
                    shape_id: Set(Some(shape_id)),
                    category_id: Set(None),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
                summary.images_created += 1;
            }
        }

        txn.commit().await?;
        Ok(summary)
    }

    /// Import coating category folders: each top-level directory becomes
    /// a coating category, each image file an image owned by it.
    pub async fn import_coating_category_images(
        &self,
        bytes: &[u8],
    ) -> Result<ImageImportSummary, ApiError> {
        let scratch = self.extract_archive(bytes)?;
        let folders = first_level_dirs(scratch.path())?;

        let txn = self.db.begin().await?;
        let mut summary = ImageImportSummary::default();

        for folder in &folders {
            let name = folder_name(folder);
            let (category_id, created) = resolve_coating_category(&txn, name).await?;
            if created {
                summary.taxonomies_created += 1;
            }

            for file in files_with_extension(folder, IMAGE_EXTENSIONS, &mut summary.files_skipped)? {
                let encoded = encode_image(&file)?;
                images::ActiveModel {
                    name: Set(sanitize_file_name(&file)),
                    base64_data: Set(encoded),
                    shape_id: Set(None),
                    category_id: Set(Some(category_id)),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
                summary.images_created += 1;
            }
        }

        txn.commit().await?;
        Ok(summary)
    }

    /// Import material folders: each spreadsheet inside a top-level
    /// directory becomes a material category named after the file stem,
    /// flagged rare-earth unless the folder name says otherwise, with one
    /// material row per spreadsheet row.
    pub async fn import_material_folders(
        &self,
        bytes: &[u8],
    ) -> Result<MaterialImportSummary, ApiError> {
        let scratch = self.extract_archive(bytes)?;
        let folders = first_level_dirs(scratch.path())?;

        let txn = self.db.begin().await?;
        let mut summary = MaterialImportSummary::default();

        for folder in &folders {
            let folder_label = folder_name(folder).to_string();
            let is_rare_earth = !folder_label.contains(NON_RARE_EARTH_MARKER);

            for file in
                files_with_extension(folder, SPREADSHEET_EXTENSIONS, &mut summary.files_skipped)?
            {
                let category_name = file
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().to_string())
                    .unwrap_or_default();
                if category_name.is_empty() {
                    summary.files_skipped += 1;
                    continue;
                }

                let (category_id, created) =
                    resolve_material_category(&txn, &category_name, is_rare_earth).await?;
                if created {
                    summary.categories_created += 1;
                }

                import_material_sheet(&txn, &file, category_id, &mut summary).await?;
            }
        }

        txn.commit().await?;
        Ok(summary)
    }

    /// Decompress the archive into a fresh scratch directory under the
    /// configured working directory. Dropping the returned handle deletes
    /// the directory, so cleanup holds on error paths too.
    fn extract_archive(&self, bytes: &[u8]) -> Result<TempDir, ApiError> {
        fs::create_dir_all(&self.upload_dir)?;
        let scratch = tempfile::Builder::new()
            .prefix("magcat-import-")
            .tempdir_in(&self.upload_dir)?;

        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ApiError::validation(format!("failed to read archive: {}", e)))?;

        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| ApiError::processing(format!("failed to read archive entry: {}", e)))?;

            let rel_path = match sanitize_entry_path(entry.name()) {
                Some(path) => path,
                None => {
                    debug!(entry = entry.name(), "skipping unsafe archive entry");
                    continue;
                }
            };

            let out_path = scratch.path().join(&rel_path);
            if entry.is_dir() {
                // Materialize directory entries so folders with no files
                // still show up in the walk.
                fs::create_dir_all(&out_path)?;
                continue;
            }

            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = fs::File::create(&out_path)?;
            std::io::copy(&mut entry, &mut outfile)?;
        }

        Ok(scratch)
    }
}

async fn import_material_sheet<C: ConnectionTrait>(
    db: &C,
    file: &Path,
    category_id: i32,
    summary: &mut MaterialImportSummary,
) -> Result<(), ApiError> {
    let bytes = fs::read(file)?;
    let sheet = spreadsheet::read_first_sheet(&bytes)
        .map_err(|e| ApiError::processing(format!("{}: {}", sanitize_file_name(file), e)))?;

    let grade_col = sheet
        .require_column("grade")
        .map_err(|e| ApiError::processing(format!("{}: {}", sanitize_file_name(file), e)))?;
    let br_col = sheet
        .require_column("br_t")
        .map_err(|e| ApiError::processing(format!("{}: {}", sanitize_file_name(file), e)))?;
    let hcb_col = sheet
        .require_column("hcb_ka_m")
        .map_err(|e| ApiError::processing(format!("{}: {}", sanitize_file_name(file), e)))?;
    let bh_max_col = sheet
        .require_column("bh_max_kj_m3")
        .map_err(|e| ApiError::processing(format!("{}: {}", sanitize_file_name(file), e)))?;

    for (idx, row) in sheet.rows.iter().enumerate() {
        let grade = row[grade_col].trim();
        let br_t = spreadsheet::parse_int_cell(&row[br_col]);
        let hcb_ka_m = spreadsheet::parse_int_cell(&row[hcb_col]);
        let bh_max_kj_m3 = spreadsheet::parse_int_cell(&row[bh_max_col]);

        let (Some(br_t), Some(hcb_ka_m), Some(bh_max_kj_m3)) = (br_t, hcb_ka_m, bh_max_kj_m3)
        else {
            warn!(row = idx + 2, "skipping material row with missing values");
            summary.rows_skipped += 1;
            continue;
        };
        if grade.is_empty() {
            warn!(row = idx + 2, "skipping material row with missing values");
            summary.rows_skipped += 1;
            continue;
        }

        materials::ActiveModel {
            grade: Set(grade.to_string()),
            br_t: Set(br_t),
            hcb_ka_m: Set(hcb_ka_m),
            bh_max_kj_m3: Set(bh_max_kj_m3),
            category_id: Set(category_id),
            ..Default::default()
        }
        .insert(db)
        .await?;
        summary.materials_created += 1;
    }

    Ok(())
}

async fn resolve_shape<C: ConnectionTrait>(db: &C, name: &str) -> Result<(i32, bool), ApiError> {
    if let Some(existing) = shapes::Entity::find()
        .filter(shapes::Column::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok((existing.id, false));
    }
    let created = shapes::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok((created.id, true))
}

async fn resolve_coating_category<C: ConnectionTrait>(
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

/// An existing category keeps its stored rare-earth flag; the folder name
/// only decides the flag for newly created categories.
async fn resolve_material_category<C: ConnectionTrait>(
    db: &C,
    name: &str,
    is_rare_earth: bool,
) -> Result<(i32, bool), ApiError> {
    if let Some(existing) = material_categories::Entity::find()
        .filter(material_categories::Column::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok((existing.id, false));
    }
    let created = material_categories::ActiveModel {
        name: Set(name.to_string()),
        is_rare_earth: Set(is_rare_earth),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok((created.id, true))
}

/// Rebuild an archive entry path from its normal components only.
/// Entries with absolute, parent or otherwise non-normal components are
/// rejected (None) and skipped by the caller.
fn sanitize_entry_path(name: &str) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if clean.as_os_str().is_empty() {
        None
    } else {
        Some(clean)
    }
}

/// First-level directories under the extraction root, sorted for a
/// deterministic walk. The macOS metadata directory never counts.
fn first_level_dirs(root: &Path) -> Result<Vec<PathBuf>, ApiError> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if entry.file_name() == MACOS_METADATA_DIR {
            continue;
        }
        dirs.push(entry.path());
    }
    dirs.sort();

    if dirs.is_empty() {
        return Err(ApiError::validation(
            "archive contains no top-level folders to import",
        ));
    }
    Ok(dirs)
}

/// Files directly inside `dir` whose extension matches (case-insensitive);
/// everything else is counted and silently skipped.
fn files_with_extension(
    dir: &Path,
    extensions: &[&str],
    skipped: &mut usize,
) -> Result<Vec<PathBuf>, ApiError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        if extensions.contains(&ext.as_str()) {
            files.push(path);
        } else {
            *skipped += 1;
        }
    }
    files.sort();
    Ok(files)
}

fn folder_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
}

fn encode_image(path: &Path) -> Result<String, ApiError> {
    let bytes = fs::read(path)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

/// Final path component with anything outside `[A-Za-z0-9._-]` replaced.
fn sanitize_file_name(path: &Path) -> String {
    let raw = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_paths_reject_escapes() {
        assert_eq!(
            sanitize_entry_path("A/img.png"),
            Some(PathBuf::from("A/img.png"))
        );
        assert_eq!(sanitize_entry_path("./A/img.png"), Some(PathBuf::from("A/img.png")));
        assert_eq!(sanitize_entry_path("../escape.png"), None);
        assert_eq!(sanitize_entry_path("/etc/passwd"), None);
        assert_eq!(sanitize_entry_path(""), None);
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(
            sanitize_file_name(Path::new("A/ring magnet (top).png")),
            "ring_magnet__top_.png"
        );
        assert_eq!(sanitize_file_name(Path::new("plain.jpg")), "plain.jpg");
    }
}
