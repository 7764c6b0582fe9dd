pub mod archive_import_service;
pub mod coating_import_service;
pub mod spreadsheet;

pub use archive_import_service::ArchiveImportService;
pub use coating_import_service::CoatingImportService;
