pub(crate) mod catalog_service;
pub(crate) mod pagination;
pub(crate) mod refine;

pub use catalog_service::{CatalogService, CatalogSettings, LoadStrategy};
