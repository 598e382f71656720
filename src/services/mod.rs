pub mod excel;
pub mod profile_cache;
pub mod store;
