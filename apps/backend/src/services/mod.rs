pub mod reference_data;
pub mod response_cache;
pub mod sessions;
