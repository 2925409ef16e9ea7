pub mod backend;
pub mod views;
