pub mod icons;
pub mod models;
pub mod scan;
