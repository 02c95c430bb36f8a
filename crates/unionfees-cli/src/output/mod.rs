pub mod archive;
pub mod json;
pub mod table;
