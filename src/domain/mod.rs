pub mod routine;
pub mod table;
