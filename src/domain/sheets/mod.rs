pub mod a1_notation;
pub mod table;
