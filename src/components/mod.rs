pub mod multi_value;
pub mod table;
pub mod wizard;
