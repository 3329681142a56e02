pub mod operator;
pub mod views;
