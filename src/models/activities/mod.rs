pub mod entities;
pub mod views;
