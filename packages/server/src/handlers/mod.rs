pub mod names;
pub mod pages;
