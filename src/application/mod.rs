pub mod tasks;
pub mod translate;
