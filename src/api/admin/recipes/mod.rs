pub mod create;
pub mod delete;
pub mod manage;
pub mod update;
