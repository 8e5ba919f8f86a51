pub mod commands;
pub mod images;
pub mod models;
pub mod schedule;
pub mod session;
pub mod storage;
pub mod tui;
