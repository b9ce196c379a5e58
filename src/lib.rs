pub mod cogs;
pub mod command;
pub mod config;
pub mod context;
pub mod handler;
pub mod keep_alive;
pub mod lifecycle;
pub mod presence;
pub mod settings;
pub mod storage;
