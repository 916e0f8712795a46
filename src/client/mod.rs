pub mod dsn;
pub mod models;
pub mod rest;
