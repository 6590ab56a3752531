pub mod api;
pub mod book;
pub mod components;
pub mod manager;
