pub mod app;
pub mod branding;
pub mod config;
pub mod detection;
pub mod dto;
pub mod handler;
pub mod middlewares;
pub mod model;
pub mod render;
pub mod repository;
pub mod router;
pub mod service;
pub mod util;
