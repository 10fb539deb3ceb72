pub mod client;
pub mod config;
pub mod controller;
pub mod handler;
pub mod model;
pub mod repository;
pub mod service;
