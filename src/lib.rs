pub mod catalog;
pub mod config;
pub mod db;
pub mod defaults;
pub mod environment;
pub mod errors;
pub mod normalization;
pub mod registry;
pub mod routes;
pub mod sound;
pub mod urls;
pub mod user;
