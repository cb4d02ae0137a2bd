pub mod config;
pub mod data;
pub mod fetch;
pub mod geo;
pub mod logging;
pub mod markup;
pub mod site;
pub mod views;
