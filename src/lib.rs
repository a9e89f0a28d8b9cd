pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod document;
pub mod logging;
pub mod model;
pub mod output;
pub mod state;
pub mod view;

#[cfg(test)]
mod tests;
