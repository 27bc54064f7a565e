pub mod app;
pub mod cli;
pub mod pages;
pub mod shell;
