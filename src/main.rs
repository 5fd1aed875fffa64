mod cli;
mod commands;
mod constants;
mod error;
mod models;
mod server;
mod services;
mod utils;

fn main() {
    cli::run();
}
