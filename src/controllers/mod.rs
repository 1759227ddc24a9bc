pub mod config;
pub mod health;
pub mod journal;
pub mod output;
pub mod production;
