pub mod integrations;
pub mod report;
pub mod server;
pub mod services;
pub mod version;
pub mod web;
