#[path = "builder/backend.rs"]
mod backend;

#[path = "builder/client_builder.rs"]
mod client_builder;

pub use backend::Provider;
pub use client_builder::ClientBuilder;
