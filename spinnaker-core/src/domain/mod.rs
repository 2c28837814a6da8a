//! Domain types shared by the client and the provider

pub mod pipeline;
pub mod template;
