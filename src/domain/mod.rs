// Domain layer - Core editor logic

pub mod document;
pub mod edl;
pub mod errors;
pub mod model;
pub mod registry;
pub mod routes;
pub mod session;
