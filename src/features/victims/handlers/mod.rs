mod victim_handler;

pub use victim_handler::*;
