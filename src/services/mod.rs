pub mod catalog_builder;
pub mod search_service;
pub mod translator;
pub mod type_inference;

pub use catalog_builder::*;
pub use search_service::*;
pub use translator::*;
pub use type_inference::*;
