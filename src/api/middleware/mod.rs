pub mod resolver;
pub mod tenant;
