pub mod alteration;
pub mod resource;
