pub mod characters;
pub mod registry;
