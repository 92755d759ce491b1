pub(crate) mod image_gen;
pub(crate) mod prompt;
pub(crate) mod resources;
