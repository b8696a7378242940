pub(crate) mod camera;
pub(crate) mod color;
pub(crate) mod model;
pub(crate) mod style;
