pub(crate) mod model;
pub(crate) mod narrative;
pub(crate) mod template;
