pub(crate) mod bitmap;
pub(crate) mod cache;
pub(crate) mod composite;
pub(crate) mod fallback;
pub(crate) mod geometry;
pub(crate) mod rasterize;
pub(crate) mod renderer;
pub(crate) mod surface;
