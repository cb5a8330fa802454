pub(crate) mod deck;
pub(crate) mod fonts;
pub(crate) mod raster;
