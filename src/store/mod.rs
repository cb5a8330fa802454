pub(crate) mod convert;
pub(crate) mod measure;
pub(crate) mod presentation;
pub(crate) mod slide_store;
