pub(crate) mod asset;
pub(crate) mod document;
pub(crate) mod factory;
pub(crate) mod layer;
pub(crate) mod materialize;
pub(crate) mod raw;
