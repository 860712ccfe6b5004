pub(crate) mod cache;
pub(crate) mod decode;
pub(crate) mod images;
pub(crate) mod source;
pub(crate) mod texture;
