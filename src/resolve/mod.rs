pub(crate) mod references;
pub(crate) mod traverse;
