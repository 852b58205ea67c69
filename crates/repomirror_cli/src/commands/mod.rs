pub(crate) mod meta;
pub(crate) mod migrate;
pub(crate) mod repo;
pub(crate) mod sync;
