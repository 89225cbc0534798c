pub(crate) mod files;
pub(crate) mod reader;
