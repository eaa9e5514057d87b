pub(crate) mod barcode;
pub(crate) mod brand;
pub(crate) mod nutrition;
pub(crate) mod text;
