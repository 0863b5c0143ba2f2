pub mod flash;
pub mod form;
pub mod page;
pub mod upload;
