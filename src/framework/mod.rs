// Web framework pieces the handlers lean on: pagination and flash messages

pub mod flash;
pub mod pagination;

pub use flash::{Flash, Level};
pub use pagination::{Page, Paginator};
