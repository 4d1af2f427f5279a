pub mod html_file;
pub mod http_pdf;
pub mod template;
pub mod traits;
