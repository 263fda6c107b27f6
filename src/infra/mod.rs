pub mod http_email;
pub mod smtp_email;
pub mod sqlite;
pub mod text_sink;
