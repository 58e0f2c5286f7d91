pub mod client_ip;
pub mod security_headers;
