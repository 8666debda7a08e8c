pub mod cookie_jar;
pub mod hex_api;

pub use cookie_jar::CookieJar;
pub use hex_api::HexApiAdapter;
