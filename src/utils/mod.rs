pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{file_url, filename_from_url, is_valid_server_url, merchant_folder_url, server_root};
