mod access_token_data;

pub use self::access_token_data::*;
