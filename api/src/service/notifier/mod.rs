mod contact;

pub use self::contact::*;
