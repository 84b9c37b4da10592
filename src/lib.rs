pub mod layout;
pub mod map;
pub mod util;
