pub mod loader;
pub mod util;
