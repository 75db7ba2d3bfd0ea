pub mod backends;
pub mod results;

pub use backends::*;
pub use results::{timeline_file_name, write_timeline};

pub mod prelude {
    pub use super::backends::*;
    pub use super::write_timeline;
}
