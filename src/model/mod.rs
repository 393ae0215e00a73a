pub mod config;
pub mod segment;
pub mod token;
pub mod user;
pub mod workspace;

pub use config::*;
pub use segment::*;
pub use token::*;
pub use user::*;
pub use workspace::*;
