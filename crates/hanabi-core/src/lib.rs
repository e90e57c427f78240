pub mod ambient;
pub mod clock;
pub mod config;
pub mod constants;
pub mod duration;
pub mod entity;
pub mod error;
pub mod motion;
pub mod placement;
pub mod scheduler;
pub mod selection;
pub mod session;
pub mod show;

pub use ambient::*;
pub use clock::*;
pub use config::*;
pub use duration::*;
pub use entity::*;
pub use error::*;
pub use motion::*;
pub use placement::*;
pub use scheduler::*;
pub use selection::*;
pub use session::*;
pub use show::*;
