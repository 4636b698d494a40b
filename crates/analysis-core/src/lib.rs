pub mod error;
pub mod ticker;
pub mod traits;
pub mod types;

pub use error::*;
pub use ticker::*;
pub use traits::*;
pub use types::*;
