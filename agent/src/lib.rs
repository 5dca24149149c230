pub mod blend;
pub mod depth_agent;
pub mod learned_agent;
pub mod opening_book;
pub mod options;
pub mod reward;

pub use blend::*;
pub use depth_agent::*;
pub use learned_agent::*;
pub use opening_book::*;
pub use options::*;
pub use reward::*;
