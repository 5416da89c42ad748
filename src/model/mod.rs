pub mod canvas;
pub mod connection;
pub mod mininode;
pub mod node;
pub mod state;

pub use canvas::*;
pub use connection::*;
pub use mininode::*;
pub use node::*;
pub use state::*;
