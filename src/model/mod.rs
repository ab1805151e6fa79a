pub mod edge;
pub mod node;
pub mod subflow;
pub mod workflow;

pub use edge::*;
pub use node::*;
pub use subflow::*;
pub use workflow::*;
