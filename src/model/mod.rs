pub mod artifact;
pub mod category;
pub mod definition;
pub mod flow;

pub use category::*;
pub use definition::*;
pub use flow::*;
