pub mod alert;
pub mod event;
pub mod priority;
pub mod responder;
pub mod tags;

pub use alert::*;
pub use event::*;
pub use priority::*;
pub use responder::*;
pub use tags::*;
