pub mod holdback;
pub mod member;
pub mod members;
pub mod message;
pub mod sequencer;
pub mod tracker;

pub use holdback::*;
pub use member::*;
pub use members::*;
pub use message::*;
pub use sequencer::*;
pub use tracker::*;
