pub mod enums;

mod condition;
mod forum;
mod message;
mod notification;
mod symptom;
mod treatment;
mod user;

pub use condition::*;
pub use forum::*;
pub use message::*;
pub use notification::*;
pub use symptom::*;
pub use treatment::*;
pub use user::*;
