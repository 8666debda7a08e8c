pub mod catalog;
pub mod command;
pub mod session;
pub mod state;

pub use command::{Command, CommandError, Flow};
pub use state::{Console, ConsoleState, Notice, NoticeLevel, Services, SessionStatus};
