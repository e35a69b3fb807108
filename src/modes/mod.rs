pub mod console;
pub mod human;
pub mod prompt;

pub use console::ConsoleMode;
pub use human::HumanMode;
pub use prompt::Prompter;
