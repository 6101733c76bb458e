mod combat_event;
mod error;
mod parser;
mod reader;

pub use combat_event::*;
pub use error::{ParseError, ReaderError};
pub use parser::EventParser;
pub use reader::Reader;
