pub mod edit;
pub mod list;
pub mod outline;
pub mod parser;
