mod list;
mod lookup;
mod reload;
mod root;

pub use root::Cli;
