/*-------------------------------------------------------------------------------------------------
  Command Line Interface (CLI) Modules
-------------------------------------------------------------------------------------------------*/

mod args;
mod core;

pub mod csv;
pub mod log;
pub mod output;

/*--------------------------------------------------------------------------------------
  CLI Module Interface
--------------------------------------------------------------------------------------*/

pub use args::{Args, Command, OutputFormat};
pub use self::core::{get_inventory, report_options};
