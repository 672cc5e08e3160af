mod io_utils;
mod reference;
mod util;

pub use io_utils::{create_writer, read_amplicon, read_windowed_table, write_windowed_table};
pub use reference::ReferenceSequence;
pub use util::{fmt_opt, handle_error_and_exit, Result};
