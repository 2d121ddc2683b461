pub mod databatch;
pub mod csv_reader;

pub use databatch::*;
pub use csv_reader::*;
