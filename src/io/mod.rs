//! Text and binary encodings: WKT and WKB (ISO, reading EWKB too).

mod wkb;
mod wkt;

pub use wkb::{ByteOrder, WkbReader, WkbWriter};
pub use wkt::{WktReader, WktWriter};
