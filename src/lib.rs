//! Planar geometry engine: overlay, buffering, DE-9IM predicates, STR-tree
//! indexing and WKT/WKB codecs.
//!
//! ```rust
//! use planar::io::{WktReader, WktWriter};
//!
//! let reader = WktReader::new();
//! let a = reader.read("POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))")?;
//! let b = reader.read("POLYGON ((5 5, 15 5, 15 15, 5 15, 5 5))")?;
//!
//! let shared = a.intersection(&b)?;
//! assert_eq!(shared.area(), 25.0);
//! assert!(a.overlaps(&b)?);
//! assert_eq!(a.relate(&b)?.to_string(), "212101212");
//!
//! let text = WktWriter::new().write(&a.envelope_geometry());
//! assert_eq!(text, "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))");
//! # Ok::<(), planar::GeometryError>(())
//! ```

pub mod algorithm;
pub mod buffer;
pub mod builder;
pub mod config;
pub mod convert;
pub mod error;
pub mod factory;
pub mod geom;
pub mod index;
pub mod io;
pub mod linemerge;
pub mod overlay;
pub mod prepared;
pub mod relate;

pub use builder::FactoryBuilder;
pub use config::Config;
pub use error::{GeometryError, Result};
pub use factory::GeometryFactory;

pub use geom::{
    Dim, Geometry, GeometryCollection, GeometryType, LineString, LinearRing, MultiLineString,
    MultiPoint, MultiPolygon, Point, Polygon,
};

pub use planar_types::{Coord, Coordinate, CoordinateSequence, Dimension, Envelope};

pub use algorithm::Location;
pub use buffer::{BufferParameters, EndCapStyle, JoinStyle};
pub use index::StrTree;
#[cfg(feature = "sync")]
pub use index::SyncStrTree;
pub use io::{ByteOrder, WkbReader, WkbWriter, WktReader, WktWriter};
pub use linemerge::LineMerger;
pub use overlay::{CascadedPolygonUnion, OverlayOp};
pub use prepared::{PreparedGeometry, PreparedGeometryFactory};
pub use relate::IntersectionMatrix;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{FactoryBuilder, GeometryError, GeometryFactory, Result};

    pub use crate::{Coord, Coordinate, Dimension, Envelope};

    pub use crate::{Geometry, LineString, LinearRing, Point, Polygon};

    pub use crate::{BufferParameters, Config, EndCapStyle, JoinStyle};

    pub use crate::{WkbReader, WkbWriter, WktReader, WktWriter};

    pub use crate::{PreparedGeometryFactory, StrTree};
}
