//! Well-known binary, ISO and EWKB flavours.

use crate::error::{GeometryError, Result};
use crate::geom::{
    Geometry, GeometryCollection, LineString, LinearRing, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};
use bytes::{Buf, BufMut, BytesMut};
use planar_types::{CoordinateSequence, Dimension};
use serde::{Deserialize, Serialize};

const EWKB_Z: u32 = 0x8000_0000;
const EWKB_M: u32 = 0x4000_0000;
const EWKB_SRID: u32 = 0x2000_0000;
const EWKB_FLAGS: u32 = EWKB_Z | EWKB_M | EWKB_SRID;

const WKB_POINT: u32 = 1;
const WKB_LINESTRING: u32 = 2;
const WKB_POLYGON: u32 = 3;
const WKB_MULTIPOINT: u32 = 4;
const WKB_MULTILINESTRING: u32 = 5;
const WKB_MULTIPOLYGON: u32 = 6;
const WKB_GEOMETRYCOLLECTION: u32 = 7;

/// Collections nested deeper than this are rejected.
const MAX_DEPTH: usize = 64;

/// Byte order of WKB output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    /// XDR, flag byte 0.
    #[default]
    BigEndian,
    /// NDR, flag byte 1.
    LittleEndian,
}

/// Cursor over the input that remembers where it started.
struct Cursor<'a> {
    buf: &'a [u8],
    len: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            buf: data,
            len: data.len(),
        }
    }

    fn position(&self) -> usize {
        self.len - self.buf.remaining()
    }

    fn require(&self, n: usize, what: &str) -> Result<()> {
        if self.buf.remaining() < n {
            return Err(GeometryError::parse(
                format!("unexpected end of input reading {}", what),
                self.position(),
            ));
        }
        Ok(())
    }

    fn byte_order(&mut self) -> Result<ByteOrder> {
        self.require(1, "byte order")?;
        let at = self.position();
        match self.buf.get_u8() {
            0 => Ok(ByteOrder::BigEndian),
            1 => Ok(ByteOrder::LittleEndian),
            other => Err(GeometryError::parse(
                format!("invalid byte order flag {}", other),
                at,
            )),
        }
    }

    fn u32(&mut self, order: ByteOrder, what: &str) -> Result<u32> {
        self.require(4, what)?;
        Ok(match order {
            ByteOrder::BigEndian => self.buf.get_u32(),
            ByteOrder::LittleEndian => self.buf.get_u32_le(),
        })
    }

    fn f64(&mut self, order: ByteOrder) -> f64 {
        match order {
            ByteOrder::BigEndian => self.buf.get_f64(),
            ByteOrder::LittleEndian => self.buf.get_f64_le(),
        }
    }

    /// A count followed by that many items of `item_size` bytes at least.
    fn count(&mut self, order: ByteOrder, item_size: usize, what: &str) -> Result<usize> {
        let at = self.position();
        let n = self.u32(order, what)? as usize;
        if n.saturating_mul(item_size) > self.buf.remaining() {
            return Err(GeometryError::parse(
                format!("{} count {} exceeds the remaining input", what, n),
                at,
            ));
        }
        Ok(n)
    }
}

/// Decoded geometry header.
struct Header {
    order: ByteOrder,
    kind: u32,
    dim: Dimension,
}

/// Reads WKB.
///
/// # Examples
///
/// ```
/// use planar::io::WkbReader;
///
/// let g = WkbReader::new()
///     .read_hex("0101000000000000000000F03F0000000000000040")
///     .unwrap();
/// assert_eq!(g.coordinate().unwrap().x, 1.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WkbReader;

impl WkbReader {
    pub fn new() -> Self {
        Self
    }

    /// # Errors
    ///
    /// `Parse` with the byte offset of the problem for truncated or
    /// malformed input, `InvalidGeometry` when a constructor rejects the
    /// decoded coordinates.
    pub fn read(&self, data: &[u8]) -> Result<Geometry> {
        let mut cursor = Cursor::new(data);
        let geometry = read_geometry(&mut cursor, 0)?;
        if cursor.buf.has_remaining() {
            return Err(GeometryError::parse(
                format!("{} trailing bytes after geometry", cursor.buf.remaining()),
                cursor.position(),
            ));
        }
        Ok(geometry)
    }

    /// Read hex-encoded WKB; case-insensitive.
    pub fn read_hex(&self, hex: &str) -> Result<Geometry> {
        self.read(&decode_hex(hex)?)
    }
}

fn decode_hex(hex: &str) -> Result<Vec<u8>> {
    let digits: Vec<char> = hex.trim().chars().collect();
    if digits.len() % 2 != 0 {
        return Err(GeometryError::parse(
            "hex input has an odd number of digits",
            digits.len(),
        ));
    }
    digits
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| -> Result<u8> {
            let digit = |offset: usize| -> Result<u32> {
                pair[offset].to_digit(16).ok_or_else(|| {
                    GeometryError::parse(
                        format!("invalid hex digit '{}'", pair[offset]),
                        2 * i + offset,
                    )
                })
            };
            Ok((digit(0)? * 16 + digit(1)?) as u8)
        })
        .collect()
}

fn read_header(cursor: &mut Cursor<'_>) -> Result<Header> {
    let order = cursor.byte_order()?;
    let at = cursor.position();
    let code = cursor.u32(order, "geometry type")?;

    let mut has_z = code & EWKB_Z != 0;
    let mut has_m = code & EWKB_M != 0;
    if code & EWKB_SRID != 0 {
        let srid = cursor.u32(order, "SRID")?;
        log::debug!("Ignoring EWKB SRID {}", srid);
    }
    let base = code & !EWKB_FLAGS;
    match base / 1000 {
        0 => {}
        1 => has_z = true,
        2 => has_m = true,
        3 => {
            has_z = true;
            has_m = true;
        }
        _ => {
            return Err(GeometryError::parse(
                format!("unknown geometry type code {}", code),
                at,
            ));
        }
    }
    let kind = base % 1000;
    if !(WKB_POINT..=WKB_GEOMETRYCOLLECTION).contains(&kind) {
        return Err(GeometryError::parse(
            format!("unknown geometry type code {}", code),
            at,
        ));
    }
    Ok(Header {
        order,
        kind,
        dim: Dimension::from_flags(has_z, has_m),
    })
}

fn read_coordinates(
    cursor: &mut Cursor<'_>,
    header: &Header,
    n: usize,
) -> Result<CoordinateSequence> {
    let stride = header.dim.ordinates();
    cursor.require(n * stride * 8, "coordinates")?;
    let ordinates: Vec<f64> = (0..n * stride).map(|_| cursor.f64(header.order)).collect();
    CoordinateSequence::from_ordinates(header.dim, ordinates).ok_or_else(|| {
        GeometryError::parse("inconsistent ordinate count", cursor.position())
    })
}

fn read_sequence(cursor: &mut Cursor<'_>, header: &Header) -> Result<CoordinateSequence> {
    let n = cursor.count(header.order, header.dim.ordinates() * 8, "point")?;
    read_coordinates(cursor, header, n)
}

fn read_polygon(cursor: &mut Cursor<'_>, header: &Header) -> Result<Polygon> {
    let rings = cursor.count(header.order, 4, "ring")?;
    if rings == 0 {
        return Ok(Polygon::empty(header.dim));
    }
    let mut parsed = Vec::with_capacity(rings);
    for _ in 0..rings {
        parsed.push(LinearRing::new(read_sequence(cursor, header)?)?);
    }
    let shell = parsed.remove(0);
    Polygon::new(shell, parsed)
}

/// Members of a multi-geometry, each with its own header of type `kind`.
fn read_members(
    cursor: &mut Cursor<'_>,
    header: &Header,
    kind: u32,
    depth: usize,
) -> Result<Vec<Geometry>> {
    let n = cursor.count(header.order, 5, "member")?;
    let mut members = Vec::with_capacity(n);
    for _ in 0..n {
        let at = cursor.position();
        let member = read_geometry(cursor, depth + 1)?;
        let code = match &member {
            Geometry::Point(_) => WKB_POINT,
            Geometry::LineString(_) => WKB_LINESTRING,
            Geometry::Polygon(_) => WKB_POLYGON,
            _ => 0,
        };
        if kind != 0 && code != kind {
            return Err(GeometryError::parse(
                format!(
                    "unexpected {} inside a multi-geometry",
                    member.geometry_type()
                ),
                at,
            ));
        }
        members.push(member);
    }
    Ok(members)
}

fn read_geometry(cursor: &mut Cursor<'_>, depth: usize) -> Result<Geometry> {
    if depth > MAX_DEPTH {
        return Err(GeometryError::parse(
            "collections nested too deeply",
            cursor.position(),
        ));
    }
    let header = read_header(cursor)?;
    let geometry = match header.kind {
        WKB_POINT => {
            let seq = read_coordinates(cursor, &header, 1)?;
            if seq.as_ordinates()[..2].iter().all(|v| v.is_nan()) {
                Geometry::Point(Point::empty(header.dim))
            } else {
                Geometry::Point(Point::from_sequence(seq)?)
            }
        }
        WKB_LINESTRING => Geometry::LineString(LineString::new(read_sequence(cursor, &header)?)?),
        WKB_POLYGON => Geometry::Polygon(read_polygon(cursor, &header)?),
        WKB_MULTIPOINT => Geometry::MultiPoint(MultiPoint::new(
            read_members(cursor, &header, WKB_POINT, depth)?
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::Point(p) => Some(p),
                    _ => None,
                })
                .collect(),
        )),
        WKB_MULTILINESTRING => Geometry::MultiLineString(MultiLineString::new(
            read_members(cursor, &header, WKB_LINESTRING, depth)?
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::LineString(l) => Some(l),
                    _ => None,
                })
                .collect(),
        )),
        WKB_MULTIPOLYGON => Geometry::MultiPolygon(MultiPolygon::new(
            read_members(cursor, &header, WKB_POLYGON, depth)?
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::Polygon(p) => Some(p),
                    _ => None,
                })
                .collect(),
        )),
        _ => Geometry::GeometryCollection(GeometryCollection::new(read_members(
            cursor, &header, 0, depth,
        )?)),
    };
    Ok(geometry)
}

/// Writes ISO WKB.
///
/// The output dimension is that of the first non-empty coordinate sequence;
/// linear rings are written as line strings.
///
/// # Examples
///
/// ```
/// use planar::io::{ByteOrder, WkbReader, WkbWriter, WktReader};
///
/// let point = WktReader::new().read("POINT (1 2)").unwrap();
/// let writer = WkbWriter::new();
/// assert_eq!(writer.write_hex(&point), "00000000013FF00000000000004000000000000000");
///
/// let little = writer.with_byte_order(ByteOrder::LittleEndian).write(&point);
/// assert_eq!(little[0], 1);
/// assert_eq!(WkbReader::new().read(&little).unwrap(), point);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WkbWriter {
    byte_order: ByteOrder,
}

impl WkbWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn write(&self, geometry: &Geometry) -> Vec<u8> {
        let dim = geometry.coordinate_dimension();
        let mut buf = BytesMut::with_capacity(9 + geometry.num_points() * dim.ordinates() * 8);
        self.put_geometry(&mut buf, geometry, dim);
        buf.to_vec()
    }

    /// Upper-case hex of [`WkbWriter::write`].
    pub fn write_hex(&self, geometry: &Geometry) -> String {
        use std::fmt::Write;
        let bytes = self.write(geometry);
        let mut out = String::with_capacity(bytes.len() * 2);
        for b in bytes {
            let _ = write!(out, "{:02X}", b);
        }
        out
    }

    fn put_u32(&self, buf: &mut BytesMut, v: u32) {
        match self.byte_order {
            ByteOrder::BigEndian => buf.put_u32(v),
            ByteOrder::LittleEndian => buf.put_u32_le(v),
        }
    }

    fn put_f64(&self, buf: &mut BytesMut, v: f64) {
        match self.byte_order {
            ByteOrder::BigEndian => buf.put_f64(v),
            ByteOrder::LittleEndian => buf.put_f64_le(v),
        }
    }

    fn put_header(&self, buf: &mut BytesMut, kind: u32, dim: Dimension) {
        buf.put_u8(match self.byte_order {
            ByteOrder::BigEndian => 0,
            ByteOrder::LittleEndian => 1,
        });
        let offset = match dim {
            Dimension::Xy => 0,
            Dimension::Xyz => 1000,
            Dimension::Xym => 2000,
            Dimension::Xyzm => 3000,
        };
        self.put_u32(buf, kind + offset);
    }

    fn put_coordinates(&self, buf: &mut BytesMut, seq: &CoordinateSequence, dim: Dimension) {
        for c in seq.iter() {
            self.put_f64(buf, c.x);
            self.put_f64(buf, c.y);
            if dim.has_z() {
                self.put_f64(buf, c.z.unwrap_or(f64::NAN));
            }
            if dim.has_m() {
                self.put_f64(buf, c.m.unwrap_or(f64::NAN));
            }
        }
    }

    fn put_sequence(&self, buf: &mut BytesMut, seq: &CoordinateSequence, dim: Dimension) {
        self.put_u32(buf, seq.len() as u32);
        self.put_coordinates(buf, seq, dim);
    }

    fn put_polygon(&self, buf: &mut BytesMut, polygon: &Polygon, dim: Dimension) {
        self.put_header(buf, WKB_POLYGON, dim);
        if polygon.is_empty() {
            self.put_u32(buf, 0);
            return;
        }
        self.put_u32(buf, 1 + polygon.num_interior_rings() as u32);
        for ring in polygon.rings() {
            self.put_sequence(buf, ring.sequence(), dim);
        }
    }

    fn put_geometry(&self, buf: &mut BytesMut, geometry: &Geometry, dim: Dimension) {
        match geometry {
            Geometry::Point(p) => {
                self.put_header(buf, WKB_POINT, dim);
                if p.is_empty() {
                    for _ in 0..dim.ordinates() {
                        self.put_f64(buf, f64::NAN);
                    }
                } else {
                    self.put_coordinates(buf, p.sequence(), dim);
                }
            }
            Geometry::LineString(l) => {
                self.put_header(buf, WKB_LINESTRING, dim);
                self.put_sequence(buf, l.sequence(), dim);
            }
            Geometry::LinearRing(r) => {
                self.put_header(buf, WKB_LINESTRING, dim);
                self.put_sequence(buf, r.sequence(), dim);
            }
            Geometry::Polygon(p) => self.put_polygon(buf, p, dim),
            Geometry::MultiPoint(m) => {
                self.put_header(buf, WKB_MULTIPOINT, dim);
                self.put_u32(buf, m.points().len() as u32);
                for p in m.points() {
                    self.put_geometry(buf, &Geometry::Point(p.clone()), dim);
                }
            }
            Geometry::MultiLineString(m) => {
                self.put_header(buf, WKB_MULTILINESTRING, dim);
                self.put_u32(buf, m.lines().len() as u32);
                for l in m.lines() {
                    self.put_header(buf, WKB_LINESTRING, dim);
                    self.put_sequence(buf, l.sequence(), dim);
                }
            }
            Geometry::MultiPolygon(m) => {
                self.put_header(buf, WKB_MULTIPOLYGON, dim);
                self.put_u32(buf, m.polygons().len() as u32);
                for p in m.polygons() {
                    self.put_polygon(buf, p, dim);
                }
            }
            Geometry::GeometryCollection(gc) => {
                self.put_header(buf, WKB_GEOMETRYCOLLECTION, dim);
                self.put_u32(buf, gc.geometries().len() as u32);
                for g in gc.geometries() {
                    self.put_geometry(buf, g, dim);
                }
            }
        }
    }
}
