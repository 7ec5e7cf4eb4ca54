//! Well-known text.

use crate::error::{GeometryError, Result};
use crate::geom::{
    Geometry, GeometryCollection, LineString, LinearRing, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};
use planar_types::{CoordinateSequence, Dimension};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Number(f64),
    LParen,
    RParen,
    Comma,
    End,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Word(w) => format!("'{}'", w),
            Token::Number(n) => format!("number {}", n),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Comma => "','".to_string(),
            Token::End => "end of input".to_string(),
        }
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    /// Ordinate layout of the geometry being read, once known.
    dim: Option<Dimension>,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            dim: None,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.chars.len() && self.chars[self.pos].is_whitespace() {
            self.pos += 1;
        }
    }

    /// Next token and the character offset it starts at.
    fn next(&mut self) -> Result<(Token, usize)> {
        self.skip_whitespace();
        let start = self.pos;
        let Some(&c) = self.chars.get(self.pos) else {
            return Ok((Token::End, start));
        };
        let token = match c {
            '(' => {
                self.pos += 1;
                Token::LParen
            }
            ')' => {
                self.pos += 1;
                Token::RParen
            }
            ',' => {
                self.pos += 1;
                Token::Comma
            }
            c if c.is_ascii_alphabetic() => {
                while self.pos < self.chars.len() && self.chars[self.pos].is_ascii_alphanumeric() {
                    self.pos += 1;
                }
                Token::Word(self.chars[start..self.pos].iter().collect())
            }
            c if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => {
                self.pos += 1;
                while self.pos < self.chars.len() {
                    let d = self.chars[self.pos];
                    let exponent_sign = matches!(d, '-' | '+')
                        && matches!(self.chars[self.pos - 1], 'e' | 'E');
                    if d.is_ascii_digit() || matches!(d, '.' | 'e' | 'E') || exponent_sign {
                        self.pos += 1;
                    } else {
                        break;
                    }
                }
                let text: String = self.chars[start..self.pos].iter().collect();
                let value = text.parse::<f64>().map_err(|_| {
                    GeometryError::parse(format!("invalid number '{}'", text), start)
                })?;
                Token::Number(value)
            }
            other => {
                return Err(GeometryError::parse(
                    format!("unexpected character '{}'", other),
                    start,
                ));
            }
        };
        Ok((token, start))
    }

    fn peek(&mut self) -> Result<(Token, usize)> {
        let saved = self.pos;
        let token = self.next();
        self.pos = saved;
        token
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        let (token, at) = self.next()?;
        if token == expected {
            Ok(())
        } else {
            Err(GeometryError::parse(
                format!(
                    "expected {} but found {}",
                    expected.describe(),
                    token.describe()
                ),
                at,
            ))
        }
    }

    /// Consume `EMPTY` if it comes next.
    fn try_empty(&mut self) -> Result<bool> {
        if let (Token::Word(w), _) = self.peek()? {
            if w.eq_ignore_ascii_case("EMPTY") {
                self.next()?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Consume a `Z`, `M` or `ZM` dimension tag if it comes next.
    fn dimension_tag(&mut self) -> Result<Option<Dimension>> {
        if let (Token::Word(w), _) = self.peek()? {
            let dim = match w.to_ascii_uppercase().as_str() {
                "Z" => Dimension::Xyz,
                "M" => Dimension::Xym,
                "ZM" => Dimension::Xyzm,
                _ => return Ok(None),
            };
            self.next()?;
            return Ok(Some(dim));
        }
        Ok(None)
    }

    fn empty_sequence(&self) -> CoordinateSequence {
        CoordinateSequence::new(self.dim.unwrap_or_default())
    }

    /// One coordinate's ordinates, appended to `out`.
    fn coordinate(&mut self, out: &mut Vec<f64>) -> Result<()> {
        let (_, start) = self.peek()?;
        let mut count = 0;
        while let (Token::Number(_), _) = self.peek()? {
            if let (Token::Number(v), _) = self.next()? {
                out.push(v);
                count += 1;
            }
        }
        let (token, at) = self.peek()?;
        if count == 0 || !matches!(token, Token::Comma | Token::RParen) {
            return Err(GeometryError::parse(
                format!("expected a number but found {}", token.describe()),
                at,
            ));
        }
        match self.dim {
            Some(dim) if dim.ordinates() != count => Err(GeometryError::parse(
                format!("expected {} ordinates but found {}", dim.ordinates(), count),
                start,
            )),
            Some(_) => Ok(()),
            None => {
                self.dim = Some(match count {
                    2 => Dimension::Xy,
                    3 => Dimension::Xyz,
                    4 => Dimension::Xyzm,
                    n => {
                        return Err(GeometryError::parse(
                            format!("a coordinate needs 2 to 4 ordinates, found {}", n),
                            start,
                        ));
                    }
                });
                Ok(())
            }
        }
    }

    fn finish_sequence(&self, ordinates: Vec<f64>, at: usize) -> Result<CoordinateSequence> {
        CoordinateSequence::from_ordinates(self.dim.unwrap_or_default(), ordinates)
            .ok_or_else(|| GeometryError::parse("inconsistent ordinate count", at))
    }

    /// `( x y, x y, ... )` or `EMPTY`.
    fn sequence(&mut self) -> Result<CoordinateSequence> {
        if self.try_empty()? {
            return Ok(self.empty_sequence());
        }
        let (_, at) = self.peek()?;
        self.expect(Token::LParen)?;
        let mut ordinates = Vec::new();
        loop {
            self.coordinate(&mut ordinates)?;
            let (token, pos) = self.next()?;
            match token {
                Token::Comma => continue,
                Token::RParen => break,
                other => {
                    return Err(GeometryError::parse(
                        format!("expected ',' or ')' but found {}", other.describe()),
                        pos,
                    ));
                }
            }
        }
        self.finish_sequence(ordinates, at)
    }

    /// Comma-separated items between parentheses.
    fn list<T>(&mut self, mut item: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        self.expect(Token::LParen)?;
        let mut items = vec![item(self)?];
        loop {
            let (token, pos) = self.next()?;
            match token {
                Token::Comma => items.push(item(self)?),
                Token::RParen => return Ok(items),
                other => {
                    return Err(GeometryError::parse(
                        format!("expected ',' or ')' but found {}", other.describe()),
                        pos,
                    ));
                }
            }
        }
    }

    fn polygon_body(&mut self) -> Result<Polygon> {
        if self.try_empty()? {
            return Ok(Polygon::empty(self.dim.unwrap_or_default()));
        }
        let rings = self.list(|p| p.sequence().and_then(LinearRing::new))?;
        let mut rings = rings.into_iter();
        let shell = rings.next().unwrap_or_else(|| LinearRing::empty(Dimension::Xy));
        Polygon::new(shell, rings.collect())
    }

    /// A MULTIPOINT member: `(x y)`, bare `x y` or `EMPTY`.
    fn multi_point_member(&mut self) -> Result<Point> {
        if self.try_empty()? {
            return Ok(Point::empty(self.dim.unwrap_or_default()));
        }
        if let (Token::LParen, _) = self.peek()? {
            return Point::from_sequence(self.sequence()?);
        }
        let (_, at) = self.peek()?;
        let mut ordinates = Vec::new();
        self.coordinate(&mut ordinates)?;
        Point::from_sequence(self.finish_sequence(ordinates, at)?)
    }

    fn geometry(&mut self, inherited: Option<Dimension>) -> Result<Geometry> {
        let (token, at) = self.next()?;
        let Token::Word(name) = token else {
            return Err(GeometryError::parse(
                format!("expected a geometry type but found {}", token.describe()),
                at,
            ));
        };
        let saved = self.dim;
        self.dim = self.dimension_tag()?.or(inherited);
        let tag = self.dim;

        let geometry = match name.to_ascii_uppercase().as_str() {
            "POINT" => Geometry::Point(Point::from_sequence(self.sequence()?)?),
            "LINESTRING" => Geometry::LineString(LineString::new(self.sequence()?)?),
            "LINEARRING" => Geometry::LinearRing(LinearRing::new(self.sequence()?)?),
            "POLYGON" => Geometry::Polygon(self.polygon_body()?),
            "MULTIPOINT" => {
                let points = if self.try_empty()? {
                    Vec::new()
                } else {
                    self.list(Self::multi_point_member)?
                };
                Geometry::MultiPoint(MultiPoint::new(points))
            }
            "MULTILINESTRING" => {
                let lines = if self.try_empty()? {
                    Vec::new()
                } else {
                    self.list(|p| p.sequence().and_then(LineString::new))?
                };
                Geometry::MultiLineString(MultiLineString::new(lines))
            }
            "MULTIPOLYGON" => {
                let polygons = if self.try_empty()? {
                    Vec::new()
                } else {
                    self.list(Self::polygon_body)?
                };
                Geometry::MultiPolygon(MultiPolygon::new(polygons))
            }
            "GEOMETRYCOLLECTION" => {
                let members = if self.try_empty()? {
                    Vec::new()
                } else {
                    // members infer their own layout unless the collection is tagged
                    self.list(|p| {
                        p.dim = tag;
                        p.geometry(tag)
                    })?
                };
                Geometry::GeometryCollection(GeometryCollection::new(members))
            }
            _ => {
                return Err(GeometryError::parse(
                    format!("unknown geometry type '{}'", name),
                    at,
                ));
            }
        };
        self.dim = saved;
        Ok(geometry)
    }
}

/// Parses WKT text.
///
/// # Examples
///
/// ```
/// use planar::io::WktReader;
///
/// let reader = WktReader::new();
/// let g = reader.read("multipoint (1 2, 3 4)").unwrap();
/// assert_eq!(g.num_geometries(), 2);
///
/// let err = reader.read("POINT (1 2").unwrap_err();
/// assert!(err.to_string().contains("position 10"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WktReader;

impl WktReader {
    pub fn new() -> Self {
        Self
    }

    /// # Errors
    ///
    /// `Parse` for malformed text (the position is a character offset),
    /// `InvalidGeometry` when the text is well formed but a constructor
    /// rejects it (an open ring, a one-point line).
    pub fn read(&self, wkt: &str) -> Result<Geometry> {
        let mut parser = Parser::new(wkt);
        let geometry = parser.geometry(None)?;
        let (token, at) = parser.next()?;
        if token != Token::End {
            return Err(GeometryError::parse(
                format!("unexpected {} after geometry", token.describe()),
                at,
            ));
        }
        Ok(geometry)
    }
}

/// Magnitudes written in exponent notation.
const EXPONENT_ABOVE: f64 = 1e16;
const EXPONENT_BELOW: f64 = 1e-6;

/// Formats geometries as WKT.
///
/// Numbers use the shortest text that reads back to the same value unless a
/// fixed number of decimals is requested. Very large and very small
/// magnitudes are written with an exponent.
///
/// # Examples
///
/// ```
/// use planar::io::{WktReader, WktWriter};
///
/// let g = WktReader::new().read("POINT Z (1.5 2 3)").unwrap();
/// assert_eq!(WktWriter::new().write(&g), "POINT Z (1.5 2 3)");
///
/// let g = WktReader::new().read("POINT (0.123456 2)").unwrap();
/// assert_eq!(WktWriter::new().with_precision(2).write(&g), "POINT (0.12 2)");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WktWriter {
    precision: Option<usize>,
}

impl WktWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Round ordinates to `decimals` places, dropping trailing zeros.
    pub fn with_precision(mut self, decimals: usize) -> Self {
        self.precision = Some(decimals);
        self
    }

    pub fn precision(&self) -> Option<usize> {
        self.precision
    }

    pub fn write(&self, geometry: &Geometry) -> String {
        let mut out = String::new();
        let dim = geometry.coordinate_dimension();
        self.write_geometry(geometry, dim, true, &mut out);
        out
    }

    fn number(&self, value: f64, out: &mut String) {
        // no negative zero in output
        let value = if value == 0.0 { 0.0 } else { value };
        let magnitude = value.abs();
        let tiny = self.precision.is_none() && magnitude < EXPONENT_BELOW;
        if value != 0.0 && magnitude.is_finite() && (magnitude >= EXPONENT_ABOVE || tiny) {
            let _ = write!(out, "{:e}", value);
            return;
        }
        match self.precision {
            None => {
                let _ = write!(out, "{}", value);
            }
            Some(decimals) => {
                let mut text = format!("{:.*}", decimals, value);
                if text.contains('.') {
                    let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
                    text.truncate(trimmed);
                }
                if text == "-0" {
                    text = "0".to_string();
                }
                out.push_str(&text);
            }
        }
    }

    fn sequence(&self, seq: &CoordinateSequence, dim: Dimension, out: &mut String) {
        if seq.is_empty() {
            out.push_str("EMPTY");
            return;
        }
        out.push('(');
        for (i, c) in seq.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.number(c.x, out);
            out.push(' ');
            self.number(c.y, out);
            if dim.has_z() {
                out.push(' ');
                self.number(c.z.unwrap_or(f64::NAN), out);
            }
            if dim.has_m() {
                out.push(' ');
                self.number(c.m.unwrap_or(f64::NAN), out);
            }
        }
        out.push(')');
    }

    fn polygon(&self, polygon: &Polygon, dim: Dimension, out: &mut String) {
        if polygon.is_empty() {
            out.push_str("EMPTY");
            return;
        }
        out.push('(');
        for (i, ring) in polygon.rings().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.sequence(ring.sequence(), dim, out);
        }
        out.push(')');
    }

    fn members<T>(&self, items: &[T], out: &mut String, mut each: impl FnMut(&T, &mut String)) {
        if items.is_empty() {
            out.push_str("EMPTY");
            return;
        }
        out.push('(');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            each(item, out);
        }
        out.push(')');
    }

    fn write_geometry(&self, geometry: &Geometry, dim: Dimension, top: bool, out: &mut String) {
        out.push_str(&geometry.geometry_type().name().to_ascii_uppercase());
        if top {
            match dim {
                Dimension::Xy => {}
                Dimension::Xyz => out.push_str(" Z"),
                Dimension::Xym => out.push_str(" M"),
                Dimension::Xyzm => out.push_str(" ZM"),
            }
        }
        out.push(' ');
        match geometry {
            Geometry::Point(p) => self.sequence(p.sequence(), dim, out),
            Geometry::LineString(l) => self.sequence(l.sequence(), dim, out),
            Geometry::LinearRing(r) => self.sequence(r.sequence(), dim, out),
            Geometry::Polygon(p) => self.polygon(p, dim, out),
            Geometry::MultiPoint(m) => {
                self.members(m.points(), out, |p, out| self.sequence(p.sequence(), dim, out))
            }
            Geometry::MultiLineString(m) => {
                self.members(m.lines(), out, |l, out| self.sequence(l.sequence(), dim, out))
            }
            Geometry::MultiPolygon(m) => {
                self.members(m.polygons(), out, |p, out| self.polygon(p, dim, out))
            }
            Geometry::GeometryCollection(gc) => self.members(gc.geometries(), out, |g, out| {
                self.write_geometry(g, dim, false, out)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::GeometryType;

    fn roundtrip(wkt: &str) -> String {
        WktWriter::new().write(&WktReader::new().read(wkt).unwrap())
    }

    #[test]
    fn test_reads_every_type() {
        let reader = WktReader::new();
        let cases = [
            ("POINT (1 2)", GeometryType::Point),
            ("LINESTRING (0 0, 1 1)", GeometryType::LineString),
            ("LINEARRING (0 0, 1 0, 1 1, 0 0)", GeometryType::LinearRing),
            ("POLYGON ((0 0, 1 0, 1 1, 0 0))", GeometryType::Polygon),
            ("MULTIPOINT ((0 0), (1 1))", GeometryType::MultiPoint),
            ("MULTILINESTRING ((0 0, 1 1), (2 2, 3 3))", GeometryType::MultiLineString),
            ("MULTIPOLYGON (((0 0, 1 0, 1 1, 0 0)))", GeometryType::MultiPolygon),
            (
                "GEOMETRYCOLLECTION (POINT (1 2), LINESTRING (0 0, 1 1))",
                GeometryType::GeometryCollection,
            ),
        ];
        for (wkt, expected) in cases {
            assert_eq!(reader.read(wkt).unwrap().geometry_type(), expected, "{wkt}");
        }
    }

    #[test]
    fn test_case_insensitive_and_whitespace() {
        assert_eq!(roundtrip("  point(1   2) "), "POINT (1 2)");
        assert_eq!(roundtrip("Polygon Empty"), "POLYGON EMPTY");
        assert_eq!(
            roundtrip("linestring z (0 0 1,1 1 2)"),
            "LINESTRING Z (0 0 1, 1 1 2)"
        );
    }

    #[test]
    fn test_dimension_inference_and_tags() {
        let reader = WktReader::new();
        let g = reader.read("POINT (1 2 3)").unwrap();
        assert_eq!(g.coordinate_dimension(), Dimension::Xyz);
        let g = reader.read("POINT M (1 2 3)").unwrap();
        assert_eq!(g.coordinate_dimension(), Dimension::Xym);
        assert_eq!(g.coordinate().unwrap().m, Some(3.0));
        let g = reader.read("POINT (1 2 3 4)").unwrap();
        assert_eq!(g.coordinate_dimension(), Dimension::Xyzm);
        assert!(reader.read("LINESTRING (0 0, 1 1 1)").is_err());
        assert!(reader.read("POINT Z (1 2)").is_err());
    }

    #[test]
    fn test_multipoint_forms() {
        assert_eq!(
            roundtrip("MULTIPOINT (1 2, 3 4)"),
            "MULTIPOINT ((1 2), (3 4))"
        );
        assert_eq!(
            roundtrip("MULTIPOINT ((1 2), (3 4))"),
            "MULTIPOINT ((1 2), (3 4))"
        );
        assert_eq!(
            roundtrip("MULTIPOINT (EMPTY, (3 4))"),
            "MULTIPOINT (EMPTY, (3 4))"
        );
    }

    #[test]
    fn test_parse_error_positions() {
        let reader = WktReader::new();
        match reader.read("POINT (1 x)") {
            Err(GeometryError::Parse { position, .. }) => assert_eq!(position, 9),
            other => panic!("expected a parse error, got {:?}", other),
        }
        match reader.read("CIRCLE (1 2)") {
            Err(GeometryError::Parse { position, message }) => {
                assert_eq!(position, 0);
                assert!(message.contains("CIRCLE"));
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
        assert!(matches!(
            reader.read("POINT (1 2) POINT"),
            Err(GeometryError::Parse { position: 12, .. })
        ));
        assert!(matches!(
            reader.read("LINESTRING (1 2)"),
            Err(GeometryError::InvalidGeometry(_))
        ));
        assert!(matches!(
            reader.read("POLYGON ((0 0, 1 0, 1 1, 0 1))"),
            Err(GeometryError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_writer_layout() {
        assert_eq!(
            roundtrip("POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (1 1, 2 1, 2 2, 1 1))"),
            "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (1 1, 2 1, 2 2, 1 1))"
        );
        assert_eq!(
            roundtrip("GEOMETRYCOLLECTION (POINT (1 2), MULTILINESTRING EMPTY)"),
            "GEOMETRYCOLLECTION (POINT (1 2), MULTILINESTRING EMPTY)"
        );
        assert_eq!(
            roundtrip("GEOMETRYCOLLECTION EMPTY"),
            "GEOMETRYCOLLECTION EMPTY"
        );
        assert_eq!(roundtrip("POINT (-0 1e-3)"), "POINT (0 0.001)");
        assert_eq!(
            roundtrip("POINT (0.1 123456789.125)"),
            "POINT (0.1 123456789.125)"
        );
    }

    #[test]
    fn test_extreme_magnitudes_use_exponents() {
        assert_eq!(roundtrip("POINT (1e300 -0.1)"), "POINT (1e300 -0.1)");
        assert_eq!(roundtrip("POINT (-2.5e20 1e-9)"), "POINT (-2.5e20 1e-9)");
        let g = WktReader::new().read("POINT (1e300 2)").unwrap();
        assert_eq!(
            WktWriter::new().with_precision(2).write(&g),
            "POINT (1e300 2)"
        );
        let text = WktWriter::new().write(&g);
        assert_eq!(WktReader::new().read(&text).unwrap(), g);
    }

    #[test]
    fn test_precision() {
        let g = WktReader::new().read("LINESTRING (1.23456 -0.0001, 2 3.5)").unwrap();
        assert_eq!(
            WktWriter::new().with_precision(3).write(&g),
            "LINESTRING (1.235 0, 2 3.5)"
        );
        assert_eq!(
            WktWriter::new().with_precision(0).write(&g),
            "LINESTRING (1 0, 2 4)"
        );
    }
}
