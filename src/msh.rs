//! ASCII reader and writer for the MSH 2.2 mesh format.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use crate::error::{MeshError, Result};
use crate::math::Point3;
use crate::topology::Dimension;

/// One mesh element: `tags[0]` is the physical group, `tags[1]` the id of
/// the geometric entity the element was generated on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshElement {
    pub el_type: u32,
    pub tags: Vec<u32>,
    pub nodes: Vec<u32>,
}

/// A named physical group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalGroup {
    pub id: u32,
    pub dim: Dimension,
}

/// Physical groups keyed by name.
pub type PhysicalTable = BTreeMap<String, PhysicalGroup>;

/// An unstructured mesh as stored in an MSH 2.2 file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GmshMesh {
    pub nodes: BTreeMap<u32, Point3>,
    pub elements: BTreeMap<u32, MeshElement>,
    pub physical: PhysicalTable,
}

impl GmshMesh {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads an ASCII MSH 2.x file. Sections other than mesh format,
    /// physical names, nodes and elements are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::Parse`] on malformed content and an I/O error
    /// if reading fails.
    pub fn read<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = Lines::new(reader);
        let mut mesh = Self::new();

        while let Some(header) = lines.read_opt()? {
            match header.as_str() {
                "" => {}
                "$MeshFormat" => {
                    let format = lines.read()?;
                    if !format.starts_with('2') {
                        return Err(lines.error(format!("unsupported mesh format '{format}'")));
                    }
                    lines.expect("$EndMeshFormat")?;
                }
                "$PhysicalNames" => {
                    let count: usize = lines.parse_next()?;
                    for _ in 0..count {
                        let line = lines.read()?;
                        let (group, name) = parse_physical_name(&line).map_err(|m| lines.error(m))?;
                        mesh.physical.insert(name, group);
                    }
                    lines.expect("$EndPhysicalNames")?;
                }
                "$Nodes" => {
                    let count: usize = lines.parse_next()?;
                    for _ in 0..count {
                        let line = lines.read()?;
                        let fields = parse_numbers::<f64>(&line).map_err(|m| lines.error(m))?;
                        let [id, x, y, z] = fields[..] else {
                            return Err(lines.error(format!("expected 4 fields in node '{line}'")));
                        };
                        mesh.nodes.insert(float_id(id).map_err(|m| lines.error(m))?, Point3::new(x, y, z));
                    }
                    lines.expect("$EndNodes")?;
                }
                "$Elements" => {
                    let count: usize = lines.parse_next()?;
                    for _ in 0..count {
                        let line = lines.read()?;
                        let (id, element) = parse_element(&line).map_err(|m| lines.error(m))?;
                        mesh.elements.insert(id, element);
                    }
                    lines.expect("$EndElements")?;
                }
                other if other.starts_with('$') => {
                    let end = format!("$End{}", &other[1..]);
                    while lines.read()? != end {}
                }
                other => return Err(lines.error(format!("unexpected line '{other}'"))),
            }
        }
        Ok(mesh)
    }

    /// Writes the mesh as an ASCII MSH 2.2 file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if writing fails.
    pub fn write_ascii<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "$MeshFormat")?;
        writeln!(out, "2.2 0 8")?;
        writeln!(out, "$EndMeshFormat")?;

        if !self.physical.is_empty() {
            writeln!(out, "$PhysicalNames")?;
            writeln!(out, "{}", self.physical.len())?;
            let mut groups: Vec<_> = self.physical.iter().collect();
            groups.sort_by_key(|(_, g)| (g.dim, g.id));
            for (name, group) in groups {
                writeln!(out, "{} {} \"{}\"", group.dim, group.id, name)?;
            }
            writeln!(out, "$EndPhysicalNames")?;
        }

        writeln!(out, "$Nodes")?;
        writeln!(out, "{}", self.nodes.len())?;
        for (id, p) in &self.nodes {
            writeln!(out, "{id} {} {} {}", p.x, p.y, p.z)?;
        }
        writeln!(out, "$EndNodes")?;

        writeln!(out, "$Elements")?;
        writeln!(out, "{}", self.elements.len())?;
        for (id, el) in &self.elements {
            write!(out, "{id} {} {}", el.el_type, el.tags.len())?;
            for v in el.tags.iter().chain(&el.nodes) {
                write!(out, " {v}")?;
            }
            writeln!(out)?;
        }
        writeln!(out, "$EndElements")?;
        Ok(())
    }
}

/// Line cursor tracking the current line number for error messages.
struct Lines<R> {
    reader: R,
    line_no: usize,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Self { reader, line_no: 0 }
    }

    fn read_opt(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        Ok(Some(buf.trim().to_string()))
    }

    fn read(&mut self) -> Result<String> {
        match self.read_opt()? {
            Some(line) => Ok(line),
            None => Err(self.error("unexpected end of file".into())),
        }
    }

    fn parse_next<T: std::str::FromStr>(&mut self) -> Result<T> {
        let line = self.read()?;
        line.parse()
            .map_err(|_| self.error(format!("expected a number, got '{line}'")))
    }

    fn expect(&mut self, marker: &str) -> Result<()> {
        let line = self.read()?;
        if line == marker {
            Ok(())
        } else {
            Err(self.error(format!("expected {marker}, got '{line}'")))
        }
    }

    fn error(&self, message: String) -> crate::error::FracmeshError {
        MeshError::Parse {
            line: self.line_no,
            message,
        }
        .into()
    }
}

fn parse_numbers<T: std::str::FromStr>(line: &str) -> std::result::Result<Vec<T>, String> {
    line.split_whitespace()
        .map(|f| f.parse().map_err(|_| format!("invalid number '{f}'")))
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_id(value: f64) -> std::result::Result<u32, String> {
    if value.fract() == 0.0 && value >= 0.0 && value <= f64::from(u32::MAX) {
        Ok(value as u32)
    } else {
        Err(format!("invalid node id {value}"))
    }
}

fn parse_physical_name(line: &str) -> std::result::Result<(PhysicalGroup, String), String> {
    let mut parts = line.splitn(3, char::is_whitespace);
    let (Some(dim), Some(id), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected 'dim id \"name\"', got '{line}'"));
    };
    let dim: u8 = dim.parse().map_err(|_| format!("invalid dimension '{dim}'"))?;
    let dim = Dimension::try_from(dim).map_err(|e| e.to_string())?;
    let id: u32 = id.parse().map_err(|_| format!("invalid physical id '{id}'"))?;
    let name = name.trim().trim_matches('"').to_string();
    Ok((PhysicalGroup { id, dim }, name))
}

fn parse_element(line: &str) -> std::result::Result<(u32, MeshElement), String> {
    let fields = parse_numbers::<u32>(line)?;
    let [id, el_type, n_tags, ref rest @ ..] = fields[..] else {
        return Err(format!("element '{line}' is too short"));
    };
    let n_tags = n_tags as usize;
    if rest.len() < n_tags {
        return Err(format!("element {id} declares {n_tags} tags but has {}", rest.len()));
    }
    let (tags, nodes) = rest.split_at(n_tags);
    Ok((
        id,
        MeshElement {
            el_type,
            tags: tags.to_vec(),
            nodes: nodes.to_vec(),
        },
    ))
}
