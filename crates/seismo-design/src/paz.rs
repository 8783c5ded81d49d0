//! Poles-and-zeros (PAZ) text files.
//!
//! ```text
//! <command line>
//! ZEROS  2
//! 	-1.0000000000000000e0  0.0000000000000000e0
//! 	-1.0000000000000000e0  0.0000000000000000e0
//! POLES  2
//! 	...
//! CONSTANT  <gain at band centre>
//! ```
//!
//! Roots are the Z-plane poles and zeros of the design.

use crate::design::FilterDesign;
use crate::error::{DesignError, Result};
use seismo_core::{Complex64, PoleZero};
use std::io::{self, Write};
use std::path::Path;

/// Write `design` in PAZ format, echoing `command_line` as the first line.
pub fn write_paz<W: Write>(design: &FilterDesign, command_line: &str, mut out: W) -> io::Result<()> {
    writeln!(out, "{command_line}")?;
    write_section(&mut out, "ZEROS", &design.zplane.zeros)?;
    write_section(&mut out, "POLES", &design.zplane.poles)?;
    writeln!(out, "CONSTANT  {:.16e}", design.fc_gain.norm())?;
    out.flush()
}

fn write_section<W: Write>(out: &mut W, label: &str, roots: &[Complex64]) -> io::Result<()> {
    writeln!(out, "{label}  {}", roots.len())?;
    for r in roots {
        writeln!(out, "\t{:.16e}  {:.16e}", r.re, r.im)?;
    }
    Ok(())
}

/// Render `design` as a PAZ string.
pub fn to_paz_string(design: &FilterDesign, command_line: &str) -> String {
    let mut buf = Vec::new();
    // writing into a Vec cannot fail
    let _ = write_paz(design, command_line, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Write a PAZ file to `path`.
pub fn save_paz(design: &FilterDesign, command_line: &str, path: impl AsRef<Path>) -> io::Result<()> {
    let file = std::fs::File::create(path.as_ref())?;
    write_paz(design, command_line, io::BufWriter::new(file))?;
    tracing::info!(path = %path.as_ref().display(), "wrote PAZ file");
    Ok(())
}

/// Parse PAZ text back into a pole-zero set; the constant becomes the gain.
///
/// The first line (the echoed command) is skipped. Sections may appear in
/// any order; a missing `CONSTANT` leaves the gain at one.
pub fn parse_paz(text: &str) -> Result<PoleZero> {
    let mut pz = PoleZero::new();
    let mut lines = text.lines().enumerate().skip(1);

    while let Some((idx, line)) = lines.next() {
        let line_no = idx + 1;
        let mut fields = line.split_whitespace();
        let Some(keyword) = fields.next() else {
            continue;
        };
        let value = fields.next();

        match keyword.to_ascii_uppercase().as_str() {
            "ZEROS" | "POLES" => {
                let count: usize = parse_field(value, line_no, "root count")?;
                let mut roots = Vec::with_capacity(count);
                for _ in 0..count {
                    let Some((ridx, rline)) = lines.next() else {
                        return Err(paz_error(line_no, format!("expected {count} roots after {keyword}")));
                    };
                    let mut parts = rline.split_whitespace();
                    let re = parse_field(parts.next(), ridx + 1, "real part")?;
                    let im = parse_field(parts.next(), ridx + 1, "imaginary part")?;
                    roots.push(Complex64::new(re, im));
                }
                if keyword.eq_ignore_ascii_case("ZEROS") {
                    pz.zeros = roots;
                } else {
                    pz.poles = roots;
                }
            }
            "CONSTANT" => {
                pz.gain = parse_field(value, line_no, "constant")?;
            }
            other => return Err(paz_error(line_no, format!("unknown keyword `{other}`"))),
        }
    }
    Ok(pz)
}

fn parse_field<T: std::str::FromStr>(field: Option<&str>, line: usize, what: &str) -> Result<T> {
    let field = field.ok_or_else(|| paz_error(line, format!("missing {what}")))?;
    field
        .parse()
        .map_err(|_| paz_error(line, format!("invalid {what} `{field}`")))
}

fn paz_error(line: usize, reason: String) -> DesignError {
    DesignError::Paz { line, reason }
}
