use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra as na;

use crate::error::{Error, Result};

/// Streaming writer for an OpenCV `FileStorage` YAML document.
///
/// Entries are appended in call order, so OpenCV's `cv::FileStorage` and the
/// usual Python readers load the result directly. Each key may appear once.
pub struct MetadataWriter<W: Write> {
    out: W,
    keys: HashSet<String>,
}

impl MetadataWriter<BufWriter<File>> {
    /// Creates (or truncates) the document at `path` and writes the header.
    pub fn create(path: &Path) -> Result<Self> {
        Self::new(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> MetadataWriter<W> {
    pub fn new(mut out: W) -> Result<Self> {
        out.write_all(b"%YAML:1.0\n---\n")?;
        Ok(MetadataWriter {
            out,
            keys: HashSet::new(),
        })
    }

    fn claim_key(&mut self, key: &str) -> Result<()> {
        let mut chars = key.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(Error::InvalidKey(key.to_string()));
        }
        if !self.keys.insert(key.to_string()) {
            return Err(Error::DuplicateKey(key.to_string()));
        }
        Ok(())
    }

    /// `key: [ width, height ]`, the layout of `cv::Size`.
    pub fn write_size(&mut self, key: &str, width: u32, height: u32) -> Result<()> {
        self.claim_key(key)?;
        writeln!(self.out, "{}: [ {}, {} ]", key, width, height)?;
        Ok(())
    }

    pub fn write_str(&mut self, key: &str, value: &str) -> Result<()> {
        self.claim_key(key)?;
        writeln!(self.out, "{}: {}", key, yaml_string(value))?;
        Ok(())
    }

    /// Writes `m` as an `!!opencv-matrix` of `f32` (`dt: f`), row-major.
    pub fn write_matrix<R, C, S>(&mut self, key: &str, m: &na::Matrix<f32, R, C, S>) -> Result<()>
    where
        R: na::Dim,
        C: na::Dim,
        S: na::RawStorage<f32, R, C>,
    {
        self.claim_key(key)?;
        let (rows, cols) = m.shape();
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(yaml_float(m[(r, c)]));
            }
        }
        writeln!(self.out, "{}: !!opencv-matrix", key)?;
        writeln!(self.out, "   rows: {}", rows)?;
        writeln!(self.out, "   cols: {}", cols)?;
        writeln!(self.out, "   dt: f")?;
        writeln!(self.out, "   data: [ {} ]", data.join(", "))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Shortest representation that parses back to the same `f32`.
fn yaml_float(v: f32) -> String {
    if v.is_nan() {
        ".Nan".to_string()
    } else if v == f32::INFINITY {
        ".Inf".to_string()
    } else if v == f32::NEG_INFINITY {
        "-.Inf".to_string()
    } else {
        format!("{:?}", v)
    }
}

fn yaml_string(value: &str) -> String {
    let plain = value
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/'));
    if plain {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }
}
