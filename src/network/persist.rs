//! Plain-text parameter file.
//!
//! ```text
//! 3                  layer count
//! 784 30 10          layer sizes
//! Biases
//! 2                  bias vector count
//! 0 0 ... 0          one line per layer
//! 0 0 ... 0
//! Weights
//! 2                  matrix count
//! 30                 rows of the first matrix
//! w w ... w          one line per row
//! ...
//! 10                 rows of the second matrix
//! ...
//! ```
//!
//! Every value is followed by a single space and every record ends in a
//! newline. Counts are checked against the structure and against the lines
//! actually present; anything that disagrees is a [`NetworkError::Format`].

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::info;

use crate::error::{NetworkError, Result};
use crate::math::matrix::Matrix;
use crate::network::params::NetworkParameters;
use crate::network::structure::NetworkStructure;

const BIASES_TAG: &str = "Biases";
const WEIGHTS_TAG: &str = "Weights";

pub fn write_parameters<W: Write>(params: &NetworkParameters, out: &mut W) -> std::io::Result<()> {
    let sizes = params.structure().sizes();
    writeln!(out, "{}", sizes.len())?;
    write_row(out, sizes.iter())?;

    writeln!(out, "{}", BIASES_TAG)?;
    writeln!(out, "{}", params.biases().len())?;
    for layer in params.biases() {
        write_row(out, layer.iter())?;
    }

    writeln!(out, "{}", WEIGHTS_TAG)?;
    writeln!(out, "{}", params.weights().len())?;
    for matrix in params.weights() {
        writeln!(out, "{}", matrix.rows)?;
        for row in &matrix.data {
            write_row(out, row.iter())?;
        }
    }
    Ok(())
}

fn write_row<W: Write, T: std::fmt::Display>(
    out: &mut W,
    values: impl Iterator<Item = T>,
) -> std::io::Result<()> {
    for v in values {
        write!(out, "{} ", v)?;
    }
    writeln!(out)
}

pub fn read_parameters<R: BufRead>(input: R) -> Result<NetworkParameters> {
    let mut cursor = LineCursor::new(input);

    let layer_count = cursor.count("layer count")?;
    let (line_no, sizes_line) = cursor.next_line("layer sizes")?;
    let sizes = sizes_line
        .split_whitespace()
        .map(|tok| {
            tok.parse::<usize>().map_err(|_| NetworkError::Format {
                line: line_no,
                message: format!("layer size {:?} is not a non-negative integer", tok),
            })
        })
        .collect::<Result<Vec<usize>>>()?;
    if sizes.len() != layer_count {
        return Err(NetworkError::Format {
            line: line_no,
            message: format!("header announces {} layers, found {} sizes", layer_count, sizes.len()),
        });
    }
    let structure = NetworkStructure::new(sizes).map_err(|e| NetworkError::Format {
        line: line_no,
        message: e.to_string(),
    })?;

    cursor.tag(BIASES_TAG)?;
    let (count_line, bias_count) = cursor.counted("bias vector count")?;
    expect_count(count_line, "bias vectors", bias_count, structure.weight_layers())?;
    let mut biases = Vec::with_capacity(bias_count);
    for layer in 1..structure.len() {
        let (line_no, line) = cursor.next_line("bias values")?;
        let values = extract_values(&line, line_no)?;
        expect_count(line_no, "biases", values.len(), structure.sizes()[layer])?;
        biases.push(values);
    }

    cursor.tag(WEIGHTS_TAG)?;
    let (count_line, matrix_count) = cursor.counted("weight matrix count")?;
    expect_count(count_line, "weight matrices", matrix_count, structure.weight_layers())?;
    let mut weights = Vec::with_capacity(matrix_count);
    for layer in 1..structure.len() {
        let (rows, cols) = structure.weight_shape(layer);
        let (rows_line, row_count) = cursor.counted("weight row count")?;
        expect_count(rows_line, "weight rows", row_count, rows)?;
        let mut data = Vec::with_capacity(rows);
        for _ in 0..rows {
            let (line_no, line) = cursor.next_line("weight values")?;
            let values = extract_values(&line, line_no)?;
            expect_count(line_no, "weights", values.len(), cols)?;
            data.push(values);
        }
        weights.push(Matrix { rows, cols, data });
    }

    cursor.finish()?;
    NetworkParameters::from_parts(structure, weights, biases)
}

pub fn save_text(params: &NetworkParameters, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| NetworkError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_parameters(params, &mut writer)
        .and_then(|_| writer.flush())
        .map_err(|e| NetworkError::io(path, e))?;
    info!("saved parameters ({}) to {:?}", params.structure(), path);
    Ok(())
}

pub fn load_text(path: impl AsRef<Path>) -> Result<NetworkParameters> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| NetworkError::io(path, e))?;
    let params = read_parameters(BufReader::new(file))?;
    info!("loaded parameters ({}) from {:?}", params.structure(), path);
    Ok(params)
}

/// Space-separated finite floats; repeated or trailing whitespace is ignored.
pub fn extract_values(line: &str, line_no: usize) -> Result<Vec<f64>> {
    line.split_whitespace()
        .map(|tok| match tok.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            Ok(_) => Err(NetworkError::Format {
                line: line_no,
                message: format!("{:?} is not a finite number", tok),
            }),
            Err(_) => Err(NetworkError::Format {
                line: line_no,
                message: format!("{:?} is not a number", tok),
            }),
        })
        .collect()
}

fn expect_count(line: usize, what: &str, found: usize, expected: usize) -> Result<()> {
    if found != expected {
        return Err(NetworkError::Format {
            line,
            message: format!("expected {} {}, found {}", expected, what, found),
        });
    }
    Ok(())
}

/// Reads lines with 1-based numbering for error messages.
struct LineCursor<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> LineCursor<R> {
    fn new(input: R) -> Self {
        LineCursor { lines: input.lines(), line_no: 0 }
    }

    fn next_line(&mut self, what: &str) -> Result<(usize, String)> {
        match self.lines.next() {
            Some(Ok(line)) => {
                self.line_no += 1;
                Ok((self.line_no, line))
            }
            Some(Err(e)) => Err(NetworkError::Format {
                line: self.line_no + 1,
                message: format!("unreadable line while expecting {}: {}", what, e),
            }),
            None => Err(NetworkError::Format {
                line: self.line_no + 1,
                message: format!("unexpected end of file, expected {}", what),
            }),
        }
    }

    fn counted(&mut self, what: &str) -> Result<(usize, usize)> {
        let (line_no, line) = self.next_line(what)?;
        let value = line.trim().parse::<usize>().map_err(|_| NetworkError::Format {
            line: line_no,
            message: format!("{} {:?} is not a non-negative integer", what, line.trim()),
        })?;
        Ok((line_no, value))
    }

    fn count(&mut self, what: &str) -> Result<usize> {
        self.counted(what).map(|(_, v)| v)
    }

    fn tag(&mut self, tag: &str) -> Result<()> {
        let (line_no, line) = self.next_line(tag)?;
        if line.trim() != tag {
            return Err(NetworkError::Format {
                line: line_no,
                message: format!("expected {:?} marker, found {:?}", tag, line.trim()),
            });
        }
        Ok(())
    }

    /// Only blank lines may follow the last weight row.
    fn finish(mut self) -> Result<()> {
        while let Some(line) = self.lines.next() {
            self.line_no += 1;
            let line = line.map_err(|e| NetworkError::Format {
                line: self.line_no,
                message: e.to_string(),
            })?;
            if !line.trim().is_empty() {
                return Err(NetworkError::Format {
                    line: self.line_no,
                    message: format!("unexpected trailing content {:?}", line.trim()),
                });
            }
        }
        Ok(())
    }
}
