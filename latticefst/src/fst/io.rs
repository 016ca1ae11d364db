/*! Binary model persistence.

A persisted model is a little-endian stream: magic and format version, the
two symbol tables (count, then length-prefixed UTF-8 strings), the start
state index, the semiring tag, the state count, one fixed-size record per
state (arc count, final weight, state id), then the arc records for every
state in the same order (input label, output label, weight, destination).

Saving is only available on the growable variant; loading always builds the
frozen variant. A failed load aborts wholesale; no partially constructed
machine ever escapes.
*/

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use thiserror::Error;

use super::{Arc, ConstFst, Fst, VectorFst};
use crate::constants::{MODEL_MAGIC, MODEL_VERSION};
use crate::semiring::Semiring;
use crate::symbols::SymbolTable;
use crate::types::{StateId, NO_STATE};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad magic bytes; not a latticefst model")]
    BadMagic,

    #[error("unsupported model version {0}")]
    BadVersion(u8),

    #[error("model carries semiring tag {found}, expected {expected}")]
    SemiringMismatch { expected: u8, found: u8 },

    #[error("state ids are not dense and in file order (found {found} at position {position})")]
    BadStateId { position: u32, found: u32 },

    #[error("start state {start} out of range ({num_states} states)")]
    BadStart { start: u32, num_states: u32 },

    #[error("arc destination {dest} out of range ({num_states} states)")]
    BadDestination { dest: u32, num_states: u32 },

    #[error("symbol table entry is not valid utf-8")]
    BadSymbol,
}

/// Snap a weight read back from the stream onto the canonical constant when
/// it compares equal to `zero()` or `one()`, so round-tripped models keep
/// bit-identical identities.
#[inline(always)]
fn snap<W: Semiring>(weight: W) -> W {
    if weight == W::zero() {
        W::zero()
    } else if weight == W::one() {
        W::one()
    } else {
        weight
    }
}

fn write_symbols<Wr: Write>(writer: &mut Wr, table: &SymbolTable) -> Result<(), ModelError> {
    writer.write_u32::<LittleEndian>(table.len() as u32)?;
    for symbol in table.iter() {
        writer.write_u32::<LittleEndian>(symbol.len() as u32)?;
        writer.write_all(symbol.as_bytes())?;
    }
    Ok(())
}

fn read_symbols<R: Read>(reader: &mut R) -> Result<SymbolTable, ModelError> {
    let count = reader.read_u32::<LittleEndian>()?;
    let mut table = SymbolTable::new();
    let mut buf = vec![];
    for _ in 0..count {
        let len = reader.read_u32::<LittleEndian>()? as usize;
        buf.resize(len, 0);
        reader.read_exact(&mut buf)?;
        let symbol = std::str::from_utf8(&buf).map_err(|_| ModelError::BadSymbol)?;
        table.add_symbol(symbol);
    }
    Ok(table)
}

/// Read the semiring tag of a persisted model without loading it, so a
/// caller can dispatch to the right weight type.
pub fn probe_kind<P: AsRef<Path>>(path: P) -> Result<u8, ModelError> {
    let mut reader = BufReader::new(File::open(path)?);
    read_header(&mut reader)?;
    read_symbols(&mut reader)?;
    read_symbols(&mut reader)?;
    reader.read_u32::<LittleEndian>()?; // start index
    Ok(reader.read_u8()?)
}

fn read_header<R: Read>(reader: &mut R) -> Result<(), ModelError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != MODEL_MAGIC {
        return Err(ModelError::BadMagic);
    }
    let version = reader.read_u8()?;
    if version != MODEL_VERSION {
        return Err(ModelError::BadVersion(version));
    }
    Ok(())
}

impl<W: Semiring> VectorFst<W> {
    /// Serialize this machine into `writer`.
    pub fn write<Wr: Write>(&self, writer: &mut Wr) -> Result<(), ModelError> {
        writer.write_all(MODEL_MAGIC)?;
        writer.write_u8(MODEL_VERSION)?;
        write_symbols(writer, self.input_symbols())?;
        write_symbols(writer, self.output_symbols())?;
        writer.write_u32::<LittleEndian>(self.start().unwrap_or(NO_STATE))?;
        writer.write_u8(W::KIND as u8)?;
        writer.write_u32::<LittleEndian>(self.num_states() as u32)?;
        for state in 0..self.num_states() as StateId {
            writer.write_u32::<LittleEndian>(self.num_arcs(state) as u32)?;
            writer.write_f32::<LittleEndian>(self.final_weight(state).value())?;
            writer.write_u32::<LittleEndian>(state)?;
        }
        for state in 0..self.num_states() as StateId {
            for arc in self.arcs(state) {
                writer.write_u32::<LittleEndian>(arc.ilabel)?;
                writer.write_u32::<LittleEndian>(arc.olabel)?;
                writer.write_f32::<LittleEndian>(arc.weight.value())?;
                writer.write_u32::<LittleEndian>(arc.nextstate)?;
            }
        }
        Ok(())
    }

    pub fn write_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write(&mut writer)
    }
}

impl<W: Semiring> ConstFst<W> {
    /// Deserialize a frozen machine from `reader`.
    pub fn read<R: Read>(reader: &mut R) -> Result<ConstFst<W>, ModelError> {
        read_header(reader)?;
        let isyms = read_symbols(reader)?;
        let osyms = read_symbols(reader)?;
        let start = reader.read_u32::<LittleEndian>()?;

        let tag = reader.read_u8()?;
        if tag != W::KIND as u8 {
            return Err(ModelError::SemiringMismatch {
                expected: W::KIND as u8,
                found: tag,
            });
        }

        let num_states = reader.read_u32::<LittleEndian>()?;
        let start = if start == NO_STATE {
            None
        } else if start < num_states {
            Some(start)
        } else {
            return Err(ModelError::BadStart {
                start,
                num_states,
            });
        };

        let mut arc_counts = Vec::with_capacity(num_states as usize);
        let mut state_parts: Vec<(W, Vec<Arc<W>>)> = Vec::with_capacity(num_states as usize);
        for position in 0..num_states {
            let num_arcs = reader.read_u32::<LittleEndian>()?;
            let final_weight = snap(W::from_value(reader.read_f32::<LittleEndian>()?));
            let id = reader.read_u32::<LittleEndian>()?;
            if id != position {
                return Err(ModelError::BadStateId {
                    position,
                    found: id,
                });
            }
            arc_counts.push(num_arcs);
            state_parts.push((final_weight, vec![]));
        }

        for (state, &num_arcs) in arc_counts.iter().enumerate() {
            let mut arcs = Vec::with_capacity(num_arcs as usize);
            for _ in 0..num_arcs {
                let ilabel = reader.read_u32::<LittleEndian>()?;
                let olabel = reader.read_u32::<LittleEndian>()?;
                let weight = W::from_value(reader.read_f32::<LittleEndian>()?);
                let dest = reader.read_u32::<LittleEndian>()?;
                if dest >= num_states {
                    return Err(ModelError::BadDestination {
                        dest,
                        num_states,
                    });
                }
                arcs.push(Arc::new(ilabel, olabel, weight, dest));
            }
            state_parts[state].1 = arcs;
        }

        Ok(ConstFst::from_parts(state_parts, start, isyms, osyms))
    }

    pub fn read_path<P: AsRef<Path>>(path: P) -> Result<ConstFst<W>, ModelError> {
        let mut reader = BufReader::new(File::open(path)?);
        ConstFst::read(&mut reader)
    }
}
