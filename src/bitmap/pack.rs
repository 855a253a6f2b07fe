//! Column-major bit packing and hexadecimal encoding.
//!
//! The target printer consumes the bitmap one column at a time, top row
//! first, 8 rows per byte with the topmost row in the most significant bit.
//!
//! Columns are emitted in the order `0, cols-1, cols-2, ..., 1`. This
//! wrap-around order is part of the output format expected by the firmware
//! and must not be changed to a plain left-to-right or right-to-left scan.

use super::grid::BitGrid;

/// Rows packed into one byte.
pub const ROWS_PER_BYTE: usize = 8;

/// The packed bytes of one source column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedColumn {
    /// Index of the column in the bit grid
    pub column: usize,
    /// One byte per run of up to 8 rows, top run first
    pub bytes: Vec<u8>,
}

/// Source column indices in emission order: `0, cols-1, ..., 1`.
pub fn column_order(cols: usize) -> impl Iterator<Item = usize> {
    (0..cols).map(move |c| (cols - c) % cols)
}

/// Read a run of bits as a big-endian unsigned integer of the run's length.
///
/// A short run is not padded: `[1, 1]` is 3, not 0xc0.
#[inline]
pub fn pack_run(run: &[u8]) -> u8 {
    run.iter().fold(0u8, |acc, &bit| (acc << 1) | bit)
}

/// Pack column `j` of `bits` into bytes.
pub fn pack_column(bits: &BitGrid, j: usize) -> Vec<u8> {
    let column: Vec<u8> = bits.column(j).collect();
    column.chunks(ROWS_PER_BYTE).map(pack_run).collect()
}

/// Pack every column, in emission order.
pub fn pack(bits: &BitGrid) -> Vec<PackedColumn> {
    column_order(bits.cols())
        .map(|column| PackedColumn {
            column,
            bytes: pack_column(bits, column),
        })
        .collect()
}

/// Minimal lowercase hex literal: `0x0`, `0x3`, `0xff`.
pub fn format_byte(byte: u8) -> String {
    format!("{:#x}", byte)
}

/// Render bytes as an initializer line, each literal followed by a comma.
///
/// The trailing comma lets consecutive lines concatenate into one array body.
pub fn encode_line(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| format_byte(b) + ",").collect()
}

/// Pack and render every column, one line per column in emission order.
pub fn encode_lines(bits: &BitGrid) -> Vec<String> {
    pack(bits)
        .into_iter()
        .map(|packed| {
            let line = encode_line(&packed.bytes);
            log::trace!("column {}: {}", packed.column, line);
            line
        })
        .collect()
}
