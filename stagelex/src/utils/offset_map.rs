//! Offset translation between a stage's output text and its input text
//!
//! The two text-transforming stages delete or collapse bytes. Each copied
//! region of the output is recorded as a piece; an output offset is mapped
//! back by locating its piece. Offsets that fall in a collapsed whitespace
//! run map to the start of that run.
use super::span::Span;
use serde::{Deserialize, Serialize};

/// One contiguous region copied from input to output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Piece {
    out_start: usize,
    in_start: usize,
    len: usize,
}

/// Maps offsets in a derived text back to offsets in the text it came from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OffsetMap {
    /// Pieces sorted by `out_start`; empty means identity
    pieces: Vec<Piece>,
    /// Length of the derived text
    out_len: usize,
    /// Length of the source text
    in_len: usize,
    identity: bool,
}

impl OffsetMap {
    /// Identity mapping for a text of `len` bytes
    pub fn identity(len: usize) -> Self {
        Self {
            pieces: Vec::new(),
            out_len: len,
            in_len: len,
            identity: true,
        }
    }

    /// Start building a map for an input of `in_len` bytes
    pub fn builder(in_len: usize) -> OffsetMapBuilder {
        OffsetMapBuilder {
            pieces: Vec::new(),
            out_len: 0,
            in_len,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.identity
    }

    pub fn output_len(&self) -> usize {
        self.out_len
    }

    pub fn input_len(&self) -> usize {
        self.in_len
    }

    /// Map an offset of the derived text to an offset of the source text
    pub fn to_source(&self, offset: usize) -> usize {
        if self.identity {
            return offset.min(self.in_len);
        }
        if self.pieces.is_empty() {
            return 0;
        }

        let idx = match self
            .pieces
            .binary_search_by(|piece| piece.out_start.cmp(&offset))
        {
            Ok(i) => i,
            Err(0) => 0,
            Err(i) => i - 1,
        };

        let piece = self.pieces[idx];
        let delta = offset.saturating_sub(piece.out_start);
        if delta < piece.len {
            piece.in_start + delta
        } else {
            // End of text or one past a piece: anchor after the copied bytes
            (piece.in_start + piece.len).min(self.in_len)
        }
    }

    /// Map a span of the derived text to the source text
    pub fn span_to_source(&self, span: Span) -> Span {
        let start = self.to_source(span.start);
        let end = if span.is_empty() {
            start
        } else {
            self.to_source(span.end - 1) + 1
        };
        Span::new(start, end.max(start))
    }

    /// Compose two maps: `self` maps C to B and `inner` maps B to A,
    /// the result maps C to A.
    pub fn then(&self, inner: &OffsetMap) -> OffsetMap {
        if self.identity {
            let mut composed = inner.clone();
            composed.out_len = self.out_len;
            return composed;
        }
        if inner.identity {
            let mut composed = self.clone();
            composed.in_len = inner.in_len;
            return composed;
        }

        let mut builder = OffsetMap::builder(inner.in_len);
        for piece in &self.pieces {
            // Split each outer piece wherever the inner mapping jumps
            let mut done = 0;
            while done < piece.len {
                let mid = piece.in_start + done;
                let start = inner.to_source(mid);
                let mut run = 1;
                while done + run < piece.len
                    && inner.to_source(mid + run) == start + run
                {
                    run += 1;
                }
                builder.push_at(piece.out_start + done, start, run);
                done += run;
            }
        }
        builder.finish(self.out_len)
    }
}

/// Accumulates copied pieces while a stage writes its output
#[derive(Debug)]
pub struct OffsetMapBuilder {
    pieces: Vec<Piece>,
    out_len: usize,
    in_len: usize,
}

impl OffsetMapBuilder {
    /// Record that `len` bytes starting at `in_start` were appended to the output
    pub fn copy(&mut self, in_start: usize, len: usize) {
        let out_start = self.out_len;
        self.push_at(out_start, in_start, len);
    }

    fn push_at(&mut self, out_start: usize, in_start: usize, len: usize) {
        if len == 0 {
            return;
        }
        if let Some(last) = self.pieces.last_mut() {
            if last.out_start + last.len == out_start && last.in_start + last.len == in_start {
                last.len += len;
                self.out_len = self.out_len.max(out_start + len);
                return;
            }
        }
        self.pieces.push(Piece {
            out_start,
            in_start,
            len,
        });
        self.out_len = self.out_len.max(out_start + len);
    }

    /// Finish the map; `out_len` is the final length of the derived text
    pub fn finish(self, out_len: usize) -> OffsetMap {
        OffsetMap {
            pieces: self.pieces,
            out_len,
            in_len: self.in_len,
            identity: false,
        }
    }
}
