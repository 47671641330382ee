// SPDX-License-Identifier: Apache-2.0

use std::fs::File;
use std::io;
use std::io::Write;
use cfg_if::cfg_if;
use crate::error::ResultContext;
use crate::segment::Segment;
use super::{CompositeView, Error, Result, Span};
use super::OperationKind::Write as WriteOp;

impl<S: Segment, const K: usize> CompositeView<S, K> {
	/// Writes `len` bytes from logical `index` to `out`, one segment at a time,
	/// returning the number of bytes written. Blocks as `out` blocks.
	pub fn write_to(&self, index: usize, len: usize, out: &mut impl Write) -> Result<usize> {
		for Span { part, offset, len: count } in self.spans_for(WriteOp, index, len)? {
			self.parts[part]
				.segment
				.write_to(offset, count, out)
				.map_err(|err| Error::io(WriteOp, err))?;
		}
		Ok(len)
	}

	/// Writes `len` bytes from logical `index` to `out` with one gathering write,
	/// returning the number of bytes written. Like a gathering channel, this may
	/// write less than `len` bytes.
	pub fn write_vectored_to(&self, index: usize, len: usize, out: &mut impl Write) -> Result<usize> {
		let slices = self.io_slices(index, len).context(WriteOp)?;
		if slices.is_empty() {
			return Ok(0)
		}

		out.write_vectored(&slices)
		   .map_err(|err| Error::io(WriteOp, err))
	}

	/// Writes `len` bytes from logical `index` to `file` at `position`, without
	/// moving the file cursor, returning the number of bytes written.
	pub fn write_at(&self, index: usize, len: usize, file: &File, mut position: u64) -> Result<usize> {
		for span in self.spans_for(WriteOp, index, len)? {
			write_all_at(file, self.span_data(span), position)
				.map_err(|err| Error::io(WriteOp, err))?;
			position += span.len as u64;
		}
		Ok(len)
	}
}

cfg_if! {
	if #[cfg(unix)] {
		fn write_all_at(file: &File, data: &[u8], position: u64) -> io::Result<()> {
			use std::os::unix::fs::FileExt;
			file.write_all_at(data, position)
		}
	} else if #[cfg(windows)] {
		fn write_all_at(file: &File, mut data: &[u8], mut position: u64) -> io::Result<()> {
			use std::os::windows::fs::FileExt;
			while !data.is_empty() {
				match file.seek_write(data, position) {
					Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
					Ok(written) => {
						data = &data[written..];
						position += written as u64;
					}
					Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
					Err(err) => return Err(err)
				}
			}
			Ok(())
		}
	} else {
		fn write_all_at(_: &File, _: &[u8], _: u64) -> io::Result<()> {
			Err(io::ErrorKind::Unsupported.into())
		}
	}
}
