// SPDX-License-Identifier: Apache-2.0

//! Assembles a length-prefixed frame from a pooled header, a metadata window and
//! a shared payload, writes it to a file in one pass, then shares demand for the
//! next frames across three upstream producers.

use std::cell::Cell;
use std::env;
use std::error::Error;
use std::fs::File;
use std::io;
use std::sync::Arc;
use framekit::{CompositeView, CreditDistributor, PooledSegment, Segment, Subscription, Window};

struct Producer {
	name: &'static str,
	outstanding: u64,
	granted: Cell<u64>,
}

impl Subscription for Producer {
	type Error = io::Error;

	fn external_requested(&self) -> u64 { self.outstanding }

	fn limit(&self) -> u64 { 64 }

	fn forward_demand(&self, n: u64) -> io::Result<()> {
		self.granted.set(self.granted.get() + n);
		Ok(())
	}
}

fn main() -> Result<(), Box<dyn Error>> {
	let payload: Arc<[u8]> = Arc::from(&b"the quick brown fox jumps over the lazy dog"[..]);
	let metadata = b"\x00\x00mime=text/plain;\x00\x00".to_vec();

	let mut header = PooledSegment::claim()?;
	let length = (16 + payload.len()) as u32;
	header.write(&length.to_be_bytes());

	let header: Box<dyn Segment> = Box::new(header);
	let metadata: Box<dyn Segment> = Box::new(Window::new(metadata, 2..18));
	let payload: Box<dyn Segment> = Box::new(payload);
	let frame = CompositeView::triple(header, metadata, payload);

	println!("{frame:?}");
	println!("frame length: {}", frame.get::<u32>(0)?);
	println!("metadata: {}", String::from_utf8_lossy(frame.view(4, 16)?));
	println!("straddling boundary: {:?}", String::from_utf8_lossy(&frame.copy_range(16, 8)?));

	let path = env::temp_dir().join("frame.bin");
	let file = File::create(&path)?;
	let written = frame.write_at(0, frame.capacity(), &file, 0)?;
	println!("wrote {written} bytes to {}", path.display());

	let producers = [
		Some(Producer { name: "alpha", outstanding: 8, granted: Cell::new(0) }),
		None,
		Some(Producer { name: "beta", outstanding: 0, granted: Cell::new(0) }),
		Some(Producer { name: "gamma", outstanding: 16, granted: Cell::new(0) }),
	];
	CreditDistributor::new().distribute(32, &producers);
	for producer in producers.iter().flatten() {
		println!("{}: granted {}", producer.name, producer.granted.get());
	}
	Ok(())
}
