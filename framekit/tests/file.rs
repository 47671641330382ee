// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::io::Write;
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;
use framekit::{CompositeView, ErrorKind};

fn frame() -> CompositeView<Vec<u8>, 3> {
	CompositeView::triple(b"HDR:".to_vec(), b"meta;".to_vec(), b"payload".to_vec())
}

#[test]
fn write_at_position() {
	let mut file = NamedTempFile::new().unwrap();
	file.write_all(b"................").unwrap();

	let written = frame().write_at(2, 10, file.as_file(), 3).unwrap();
	assert_eq!(written, 10);
	assert_eq!(fs::read(file.path()).unwrap(), b"...R:meta;pay...");
}

#[test]
fn write_at_extends_file() {
	let file = NamedTempFile::new().unwrap();
	let view = frame();
	let written = view.write_at(0, view.capacity(), file.as_file(), 0).unwrap();
	assert_eq!(written, 16);
	assert_eq!(fs::read(file.path()).unwrap(), b"HDR:meta;payload");
}

#[test]
fn write_at_leaves_cursor() {
	let mut file = NamedTempFile::new().unwrap();
	frame().write_at(4, 5, file.as_file(), 8).unwrap();
	file.write_all(b"head").unwrap();

	let mut expected = b"head".to_vec();
	expected.resize(8, 0);
	expected.extend_from_slice(b"meta;");
	assert_eq!(fs::read(file.path()).unwrap(), expected);
}

#[test]
fn write_at_out_of_bounds() {
	let file = NamedTempFile::new().unwrap();
	let error = frame().write_at(10, 7, file.as_file(), 0).unwrap_err();
	assert_eq!(error.kind(), ErrorKind::OutOfBounds);
	assert_eq!(fs::read(file.path()).unwrap(), b"");
}

#[test]
fn write_to_file() {
	let mut file = NamedTempFile::new().unwrap();
	assert_eq!(frame().write_to(4, 12, &mut file).unwrap(), 12);
	assert_eq!(fs::read(file.path()).unwrap(), b"meta;payload");
}
