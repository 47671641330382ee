// SPDX-License-Identifier: Apache-2.0

use std::mem;

/// The widest [`Element`], bounding the stack buffer used by typed reads.
pub(crate) const MAX_ELEMENT_SIZE: usize = 16;

mod sealed {
	pub trait Sealed { }
}

/// A primitive element read from a buffer by absolute index, like a byte or
/// other integer. Defines conversion from raw bytes in either byte order.
///
/// This trait is sealed; it's implemented for the integer and float primitives
/// only, none wider than 16 bytes.
pub trait Element: Copy + Sized + sealed::Sealed {
	const SIZE: usize = mem::size_of::<Self>();

	/// Converts from big-endian bytes. `bytes` is exactly [`Self::SIZE`] long.
	fn from_be_slice(bytes: &[u8]) -> Self;
	/// Converts from little-endian bytes. `bytes` is exactly [`Self::SIZE`] long.
	fn from_le_slice(bytes: &[u8]) -> Self;
}

macro_rules! generate {
    ($($ty:ident)+) => {
		$(
		impl sealed::Sealed for $ty { }

		impl Element for $ty {
			#[inline]
			fn from_be_slice(bytes: &[u8]) -> Self {
				let mut array = [0; mem::size_of::<$ty>()];
				array.copy_from_slice(bytes);
				$ty::from_be_bytes(array)
			}

			#[inline]
			fn from_le_slice(bytes: &[u8]) -> Self {
				let mut array = [0; mem::size_of::<$ty>()];
				array.copy_from_slice(bytes);
				$ty::from_le_bytes(array)
			}
		}
		)+
	};
}

generate! { u8 i8 u16 i16 u32 i32 u64 i64 u128 i128 f32 f64 }

#[cfg(test)]
mod test {
	use super::{Element, MAX_ELEMENT_SIZE};

	fn fits<T: Element>() -> bool { T::SIZE <= MAX_ELEMENT_SIZE }

	#[test]
	fn primitives_fit_read_buffer() {
		assert!(fits::<u8>() && fits::<i8>());
		assert!(fits::<u16>() && fits::<i16>());
		assert!(fits::<u32>() && fits::<i32>() && fits::<f32>());
		assert!(fits::<u64>() && fits::<i64>() && fits::<f64>());
		assert_eq!(u128::SIZE, MAX_ELEMENT_SIZE);
		assert_eq!(i128::SIZE, MAX_ELEMENT_SIZE);
	}
}
