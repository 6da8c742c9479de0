/// Fixed-size plain values that can travel as a record payload.
///
/// Encoding is the host's native byte order: the store is a same-host
/// shared-memory format, so both sides see identical layout by
/// construction. Implementations exist for the integer primitives, `bool`,
/// and `[u8; N]`.
///
/// `put` and `take` operate on a buffer of exactly [`FixedValue::SIZE`]
/// bytes; anything else is a caller bug and panics.
pub trait FixedValue: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Write the encoding into `buf`.
    fn put(&self, buf: &mut [u8]);

    /// Read a value back out of `buf`.
    fn take(buf: &[u8]) -> Self;
}

macro_rules! fixed_value_int {
    ($($t:ty),* $(,)?) => {$(
        impl FixedValue for $t {
            const SIZE: usize = std::mem::size_of::<$t>();

            fn put(&self, buf: &mut [u8]) {
                buf.copy_from_slice(&self.to_ne_bytes());
            }

            fn take(buf: &[u8]) -> Self {
                Self::from_ne_bytes(buf.try_into().unwrap())
            }
        }
    )*};
}

fixed_value_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl FixedValue for bool {
    const SIZE: usize = 1;

    fn put(&self, buf: &mut [u8]) {
        buf[0] = u8::from(*self);
    }

    fn take(buf: &[u8]) -> Self {
        buf[0] != 0
    }
}

impl<const N: usize> FixedValue for [u8; N] {
    const SIZE: usize = N;

    fn put(&self, buf: &mut [u8]) {
        buf.copy_from_slice(self);
    }

    fn take(buf: &[u8]) -> Self {
        buf.try_into().unwrap()
    }
}
