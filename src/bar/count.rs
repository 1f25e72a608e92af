use std::fmt::Display;

/// Integer types a [`Bar`](super::Bar) can count in.
///
/// Implemented for every primitive integer width so callers can track
/// `u8` chunk counts or `u128` byte totals without converting.
pub trait Count: Copy + Default + PartialEq + Display + Send + 'static {
    /// Lossy widening used for the fill ratio
    fn as_f64(self) -> f64;
}

macro_rules! impl_count {
    ($($t:ty),* $(,)?) => {
        $(
            impl Count for $t {
                #[inline]
                fn as_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_count!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
