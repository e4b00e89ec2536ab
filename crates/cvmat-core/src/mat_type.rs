use crate::error::MatError;

/// Number of bits the channel count is shifted by inside a type code.
const CHANNEL_SHIFT: i32 = 3;

/// Highest channel count a [`MatType`] can describe.
pub const MAX_CHANNELS: usize = 4;

/// Element depth of a mat, with the wrapped library's numeric codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum Depth {
    /// 8-bit unsigned integer.
    U8 = 0,
    /// 8-bit signed integer.
    S8 = 1,
    /// 16-bit unsigned integer.
    U16 = 2,
    /// 16-bit signed integer.
    S16 = 3,
    /// 32-bit signed integer.
    S32 = 4,
    /// 32-bit float.
    F32 = 5,
    /// 64-bit float.
    F64 = 6,
}

impl Depth {
    /// Size in bytes of one scalar of this depth.
    pub const fn size(self) -> usize {
        match self {
            Depth::U8 | Depth::S8 => 1,
            Depth::U16 | Depth::S16 => 2,
            Depth::S32 | Depth::F32 => 4,
            Depth::F64 => 8,
        }
    }

    /// Returns true for the floating point depths.
    pub const fn is_float(self) -> bool {
        matches!(self, Depth::F32 | Depth::F64)
    }
}

impl TryFrom<i32> for Depth {
    type Error = MatError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => Depth::U8,
            1 => Depth::S8,
            2 => Depth::U16,
            3 => Depth::S16,
            4 => Depth::S32,
            5 => Depth::F32,
            6 => Depth::F64,
            _ => return Err(MatError::InvalidMatType(code)),
        })
    }
}

/// Element type of a mat: a depth and an interleaved channel count.
///
/// The integer code matches the wrapped library, `depth + (channels - 1) * 8`.
///
/// # Examples
///
/// ```
/// use cvmat_core::{Depth, MatType};
///
/// assert_eq!(MatType::CV_8UC3.code(), 16);
/// assert_eq!(MatType::CV_8UC3.depth(), Depth::U8);
/// assert_eq!(MatType::CV_8UC3.elem_size(), 3);
/// assert_eq!(MatType::try_from(11).unwrap(), MatType::CV_16SC2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MatType {
    depth: Depth,
    channels: u8,
}

macro_rules! mat_type_consts {
    ($($name:ident => ($depth:ident, $channels:expr)),* $(,)?) => {
        $(
            #[doc = concat!("`", stringify!($name), "` element type.")]
            pub const $name: MatType = MatType::from_parts(Depth::$depth, $channels);
        )*
    };
}

impl MatType {
    const fn from_parts(depth: Depth, channels: u8) -> Self {
        Self { depth, channels }
    }

    /// Creates a mat type from a depth and a channel count in `1..=4`.
    pub fn new(depth: Depth, channels: usize) -> Result<Self, MatError> {
        if channels == 0 || channels > MAX_CHANNELS {
            return Err(MatError::InvalidMatType(
                depth as i32 + ((channels as i32 - 1) << CHANNEL_SHIFT),
            ));
        }
        Ok(Self::from_parts(depth, channels as u8))
    }

    mat_type_consts! {
        CV_8UC1 => (U8, 1), CV_8UC2 => (U8, 2), CV_8UC3 => (U8, 3), CV_8UC4 => (U8, 4),
        CV_8SC1 => (S8, 1), CV_8SC2 => (S8, 2), CV_8SC3 => (S8, 3), CV_8SC4 => (S8, 4),
        CV_16UC1 => (U16, 1), CV_16UC2 => (U16, 2), CV_16UC3 => (U16, 3), CV_16UC4 => (U16, 4),
        CV_16SC1 => (S16, 1), CV_16SC2 => (S16, 2), CV_16SC3 => (S16, 3), CV_16SC4 => (S16, 4),
        CV_32SC1 => (S32, 1), CV_32SC2 => (S32, 2), CV_32SC3 => (S32, 3), CV_32SC4 => (S32, 4),
        CV_32FC1 => (F32, 1), CV_32FC2 => (F32, 2), CV_32FC3 => (F32, 3), CV_32FC4 => (F32, 4),
        CV_64FC1 => (F64, 1), CV_64FC2 => (F64, 2), CV_64FC3 => (F64, 3), CV_64FC4 => (F64, 4),
    }

    /// Returns the element depth.
    #[inline]
    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// Returns the number of interleaved channels.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels as usize
    }

    /// Size in bytes of one element (all channels).
    #[inline]
    pub fn elem_size(&self) -> usize {
        self.depth.size() * self.channels()
    }

    /// Size in bytes of one channel of an element.
    #[inline]
    pub fn elem_size1(&self) -> usize {
        self.depth.size()
    }

    /// Same depth with a different number of channels.
    pub fn with_channels(&self, channels: usize) -> Result<Self, MatError> {
        Self::new(self.depth, channels)
    }

    /// Same channel count with a different depth.
    pub fn with_depth(&self, depth: Depth) -> Self {
        Self::from_parts(depth, self.channels)
    }

    /// The integer code understood by the wrapped library.
    pub fn code(&self) -> i32 {
        self.depth as i32 + ((self.channels as i32 - 1) << CHANNEL_SHIFT)
    }
}

impl TryFrom<i32> for MatType {
    type Error = MatError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        if code < 0 {
            return Err(MatError::InvalidMatType(code));
        }
        let depth = Depth::try_from(code & ((1 << CHANNEL_SHIFT) - 1))
            .map_err(|_| MatError::InvalidMatType(code))?;
        let channels = ((code >> CHANNEL_SHIFT) + 1) as usize;
        Self::new(depth, channels).map_err(|_| MatError::InvalidMatType(code))
    }
}

impl From<MatType> for i32 {
    fn from(mt: MatType) -> Self {
        mt.code()
    }
}

impl std::fmt::Display for MatType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let depth = match self.depth {
            Depth::U8 => "8U",
            Depth::S8 => "8S",
            Depth::U16 => "16U",
            Depth::S16 => "16S",
            Depth::S32 => "32S",
            Depth::F32 => "32F",
            Depth::F64 => "64F",
        };
        write!(f, "CV_{}C{}", depth, self.channels)
    }
}

/// Scalar types that can be read from and written to a mat.
///
/// Each implementation is tied to exactly one [`Depth`]; accessors refuse to
/// reinterpret storage of a different depth.
pub trait DataType:
    Copy + Default + PartialEq + std::fmt::Debug + num_traits::NumCast + Send + Sync + 'static
{
    /// The depth this scalar type is stored as.
    const DEPTH: Depth;

    /// Reads a scalar from native-endian bytes. `bytes` has exactly `DEPTH.size()` bytes.
    fn read(bytes: &[u8]) -> Self;

    /// Writes the scalar as native-endian bytes into `bytes`.
    fn write(self, bytes: &mut [u8]);

    /// Converts from `f64` with rounding and saturation for integer depths.
    fn saturate_from_f64(value: f64) -> Self;
}

macro_rules! impl_data_type {
    (@rw $t:ty) => {
        #[inline]
        fn read(bytes: &[u8]) -> Self {
            let mut raw = [0u8; std::mem::size_of::<$t>()];
            raw.copy_from_slice(bytes);
            <$t>::from_ne_bytes(raw)
        }

        #[inline]
        fn write(self, bytes: &mut [u8]) {
            bytes.copy_from_slice(&self.to_ne_bytes());
        }
    };
    ($t:ty, $depth:ident, int) => {
        impl DataType for $t {
            const DEPTH: Depth = Depth::$depth;
            impl_data_type!(@rw $t);
            fn saturate_from_f64(value: f64) -> Self {
                // `as` saturates at the bounds and maps NaN to zero
                value.round() as $t
            }
        }
    };
    ($t:ty, $depth:ident, float) => {
        impl DataType for $t {
            const DEPTH: Depth = Depth::$depth;
            impl_data_type!(@rw $t);
            fn saturate_from_f64(value: f64) -> Self {
                value as $t
            }
        }
    };
}

impl_data_type!(u8, U8, int);
impl_data_type!(i8, S8, int);
impl_data_type!(u16, U16, int);
impl_data_type!(i16, S16, int);
impl_data_type!(i32, S32, int);
impl_data_type!(f32, F32, float);
impl_data_type!(f64, F64, float);

/// Reads one scalar of any depth as `f64`.
pub(crate) fn read_as_f64(depth: Depth, bytes: &[u8]) -> f64 {
    fn widen<T: DataType>(bytes: &[u8]) -> f64 {
        num_traits::cast::<T, f64>(T::read(bytes)).unwrap_or_default()
    }
    match depth {
        Depth::U8 => widen::<u8>(bytes),
        Depth::S8 => widen::<i8>(bytes),
        Depth::U16 => widen::<u16>(bytes),
        Depth::S16 => widen::<i16>(bytes),
        Depth::S32 => widen::<i32>(bytes),
        Depth::F32 => widen::<f32>(bytes),
        Depth::F64 => widen::<f64>(bytes),
    }
}

/// Writes an `f64` into one scalar slot of any depth, saturating.
pub(crate) fn write_saturated(depth: Depth, value: f64, bytes: &mut [u8]) {
    match depth {
        Depth::U8 => u8::saturate_from_f64(value).write(bytes),
        Depth::S8 => i8::saturate_from_f64(value).write(bytes),
        Depth::U16 => u16::saturate_from_f64(value).write(bytes),
        Depth::S16 => i16::saturate_from_f64(value).write(bytes),
        Depth::S32 => i32::saturate_from_f64(value).write(bytes),
        Depth::F32 => f32::saturate_from_f64(value).write(bytes),
        Depth::F64 => f64::saturate_from_f64(value).write(bytes),
    }
}
