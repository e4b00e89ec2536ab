use crate::{
    allocator::CpuAllocator,
    error::MatError,
    ffi,
    geometry::Rectangle,
    mat_type::{read_as_f64, write_saturated, DataType, MatType},
    storage::MatStorage,
};

/// Where the bytes of a [`Mat`] live.
enum MatData<'a> {
    /// No storage at all.
    Empty,
    /// Storage owned by the mat, allocated or moved in from a caller vector.
    Owned(MatStorage),
    /// Caller bytes or a parent's storage, borrowed for `'a`.
    Borrowed(&'a mut [u8]),
}

/// An n-dimensional dense array handle shared with the wrapped vision library.
///
/// A mat is either empty, owns freshly allocated storage, or wraps caller bytes.
/// Rows are `step` bytes apart; a mat is continuous when there is no padding
/// between rows.
///
/// # Lifetime
///
/// `'a` is the lifetime of the bytes the mat does not own: caller bytes passed to
/// [`Mat::from_bytes`], or the parent of a [`Mat::region`]. Mats owning their
/// storage are `Mat<'static>`. The borrow checker therefore rejects releasing
/// (or reallocating) a wrapped buffer or a parent while the mat is alive.
///
/// # Examples
///
/// ```
/// use cvmat_core::{Mat, MatType, Rectangle};
///
/// let mut mat = Mat::new_with_size(4, 4, MatType::CV_64FC1).unwrap();
/// {
///     let mut roi = mat.region(Rectangle::new(1, 1, 3, 3)).unwrap();
///     roi.set_double_at(0, 0, 5.0).unwrap();
/// }
/// assert_eq!(mat.get_double_at(1, 1).unwrap(), 5.0);
/// ```
pub struct Mat<'a> {
    data: MatData<'a>,
    sizes: Vec<usize>,
    mat_type: MatType,
    step: usize,
}

impl Mat<'static> {
    /// Creates a new empty mat.
    pub fn new() -> Self {
        Self {
            data: MatData::Empty,
            sizes: Vec::new(),
            mat_type: MatType::CV_8UC1,
            step: 0,
        }
    }

    /// Creates a zero-initialized 2D mat with the given shape and type.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be allocated.
    pub fn new_with_size(rows: usize, cols: usize, mat_type: MatType) -> Result<Self, MatError> {
        Self::new_with_sizes(&[rows, cols], mat_type)
    }

    /// Creates a zero-initialized mat with an arbitrary number of dimensions.
    ///
    /// The first dimension plays the role of rows; a "row" spans all remaining
    /// dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two dimensions are given or the storage
    /// cannot be allocated.
    pub fn new_with_sizes(sizes: &[usize], mat_type: MatType) -> Result<Self, MatError> {
        if sizes.len() < 2 {
            return Err(MatError::unsupported_operation(
                "new_with_sizes",
                format!("a mat needs at least 2 dimensions, got {}", sizes.len()),
            ));
        }

        let (row_len, len) =
            shape_bytes(sizes, mat_type).ok_or_else(|| MatError::ShapeOverflow(sizes.to_vec()))?;

        let data = if len == 0 {
            MatData::Empty
        } else {
            log::debug!("allocating {len} bytes for a {sizes:?} {mat_type} mat");
            MatData::Owned(MatStorage::zeros(len, CpuAllocator)?)
        };

        Ok(Self {
            data,
            sizes: sizes.to_vec(),
            mat_type,
            step: row_len,
        })
    }

    /// Creates a mat that takes ownership of a caller vector, without copying.
    ///
    /// # Errors
    ///
    /// Returns [`MatError::EmptyInput`] for an empty vector and
    /// [`MatError::InvalidShape`] if the length does not match the shape and type.
    pub fn from_vec(
        rows: usize,
        cols: usize,
        mat_type: MatType,
        data: Vec<u8>,
    ) -> Result<Self, MatError> {
        let step = check_bytes_len(rows, cols, mat_type, data.len())?;
        Ok(Self {
            data: MatData::Owned(MatStorage::from_vec(data)),
            sizes: vec![rows, cols],
            mat_type,
            step,
        })
    }

    /// Creates a single or multi channel mat from typed scalars, copying them.
    ///
    /// `data` holds `rows * cols * channels` interleaved scalars.
    ///
    /// # Errors
    ///
    /// Returns an error if `channels` is not in `1..=4` or the data length does
    /// not match the shape.
    pub fn from_slice<T: DataType>(
        rows: usize,
        cols: usize,
        channels: usize,
        data: &[T],
    ) -> Result<Self, MatError> {
        let mat_type = MatType::new(T::DEPTH, channels)?;
        let scalar = T::DEPTH.size();
        let mut bytes = vec![0u8; data.len() * scalar];
        for (chunk, &value) in bytes.chunks_exact_mut(scalar).zip(data) {
            value.write(chunk);
        }
        Self::from_vec(rows, cols, mat_type, bytes)
    }
}

impl Default for Mat<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Mat<'a> {
    /// Creates a mat over caller bytes without copying them.
    ///
    /// The mat borrows `data` for its whole lifetime, so the buffer outlives every
    /// read the wrapped library may do through the mat.
    ///
    /// # Errors
    ///
    /// Returns [`MatError::EmptyInput`] for an empty buffer and
    /// [`MatError::InvalidShape`] if the length does not match the shape and type.
    ///
    /// # Examples
    ///
    /// ```
    /// use cvmat_core::{Mat, MatType};
    ///
    /// let mut bytes = vec![1u8, 2, 3, 4, 5, 6];
    /// let mat = Mat::from_bytes(2, 3, MatType::CV_8UC1, &mut bytes).unwrap();
    /// assert_eq!(mat.to_bytes(), vec![1, 2, 3, 4, 5, 6]);
    /// ```
    pub fn from_bytes(
        rows: usize,
        cols: usize,
        mat_type: MatType,
        data: &'a mut [u8],
    ) -> Result<Self, MatError> {
        let step = check_bytes_len(rows, cols, mat_type, data.len())?;
        Ok(Self {
            data: MatData::Borrowed(data),
            sizes: vec![rows, cols],
            mat_type,
            step,
        })
    }

    /// Releases the mat. The backing buffer reference is dropped after the handle.
    pub fn close(self) {
        log::trace!("closing {:?}", self);
        drop(self)
    }

    /// Returns true if the mat has no elements.
    #[inline]
    pub fn empty(&self) -> bool {
        self.total() == 0
    }

    /// Number of rows, the size of the first dimension.
    #[inline]
    pub fn rows(&self) -> usize {
        self.sizes.first().copied().unwrap_or(0)
    }

    /// Number of columns, the size of the second dimension.
    #[inline]
    pub fn cols(&self) -> usize {
        self.sizes.get(1).copied().unwrap_or(0)
    }

    /// Number of dimensions, 0 for a mat created with [`Mat::new`].
    #[inline]
    pub fn dims(&self) -> usize {
        self.sizes.len()
    }

    /// Number of interleaved channels.
    #[inline]
    pub fn channels(&self) -> usize {
        self.mat_type.channels()
    }

    /// Element type.
    #[inline]
    pub fn mat_type(&self) -> MatType {
        self.mat_type
    }

    /// Number of bytes each row occupies, padding included.
    #[inline]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Size in bytes of one element.
    #[inline]
    pub fn elem_size(&self) -> usize {
        self.mat_type.elem_size()
    }

    /// Total number of elements.
    pub fn total(&self) -> usize {
        if self.sizes.is_empty() {
            return 0;
        }
        self.sizes.iter().product()
    }

    /// The size of every dimension.
    pub fn size(&self) -> Vec<usize> {
        self.sizes.clone()
    }

    /// Returns true if there is no padding between rows.
    pub fn is_continuous(&self) -> bool {
        self.rows() <= 1 || self.step == self.row_len()
    }

    /// Number of meaningful bytes in a row.
    fn row_len(&self) -> usize {
        if self.sizes.len() < 2 {
            return 0;
        }
        self.sizes[1..].iter().product::<usize>() * self.elem_size()
    }

    fn bytes(&self) -> &[u8] {
        match &self.data {
            MatData::Empty => &[],
            MatData::Owned(storage) => storage.as_slice(),
            MatData::Borrowed(bytes) => &bytes[..],
        }
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        match &mut self.data {
            MatData::Empty => &mut [],
            MatData::Owned(storage) => storage.as_mut_slice(),
            MatData::Borrowed(bytes) => &mut bytes[..],
        }
    }

    fn row(&self, row: usize) -> &[u8] {
        let start = row * self.step;
        &self.bytes()[start..start + self.row_len()]
    }

    fn row_mut(&mut self, row: usize) -> &mut [u8] {
        let start = row * self.step;
        let len = self.row_len();
        &mut self.bytes_mut()[start..start + len]
    }

    /// Copies the elements into a compact byte vector, row by row.
    ///
    /// Row padding of non-continuous mats is skipped.
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.is_continuous() {
            let len = self.rows() * self.row_len();
            return self.bytes()[..len].to_vec();
        }
        let mut out = Vec::with_capacity(self.rows() * self.row_len());
        for r in 0..self.rows() {
            out.extend_from_slice(self.row(r));
        }
        out
    }

    /// Returns a slice that references the mat's bytes.
    ///
    /// # Errors
    ///
    /// Returns [`MatError::NotContinuous`] if rows are padded, since a flat view
    /// would misrepresent row boundaries.
    pub fn data_ptr_u8(&self) -> Result<&[u8], MatError> {
        if !self.is_continuous() {
            return Err(MatError::NotContinuous);
        }
        let len = self.rows() * self.row_len();
        Ok(&self.bytes()[..len])
    }

    /// Returns a mutable slice that references the mat's bytes.
    ///
    /// # Errors
    ///
    /// Returns [`MatError::NotContinuous`] if rows are padded.
    pub fn data_ptr_u8_mut(&mut self) -> Result<&mut [u8], MatError> {
        if !self.is_continuous() {
            return Err(MatError::NotContinuous);
        }
        let len = self.rows() * self.row_len();
        Ok(&mut self.bytes_mut()[..len])
    }

    /// Byte offset of the scalar at `(row, col)` after checking type and bounds.
    ///
    /// `col` indexes the `cols * channels` scalars of a row.
    fn scalar_offset<T: DataType>(&self, row: usize, col: usize) -> Result<usize, MatError> {
        if self.dims() != 2 {
            return Err(MatError::unsupported_operation(
                "element access",
                format!("expected a 2D mat, got {} dimensions", self.dims()),
            ));
        }
        if T::DEPTH != self.mat_type.depth() {
            return Err(MatError::TypeMismatch {
                expected: T::DEPTH,
                actual: self.mat_type.depth(),
            });
        }
        if row >= self.rows() {
            return Err(MatError::index_out_of_bounds(row, self.rows()));
        }
        let scalars = self.cols() * self.channels();
        if col >= scalars {
            return Err(MatError::index_out_of_bounds(col, scalars));
        }
        Ok(row * self.step + col * T::DEPTH.size())
    }

    /// Reads the scalar at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`MatError::TypeMismatch`] if `T` does not match the mat depth and
    /// [`MatError::IndexOutOfBounds`] outside the mat.
    pub fn at<T: DataType>(&self, row: usize, col: usize) -> Result<T, MatError> {
        let offset = self.scalar_offset::<T>(row, col)?;
        Ok(T::read(&self.bytes()[offset..offset + T::DEPTH.size()]))
    }

    /// Writes the scalar at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Same as [`Mat::at`].
    pub fn set_at<T: DataType>(&mut self, row: usize, col: usize, value: T) -> Result<(), MatError> {
        let offset = self.scalar_offset::<T>(row, col)?;
        value.write(&mut self.bytes_mut()[offset..offset + T::DEPTH.size()]);
        Ok(())
    }

    /// Reads a `CV_8U` value.
    pub fn get_uchar_at(&self, row: usize, col: usize) -> Result<u8, MatError> {
        self.at(row, col)
    }

    /// Writes a `CV_8U` value.
    pub fn set_uchar_at(&mut self, row: usize, col: usize, value: u8) -> Result<(), MatError> {
        self.set_at(row, col, value)
    }

    /// Reads a `CV_32S` value.
    pub fn get_int_at(&self, row: usize, col: usize) -> Result<i32, MatError> {
        self.at(row, col)
    }

    /// Writes a `CV_32S` value.
    pub fn set_int_at(&mut self, row: usize, col: usize, value: i32) -> Result<(), MatError> {
        self.set_at(row, col, value)
    }

    /// Reads a `CV_32F` value.
    pub fn get_float_at(&self, row: usize, col: usize) -> Result<f32, MatError> {
        self.at(row, col)
    }

    /// Writes a `CV_32F` value.
    pub fn set_float_at(&mut self, row: usize, col: usize, value: f32) -> Result<(), MatError> {
        self.set_at(row, col, value)
    }

    /// Reads a `CV_64F` value.
    pub fn get_double_at(&self, row: usize, col: usize) -> Result<f64, MatError> {
        self.at(row, col)
    }

    /// Writes a `CV_64F` value.
    pub fn set_double_at(&mut self, row: usize, col: usize, value: f64) -> Result<(), MatError> {
        self.set_at(row, col, value)
    }

    /// Returns a mat aliasing a sub-rectangle of this one.
    ///
    /// Writes through the region are visible in this mat. The region mutably
    /// borrows its parent, so the parent cannot be released, resized or
    /// otherwise touched until the region is gone.
    ///
    /// # Errors
    ///
    /// Returns [`MatError::RegionOutOfBounds`] if the rectangle is empty or not
    /// fully inside the mat.
    pub fn region(&mut self, rect: Rectangle) -> Result<Mat<'_>, MatError> {
        let (rows, cols) = (self.rows(), self.cols());
        let out_of_bounds = self.dims() != 2
            || rect.is_empty()
            || rect.min.x < 0
            || rect.min.y < 0
            || rect.max.x as usize > cols
            || rect.max.y as usize > rows;
        if out_of_bounds {
            return Err(MatError::RegionOutOfBounds {
                x: rect.min.x,
                y: rect.min.y,
                width: rect.dx(),
                height: rect.dy(),
                cols,
                rows,
            });
        }

        let (x, y) = (rect.min.x as usize, rect.min.y as usize);
        let (width, height) = (rect.dx() as usize, rect.dy() as usize);
        let elem_size = self.elem_size();
        let mat_type = self.mat_type;
        let step = self.step;
        let start = y * step + x * elem_size;
        let len = (height - 1) * step + width * elem_size;

        log::trace!("region {rect:?} of a {rows}x{cols} mat, bytes {start}..{}", start + len);

        Ok(Mat {
            data: MatData::Borrowed(&mut self.bytes_mut()[start..start + len]),
            sizes: vec![height, width],
            mat_type,
            step,
        })
    }

    /// Returns a deep copy that owns its storage and borrows nothing.
    pub fn detach(&self) -> Mat<'static> {
        if self.total() == 0 {
            return Mat {
                data: MatData::Empty,
                sizes: self.sizes.clone(),
                mat_type: self.mat_type,
                step: self.row_len(),
            };
        }
        Mat {
            data: MatData::Owned(MatStorage::from_vec(self.to_bytes())),
            sizes: self.sizes.clone(),
            mat_type: self.mat_type,
            step: self.row_len(),
        }
    }

    /// Makes sure the mat has the given shape and type.
    ///
    /// Existing storage is kept when shape and type already match, otherwise the
    /// mat is reallocated (zero-filled) and stops aliasing whatever it borrowed.
    pub fn create(&mut self, rows: usize, cols: usize, mat_type: MatType) -> Result<(), MatError> {
        self.create_with_sizes(&[rows, cols], mat_type)
    }

    /// N-dimensional version of [`Mat::create`].
    pub fn create_with_sizes(&mut self, sizes: &[usize], mat_type: MatType) -> Result<(), MatError> {
        if self.sizes == sizes && self.mat_type == mat_type {
            return Ok(());
        }
        *self = Mat::new_with_sizes(sizes, mat_type)?;
        Ok(())
    }

    /// Copies this mat into `dst`, reallocating `dst` if shape or type differ.
    ///
    /// When `dst` already matches (for example a region of the right size) the
    /// bytes are written in place.
    pub fn copy_to(&self, dst: &mut Mat<'_>) -> Result<(), MatError> {
        if self.dims() == 0 {
            *dst = Mat::new();
            return Ok(());
        }
        dst.create_with_sizes(&self.sizes, self.mat_type)?;
        for r in 0..self.rows() {
            dst.row_mut(r).copy_from_slice(self.row(r));
        }
        Ok(())
    }

    /// Overwrites the mat with compact bytes of the given shape and type.
    ///
    /// # Errors
    ///
    /// Returns [`MatError::InvalidShape`] if `bytes` does not hold exactly
    /// `rows * cols` elements.
    pub fn assign(
        &mut self,
        rows: usize,
        cols: usize,
        mat_type: MatType,
        bytes: &[u8],
    ) -> Result<(), MatError> {
        let (_, expected) = shape_bytes(&[rows, cols], mat_type)
            .ok_or_else(|| MatError::ShapeOverflow(vec![rows, cols]))?;
        if bytes.len() != expected {
            return Err(MatError::InvalidShape {
                expected,
                actual: bytes.len(),
            });
        }
        self.create(rows, cols, mat_type)?;
        let row_len = self.row_len();
        if row_len == 0 {
            return Ok(());
        }
        for (r, chunk) in bytes.chunks_exact(row_len).enumerate() {
            self.row_mut(r).copy_from_slice(chunk);
        }
        Ok(())
    }

    /// Converts the elements to the depth of `mat_type`, keeping the channel count.
    ///
    /// Values are rounded and saturated when the target depth is an integer one.
    pub fn convert_to(&self, dst: &mut Mat<'_>, mat_type: MatType) -> Result<(), MatError> {
        let target = self.mat_type.with_depth(mat_type.depth());
        if target == self.mat_type {
            return self.copy_to(dst);
        }
        dst.create_with_sizes(&self.sizes, target)?;

        let (src_depth, dst_depth) = (self.mat_type.depth(), target.depth());
        let (src_size, dst_size) = (src_depth.size(), dst_depth.size());
        for r in 0..self.rows() {
            let src_row = self.row(r);
            let dst_row = dst.row_mut(r);
            for (s, d) in src_row
                .chunks_exact(src_size)
                .zip(dst_row.chunks_exact_mut(dst_size))
            {
                write_saturated(dst_depth, read_as_f64(src_depth, s), d);
            }
        }
        Ok(())
    }

    /// Splits a multi-channel mat into one single-channel mat per channel.
    ///
    /// Each returned mat has the source extents and owns its storage.
    pub fn split(&self) -> Result<Vec<Mat<'static>>, MatError> {
        if self.dims() == 0 {
            return Ok(Vec::new());
        }
        let channels = self.channels();
        let plane_type = self.mat_type.with_channels(1)?;
        let scalar = self.mat_type.elem_size1();

        let mut planes = (0..channels)
            .map(|_| Mat::new_with_sizes(&self.sizes, plane_type))
            .collect::<Result<Vec<_>, _>>()?;

        log::trace!("splitting {} into {channels} planes", self.mat_type);

        for r in 0..self.rows() {
            let src_row = self.row(r);
            for (c, plane) in planes.iter_mut().enumerate() {
                let dst_row = plane.row_mut(r);
                for (dst, src) in dst_row
                    .chunks_exact_mut(scalar)
                    .zip(src_row.chunks_exact(scalar * channels))
                {
                    dst.copy_from_slice(&src[c * scalar..(c + 1) * scalar]);
                }
            }
        }
        Ok(planes)
    }

    /// Borrowed descriptor for the wrapped library, for read-only use.
    ///
    /// # Errors
    ///
    /// Returns [`MatError::UnsupportedOperation`] for mats with more than two
    /// dimensions, which the descriptor cannot express, and
    /// [`MatError::LengthOverflow`] if an extent exceeds the native `int`.
    pub fn as_raw(&self) -> Result<ffi::MatView, MatError> {
        if self.dims() > 2 {
            return Err(MatError::unsupported_operation(
                "as_raw",
                format!("the native descriptor is 2D, the mat has {} dimensions", self.dims()),
            ));
        }
        let data = if self.empty() {
            std::ptr::null_mut()
        } else {
            self.bytes().as_ptr() as *mut u8
        };
        Ok(ffi::MatView {
            data,
            rows: ffi::to_c_len(self.rows())?,
            cols: ffi::to_c_len(self.cols())?,
            mat_type: self.mat_type.code(),
            step: self.step,
        })
    }

    /// Borrowed descriptor for the wrapped library, allowing writes.
    ///
    /// # Errors
    ///
    /// Same as [`Mat::as_raw`].
    pub fn as_raw_mut(&mut self) -> Result<ffi::MatView, MatError> {
        let mut view = self.as_raw()?;
        if !self.empty() {
            view.data = self.bytes_mut().as_mut_ptr();
        }
        Ok(view)
    }

    /// Copies a mat allocated by the wrapped library into this one.
    ///
    /// # Safety
    ///
    /// `buffer.data` must describe `rows * cols` compact elements of
    /// `buffer.mat_type`, valid for reads, or be null for an empty result.
    pub unsafe fn assign_from_raw(&mut self, buffer: &ffi::MatBuffer) -> Result<(), MatError> {
        if buffer.data.data.is_null() || buffer.rows <= 0 || buffer.cols <= 0 {
            *self = Mat::new();
            return Ok(());
        }
        let mat_type = MatType::try_from(buffer.mat_type)?;
        let bytes = ffi::from_byte_array(&buffer.data);
        self.assign(buffer.rows as usize, buffer.cols as usize, mat_type, &bytes)
    }
}

impl Clone for Mat<'_> {
    /// Deep copy. The clone never shares storage with the source.
    fn clone(&self) -> Self {
        self.detach()
    }
}

impl std::fmt::Debug for Mat<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.data {
            MatData::Empty => "empty",
            MatData::Owned(_) => "owned",
            MatData::Borrowed(_) => "borrowed",
        };
        f.debug_struct("Mat")
            .field("sizes", &self.sizes)
            .field("mat_type", &self.mat_type)
            .field("step", &self.step)
            .field("data", &kind)
            .finish()
    }
}

/// Validates a caller buffer against a 2D shape and returns the row step.
fn check_bytes_len(
    rows: usize,
    cols: usize,
    mat_type: MatType,
    len: usize,
) -> Result<usize, MatError> {
    if len == 0 {
        return Err(MatError::EmptyInput);
    }
    let (step, expected) = shape_bytes(&[rows, cols], mat_type)
        .ok_or_else(|| MatError::ShapeOverflow(vec![rows, cols]))?;
    if expected != len {
        return Err(MatError::InvalidShape {
            expected,
            actual: len,
        });
    }
    Ok(step)
}

/// Bytes per row and in total for `sizes`, or `None` on overflow.
fn shape_bytes(sizes: &[usize], mat_type: MatType) -> Option<(usize, usize)> {
    let row_len = sizes[1..]
        .iter()
        .try_fold(mat_type.elem_size(), |acc, &n| acc.checked_mul(n))?;
    Some((row_len, sizes[0].checked_mul(row_len)?))
}
