use crate::{
    error::MatError,
    ffi,
    geometry::{Point, Point2f},
};

macro_rules! point_vector {
    ($(#[$meta:meta])* $name:ident, $point:ty, $raw:ty, $ffi:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct $name(Vec<$raw>);

        impl $name {
            /// Creates a new empty vector.
            pub fn new() -> Self {
                Self(Vec::new())
            }

            /// Creates a vector holding a copy of `points`, in order.
            pub fn from_points(points: &[$point]) -> Self {
                Self(points.iter().map(|&p| <$raw>::from(p)).collect())
            }

            /// Number of points.
            #[inline]
            pub fn size(&self) -> usize {
                self.0.len()
            }

            /// Returns true if the vector holds no point.
            #[inline]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Returns the point at `idx`, or the zero point when `idx` is out of range.
            ///
            /// Use [`Self::get`] to tell a missing point apart from a stored zero.
            pub fn at(&self, idx: usize) -> $point {
                match self.get(idx) {
                    Some(p) => p,
                    None => {
                        log::warn!(
                            "{}::at({idx}) out of range for size {}, returning zero",
                            stringify!($name),
                            self.size()
                        );
                        <$point>::default()
                    }
                }
            }

            /// Returns the point at `idx`, if any.
            pub fn get(&self, idx: usize) -> Option<$point> {
                self.0.get(idx).map(|&p| p.into())
            }

            /// Replaces the point at `idx`.
            ///
            /// # Errors
            ///
            /// Returns [`MatError::IndexOutOfBounds`] when `idx >= size`.
            pub fn set(&mut self, idx: usize, point: $point) -> Result<(), MatError> {
                let size = self.size();
                let slot = self
                    .0
                    .get_mut(idx)
                    .ok_or(MatError::index_out_of_bounds(idx, size))?;
                *slot = point.into();
                Ok(())
            }

            /// Adds a point at the end.
            pub fn append(&mut self, point: $point) {
                self.0.push(point.into());
            }

            /// Copies the points out, in order.
            pub fn to_points(&self) -> Vec<$point> {
                self.0.iter().map(|&p| p.into()).collect()
            }

            /// Borrowed descriptor for the wrapped library.
            ///
            /// The descriptor is valid while the vector is neither dropped nor modified.
            ///
            /// # Errors
            ///
            /// Returns [`MatError::LengthOverflow`] if the vector holds more
            /// points than the native `int` can count.
            pub fn as_ffi(&self) -> Result<ffi::$ffi, MatError> {
                Ok(ffi::$ffi {
                    points: self.0.as_ptr(),
                    length: ffi::to_c_len(self.0.len())?,
                })
            }

            /// Releases the vector.
            pub fn close(self) {}
        }

        impl From<Vec<$point>> for $name {
            fn from(points: Vec<$point>) -> Self {
                points.into_iter().collect()
            }
        }

        impl FromIterator<$point> for $name {
            fn from_iter<I: IntoIterator<Item = $point>>(iter: I) -> Self {
                Self(iter.into_iter().map(<$raw>::from).collect())
            }
        }
    };
}

point_vector!(
    /// An owned sequence of integer points.
    ///
    /// # Examples
    ///
    /// ```
    /// use cvmat_core::{Point, PointVector};
    ///
    /// let pv = PointVector::from_points(&[Point::new(1, 2), Point::new(3, 4)]);
    /// assert_eq!(pv.size(), 2);
    /// assert_eq!(pv.at(1), Point::new(3, 4));
    /// assert_eq!(pv.at(5), Point::new(0, 0));
    /// ```
    PointVector,
    Point,
    ffi::Point,
    Points
);

point_vector!(
    /// An owned sequence of single precision points.
    Point2fVector,
    Point2f,
    ffi::Point2f,
    Points2f
);

/// An owned sequence of [`PointVector`]s, such as a set of contours.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointsVector(Vec<PointVector>);

static EMPTY_POINT_VECTOR: PointVector = PointVector(Vec::new());

impl PointsVector {
    /// Creates a new empty vector.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates a vector holding a copy of every inner sequence, in order.
    ///
    /// An empty outer slice gives an empty vector.
    pub fn from_points(points: &[Vec<Point>]) -> Self {
        Self(points.iter().map(|p| PointVector::from_points(p)).collect())
    }

    /// Number of inner vectors.
    #[inline]
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there is no inner vector.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the inner vector at `idx`, or an empty one when out of range.
    pub fn at(&self, idx: usize) -> &PointVector {
        match self.0.get(idx) {
            Some(pv) => pv,
            None => {
                log::warn!(
                    "PointsVector::at({idx}) out of range for size {}, returning empty",
                    self.size()
                );
                &EMPTY_POINT_VECTOR
            }
        }
    }

    /// Returns the inner vector at `idx`, if any.
    pub fn get(&self, idx: usize) -> Option<&PointVector> {
        self.0.get(idx)
    }

    /// Replaces the inner vector at `idx`.
    ///
    /// # Errors
    ///
    /// Returns [`MatError::IndexOutOfBounds`] when `idx >= size`.
    pub fn set(&mut self, idx: usize, points: PointVector) -> Result<(), MatError> {
        let size = self.size();
        let slot = self
            .0
            .get_mut(idx)
            .ok_or(MatError::index_out_of_bounds(idx, size))?;
        *slot = points;
        Ok(())
    }

    /// Moves an inner vector in at the end. `None` leaves the vector untouched.
    pub fn append(&mut self, points: impl Into<Option<PointVector>>) {
        if let Some(points) = points.into() {
            self.0.push(points);
        }
    }

    /// Copies every inner sequence out, in order.
    pub fn to_points(&self) -> Vec<Vec<Point>> {
        self.0.iter().map(PointVector::to_points).collect()
    }

    /// Borrowed descriptors of the inner vectors, to be wrapped in an
    /// [`ffi::Contours`] for the wrapped library.
    ///
    /// The descriptors are valid while `self` is neither dropped nor modified.
    ///
    /// # Errors
    ///
    /// Returns [`MatError::LengthOverflow`] if an inner vector is too long for
    /// the native `int`.
    pub fn as_ffi(&self) -> Result<Vec<ffi::Points>, MatError> {
        self.0.iter().map(PointVector::as_ffi).collect()
    }

    /// Releases the vector and every inner vector.
    pub fn close(self) {}
}

impl From<Vec<PointVector>> for PointsVector {
    fn from(points: Vec<PointVector>) -> Self {
        Self(points)
    }
}

impl FromIterator<PointVector> for PointsVector {
    fn from_iter<I: IntoIterator<Item = PointVector>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_vector_roundtrip() {
        let points = vec![Point::new(10, 10), Point::new(10, 20), Point::new(20, 20)];
        let pv = PointVector::from_points(&points);
        assert_eq!(pv.size(), 3);
        assert_eq!(pv.to_points(), points);
        for (i, p) in points.iter().enumerate() {
            assert_eq!(pv.at(i), *p);
        }
    }

    #[test]
    fn test_point_vector_at_out_of_range() {
        let pv = PointVector::from_points(&[Point::new(1, 1)]);
        assert_eq!(pv.at(1), Point::new(0, 0));
        assert_eq!(pv.at(100), Point::default());
        assert_eq!(pv.get(1), None);
        assert_eq!(pv.get(0), Some(Point::new(1, 1)));
        assert_eq!(PointVector::new().at(0), Point::default());
    }

    #[test]
    fn test_point_vector_set() -> Result<(), MatError> {
        let mut pv = PointVector::from_points(&[Point::new(1, 1), Point::new(2, 2)]);
        pv.set(1, Point::new(5, 6))?;
        assert_eq!(pv.at(1), Point::new(5, 6));
        assert_eq!(
            pv.set(2, Point::new(0, 0)),
            Err(MatError::index_out_of_bounds(2, 2))
        );
        Ok(())
    }

    #[test]
    fn test_point_vector_append() {
        let mut pv = PointVector::new();
        assert!(pv.is_empty());
        pv.append(Point::new(3, 4));
        pv.append(Point::new(5, 6));
        assert_eq!(pv.size(), 2);
        assert_eq!(pv.to_points(), vec![Point::new(3, 4), Point::new(5, 6)]);
    }

    #[test]
    fn test_point_vector_as_ffi() -> Result<(), MatError> {
        let pv: PointVector = vec![Point::new(7, 8), Point::new(9, 10)].into();
        let raw = pv.as_ffi()?;
        assert_eq!(raw.length, 2);
        let second = unsafe { *raw.points.add(1) };
        assert_eq!(second, ffi::Point { x: 9, y: 10 });
        Ok(())
    }

    #[test]
    fn test_point2f_vector() {
        let pv: Point2fVector = [Point2f::new(1.5, 2.5), Point2f::new(3.0, 4.0)]
            .into_iter()
            .collect();
        assert_eq!(pv.size(), 2);
        approx::assert_relative_eq!(pv.at(0).x, 1.5);
        approx::assert_relative_eq!(pv.at(1).y, 4.0);
        assert_eq!(pv.at(2), Point2f::default());
    }

    #[test]
    fn test_points_vector_roundtrip() {
        let points = vec![
            vec![Point::new(10, 10), Point::new(10, 20)],
            vec![Point::new(1, 1), Point::new(2, 2), Point::new(3, 3)],
        ];
        let psv = PointsVector::from_points(&points);
        assert_eq!(psv.size(), 2);
        assert_eq!(psv.at(1).size(), 3);
        assert_eq!(psv.to_points(), points);
    }

    #[test]
    fn test_points_vector_empty_outer() {
        let psv = PointsVector::from_points(&[]);
        assert!(psv.is_empty());
        assert!(psv.to_points().is_empty());
        assert!(psv.at(0).is_empty());
    }

    #[test]
    fn test_points_vector_append() {
        let mut psv = PointsVector::new();
        psv.append(PointVector::from_points(&[Point::new(1, 2)]));
        psv.append(None);
        assert_eq!(psv.size(), 1);
        assert_eq!(psv.at(0).at(0), Point::new(1, 2));
        assert!(psv.get(1).is_none());
    }

    #[test]
    fn test_points_vector_as_ffi() -> Result<(), MatError> {
        let psv = PointsVector::from_points(&[vec![Point::new(1, 1)], vec![]]);
        let raw = psv.as_ffi()?;
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].length, 1);
        assert_eq!(raw[1].length, 0);
        Ok(())
    }
}
