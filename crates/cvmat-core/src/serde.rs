use crate::{
    geometry::{Point, Point2f},
    mat::Mat,
    mat_type::{Depth, MatType},
    points::{Point2fVector, PointVector, PointsVector},
};

use serde::ser::SerializeStruct;
use serde::Deserialize;

impl serde::Serialize for Mat<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("Mat", 3)?;
        state.serialize_field("data", &self.to_bytes())?;
        state.serialize_field("shape", &self.size())?;
        state.serialize_field("mat_type", &self.mat_type())?;
        state.end()
    }
}

impl<'de> serde::Deserialize<'de> for Mat<'static> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct MatData {
            data: Vec<u8>,
            shape: Vec<usize>,
            mat_type: MatType,
        }

        let MatData {
            data,
            shape,
            mat_type,
        } = MatData::deserialize(deserializer)?;

        if shape.is_empty() {
            return Ok(Mat::new());
        }

        let mut mat = Mat::new_with_sizes(&shape, mat_type).map_err(serde::de::Error::custom)?;
        let bytes = mat.data_ptr_u8_mut().map_err(serde::de::Error::custom)?;
        if bytes.len() != data.len() {
            return Err(serde::de::Error::custom(format!(
                "Invalid data length {} for shape {shape:?} of type {mat_type}",
                data.len()
            )));
        }
        bytes.copy_from_slice(&data);

        Ok(mat)
    }
}

impl<'de> serde::Deserialize<'de> for MatType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct MatTypeParts {
            depth: Depth,
            channels: usize,
        }

        let MatTypeParts { depth, channels } = MatTypeParts::deserialize(deserializer)?;
        MatType::new(depth, channels).map_err(serde::de::Error::custom)
    }
}

impl serde::Serialize for PointVector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.to_points())
    }
}

impl<'de> serde::Deserialize<'de> for PointVector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Vec::<Point>::deserialize(deserializer)?.into())
    }
}

impl serde::Serialize for Point2fVector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.to_points())
    }
}

impl<'de> serde::Deserialize<'de> for Point2fVector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Vec::<Point2f>::deserialize(deserializer)?.into())
    }
}

impl serde::Serialize for PointsVector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.to_points())
    }
}

impl<'de> serde::Deserialize<'de> for PointsVector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(PointsVector::from_points(&Vec::<Vec<Point>>::deserialize(
            deserializer,
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rectangle;

    #[test]
    fn test_serde_mat() -> Result<(), Box<dyn std::error::Error>> {
        let mat = Mat::from_vec(2, 3, MatType::CV_8UC1, vec![1, 2, 3, 4, 5, 6])?;
        let serialized = serde_json::to_string(&mat)?;
        let deserialized: Mat<'static> = serde_json::from_str(&serialized)?;
        assert_eq!(deserialized.size(), vec![2, 3]);
        assert_eq!(deserialized.mat_type(), MatType::CV_8UC1);
        assert_eq!(mat.to_bytes(), deserialized.to_bytes());
        Ok(())
    }

    #[test]
    fn test_serde_region_is_compact() -> Result<(), Box<dyn std::error::Error>> {
        let mut mat = Mat::from_vec(3, 3, MatType::CV_8UC1, (0..9).collect())?;
        let roi = mat.region(Rectangle::new(1, 1, 3, 3))?;
        let serialized = serde_json::to_string(&roi)?;
        let deserialized: Mat<'static> = serde_json::from_str(&serialized)?;
        assert_eq!(deserialized.to_bytes(), vec![4, 5, 7, 8]);
        assert!(deserialized.is_continuous());
        Ok(())
    }

    #[test]
    fn test_serde_mat_bad_length() {
        let json = r#"{"data":[1,2,3],"shape":[2,2],"mat_type":{"depth":"U8","channels":1}}"#;
        assert!(serde_json::from_str::<Mat<'static>>(json).is_err());
    }

    #[test]
    fn test_serde_mat_type_channels() -> Result<(), serde_json::Error> {
        let json = serde_json::to_string(&MatType::CV_32FC3)?;
        assert_eq!(json, r#"{"depth":"F32","channels":3}"#);
        assert_eq!(serde_json::from_str::<MatType>(&json)?, MatType::CV_32FC3);

        for channels in [0, 5, 200] {
            let json = format!(r#"{{"depth":"U8","channels":{channels}}}"#);
            assert!(serde_json::from_str::<MatType>(&json).is_err());
        }
        Ok(())
    }

    #[test]
    fn test_serde_mat_rejects_zero_channels() {
        let json = r#"{"data":[],"shape":[0,2],"mat_type":{"depth":"U8","channels":0}}"#;
        assert!(serde_json::from_str::<Mat<'static>>(json).is_err());
    }

    #[test]
    fn test_serde_points_vector() -> Result<(), serde_json::Error> {
        let psv = PointsVector::from_points(&[vec![Point::new(1, 2)]]);
        let json = serde_json::to_string(&psv)?;
        assert_eq!(json, r#"[[{"x":1,"y":2}]]"#);
        let back: PointsVector = serde_json::from_str(&json)?;
        assert_eq!(back, psv);
        Ok(())
    }
}
