use std::path::Path;

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SetupError;

/// Cube faces in texture layer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    pub fn layer(self) -> u32 {
        self as u32
    }
}

#[derive(Debug, Error)]
pub enum CubemapError {
    #[error("{face:?} face is {width}x{height}, cube faces must be square")]
    NotSquare {
        face: CubeFace,
        width: u32,
        height: u32,
    },
    #[error("{face:?} face is {found}px, expected {expected}px like the first face")]
    SizeMismatch {
        face: CubeFace,
        expected: u32,
        found: u32,
    },
    #[error("cube faces have zero size")]
    Empty,
    #[error("failed to decode {face:?} face: {source}")]
    Decode {
        face: CubeFace,
        #[source]
        source: image::ImageError,
    },
}

/// File names of the six faces inside the skybox directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceFiles {
    pub positive_x: String,
    pub negative_x: String,
    pub positive_y: String,
    pub negative_y: String,
    pub positive_z: String,
    pub negative_z: String,
}

impl FaceFiles {
    pub fn get(&self, face: CubeFace) -> &str {
        match face {
            CubeFace::PositiveX => &self.positive_x,
            CubeFace::NegativeX => &self.negative_x,
            CubeFace::PositiveY => &self.positive_y,
            CubeFace::NegativeY => &self.negative_y,
            CubeFace::PositiveZ => &self.positive_z,
            CubeFace::NegativeZ => &self.negative_z,
        }
    }
}

impl Default for FaceFiles {
    fn default() -> Self {
        Self {
            positive_x: "space_ft.png".into(),
            negative_x: "space_bk.png".into(),
            positive_y: "space_up.png".into(),
            negative_y: "space_dn.png".into(),
            positive_z: "space_rt.png".into(),
            negative_z: "space_lf.png".into(),
        }
    }
}

/// Six decoded RGBA8 faces of identical square size.
#[derive(Debug, Clone)]
pub struct CubemapData {
    size: u32,
    faces: Vec<RgbaImage>,
}

impl CubemapData {
    /// Faces are given in [`CubeFace::ALL`] order.
    pub fn from_faces(faces: [RgbaImage; 6]) -> Result<Self, CubemapError> {
        let size = faces[0].width();
        if size == 0 {
            return Err(CubemapError::Empty);
        }

        for (face, image) in CubeFace::ALL.into_iter().zip(faces.iter()) {
            let (width, height) = image.dimensions();
            if width != height {
                return Err(CubemapError::NotSquare {
                    face,
                    width,
                    height,
                });
            }
            if width != size {
                return Err(CubemapError::SizeMismatch {
                    face,
                    expected: size,
                    found: width,
                });
            }
        }

        Ok(Self {
            size,
            faces: faces.into(),
        })
    }

    /// Decodes all six faces from `dir`. Any unreadable face aborts loading.
    pub fn load_dir(dir: impl AsRef<Path>, files: &FaceFiles) -> Result<Self, SetupError> {
        let dir = dir.as_ref();
        let name = dir.display().to_string();

        let mut faces = Vec::with_capacity(6);
        for face in CubeFace::ALL {
            let path = dir.join(files.get(face));
            log::info!("Loading cubemap face {:?}: {:?}", face, path);
            let image = image::open(&path)
                .map_err(|source| SetupError::Cubemap {
                    name: path.display().to_string(),
                    source: CubemapError::Decode { face, source },
                })?
                .to_rgba8();
            faces.push(image);
        }

        let faces: [RgbaImage; 6] = faces
            .try_into()
            .map_err(|_| SetupError::resource("cubemap faces", "expected six faces"))?;

        Self::from_faces(faces).map_err(|source| SetupError::Cubemap { name, source })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn face(&self, face: CubeFace) -> &[u8] {
        self.faces[face.layer() as usize].as_raw()
    }
}
