use strum::Display;

use crate::geometry::{HoriAlign, Rect, Vec2, VertAlign, align_offset};

/// Handle to an image owned by the renderer, with its native pixel size.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Texture {
    pub key: String,
    pub width: f32,
    pub height: f32,
}

impl Texture {
    pub fn new(key: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            key: key.into(),
            width,
            height,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImageOverflow {
    AllowOverflow,
    #[default]
    ShrinkToFit,
    /// One shared factor for every image in the row.
    ShrinkRowToFit,
    /// One shared factor for every image in the column.
    ShrinkColToFit,
}

/// Image element. Sized from its texture's native size, never upscaled.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBox {
    pub texture: Option<Texture>,
    /// Drawn under the texture; also sizes the box when there is no texture.
    pub backdrop: Option<Texture>,
    pub overflow: ImageOverflow,
    pub vert: VertAlign,
    pub hori: HoriAlign,
    scale: f32,
}

impl ImageBox {
    pub fn new(texture: Option<Texture>, overflow: ImageOverflow) -> Self {
        Self {
            texture,
            backdrop: None,
            overflow,
            vert: VertAlign::Top,
            hori: HoriAlign::Left,
            scale: 1.0,
        }
    }

    pub fn aligned(mut self, vert: VertAlign, hori: HoriAlign) -> Self {
        self.vert = vert;
        self.hori = hori;
        self
    }

    pub fn with_backdrop(mut self, backdrop: Texture) -> Self {
        self.backdrop = Some(backdrop);
        self
    }

    /// Factor applied to the native size in the last layout pass.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Native size at the current device scale.
    pub fn natural_size(&self, device_scale: f32) -> Vec2 {
        self.texture
            .as_ref()
            .or(self.backdrop.as_ref())
            .map(|texture| texture.size() * device_scale)
            .unwrap_or(Vec2::ZERO)
    }

    /// Largest factor that keeps the natural size inside `space`. Boxes with
    /// nothing to show never constrain their neighbours.
    pub fn required_scale(&self, space: Vec2, device_scale: f32) -> f32 {
        let natural = self.natural_size(device_scale);
        if natural.x <= 0.0 || natural.y <= 0.0 {
            return f32::INFINITY;
        }
        (space.x / natural.x).min(space.y / natural.y)
    }

    /// Resolves the drawn rect inside `space`. `shared` is the group factor
    /// for the row/column modes.
    pub(crate) fn fit(&mut self, space: Rect, device_scale: f32, shared: Option<f32>) -> Rect {
        self.scale = match self.overflow {
            ImageOverflow::AllowOverflow => 1.0,
            ImageOverflow::ShrinkToFit => self.required_scale(space.size(), device_scale).min(1.0),
            ImageOverflow::ShrinkRowToFit | ImageOverflow::ShrinkColToFit => {
                shared.unwrap_or(1.0).min(1.0)
            }
        };
        let size = self.natural_size(device_scale) * self.scale;
        let offset = align_offset(size, space.size(), self.vert, self.hori);
        Rect::new(space.x + offset.x, space.y + offset.y, size.x, size.y)
    }
}
