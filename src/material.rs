//! Plain-data state read by the displacement shader each frame.
//!
//! The widget owns one [`MaterialState`] and hands it to the surface by
//! reference on every repaint. Nothing here touches the GPU.

/// Cover-fit scale factors applied to the sampling coordinates.
///
/// One factor is always `1.0`; the other shrinks the sampled range along the
/// axis where the container is relatively longer than the images, so the
/// image fills the surface without stretching.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AspectFactors {
    pub a1: f32,
    pub a2: f32,
}

impl Default for AspectFactors {
    fn default() -> Self {
        Self { a1: 1.0, a2: 1.0 }
    }
}

impl AspectFactors {
    /// Compute the factors for a container of `width`×`height` showing images
    /// with height/width ratio `image_aspect`.
    pub fn cover(width: f32, height: f32, image_aspect: f32) -> Self {
        if width <= 0.0 || height <= 0.0 {
            return Self::default();
        }

        if height / width < image_aspect {
            Self {
                a1: 1.0,
                a2: height / width / image_aspect,
            }
        } else {
            Self {
                a1: (width / height) * image_aspect,
                a2: 1.0,
            }
        }
    }
}

/// Per-slot distortion parameters, fixed for the lifetime of a widget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplacementParams {
    pub intensity1: f32,
    pub intensity2: f32,
    /// Rotation in radians applied to the displacement vector for slot A.
    pub angle1: f32,
    /// Rotation in radians applied to the displacement vector for slot B.
    pub angle2: f32,
}

/// One of the two texture bindings of the shader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Fully visible at blend factor 0.
    A,
    /// Fully visible at blend factor 1.
    B,
}

impl Slot {
    /// The slot that is fully visible at the given blend factor, rounded.
    pub fn visible_at(blend: f32) -> Self {
        if blend.round() >= 1.0 { Slot::B } else { Slot::A }
    }

    pub fn other(self) -> Self {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }

    /// Blend factor at which this slot is fully visible.
    pub fn blend(self) -> f32 {
        match self {
            Slot::A => 0.0,
            Slot::B => 1.0,
        }
    }
}

/// Everything the shader reads: which slide sits in each slot, the blend
/// factor, and the surface-dependent scale factors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialState {
    /// Slide index bound to slot A.
    pub slot_a: usize,
    /// Slide index bound to slot B.
    pub slot_b: usize,
    /// 0.0 shows slot A, 1.0 shows slot B.
    pub blend: f32,
    pub aspect: AspectFactors,
    pub params: DisplacementParams,
}

impl MaterialState {
    pub fn new(params: DisplacementParams, aspect: AspectFactors) -> Self {
        Self {
            slot_a: 0,
            slot_b: 1,
            blend: 0.0,
            aspect,
            params,
        }
    }

    pub fn slot(&self, slot: Slot) -> usize {
        match slot {
            Slot::A => self.slot_a,
            Slot::B => self.slot_b,
        }
    }

    pub fn bind(&mut self, slot: Slot, texture: usize) {
        match slot {
            Slot::A => self.slot_a = texture,
            Slot::B => self.slot_b = texture,
        }
    }

    /// Slide index currently on screen, judged from the rounded blend factor.
    pub fn visible_texture(&self) -> usize {
        self.slot(Slot::visible_at(self.blend))
    }
}
