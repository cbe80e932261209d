// Copyright (c) 2019-present Dmitry Stepanov and Fyrox Engine contributors.
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Shadow cache of the OpenGL state machine. Every state-setting call made by a backend goes
//! through [`GlStateCache`], which compares the requested value against its own record of the
//! device state and forwards only the transitions that actually change something.
//!
//! The cache never talks to OpenGL directly. It issues calls through the closed set of entry
//! points described by [`GlDevice`], which is implemented for [`glow::Context`].

pub use fyrox_core as core;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString, VariantNames};

pub mod binding;
pub mod blend;
pub mod cache;
pub mod device;
pub mod error;
pub mod fixed;
pub mod scope;
pub mod settings;
pub mod stats;
pub mod toggle;
pub mod viewport;

pub use cache::GlStateCache;
pub use device::GlDevice;

/// Converts a closed enumeration into its native OpenGL constant.
pub trait ToGlConstant {
    /// Returns native constant.
    fn into_gl(self) -> u32;
}

/// Reverse of [`ToGlConstant`], used when the cache is primed from the real device state.
pub trait FromGlConstant: Sized {
    /// Returns `None` if the native constant has no counterpart in the enumeration.
    fn from_gl(value: u32) -> Option<Self>;
}

/// Comparison between an incoming fragment value and the stored one, used by depth and stencil
/// tests.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[derive(AsRefStr, EnumString, VariantNames)]
pub enum CompareFunc {
    Never,
    #[default]
    Less,
    Equal,
    LessOrEqual,
    Greater,
    NotEqual,
    GreaterOrEqual,
    Always,
}

impl ToGlConstant for CompareFunc {
    fn into_gl(self) -> u32 {
        match self {
            Self::Never => glow::NEVER,
            Self::Less => glow::LESS,
            Self::Equal => glow::EQUAL,
            Self::LessOrEqual => glow::LEQUAL,
            Self::Greater => glow::GREATER,
            Self::NotEqual => glow::NOTEQUAL,
            Self::GreaterOrEqual => glow::GEQUAL,
            Self::Always => glow::ALWAYS,
        }
    }
}

impl FromGlConstant for CompareFunc {
    fn from_gl(value: u32) -> Option<Self> {
        match value {
            glow::NEVER => Some(Self::Never),
            glow::LESS => Some(Self::Less),
            glow::EQUAL => Some(Self::Equal),
            glow::LEQUAL => Some(Self::LessOrEqual),
            glow::GREATER => Some(Self::Greater),
            glow::NOTEQUAL => Some(Self::NotEqual),
            glow::GEQUAL => Some(Self::GreaterOrEqual),
            glow::ALWAYS => Some(Self::Always),
            _ => None,
        }
    }
}

/// What happens to a stencil value after the stencil and depth tests.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[derive(AsRefStr, EnumString, VariantNames)]
pub enum StencilAction {
    #[default]
    Keep,
    Zero,
    /// Writes the reference value.
    Replace,
    /// Saturating increment.
    Incr,
    IncrWrap,
    /// Saturating decrement.
    Decr,
    DecrWrap,
    Invert,
}

impl ToGlConstant for StencilAction {
    fn into_gl(self) -> u32 {
        match self {
            StencilAction::Keep => glow::KEEP,
            StencilAction::Zero => glow::ZERO,
            StencilAction::Replace => glow::REPLACE,
            StencilAction::Incr => glow::INCR,
            StencilAction::IncrWrap => glow::INCR_WRAP,
            StencilAction::Decr => glow::DECR,
            StencilAction::DecrWrap => glow::DECR_WRAP,
            StencilAction::Invert => glow::INVERT,
        }
    }
}

impl FromGlConstant for StencilAction {
    fn from_gl(value: u32) -> Option<Self> {
        match value {
            glow::KEEP => Some(Self::Keep),
            glow::ZERO => Some(Self::Zero),
            glow::REPLACE => Some(Self::Replace),
            glow::INCR => Some(Self::Incr),
            glow::INCR_WRAP => Some(Self::IncrWrap),
            glow::DECR => Some(Self::Decr),
            glow::DECR_WRAP => Some(Self::DecrWrap),
            glow::INVERT => Some(Self::Invert),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Default, PartialOrd, PartialEq, Hash, Debug, Serialize, Deserialize, Eq)]
pub enum CullFace {
    #[default]
    Back,
    Front,
    FrontAndBack,
}

impl ToGlConstant for CullFace {
    fn into_gl(self) -> u32 {
        match self {
            Self::Back => glow::BACK,
            Self::Front => glow::FRONT,
            Self::FrontAndBack => glow::FRONT_AND_BACK,
        }
    }
}

impl FromGlConstant for CullFace {
    fn from_gl(value: u32) -> Option<Self> {
        match value {
            glow::BACK => Some(Self::Back),
            glow::FRONT => Some(Self::Front),
            glow::FRONT_AND_BACK => Some(Self::FrontAndBack),
            _ => None,
        }
    }
}

/// Winding order of front-facing polygons.
#[derive(Copy, Clone, Default, PartialOrd, PartialEq, Hash, Debug, Serialize, Deserialize, Eq)]
pub enum FrontFace {
    Clockwise,
    #[default]
    CounterClockwise,
}

impl ToGlConstant for FrontFace {
    fn into_gl(self) -> u32 {
        match self {
            Self::Clockwise => glow::CW,
            Self::CounterClockwise => glow::CCW,
        }
    }
}

impl FromGlConstant for FrontFace {
    fn from_gl(value: u32) -> Option<Self> {
        match value {
            glow::CW => Some(Self::Clockwise),
            glow::CCW => Some(Self::CounterClockwise),
            _ => None,
        }
    }
}

#[derive(
    Copy,
    Clone,
    Default,
    PartialOrd,
    PartialEq,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    Eq,
    AsRefStr,
    EnumString,
    VariantNames,
)]
pub enum PolygonFace {
    Front,
    Back,
    #[default]
    FrontAndBack,
}

impl ToGlConstant for PolygonFace {
    fn into_gl(self) -> u32 {
        match self {
            Self::Front => glow::FRONT,
            Self::Back => glow::BACK,
            Self::FrontAndBack => glow::FRONT_AND_BACK,
        }
    }
}

#[derive(
    Copy,
    Clone,
    Default,
    PartialOrd,
    PartialEq,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    Eq,
    AsRefStr,
    EnumString,
    VariantNames,
)]
pub enum PolygonFillMode {
    Point,
    Line,
    #[default]
    Fill,
}

impl ToGlConstant for PolygonFillMode {
    fn into_gl(self) -> u32 {
        match self {
            Self::Point => glow::POINT,
            Self::Line => glow::LINE,
            Self::Fill => glow::FILL,
        }
    }
}

impl FromGlConstant for PolygonFillMode {
    fn from_gl(value: u32) -> Option<Self> {
        match value {
            glow::POINT => Some(Self::Point),
            glow::LINE => Some(Self::Line),
            glow::FILL => Some(Self::Fill),
            _ => None,
        }
    }
}

#[derive(
    Copy,
    Clone,
    Default,
    Hash,
    PartialOrd,
    PartialEq,
    Eq,
    Ord,
    Serialize,
    Deserialize,
    Debug,
    AsRefStr,
    EnumString,
    VariantNames,
)]
pub enum BlendFactor {
    #[default]
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    ConstantColor,
    OneMinusConstantColor,
    ConstantAlpha,
    OneMinusConstantAlpha,
    SrcAlphaSaturate,
    Src1Color,
    OneMinusSrc1Color,
    Src1Alpha,
    OneMinusSrc1Alpha,
}

impl ToGlConstant for BlendFactor {
    fn into_gl(self) -> u32 {
        match self {
            Self::Zero => glow::ZERO,
            Self::One => glow::ONE,
            Self::SrcColor => glow::SRC_COLOR,
            Self::OneMinusSrcColor => glow::ONE_MINUS_SRC_COLOR,
            Self::DstColor => glow::DST_COLOR,
            Self::OneMinusDstColor => glow::ONE_MINUS_DST_COLOR,
            Self::SrcAlpha => glow::SRC_ALPHA,
            Self::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
            Self::DstAlpha => glow::DST_ALPHA,
            Self::OneMinusDstAlpha => glow::ONE_MINUS_DST_ALPHA,
            Self::ConstantColor => glow::CONSTANT_COLOR,
            Self::OneMinusConstantColor => glow::ONE_MINUS_CONSTANT_COLOR,
            Self::ConstantAlpha => glow::CONSTANT_ALPHA,
            Self::OneMinusConstantAlpha => glow::ONE_MINUS_CONSTANT_ALPHA,
            Self::SrcAlphaSaturate => glow::SRC_ALPHA_SATURATE,
            Self::Src1Color => glow::SRC1_COLOR,
            Self::OneMinusSrc1Color => glow::ONE_MINUS_SRC1_COLOR,
            Self::Src1Alpha => glow::SRC1_ALPHA,
            Self::OneMinusSrc1Alpha => glow::ONE_MINUS_SRC1_ALPHA,
        }
    }
}

#[derive(Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct BlendFunc {
    pub sfactor: BlendFactor,
    pub dfactor: BlendFactor,
    pub alpha_sfactor: BlendFactor,
    pub alpha_dfactor: BlendFactor,
}

impl BlendFunc {
    pub fn new(sfactor: BlendFactor, dfactor: BlendFactor) -> Self {
        Self {
            sfactor,
            dfactor,
            alpha_sfactor: sfactor,
            alpha_dfactor: dfactor,
        }
    }

    pub fn new_separate(
        sfactor: BlendFactor,
        dfactor: BlendFactor,
        alpha_sfactor: BlendFactor,
        alpha_dfactor: BlendFactor,
    ) -> Self {
        Self {
            sfactor,
            dfactor,
            alpha_sfactor,
            alpha_dfactor,
        }
    }
}

impl Default for BlendFunc {
    fn default() -> Self {
        Self::new(BlendFactor::One, BlendFactor::Zero)
    }
}

#[derive(Copy, Clone, PartialOrd, PartialEq, Hash, Debug, Serialize, Deserialize, Eq)]
pub struct ColorMask {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
    pub alpha: bool,
}

impl Default for ColorMask {
    fn default() -> Self {
        Self::all(true)
    }
}

impl ColorMask {
    pub fn all(value: bool) -> Self {
        Self {
            red: value,
            green: value,
            blue: value,
            alpha: value,
        }
    }
}
