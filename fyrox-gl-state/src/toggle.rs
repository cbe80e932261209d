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

//! Boolean device capabilities (`glEnable`/`glDisable`) and their shadow values.

use crate::ToGlConstant;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumCount, EnumIter, EnumString, VariantNames};

/// A binary device toggle.
#[derive(
    Copy,
    Clone,
    PartialOrd,
    PartialEq,
    Eq,
    Ord,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumString,
    VariantNames,
    EnumCount,
    EnumIter,
)]
pub enum Capability {
    Blend,
    ColorLogicOp,
    CullFace,
    DebugOutput,
    DebugOutputSynchronous,
    DepthClamp,
    DepthTest,
    Dither,
    FramebufferSrgb,
    LineSmooth,
    Multisample,
    PolygonOffsetFill,
    PolygonOffsetLine,
    PolygonOffsetPoint,
    PolygonSmooth,
    PrimitiveRestart,
    PrimitiveRestartFixedIndex,
    RasterizerDiscard,
    SampleAlphaToCoverage,
    SampleAlphaToOne,
    SampleCoverage,
    SampleShading,
    SampleMask,
    ScissorTest,
    StencilTest,
    TextureCubeMapSeamless,
    ProgramPointSize,
}

impl ToGlConstant for Capability {
    fn into_gl(self) -> u32 {
        match self {
            Self::Blend => glow::BLEND,
            Self::ColorLogicOp => glow::COLOR_LOGIC_OP,
            Self::CullFace => glow::CULL_FACE,
            Self::DebugOutput => glow::DEBUG_OUTPUT,
            Self::DebugOutputSynchronous => glow::DEBUG_OUTPUT_SYNCHRONOUS,
            Self::DepthClamp => glow::DEPTH_CLAMP,
            Self::DepthTest => glow::DEPTH_TEST,
            Self::Dither => glow::DITHER,
            Self::FramebufferSrgb => glow::FRAMEBUFFER_SRGB,
            Self::LineSmooth => glow::LINE_SMOOTH,
            Self::Multisample => glow::MULTISAMPLE,
            Self::PolygonOffsetFill => glow::POLYGON_OFFSET_FILL,
            Self::PolygonOffsetLine => glow::POLYGON_OFFSET_LINE,
            Self::PolygonOffsetPoint => glow::POLYGON_OFFSET_POINT,
            Self::PolygonSmooth => glow::POLYGON_SMOOTH,
            Self::PrimitiveRestart => glow::PRIMITIVE_RESTART,
            Self::PrimitiveRestartFixedIndex => glow::PRIMITIVE_RESTART_FIXED_INDEX,
            Self::RasterizerDiscard => glow::RASTERIZER_DISCARD,
            Self::SampleAlphaToCoverage => glow::SAMPLE_ALPHA_TO_COVERAGE,
            Self::SampleAlphaToOne => glow::SAMPLE_ALPHA_TO_ONE,
            Self::SampleCoverage => glow::SAMPLE_COVERAGE,
            Self::SampleShading => glow::SAMPLE_SHADING,
            Self::SampleMask => glow::SAMPLE_MASK,
            Self::ScissorTest => glow::SCISSOR_TEST,
            Self::StencilTest => glow::STENCIL_TEST,
            Self::TextureCubeMapSeamless => glow::TEXTURE_CUBE_MAP_SEAMLESS,
            Self::ProgramPointSize => glow::PROGRAM_POINT_SIZE,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct SavedToggle {
    capability: Capability,
    enabled: bool,
}

/// Last known value of every [`Capability`] plus the save stack used by push/pop.
pub(crate) struct ToggleCache {
    values: [bool; <Capability as strum::EnumCount>::COUNT],
    stack: Vec<SavedToggle>,
}

impl Default for ToggleCache {
    fn default() -> Self {
        Self {
            values: [false; <Capability as strum::EnumCount>::COUNT],
            stack: Default::default(),
        }
    }
}

impl ToggleCache {
    pub fn get(&self, capability: Capability) -> bool {
        self.values[capability as usize]
    }

    /// Stores the new value and returns `true` if it differs from the previous one.
    pub fn update(&mut self, capability: Capability, enabled: bool) -> bool {
        let slot = &mut self.values[capability as usize];
        if *slot != enabled {
            *slot = enabled;
            true
        } else {
            false
        }
    }

    /// Overwrites the cached value without comparison. Returns `true` if the cache was wrong.
    pub fn overwrite(&mut self, capability: Capability, enabled: bool) -> bool {
        let drifted = self.values[capability as usize] != enabled;
        self.values[capability as usize] = enabled;
        drifted
    }

    pub fn push(&mut self, capability: Capability) {
        self.stack.push(SavedToggle {
            capability,
            enabled: self.get(capability),
        });
    }

    /// # Panics
    ///
    /// Panics if there is nothing to pop.
    pub fn pop(&mut self) -> (Capability, bool) {
        match self.stack.pop() {
            Some(saved) => (saved.capability, saved.enabled),
            None => panic!("Unbalanced capability stack: nothing to pop!"),
        }
    }

    #[cfg(test)]
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }
}
