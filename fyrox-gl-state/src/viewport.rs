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

//! Viewport, scissor and depth range records, plus the vertical origin flip used when the
//! logical coordinate system has its origin in the upper-left corner.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Where row 0 of the logical coordinate system is.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ClipOrigin {
    /// Native OpenGL convention, no remapping is needed.
    #[default]
    LowerLeft,
    /// Row 0 is at the top, every rectangle is flipped before it is sent to the device.
    UpperLeft,
}

#[derive(Copy, Clone, Default, PartialEq, Debug, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns a copy with vertical origin moved to the other edge of a context of the given
    /// height.
    pub fn flipped(mut self, context_height: i32) -> Self {
        self.y = context_height as f32 - self.height - self.y;
        self
    }
}

#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct ScissorBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ScissorBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// See [`Viewport::flipped`].
    pub fn flipped(mut self, context_height: i32) -> Self {
        self.y = context_height - self.height - self.y;
        self
    }
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct DepthRange {
    pub min_depth: f64,
    pub max_depth: f64,
}

impl Default for DepthRange {
    fn default() -> Self {
        Self {
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// Vertical flip settings, injected by the owning context.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub(crate) struct CoordinateSpace {
    pub origin: ClipOrigin,
    pub context_height: i32,
}

impl CoordinateSpace {
    pub fn viewport(&self, viewport: Viewport) -> Viewport {
        match self.origin {
            ClipOrigin::LowerLeft => viewport,
            ClipOrigin::UpperLeft => viewport.flipped(self.context_height),
        }
    }

    pub fn scissor(&self, scissor: ScissorBox) -> ScissorBox {
        match self.origin {
            ClipOrigin::LowerLeft => scissor,
            ClipOrigin::UpperLeft => scissor.flipped(self.context_height),
        }
    }

    pub fn viewports(&self, viewports: &[Viewport]) -> Vec<Viewport> {
        viewports.iter().map(|v| self.viewport(*v)).collect()
    }

    pub fn scissors(&self, scissors: &[ScissorBox]) -> Vec<ScissorBox> {
        scissors.iter().map(|s| self.scissor(*s)).collect()
    }
}
