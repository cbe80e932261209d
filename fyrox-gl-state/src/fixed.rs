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

//! Composite fixed-function state: depth, rasterizer and per-face stencil records.

use crate::{CompareFunc, CullFace, FrontFace, PolygonFace, PolygonFillMode, StencilAction};
use serde::{Deserialize, Serialize};

/// Complete stencil state of a single polygon face.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct StencilState {
    /// Action when the stencil test fails.
    pub fail: StencilAction,
    /// Action when the stencil test passes, but the depth test fails.
    pub depth_fail: StencilAction,
    /// Action when both tests pass.
    pub depth_pass: StencilAction,
    pub func: CompareFunc,
    pub reference: i32,
    pub read_mask: u32,
    pub write_mask: u32,
}

impl Default for StencilState {
    fn default() -> Self {
        Self {
            fail: StencilAction::Keep,
            depth_fail: StencilAction::Keep,
            depth_pass: StencilAction::Keep,
            func: CompareFunc::Always,
            reference: 0,
            read_mask: u32::MAX,
            write_mask: u32::MAX,
        }
    }
}

/// Which groups of a [`StencilState`] differ from the cached one. Each group maps to exactly one
/// native call.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub(crate) struct StencilChanges {
    pub op: bool,
    pub func: bool,
    pub write_mask: bool,
}

impl StencilChanges {
    pub fn any(&self) -> bool {
        self.op || self.func || self.write_mask
    }
}

impl StencilState {
    /// Copies `new` into `self` and reports which groups have actually changed.
    pub(crate) fn assign(&mut self, new: &StencilState) -> StencilChanges {
        let changes = StencilChanges {
            op: self.fail != new.fail
                || self.depth_fail != new.depth_fail
                || self.depth_pass != new.depth_pass,
            func: self.func != new.func
                || self.reference != new.reference
                || self.read_mask != new.read_mask,
            write_mask: self.write_mask != new.write_mask,
        };
        *self = *new;
        changes
    }
}

/// A single stencil face record. Unlike [`PolygonFace`] it can't address both faces at once.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub(crate) enum StencilFaceIndex {
    Front = 0,
    Back = 1,
}

impl StencilFaceIndex {
    pub fn expand(face: PolygonFace) -> &'static [StencilFaceIndex] {
        match face {
            PolygonFace::Front => &[StencilFaceIndex::Front],
            PolygonFace::Back => &[StencilFaceIndex::Back],
            PolygonFace::FrontAndBack => &[StencilFaceIndex::Front, StencilFaceIndex::Back],
        }
    }

    pub fn polygon_face(self) -> PolygonFace {
        match self {
            StencilFaceIndex::Front => PolygonFace::Front,
            StencilFaceIndex::Back => PolygonFace::Back,
        }
    }
}

/// Last written values of the non-boolean fixed-function state. Initial values match the
/// initial state of a freshly created context.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FixedFunctionState {
    pub depth_func: CompareFunc,
    pub depth_write: bool,
    pub cull_face: CullFace,
    pub front_face: FrontFace,
    /// `None` if the device value is unknown.
    pub polygon_mode: Option<(PolygonFace, PolygonFillMode)>,
    pub stencil: [StencilState; 2],
}

impl Default for FixedFunctionState {
    fn default() -> Self {
        Self {
            depth_func: CompareFunc::Less,
            depth_write: true,
            cull_face: CullFace::Back,
            front_face: FrontFace::CounterClockwise,
            polygon_mode: Some((PolygonFace::FrontAndBack, PolygonFillMode::Fill)),
            stencil: Default::default(),
        }
    }
}

impl FixedFunctionState {
    pub fn stencil(&self, face: StencilFaceIndex) -> &StencilState {
        &self.stencil[face as usize]
    }

    pub fn stencil_mut(&mut self, face: StencilFaceIndex) -> &mut StencilState {
        &mut self.stencil[face as usize]
    }
}
