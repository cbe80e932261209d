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

//! Per draw buffer blend state.

use crate::{BlendFunc, ColorMask};
use serde::{Deserialize, Serialize};

/// Blend state of a single draw buffer.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct BlendTarget {
    pub color_mask: ColorMask,
    pub func: BlendFunc,
}

/// Last color mask written through the non-indexed entry point. `None` means the device value
/// is unknown, for example after the serialized per draw buffer path has rewritten it. Blend
/// func is not cached, it is sent every time blending is enabled.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct BlendCache {
    pub color_mask: Option<ColorMask>,
}

impl Default for BlendCache {
    fn default() -> Self {
        Self {
            color_mask: Some(ColorMask::default()),
        }
    }
}

impl BlendCache {
    pub fn update_color_mask(&mut self, mask: ColorMask) -> bool {
        if self.color_mask != Some(mask) {
            self.color_mask = Some(mask);
            true
        } else {
            false
        }
    }

    pub fn invalidate(&mut self) {
        self.color_mask = None;
    }
}
