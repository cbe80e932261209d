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

//! Configuration injected into the cache by the owning context and the capability resolution
//! layer. The cache never probes the device for any of it.

use crate::viewport::ClipOrigin;
use serde::{Deserialize, Serialize};

/// Optional device entry points that change how multi-target setters are dispatched.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct DeviceFeatures {
    /// Indexed viewports, scissors and depth ranges (`ARB_viewport_array`).
    pub viewport_array: bool,
    /// Per draw buffer color mask and blend func (`ARB_draw_buffers_blend`). Without it, draw
    /// buffers are addressed one by one by switching the current draw buffer.
    pub indexed_draw_buffer_blend: bool,
}

/// Attributes of the context the cache is attached to.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ContextInfo {
    /// Height of the drawable surface in pixels, used to flip rectangles vertically.
    pub height: i32,
}

#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct StateCacheSettings {
    #[serde(default)]
    pub features: DeviceFeatures,
    #[serde(default)]
    pub clip_origin: ClipOrigin,
    #[serde(default)]
    pub context_height: i32,
}
