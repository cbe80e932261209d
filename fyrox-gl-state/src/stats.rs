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

use std::fmt::{Display, Formatter};

/// Amount of state changes that were actually sent to the device, per category, plus the
/// amount of calls that were dropped because they would not change anything.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct StateStatistics {
    pub capability_changes: usize,
    pub buffer_binding_changes: usize,
    pub texture_binding_changes: usize,
    pub texture_layer_changes: usize,
    pub program_binding_changes: usize,
    pub vao_binding_changes: usize,
    pub fixed_function_changes: usize,
    pub blend_state_changes: usize,
    pub viewport_state_changes: usize,
    pub redundant_calls_skipped: usize,
}

impl std::ops::AddAssign for StateStatistics {
    fn add_assign(&mut self, rhs: Self) {
        self.capability_changes += rhs.capability_changes;
        self.buffer_binding_changes += rhs.buffer_binding_changes;
        self.texture_binding_changes += rhs.texture_binding_changes;
        self.texture_layer_changes += rhs.texture_layer_changes;
        self.program_binding_changes += rhs.program_binding_changes;
        self.vao_binding_changes += rhs.vao_binding_changes;
        self.fixed_function_changes += rhs.fixed_function_changes;
        self.blend_state_changes += rhs.blend_state_changes;
        self.viewport_state_changes += rhs.viewport_state_changes;
        self.redundant_calls_skipped += rhs.redundant_calls_skipped;
    }
}

impl std::ops::Sub for StateStatistics {
    type Output = StateStatistics;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            capability_changes: self.capability_changes - rhs.capability_changes,
            buffer_binding_changes: self.buffer_binding_changes - rhs.buffer_binding_changes,
            texture_binding_changes: self.texture_binding_changes - rhs.texture_binding_changes,
            texture_layer_changes: self.texture_layer_changes - rhs.texture_layer_changes,
            program_binding_changes: self.program_binding_changes - rhs.program_binding_changes,
            vao_binding_changes: self.vao_binding_changes - rhs.vao_binding_changes,
            fixed_function_changes: self.fixed_function_changes - rhs.fixed_function_changes,
            blend_state_changes: self.blend_state_changes - rhs.blend_state_changes,
            viewport_state_changes: self.viewport_state_changes - rhs.viewport_state_changes,
            redundant_calls_skipped: self.redundant_calls_skipped - rhs.redundant_calls_skipped,
        }
    }
}

impl Display for StateStatistics {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Pipeline state changes:\n\
            \tCapabilities: {},\n\
            \tBuffers: {},\n\
            \tTextures: {},\n\
            \tTexture Layers: {},\n\
            \tShaders: {},\n\
            \tVAO: {},\n\
            \tFixed Function: {},\n\
            \tBlend: {},\n\
            \tViewport State: {},\n\
            \tSkipped: {}",
            self.capability_changes,
            self.buffer_binding_changes,
            self.texture_binding_changes,
            self.texture_layer_changes,
            self.program_binding_changes,
            self.vao_binding_changes,
            self.fixed_function_changes,
            self.blend_state_changes,
            self.viewport_state_changes,
            self.redundant_calls_skipped
        )
    }
}
