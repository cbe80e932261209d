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

//! Outbound side of the cache: the closed set of native entry points it is allowed to call.
//!
//! Every method takes already resolved native enumerants and raw object names. Object name `0`
//! always means "nothing bound".

/// The complete set of native calls the state cache may issue. Adding a new state family means
/// adding a method here, the cache never reaches the device through any other path.
pub trait GlDevice {
    fn enable(&self, capability: u32);

    fn disable(&self, capability: u32);

    /// Queries the true enabled state of a capability. Only used for re-synchronization.
    fn is_enabled(&self, capability: u32) -> bool;

    /// Queries an integer state value. Only used for re-synchronization.
    fn get_integer(&self, parameter: u32) -> i32;

    fn bind_buffer(&self, target: u32, buffer: u32);

    fn bind_buffer_base(&self, target: u32, index: u32, buffer: u32);

    fn bind_vertex_array(&self, vertex_array: u32);

    /// Selects texture unit, `unit` is zero-based (not `TEXTURE0 + n`).
    fn active_texture(&self, unit: u32);

    fn bind_texture(&self, target: u32, texture: u32);

    fn use_program(&self, program: u32);

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);

    /// Indexed viewport path. Each entry is `[x, y, width, height]`.
    fn viewport_array(&self, first: u32, viewports: &[[f32; 4]]);

    fn scissor(&self, x: i32, y: i32, width: i32, height: i32);

    /// Indexed scissor path. Each entry is `[x, y, width, height]`.
    fn scissor_array(&self, first: u32, scissors: &[[i32; 4]]);

    fn depth_range(&self, near: f64, far: f64);

    /// Indexed depth range path. Each entry is `[near, far]`.
    fn depth_range_array(&self, first: u32, ranges: &[[f64; 2]]);

    fn depth_func(&self, func: u32);

    fn depth_mask(&self, flag: bool);

    fn cull_face(&self, face: u32);

    fn front_face(&self, mode: u32);

    fn polygon_mode(&self, face: u32, mode: u32);

    fn stencil_op_separate(&self, face: u32, fail: u32, depth_fail: u32, depth_pass: u32);

    fn stencil_func_separate(&self, face: u32, func: u32, reference: i32, mask: u32);

    fn stencil_mask_separate(&self, face: u32, mask: u32);

    fn color_mask(&self, red: bool, green: bool, blue: bool, alpha: bool);

    fn color_mask_indexed(&self, draw_buffer: u32, red: bool, green: bool, blue: bool, alpha: bool);

    fn blend_func_separate(&self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32);

    fn blend_func_separate_indexed(
        &self,
        draw_buffer: u32,
        src_rgb: u32,
        dst_rgb: u32,
        src_alpha: u32,
        dst_alpha: u32,
    );

    /// Selects the draw buffer that non-indexed color mask and blend calls address.
    fn draw_buffer(&self, buffer: u32);
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::GlDevice;
    use glow::HasContext;
    use std::num::NonZeroU32;

    fn name<T>(raw: u32, wrap: fn(NonZeroU32) -> T) -> Option<T> {
        NonZeroU32::new(raw).map(wrap)
    }

    impl GlDevice for glow::Context {
        fn enable(&self, capability: u32) {
            unsafe { HasContext::enable(self, capability) }
        }

        fn disable(&self, capability: u32) {
            unsafe { HasContext::disable(self, capability) }
        }

        fn is_enabled(&self, capability: u32) -> bool {
            unsafe { HasContext::is_enabled(self, capability) }
        }

        fn get_integer(&self, parameter: u32) -> i32 {
            unsafe { self.get_parameter_i32(parameter) }
        }

        fn bind_buffer(&self, target: u32, buffer: u32) {
            unsafe { HasContext::bind_buffer(self, target, name(buffer, glow::NativeBuffer)) }
        }

        fn bind_buffer_base(&self, target: u32, index: u32, buffer: u32) {
            unsafe {
                HasContext::bind_buffer_base(self, target, index, name(buffer, glow::NativeBuffer))
            }
        }

        fn bind_vertex_array(&self, vertex_array: u32) {
            unsafe {
                HasContext::bind_vertex_array(self, name(vertex_array, glow::NativeVertexArray))
            }
        }

        fn active_texture(&self, unit: u32) {
            unsafe { HasContext::active_texture(self, glow::TEXTURE0 + unit) }
        }

        fn bind_texture(&self, target: u32, texture: u32) {
            unsafe { HasContext::bind_texture(self, target, name(texture, glow::NativeTexture)) }
        }

        fn use_program(&self, program: u32) {
            unsafe { HasContext::use_program(self, name(program, glow::NativeProgram)) }
        }

        fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
            unsafe { HasContext::viewport(self, x, y, width, height) }
        }

        fn viewport_array(&self, first: u32, viewports: &[[f32; 4]]) {
            unsafe { self.viewport_f32_slice(first, viewports.len() as i32, viewports) }
        }

        fn scissor(&self, x: i32, y: i32, width: i32, height: i32) {
            unsafe { HasContext::scissor(self, x, y, width, height) }
        }

        fn scissor_array(&self, first: u32, scissors: &[[i32; 4]]) {
            unsafe { self.scissor_slice(first, scissors.len() as i32, scissors) }
        }

        fn depth_range(&self, near: f64, far: f64) {
            unsafe { self.depth_range_f64(near, far) }
        }

        fn depth_range_array(&self, first: u32, ranges: &[[f64; 2]]) {
            unsafe { self.depth_range_f64_slice(first, ranges.len() as i32, ranges) }
        }

        fn depth_func(&self, func: u32) {
            unsafe { HasContext::depth_func(self, func) }
        }

        fn depth_mask(&self, flag: bool) {
            unsafe { HasContext::depth_mask(self, flag) }
        }

        fn cull_face(&self, face: u32) {
            unsafe { HasContext::cull_face(self, face) }
        }

        fn front_face(&self, mode: u32) {
            unsafe { HasContext::front_face(self, mode) }
        }

        fn polygon_mode(&self, face: u32, mode: u32) {
            unsafe { HasContext::polygon_mode(self, face, mode) }
        }

        fn stencil_op_separate(&self, face: u32, fail: u32, depth_fail: u32, depth_pass: u32) {
            unsafe { HasContext::stencil_op_separate(self, face, fail, depth_fail, depth_pass) }
        }

        fn stencil_func_separate(&self, face: u32, func: u32, reference: i32, mask: u32) {
            unsafe { HasContext::stencil_func_separate(self, face, func, reference, mask) }
        }

        fn stencil_mask_separate(&self, face: u32, mask: u32) {
            unsafe { HasContext::stencil_mask_separate(self, face, mask) }
        }

        fn color_mask(&self, red: bool, green: bool, blue: bool, alpha: bool) {
            unsafe { HasContext::color_mask(self, red, green, blue, alpha) }
        }

        fn color_mask_indexed(
            &self,
            draw_buffer: u32,
            red: bool,
            green: bool,
            blue: bool,
            alpha: bool,
        ) {
            unsafe { self.color_mask_draw_buffer(draw_buffer, red, green, blue, alpha) }
        }

        fn blend_func_separate(&self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32) {
            unsafe { HasContext::blend_func_separate(self, src_rgb, dst_rgb, src_alpha, dst_alpha) }
        }

        fn blend_func_separate_indexed(
            &self,
            draw_buffer: u32,
            src_rgb: u32,
            dst_rgb: u32,
            src_alpha: u32,
            dst_alpha: u32,
        ) {
            unsafe {
                self.blend_func_separate_draw_buffer(
                    draw_buffer,
                    src_rgb,
                    dst_rgb,
                    src_alpha,
                    dst_alpha,
                )
            }
        }

        fn draw_buffer(&self, buffer: u32) {
            unsafe { HasContext::draw_buffer(self, buffer) }
        }
    }
}
