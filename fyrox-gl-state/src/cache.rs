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

//! The state cache itself. See [`GlStateCache`] docs for more info.

use crate::{
    binding::{
        BufferBindings, BufferTarget, ProgramBinding, TextureBindings, TextureSlot, TextureTarget,
        MAX_TEXTURE_LAYERS,
    },
    blend::{BlendCache, BlendTarget},
    core::log::Log,
    device::GlDevice,
    error::StateError,
    fixed::{FixedFunctionState, StencilFaceIndex, StencilState},
    scope::StateScope,
    settings::{ContextInfo, DeviceFeatures, StateCacheSettings},
    stats::StateStatistics,
    toggle::{Capability, ToggleCache},
    viewport::{ClipOrigin, CoordinateSpace, DepthRange, ScissorBox, Viewport},
    CompareFunc, CullFace, FromGlConstant, FrontFace, PolygonFace, PolygonFillMode, ToGlConstant,
};
use std::cell::RefCell;
use strum::IntoEnumIterator;

pub(crate) struct InnerState {
    toggles: ToggleCache,
    buffers: BufferBindings,
    textures: TextureBindings,
    program: ProgramBinding,
    fixed: FixedFunctionState,
    blend: BlendCache,
    space: CoordinateSpace,
    features: DeviceFeatures,
    frame_statistics: StateStatistics,
}

impl InnerState {
    fn new(settings: StateCacheSettings) -> Self {
        Self {
            toggles: Default::default(),
            buffers: Default::default(),
            textures: Default::default(),
            program: Default::default(),
            fixed: Default::default(),
            blend: Default::default(),
            space: CoordinateSpace {
                origin: settings.clip_origin,
                context_height: settings.context_height,
            },
            features: settings.features,
            frame_statistics: Default::default(),
        }
    }
}

/// Shadow copy of the device state that sits between a backend and the device. Every setter
/// compares the requested value with the cached one and only forwards actual transitions to
/// the device, redundant calls are dropped.
///
/// The cache must see every state change. If some external code has modified the device state
/// behind its back, call [`Self::reset`] (capabilities) or the `forced_*` binding methods to
/// bring it back in sync.
///
/// There must be exactly one cache per device context. The cache is not [`Sync`], and it should
/// be used only on the thread that owns the context.
pub struct GlStateCache<D: GlDevice> {
    device: D,
    state: RefCell<InnerState>,
}

impl<D: GlDevice> GlStateCache<D> {
    /// Creates a new cache which assumes that the device is in its initial state: no capability
    /// enabled, nothing bound.
    pub fn new(device: D, settings: StateCacheSettings) -> Self {
        Self {
            device,
            state: RefCell::new(InnerState::new(settings)),
        }
    }

    /// Creates a new cache and fills it by querying the actual device state. Use this when
    /// attaching to a context that could be modified by someone else before (a shared or
    /// external context).
    pub fn from_device_state(device: D, settings: StateCacheSettings) -> Self {
        let cache = Self::new(device, settings);
        cache.reset();
        cache.sync_bindings();
        cache.sync_fixed_function();
        // The color mask can't be read back as an integer, so it is unknown until set.
        cache.state.borrow_mut().blend.invalidate();
        Log::info(format!(
            "State cache was primed from device state. Active texture layer: {}, program: {}",
            cache.active_texture_layer(),
            cache.bound_program()
        ));
        cache
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Must be called by the owner of the context whenever the context becomes current or its
    /// size changes.
    pub fn make_current_info(&self, context_info: &ContextInfo) {
        self.state.borrow_mut().space.context_height = context_info.height;
    }

    /// Sets the logical coordinate origin. [`ClipOrigin::UpperLeft`] enables vertical flip of
    /// every viewport and scissor rectangle before it is sent to the device.
    pub fn set_clip_origin(&self, origin: ClipOrigin) {
        self.state.borrow_mut().space.origin = origin;
    }

    pub fn clip_origin(&self) -> ClipOrigin {
        self.state.borrow().space.origin
    }

    pub fn context_height(&self) -> i32 {
        self.state.borrow().space.context_height
    }

    pub fn features(&self) -> DeviceFeatures {
        self.state.borrow().features
    }

    pub fn statistics(&self) -> StateStatistics {
        self.state.borrow().frame_statistics
    }

    pub fn reset_statistics(&self) {
        self.state.borrow_mut().frame_statistics = Default::default();
    }

    /// Creates a scope whose pushed states are restored when it is dropped.
    pub fn scope(&self) -> StateScope<'_, D> {
        StateScope::new(self)
    }

    // Capabilities.

    /// Re-reads every capability from the device. This is the only way to recover after the
    /// device state was changed without the cache.
    pub fn reset(&self) {
        let mut state = self.state.borrow_mut();
        let mut drifted = 0;
        for capability in Capability::iter() {
            let enabled = self.device.is_enabled(capability.into_gl());
            if state.toggles.overwrite(capability, enabled) {
                drifted += 1;
            }
        }
        if drifted > 0 {
            Log::info(format!(
                "State cache re-synchronized {drifted} capabilities with the device."
            ));
        }
    }

    pub fn set(&self, capability: Capability, enabled: bool) {
        let mut state = self.state.borrow_mut();
        if state.toggles.update(capability, enabled) {
            state.frame_statistics.capability_changes += 1;
            if enabled {
                self.device.enable(capability.into_gl());
            } else {
                self.device.disable(capability.into_gl());
            }
        } else {
            state.frame_statistics.redundant_calls_skipped += 1;
        }
    }

    pub fn enable(&self, capability: Capability) {
        let mut state = self.state.borrow_mut();
        if !state.toggles.get(capability) {
            state.toggles.update(capability, true);
            state.frame_statistics.capability_changes += 1;
            self.device.enable(capability.into_gl());
        } else {
            state.frame_statistics.redundant_calls_skipped += 1;
        }
    }

    pub fn disable(&self, capability: Capability) {
        let mut state = self.state.borrow_mut();
        if state.toggles.get(capability) {
            state.toggles.update(capability, false);
            state.frame_statistics.capability_changes += 1;
            self.device.disable(capability.into_gl());
        } else {
            state.frame_statistics.redundant_calls_skipped += 1;
        }
    }

    /// Returns the cached value, the device is never queried.
    pub fn is_enabled(&self, capability: Capability) -> bool {
        self.state.borrow().toggles.get(capability)
    }

    pub fn push_state(&self, capability: Capability) {
        self.state.borrow_mut().toggles.push(capability);
    }

    /// Restores the most recently pushed capability.
    ///
    /// # Panics
    ///
    /// Panics if there is nothing to pop.
    pub fn pop_state(&self) {
        let (capability, enabled) = self.state.borrow_mut().toggles.pop();
        self.set(capability, enabled);
    }

    /// Pops `count` capabilities in reverse order of pushing.
    pub fn pop_states(&self, count: usize) {
        for _ in 0..count {
            self.pop_state();
        }
    }

    // Buffers.

    pub fn bind_buffer(&self, target: BufferTarget, buffer: u32) {
        let mut state = self.state.borrow_mut();
        if state.buffers.update(target, buffer) {
            state.frame_statistics.buffer_binding_changes += 1;
            self.device.bind_buffer(target.into_gl(), buffer);
        } else {
            state.frame_statistics.redundant_calls_skipped += 1;
        }
    }

    /// Binds a buffer to an indexed binding point. The index is not tracked, so this call is
    /// always forwarded to the device.
    pub fn bind_buffer_base(&self, target: BufferTarget, index: u32, buffer: u32) {
        let mut state = self.state.borrow_mut();
        state.buffers.overwrite(target, buffer);
        state.frame_statistics.buffer_binding_changes += 1;
        self.device.bind_buffer_base(target.into_gl(), index, buffer);
    }

    /// Binds a buffer without comparing it against the cache. Use it when the cached value is
    /// known to be stale.
    pub fn forced_bind_buffer(&self, target: BufferTarget, buffer: u32) {
        let mut state = self.state.borrow_mut();
        state.buffers.overwrite(target, buffer);
        state.frame_statistics.buffer_binding_changes += 1;
        self.device.bind_buffer(target.into_gl(), buffer);
    }

    /// Binds a vertex array object. Always forwarded, the vertex and index buffer bindings are
    /// reset in the cache since they're now defined by the vertex array.
    pub fn bind_vertex_array(&self, vertex_array: u32) {
        let mut state = self.state.borrow_mut();
        state.frame_statistics.vao_binding_changes += 1;
        self.device.bind_vertex_array(vertex_array);
        state.buffers.overwrite(BufferTarget::Array, 0);
        state.buffers.overwrite(BufferTarget::ElementArray, 0);
    }

    pub fn bound_buffer(&self, target: BufferTarget) -> u32 {
        self.state.borrow().buffers.get(target)
    }

    pub fn push_bound_buffer(&self, target: BufferTarget) {
        self.state.borrow_mut().buffers.push(target);
    }

    /// # Panics
    ///
    /// Panics if nothing was pushed for the target.
    pub fn pop_bound_buffer(&self, target: BufferTarget) {
        let buffer = self.state.borrow_mut().buffers.pop(target);
        self.bind_buffer(target, buffer);
    }

    // Textures.

    /// Selects the texture layer subsequent texture binds address.
    ///
    /// # Panics
    ///
    /// Panics if the layer is out of range (see [`MAX_TEXTURE_LAYERS`]).
    pub fn active_texture(&self, layer: u32) {
        let mut state = self.state.borrow_mut();
        if state.textures.set_active_layer(layer) {
            state.frame_statistics.texture_layer_changes += 1;
            self.device.active_texture(layer);
        } else {
            state.frame_statistics.redundant_calls_skipped += 1;
        }
    }

    pub fn active_texture_layer(&self) -> u32 {
        self.state.borrow().textures.active_layer()
    }

    /// Binds a texture to the target of the active layer.
    pub fn bind_texture(&self, target: TextureTarget, texture: u32) {
        let mut state = self.state.borrow_mut();
        if state.textures.update(target, texture) {
            state.frame_statistics.texture_binding_changes += 1;
            self.device.bind_texture(target.into_gl(), texture);
        } else {
            state.frame_statistics.redundant_calls_skipped += 1;
        }
    }

    pub fn forced_bind_texture(&self, target: TextureTarget, texture: u32) {
        let mut state = self.state.borrow_mut();
        state.textures.overwrite(target, texture);
        state.frame_statistics.texture_binding_changes += 1;
        self.device.bind_texture(target.into_gl(), texture);
    }

    /// # Panics
    ///
    /// Panics if the layer is out of range.
    pub fn bound_texture(&self, layer: u32, target: TextureTarget) -> u32 {
        self.state.borrow().textures.get(TextureSlot { layer, target })
    }

    /// Returns the first texture layer that has no textures bound.
    pub fn free_texture_layer(&self) -> Option<u32> {
        self.state.borrow().textures.free_layer()
    }

    pub fn push_bound_texture(&self, layer: u32, target: TextureTarget) {
        self.state
            .borrow_mut()
            .textures
            .push(TextureSlot { layer, target });
    }

    /// Restores the binding saved for the layer and target. If it differs from the current
    /// one, the layer becomes active and stays active afterwards.
    ///
    /// # Panics
    ///
    /// Panics if nothing was pushed for the layer and target.
    pub fn pop_bound_texture(&self, layer: u32, target: TextureTarget) {
        let slot = TextureSlot { layer, target };
        let texture = {
            let mut state = self.state.borrow_mut();
            let texture = state.textures.pop(slot);
            if state.textures.get(slot) == texture {
                state.frame_statistics.redundant_calls_skipped += 1;
                return;
            }
            texture
        };
        self.active_texture(layer);
        self.bind_texture(target, texture);
    }

    // Shader program.

    pub fn bind_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        if state.program.update(program) {
            state.frame_statistics.program_binding_changes += 1;
            self.device.use_program(program);
        } else {
            state.frame_statistics.redundant_calls_skipped += 1;
        }
    }

    pub fn bound_program(&self) -> u32 {
        self.state.borrow().program.get()
    }

    pub fn push_program(&self) {
        self.state.borrow_mut().program.push();
    }

    /// # Panics
    ///
    /// Panics if there is nothing to pop.
    pub fn pop_program(&self) {
        let program = self.state.borrow_mut().program.pop();
        self.bind_program(program);
    }

    /// Unbinds every texture on every layer and the shader program, and makes layer 0 active.
    pub fn invalidate_bindings(&self) {
        let mut state = self.state.borrow_mut();

        let bound = state.textures.bound_textures().collect::<Vec<_>>();
        let mut active_layer = state.textures.active_layer();
        for (layer, target, _) in bound {
            if active_layer != layer {
                active_layer = layer;
                state.frame_statistics.texture_layer_changes += 1;
                self.device.active_texture(layer);
            }
            state.frame_statistics.texture_binding_changes += 1;
            self.device.bind_texture(target.into_gl(), 0);
        }
        if active_layer != 0 {
            state.frame_statistics.texture_layer_changes += 1;
            self.device.active_texture(0);
        }
        state.textures.clear();

        if state.program.update(0) {
            state.frame_statistics.program_binding_changes += 1;
            self.device.use_program(0);
        }
    }

    // Fixed function state.

    pub fn set_depth_func(&self, depth_func: CompareFunc) {
        let mut state = self.state.borrow_mut();
        if state.fixed.depth_func != depth_func {
            state.fixed.depth_func = depth_func;
            state.frame_statistics.fixed_function_changes += 1;
            self.device.depth_func(depth_func.into_gl());
        } else {
            state.frame_statistics.redundant_calls_skipped += 1;
        }
    }

    pub fn depth_func(&self) -> CompareFunc {
        self.state.borrow().fixed.depth_func
    }

    pub fn set_depth_write(&self, depth_write: bool) {
        let mut state = self.state.borrow_mut();
        if state.fixed.depth_write != depth_write {
            state.fixed.depth_write = depth_write;
            state.frame_statistics.fixed_function_changes += 1;
            self.device.depth_mask(depth_write);
        } else {
            state.frame_statistics.redundant_calls_skipped += 1;
        }
    }

    pub fn depth_write(&self) -> bool {
        self.state.borrow().fixed.depth_write
    }

    pub fn set_cull_face(&self, cull_face: CullFace) {
        let mut state = self.state.borrow_mut();
        if state.fixed.cull_face != cull_face {
            state.fixed.cull_face = cull_face;
            state.frame_statistics.fixed_function_changes += 1;
            self.device.cull_face(cull_face.into_gl());
        } else {
            state.frame_statistics.redundant_calls_skipped += 1;
        }
    }

    pub fn cull_face(&self) -> CullFace {
        self.state.borrow().fixed.cull_face
    }

    pub fn set_front_face(&self, front_face: FrontFace) {
        let mut state = self.state.borrow_mut();
        if state.fixed.front_face != front_face {
            state.fixed.front_face = front_face;
            state.frame_statistics.fixed_function_changes += 1;
            self.device.front_face(front_face.into_gl());
        } else {
            state.frame_statistics.redundant_calls_skipped += 1;
        }
    }

    pub fn front_face(&self) -> FrontFace {
        self.state.borrow().fixed.front_face
    }

    pub fn set_polygon_fill_mode(&self, polygon_face: PolygonFace, polygon_fill_mode: PolygonFillMode) {
        let mut state = self.state.borrow_mut();
        let polygon_mode = Some((polygon_face, polygon_fill_mode));
        if state.fixed.polygon_mode != polygon_mode {
            state.fixed.polygon_mode = polygon_mode;
            state.frame_statistics.fixed_function_changes += 1;
            self.device
                .polygon_mode(polygon_face.into_gl(), polygon_fill_mode.into_gl());
        } else {
            state.frame_statistics.redundant_calls_skipped += 1;
        }
    }

    /// Returns `None` if the cache was primed from a device that reported an unknown mode.
    pub fn polygon_fill_mode(&self) -> Option<(PolygonFace, PolygonFillMode)> {
        self.state.borrow().fixed.polygon_mode
    }

    /// Sets stencil state of one or both faces. Each face is compared separately, so setting
    /// [`PolygonFace::FrontAndBack`] updates a face even if the other one already matches.
    pub fn set_stencil_state(&self, face: PolygonFace, stencil: &StencilState) {
        let mut state = self.state.borrow_mut();
        for &index in StencilFaceIndex::expand(face) {
            let changes = state.fixed.stencil_mut(index).assign(stencil);
            if !changes.any() {
                state.frame_statistics.redundant_calls_skipped += 1;
                continue;
            }

            let gl_face = index.polygon_face().into_gl();
            if changes.op {
                state.frame_statistics.fixed_function_changes += 1;
                self.device.stencil_op_separate(
                    gl_face,
                    stencil.fail.into_gl(),
                    stencil.depth_fail.into_gl(),
                    stencil.depth_pass.into_gl(),
                );
            }
            if changes.func {
                state.frame_statistics.fixed_function_changes += 1;
                self.device.stencil_func_separate(
                    gl_face,
                    stencil.func.into_gl(),
                    stencil.reference,
                    stencil.read_mask,
                );
            }
            if changes.write_mask {
                state.frame_statistics.fixed_function_changes += 1;
                self.device
                    .stencil_mask_separate(gl_face, stencil.write_mask);
            }
        }
    }

    pub fn front_stencil_state(&self) -> StencilState {
        *self.state.borrow().fixed.stencil(StencilFaceIndex::Front)
    }

    pub fn back_stencil_state(&self) -> StencilState {
        *self.state.borrow().fixed.stencil(StencilFaceIndex::Back)
    }

    // Multi-target state.

    /// Sends viewports to the device. A single viewport always goes through the legacy entry
    /// point, multiple viewports require [`DeviceFeatures::viewport_array`]. Viewports are
    /// always sent, they aren't cached.
    pub fn set_viewports(&self, viewports: &[Viewport]) -> Result<(), StateError> {
        let mut state = self.state.borrow_mut();
        match viewports {
            [] => (),
            [viewport] => {
                let viewport = state.space.viewport(*viewport);
                self.device.viewport(
                    viewport.x as i32,
                    viewport.y as i32,
                    viewport.width as i32,
                    viewport.height as i32,
                );
            }
            _ => {
                if !state.features.viewport_array {
                    return Err(StateError::IndexedPathUnsupported {
                        family: "viewport",
                        count: viewports.len(),
                    });
                }
                let viewports = state.space.viewports(viewports);
                self.device
                    .viewport_array(0, bytemuck::cast_slice(&viewports));
            }
        }
        state.frame_statistics.viewport_state_changes += viewports.len().min(1);
        Ok(())
    }

    /// Same as [`Self::set_viewports`], but for scissor rectangles.
    pub fn set_scissors(&self, scissors: &[ScissorBox]) -> Result<(), StateError> {
        let mut state = self.state.borrow_mut();
        match scissors {
            [] => (),
            [scissor] => {
                let scissor = state.space.scissor(*scissor);
                self.device
                    .scissor(scissor.x, scissor.y, scissor.width, scissor.height);
            }
            _ => {
                if !state.features.viewport_array {
                    return Err(StateError::IndexedPathUnsupported {
                        family: "scissor",
                        count: scissors.len(),
                    });
                }
                let scissors = state.space.scissors(scissors);
                self.device.scissor_array(0, bytemuck::cast_slice(&scissors));
            }
        }
        state.frame_statistics.viewport_state_changes += scissors.len().min(1);
        Ok(())
    }

    /// Depth ranges follow the same dispatch rules as viewports, but are never flipped.
    pub fn set_depth_ranges(&self, depth_ranges: &[DepthRange]) -> Result<(), StateError> {
        let mut state = self.state.borrow_mut();
        match depth_ranges {
            [] => (),
            [range] => self.device.depth_range(range.min_depth, range.max_depth),
            _ => {
                if !state.features.viewport_array {
                    return Err(StateError::IndexedPathUnsupported {
                        family: "depth range",
                        count: depth_ranges.len(),
                    });
                }
                self.device
                    .depth_range_array(0, bytemuck::cast_slice(depth_ranges));
            }
        }
        state.frame_statistics.viewport_state_changes += depth_ranges.len().min(1);
        Ok(())
    }

    /// Sets color mask and blend func of every draw buffer, in draw buffer order. Blend func is
    /// only sent when `blend_enabled` is set.
    ///
    /// A single target goes through the non-indexed entry points, only its color mask is compared
    /// against the cache and the blend func is always sent. Multiple targets are always sent: either by indexed calls, or, without
    /// [`DeviceFeatures::indexed_draw_buffer_blend`], by switching the current draw buffer
    /// before each non-indexed call. The latter leaves the last draw buffer current.
    pub fn set_blend_states(&self, targets: &[BlendTarget], blend_enabled: bool) {
        let mut state = self.state.borrow_mut();
        match targets {
            [] => (),
            [target] => {
                let mask = target.color_mask;
                if state.blend.update_color_mask(mask) {
                    state.frame_statistics.blend_state_changes += 1;
                    self.device
                        .color_mask(mask.red, mask.green, mask.blue, mask.alpha);
                } else {
                    state.frame_statistics.redundant_calls_skipped += 1;
                }

                if blend_enabled {
                    let func = target.func;
                    state.frame_statistics.blend_state_changes += 1;
                    self.device.blend_func_separate(
                        func.sfactor.into_gl(),
                        func.dfactor.into_gl(),
                        func.alpha_sfactor.into_gl(),
                        func.alpha_dfactor.into_gl(),
                    );
                }
            }
            _ => {
                let indexed = state.features.indexed_draw_buffer_blend;
                for (draw_buffer, target) in targets.iter().enumerate() {
                    let draw_buffer = draw_buffer as u32;
                    let mask = target.color_mask;
                    let func = target.func;
                    if indexed {
                        self.device.color_mask_indexed(
                            draw_buffer,
                            mask.red,
                            mask.green,
                            mask.blue,
                            mask.alpha,
                        );
                        if blend_enabled {
                            self.device.blend_func_separate_indexed(
                                draw_buffer,
                                func.sfactor.into_gl(),
                                func.dfactor.into_gl(),
                                func.alpha_sfactor.into_gl(),
                                func.alpha_dfactor.into_gl(),
                            );
                        }
                    } else {
                        self.device
                            .draw_buffer(glow::COLOR_ATTACHMENT0 + draw_buffer);
                        self.device
                            .color_mask(mask.red, mask.green, mask.blue, mask.alpha);
                        if blend_enabled {
                            self.device.blend_func_separate(
                                func.sfactor.into_gl(),
                                func.dfactor.into_gl(),
                                func.alpha_sfactor.into_gl(),
                                func.alpha_dfactor.into_gl(),
                            );
                        }
                    }
                    state.frame_statistics.blend_state_changes += 1;
                }
                state.blend.invalidate();
            }
        }
    }

    // Synchronization with the device.

    fn sync_bindings(&self) {
        let mut state = self.state.borrow_mut();

        for target in BufferTarget::iter() {
            let buffer = self.device.get_integer(target.binding_query());
            state.buffers.overwrite(target, buffer as u32);
        }

        let program = self.device.get_integer(glow::CURRENT_PROGRAM);
        state.program.update(program as u32);

        let active_layer = (self.device.get_integer(glow::ACTIVE_TEXTURE) as u32)
            .saturating_sub(glow::TEXTURE0)
            .min(MAX_TEXTURE_LAYERS as u32 - 1);
        let layer_count = self
            .device
            .get_integer(glow::MAX_COMBINED_TEXTURE_IMAGE_UNITS)
            .clamp(0, MAX_TEXTURE_LAYERS as i32) as u32;
        for layer in 0..layer_count {
            self.device.active_texture(layer);
            state.textures.set_active_layer(layer);
            for target in TextureTarget::iter() {
                let texture = self.device.get_integer(target.binding_query());
                state.textures.overwrite(target, texture as u32);
            }
        }
        if layer_count > 0 {
            self.device.active_texture(active_layer);
        }
        state.textures.set_active_layer(active_layer);
    }

    fn sync_fixed_function(&self) {
        fn query<T: FromGlConstant>(device: &impl GlDevice, parameter: u32, name: &str) -> Option<T> {
            let value = device.get_integer(parameter) as u32;
            let result = T::from_gl(value);
            if result.is_none() {
                Log::warn(format!(
                    "Unable to map {name} value {value:#x} reported by the device, keeping the default."
                ));
            }
            result
        }

        fn query_stencil(device: &impl GlDevice, stencil: &mut StencilState, parameters: [u32; 7]) {
            let [fail, depth_fail, depth_pass, func, reference, read_mask, write_mask] = parameters;
            if let Some(fail) = query(device, fail, "stencil fail op") {
                stencil.fail = fail;
            }
            if let Some(depth_fail) = query(device, depth_fail, "stencil depth fail op") {
                stencil.depth_fail = depth_fail;
            }
            if let Some(depth_pass) = query(device, depth_pass, "stencil depth pass op") {
                stencil.depth_pass = depth_pass;
            }
            if let Some(func) = query(device, func, "stencil func") {
                stencil.func = func;
            }
            stencil.reference = device.get_integer(reference);
            stencil.read_mask = device.get_integer(read_mask) as u32;
            stencil.write_mask = device.get_integer(write_mask) as u32;
        }

        let mut state = self.state.borrow_mut();
        let device = &self.device;
        let fixed = &mut state.fixed;

        if let Some(depth_func) = query(device, glow::DEPTH_FUNC, "depth func") {
            fixed.depth_func = depth_func;
        }
        fixed.depth_write = device.get_integer(glow::DEPTH_WRITEMASK) != 0;
        if let Some(cull_face) = query(device, glow::CULL_FACE_MODE, "cull face") {
            fixed.cull_face = cull_face;
        }
        if let Some(front_face) = query(device, glow::FRONT_FACE, "front face") {
            fixed.front_face = front_face;
        }
        // Core profiles report a single mode shared by both faces. An unknown mode is not
        // replaced by the default, the next polygon mode call must reach the device.
        fixed.polygon_mode = query::<PolygonFillMode>(device, glow::POLYGON_MODE, "polygon mode")
            .map(|mode| (PolygonFace::FrontAndBack, mode));

        query_stencil(
            device,
            fixed.stencil_mut(StencilFaceIndex::Front),
            [
                glow::STENCIL_FAIL,
                glow::STENCIL_PASS_DEPTH_FAIL,
                glow::STENCIL_PASS_DEPTH_PASS,
                glow::STENCIL_FUNC,
                glow::STENCIL_REF,
                glow::STENCIL_VALUE_MASK,
                glow::STENCIL_WRITEMASK,
            ],
        );
        query_stencil(
            device,
            fixed.stencil_mut(StencilFaceIndex::Back),
            [
                glow::STENCIL_BACK_FAIL,
                glow::STENCIL_BACK_PASS_DEPTH_FAIL,
                glow::STENCIL_BACK_PASS_DEPTH_PASS,
                glow::STENCIL_BACK_FUNC,
                glow::STENCIL_BACK_REF,
                glow::STENCIL_BACK_VALUE_MASK,
                glow::STENCIL_BACK_WRITEMASK,
            ],
        );
    }
}

#[cfg(test)]
mod test {
    use crate::{
        binding::{BufferTarget, TextureTarget},
        blend::BlendTarget,
        cache::GlStateCache,
        device::test::{DeviceCall, RecordingDevice},
        error::StateError,
        fixed::StencilState,
        settings::{ContextInfo, DeviceFeatures, StateCacheSettings},
        toggle::Capability,
        viewport::{ClipOrigin, DepthRange, ScissorBox, Viewport},
        BlendFactor, BlendFunc, ColorMask, CompareFunc, CullFace, FrontFace, PolygonFace,
        PolygonFillMode, StencilAction,
    };

    fn make_cache() -> GlStateCache<RecordingDevice> {
        GlStateCache::new(RecordingDevice::default(), Default::default())
    }

    fn make_cache_with_features(features: DeviceFeatures) -> GlStateCache<RecordingDevice> {
        GlStateCache::new(
            RecordingDevice::default(),
            StateCacheSettings {
                features,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_repeated_setters_reach_device_once() {
        let cache = make_cache();

        cache.set(Capability::Blend, true);
        cache.set(Capability::Blend, true);
        cache.enable(Capability::Blend);
        cache.bind_buffer(BufferTarget::Array, 4);
        cache.bind_buffer(BufferTarget::Array, 4);
        cache.bind_program(9);
        cache.bind_program(9);
        cache.set_depth_func(CompareFunc::LessOrEqual);
        cache.set_depth_func(CompareFunc::LessOrEqual);
        cache.set_cull_face(CullFace::Front);
        cache.set_cull_face(CullFace::Front);
        cache.set_front_face(FrontFace::Clockwise);
        cache.set_front_face(FrontFace::Clockwise);
        cache.set_depth_write(false);
        cache.set_depth_write(false);

        assert_eq!(
            cache.device().take_calls(),
            vec![
                DeviceCall::Enable(glow::BLEND),
                DeviceCall::BindBuffer(glow::ARRAY_BUFFER, 4),
                DeviceCall::UseProgram(9),
                DeviceCall::DepthFunc(glow::LEQUAL),
                DeviceCall::CullFace(glow::FRONT),
                DeviceCall::FrontFace(glow::CW),
                DeviceCall::DepthMask(false),
            ]
        );
        assert_eq!(cache.statistics().redundant_calls_skipped, 8);
    }

    #[test]
    fn test_values_matching_initial_state_are_not_sent() {
        let cache = make_cache();
        cache.disable(Capability::DepthTest);
        cache.bind_buffer(BufferTarget::Uniform, 0);
        cache.bind_texture(TextureTarget::Texture2D, 0);
        cache.active_texture(0);
        cache.set_depth_func(CompareFunc::Less);
        cache.set_depth_write(true);
        cache.set_stencil_state(PolygonFace::FrontAndBack, &StencilState::default());
        assert_eq!(cache.device().call_count(), 0);
    }

    #[test]
    fn test_enable_disable_toggle() {
        let cache = make_cache();
        cache.enable(Capability::ScissorTest);
        assert!(cache.is_enabled(Capability::ScissorTest));
        cache.disable(Capability::ScissorTest);
        cache.disable(Capability::ScissorTest);
        assert!(!cache.is_enabled(Capability::ScissorTest));
        assert_eq!(
            cache.device().take_calls(),
            vec![
                DeviceCall::Enable(glow::SCISSOR_TEST),
                DeviceCall::Disable(glow::SCISSOR_TEST),
            ]
        );
    }

    #[test]
    fn test_push_pop_capability_restores_value() {
        let cache = make_cache();
        cache.enable(Capability::DepthTest);

        cache.push_state(Capability::DepthTest);
        cache.push_state(Capability::Blend);
        cache.disable(Capability::DepthTest);
        cache.enable(Capability::DepthTest);
        cache.disable(Capability::DepthTest);
        cache.enable(Capability::Blend);
        cache.pop_states(2);

        assert!(cache.is_enabled(Capability::DepthTest));
        assert!(!cache.is_enabled(Capability::Blend));
    }

    #[test]
    fn test_pop_restoring_current_value_is_no_op() {
        let cache = make_cache();
        cache.bind_program(3);
        cache.push_program();
        cache.bind_program(3);
        cache.push_state(Capability::Blend);
        cache.device().take_calls();

        cache.pop_state();
        cache.pop_program();

        assert_eq!(cache.device().call_count(), 0);
    }

    #[test]
    #[should_panic]
    fn test_pop_empty_capability_stack_panics() {
        make_cache().pop_state();
    }

    #[test]
    #[should_panic]
    fn test_pop_empty_program_stack_panics() {
        make_cache().pop_program();
    }

    #[test]
    #[should_panic]
    fn test_pop_empty_buffer_stack_panics() {
        let cache = make_cache();
        cache.push_bound_buffer(BufferTarget::Array);
        // Stacks are per target, the array buffer entry can't satisfy this pop.
        cache.pop_bound_buffer(BufferTarget::Uniform);
    }

    #[test]
    fn test_push_pop_buffer_restores_binding() {
        let cache = make_cache();
        cache.bind_buffer(BufferTarget::Uniform, 11);
        cache.push_bound_buffer(BufferTarget::Uniform);
        cache.bind_buffer(BufferTarget::Uniform, 12);
        cache.bind_buffer(BufferTarget::Uniform, 13);
        cache.device().take_calls();

        cache.pop_bound_buffer(BufferTarget::Uniform);

        assert_eq!(cache.bound_buffer(BufferTarget::Uniform), 11);
        assert_eq!(
            cache.device().take_calls(),
            vec![DeviceCall::BindBuffer(glow::UNIFORM_BUFFER, 11)]
        );
    }

    #[test]
    fn test_forced_bind_updates_cache() {
        let cache = make_cache();
        cache.forced_bind_buffer(BufferTarget::Array, 5);
        cache.forced_bind_buffer(BufferTarget::Array, 5);
        cache.bind_buffer(BufferTarget::Array, 5);
        cache.forced_bind_texture(TextureTarget::Texture2D, 6);
        cache.bind_texture(TextureTarget::Texture2D, 6);

        assert_eq!(
            cache.device().take_calls(),
            vec![
                DeviceCall::BindBuffer(glow::ARRAY_BUFFER, 5),
                DeviceCall::BindBuffer(glow::ARRAY_BUFFER, 5),
                DeviceCall::BindTexture(glow::TEXTURE_2D, 6),
            ]
        );
    }

    #[test]
    fn test_indexed_bind_is_never_eliminated() {
        let cache = make_cache();
        cache.bind_buffer_base(BufferTarget::Uniform, 2, 8);
        cache.bind_buffer_base(BufferTarget::Uniform, 2, 8);

        assert_eq!(
            cache.device().take_calls(),
            vec![
                DeviceCall::BindBufferBase(glow::UNIFORM_BUFFER, 2, 8),
                DeviceCall::BindBufferBase(glow::UNIFORM_BUFFER, 2, 8),
            ]
        );
        // The last bound buffer is still remembered.
        assert_eq!(cache.bound_buffer(BufferTarget::Uniform), 8);
        cache.bind_buffer(BufferTarget::Uniform, 8);
        assert_eq!(cache.device().call_count(), 0);
    }

    #[test]
    fn test_vertex_array_forgets_vertex_and_index_buffers() {
        let cache = make_cache();
        cache.bind_buffer(BufferTarget::Array, 1);
        cache.bind_buffer(BufferTarget::ElementArray, 2);
        cache.bind_buffer(BufferTarget::Uniform, 3);
        cache.bind_vertex_array(4);
        cache.bind_vertex_array(4);

        assert_eq!(cache.bound_buffer(BufferTarget::Array), 0);
        assert_eq!(cache.bound_buffer(BufferTarget::ElementArray), 0);
        assert_eq!(cache.bound_buffer(BufferTarget::Uniform), 3);
        assert_eq!(
            cache.device().take_calls()[3..],
            [
                DeviceCall::BindVertexArray(4),
                DeviceCall::BindVertexArray(4)
            ]
        );

        cache.bind_buffer(BufferTarget::Array, 1);
        assert_eq!(
            cache.device().take_calls(),
            vec![DeviceCall::BindBuffer(glow::ARRAY_BUFFER, 1)]
        );
    }

    #[test]
    fn test_texture_layers_are_isolated() {
        let cache = make_cache();
        cache.bind_texture(TextureTarget::Texture2D, 100);
        cache.active_texture(1);
        cache.bind_texture(TextureTarget::Texture2D, 200);
        cache.active_texture(1);
        cache.active_texture(0);

        assert_eq!(cache.bound_texture(0, TextureTarget::Texture2D), 100);
        assert_eq!(cache.bound_texture(1, TextureTarget::Texture2D), 200);
        assert_eq!(cache.bound_texture(1, TextureTarget::CubeMap), 0);
        assert_eq!(cache.active_texture_layer(), 0);

        // Layer 0 already has texture 100 bound.
        cache.bind_texture(TextureTarget::Texture2D, 100);

        assert_eq!(
            cache.device().take_calls(),
            vec![
                DeviceCall::BindTexture(glow::TEXTURE_2D, 100),
                DeviceCall::ActiveTexture(1),
                DeviceCall::BindTexture(glow::TEXTURE_2D, 200),
                DeviceCall::ActiveTexture(0),
            ]
        );
        assert_eq!(cache.free_texture_layer(), Some(2));
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_texture_layer_panics() {
        make_cache().active_texture(32);
    }

    #[test]
    fn test_push_pop_texture_switches_layer_only_when_needed() {
        let cache = make_cache();
        cache.active_texture(2);
        cache.bind_texture(TextureTarget::CubeMap, 5);
        cache.push_bound_texture(2, TextureTarget::CubeMap);
        cache.push_bound_texture(3, TextureTarget::Texture3D);
        cache.bind_texture(TextureTarget::CubeMap, 6);
        cache.active_texture(0);
        cache.device().take_calls();

        // Layer 3 was never touched, nothing to restore.
        cache.pop_bound_texture(3, TextureTarget::Texture3D);
        assert_eq!(cache.device().call_count(), 0);

        cache.pop_bound_texture(2, TextureTarget::CubeMap);
        assert_eq!(
            cache.device().take_calls(),
            vec![
                DeviceCall::ActiveTexture(2),
                DeviceCall::BindTexture(glow::TEXTURE_CUBE_MAP, 5),
            ]
        );
        assert_eq!(cache.bound_texture(2, TextureTarget::CubeMap), 5);
    }

    #[test]
    #[should_panic]
    fn test_pop_texture_of_other_slot_panics() {
        let cache = make_cache();
        cache.push_bound_texture(0, TextureTarget::Texture2D);
        cache.pop_bound_texture(1, TextureTarget::Texture2D);
    }

    #[test]
    fn test_invalidate_bindings_unbinds_everything() {
        let cache = make_cache();
        cache.bind_texture(TextureTarget::Texture2D, 1);
        cache.active_texture(4);
        cache.bind_texture(TextureTarget::Texture3D, 2);
        cache.bind_program(7);
        cache.device().take_calls();

        cache.invalidate_bindings();

        assert_eq!(
            cache.device().take_calls(),
            vec![
                DeviceCall::ActiveTexture(0),
                DeviceCall::BindTexture(glow::TEXTURE_2D, 0),
                DeviceCall::ActiveTexture(4),
                DeviceCall::BindTexture(glow::TEXTURE_3D, 0),
                DeviceCall::ActiveTexture(0),
                DeviceCall::UseProgram(0),
            ]
        );
        assert_eq!(cache.active_texture_layer(), 0);
        assert_eq!(cache.bound_program(), 0);
        assert_eq!(cache.free_texture_layer(), Some(0));

        let stats = cache.statistics();
        assert_eq!(stats.texture_binding_changes, 4);
        assert_eq!(stats.texture_layer_changes, 4);
        assert_eq!(stats.program_binding_changes, 2);
    }

    #[test]
    fn test_stencil_faces_are_independent() {
        let cache = make_cache();
        let front = StencilState {
            func: CompareFunc::Equal,
            reference: 1,
            ..Default::default()
        };
        cache.set_stencil_state(PolygonFace::Front, &front);

        assert_eq!(cache.front_stencil_state(), front);
        assert_eq!(cache.back_stencil_state(), StencilState::default());
        assert_eq!(
            cache.device().take_calls(),
            vec![DeviceCall::StencilFuncSeparate(
                glow::FRONT,
                glow::EQUAL,
                1,
                u32::MAX
            )]
        );

        let back = StencilState {
            depth_pass: StencilAction::Replace,
            write_mask: 0xFF,
            ..Default::default()
        };
        cache.set_stencil_state(PolygonFace::Back, &back);
        assert_eq!(cache.front_stencil_state(), front);
        assert_eq!(cache.back_stencil_state(), back);
    }

    #[test]
    fn test_front_and_back_stencil_updates_both_faces() {
        let cache = make_cache();
        let state = StencilState {
            func: CompareFunc::NotEqual,
            reference: 3,
            ..Default::default()
        };
        cache.set_stencil_state(PolygonFace::Front, &state);
        cache.device().take_calls();

        // Front already matches, but back still has to be written.
        cache.set_stencil_state(PolygonFace::FrontAndBack, &state);

        assert_eq!(
            cache.device().take_calls(),
            vec![DeviceCall::StencilFuncSeparate(
                glow::BACK,
                glow::NOTEQUAL,
                3,
                u32::MAX
            )]
        );
        assert_eq!(cache.front_stencil_state(), state);
        assert_eq!(cache.back_stencil_state(), state);
    }

    #[test]
    fn test_stencil_sends_only_changed_groups() {
        let cache = make_cache();
        let state = StencilState {
            fail: StencilAction::Zero,
            write_mask: 0x0F,
            ..Default::default()
        };
        cache.set_stencil_state(PolygonFace::Back, &state);
        assert_eq!(
            cache.device().take_calls(),
            vec![
                DeviceCall::StencilOpSeparate(glow::BACK, glow::ZERO, glow::KEEP, glow::KEEP),
                DeviceCall::StencilMaskSeparate(glow::BACK, 0x0F),
            ]
        );
    }

    #[test]
    fn test_polygon_fill_mode() {
        let cache = make_cache();
        cache.set_polygon_fill_mode(PolygonFace::FrontAndBack, PolygonFillMode::Line);
        cache.set_polygon_fill_mode(PolygonFace::FrontAndBack, PolygonFillMode::Line);
        assert_eq!(
            cache.device().take_calls(),
            vec![DeviceCall::PolygonMode(glow::FRONT_AND_BACK, glow::LINE)]
        );
    }

    #[test]
    fn test_upper_left_origin_flips_viewport_copy() {
        let cache = make_cache();
        cache.set_clip_origin(ClipOrigin::UpperLeft);
        cache.make_current_info(&ContextInfo { height: 600 });

        let viewport = Viewport::new(0.0, 50.0, 800.0, 200.0);
        cache.set_viewports(&[viewport]).unwrap();

        assert_eq!(
            cache.device().take_calls(),
            vec![DeviceCall::Viewport(0, 350, 800, 200)]
        );
        assert_eq!(viewport.y, 50.0);
    }

    #[test]
    fn test_lower_left_origin_sends_rectangles_as_is() {
        let cache = make_cache();
        cache.make_current_info(&ContextInfo { height: 600 });
        cache.set_scissors(&[ScissorBox::new(1, 2, 3, 4)]).unwrap();
        assert_eq!(
            cache.device().take_calls(),
            vec![DeviceCall::Scissor(1, 2, 3, 4)]
        );
    }

    #[test]
    fn test_viewports_are_not_cached() {
        let cache = make_cache();
        let viewport = [Viewport::new(0.0, 0.0, 10.0, 10.0)];
        cache.set_viewports(&viewport).unwrap();
        cache.set_viewports(&viewport).unwrap();
        cache.set_viewports(&[]).unwrap();
        assert_eq!(cache.device().call_count(), 2);
    }

    #[test]
    fn test_viewport_state_changes_count_every_family() {
        let cache = make_cache();
        cache
            .set_viewports(&[Viewport::new(0.0, 0.0, 10.0, 10.0)])
            .unwrap();
        cache.set_scissors(&[ScissorBox::new(0, 0, 10, 10)]).unwrap();
        cache.set_depth_ranges(&[DepthRange::default()]).unwrap();
        let stats = cache.statistics();
        assert_eq!(stats.viewport_state_changes, 3);
        assert!(stats.to_string().contains("Viewport State: 3"));
    }

    #[test]
    fn test_multiple_viewports_require_indexed_path() {
        let cache = make_cache();
        let viewports = [
            Viewport::new(0.0, 0.0, 10.0, 10.0),
            Viewport::new(10.0, 0.0, 10.0, 10.0),
        ];
        assert!(matches!(
            cache.set_viewports(&viewports),
            Err(StateError::IndexedPathUnsupported {
                family: "viewport",
                count: 2
            })
        ));
        assert!(cache
            .set_scissors(&[ScissorBox::default(), ScissorBox::default()])
            .is_err());
        assert!(cache
            .set_depth_ranges(&[DepthRange::default(), DepthRange::default()])
            .is_err());
        // No fallback is attempted.
        assert_eq!(cache.device().call_count(), 0);
    }

    #[test]
    fn test_multiple_viewports_use_indexed_path() {
        let cache = make_cache_with_features(DeviceFeatures {
            viewport_array: true,
            ..Default::default()
        });
        cache.set_clip_origin(ClipOrigin::UpperLeft);
        cache.make_current_info(&ContextInfo { height: 100 });

        cache
            .set_viewports(&[
                Viewport::new(0.0, 0.0, 50.0, 50.0),
                Viewport::new(50.0, 10.0, 50.0, 20.0),
            ])
            .unwrap();
        cache
            .set_scissors(&[ScissorBox::new(0, 0, 50, 50), ScissorBox::new(50, 10, 50, 20)])
            .unwrap();
        cache
            .set_depth_ranges(&[
                DepthRange::default(),
                DepthRange {
                    min_depth: 0.5,
                    max_depth: 1.0,
                },
            ])
            .unwrap();

        assert_eq!(
            cache.device().take_calls(),
            vec![
                DeviceCall::ViewportArray(
                    0,
                    vec![[0.0, 50.0, 50.0, 50.0], [50.0, 70.0, 50.0, 20.0]]
                ),
                DeviceCall::ScissorArray(0, vec![[0, 50, 50, 50], [50, 70, 50, 20]]),
                DeviceCall::DepthRangeArray(0, vec![[0.0, 1.0], [0.5, 1.0]]),
            ]
        );
    }

    #[test]
    fn test_single_depth_range_uses_legacy_path() {
        let cache = make_cache();
        cache
            .set_depth_ranges(&[DepthRange {
                min_depth: 0.25,
                max_depth: 0.75,
            }])
            .unwrap();
        assert_eq!(
            cache.device().take_calls(),
            vec![DeviceCall::DepthRange(0.25, 0.75)]
        );
    }

    fn alpha_blend_target() -> BlendTarget {
        BlendTarget {
            color_mask: ColorMask::default(),
            func: BlendFunc::new(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha),
        }
    }

    fn alpha_blend_func_call() -> DeviceCall {
        DeviceCall::BlendFuncSeparate(
            glow::SRC_ALPHA,
            glow::ONE_MINUS_SRC_ALPHA,
            glow::SRC_ALPHA,
            glow::ONE_MINUS_SRC_ALPHA,
        )
    }

    #[test]
    fn test_single_blend_target_caches_color_mask_only() {
        let cache = make_cache();
        let target = alpha_blend_target();
        cache.set_blend_states(&[target], true);
        cache.set_blend_states(&[target], true);
        assert_eq!(
            cache.device().take_calls(),
            vec![alpha_blend_func_call(), alpha_blend_func_call()]
        );

        cache.set_blend_states(
            &[BlendTarget {
                color_mask: ColorMask::all(false),
                func: BlendFunc::default(),
            }],
            false,
        );
        assert_eq!(
            cache.device().take_calls(),
            vec![DeviceCall::ColorMask(false, false, false, false)]
        );
    }

    #[test]
    fn test_multiple_blend_targets_with_indexed_calls() {
        let cache = make_cache_with_features(DeviceFeatures {
            indexed_draw_buffer_blend: true,
            ..Default::default()
        });
        let targets = [alpha_blend_target(), alpha_blend_target()];
        cache.set_blend_states(&targets, false);
        cache.set_blend_states(&targets, false);

        let expected = vec![
            DeviceCall::ColorMaskIndexed(0, true, true, true, true),
            DeviceCall::ColorMaskIndexed(1, true, true, true, true),
        ];
        let calls = cache.device().take_calls();
        assert_eq!(calls[..2], expected[..]);
        assert_eq!(calls[2..], expected[..]);
    }

    #[test]
    fn test_multiple_blend_targets_without_indexed_calls() {
        let cache = make_cache();
        let targets = [alpha_blend_target(), alpha_blend_target()];
        cache.set_blend_states(&targets, true);

        assert_eq!(
            cache.device().take_calls(),
            vec![
                DeviceCall::DrawBuffer(glow::COLOR_ATTACHMENT0),
                DeviceCall::ColorMask(true, true, true, true),
                alpha_blend_func_call(),
                DeviceCall::DrawBuffer(glow::COLOR_ATTACHMENT0 + 1),
                DeviceCall::ColorMask(true, true, true, true),
                alpha_blend_func_call(),
            ]
        );

        // Non-indexed color mask is unknown now, so a single target sends it again.
        cache.set_blend_states(&[alpha_blend_target()], true);
        assert_eq!(
            cache.device().take_calls(),
            vec![
                DeviceCall::ColorMask(true, true, true, true),
                alpha_blend_func_call()
            ]
        );
    }

    #[test]
    fn test_reset_resynchronizes_capabilities() {
        let cache = make_cache();
        cache.enable(Capability::Blend);
        cache.device().set_enabled_externally(glow::BLEND, false);
        cache.device().set_enabled_externally(glow::STENCIL_TEST, true);
        cache.device().take_calls();

        cache.reset();

        assert!(!cache.is_enabled(Capability::Blend));
        assert!(cache.is_enabled(Capability::StencilTest));
        assert!(cache.is_enabled(Capability::Dither));
        // Reset only queries.
        assert_eq!(cache.device().call_count(), 0);

        cache.enable(Capability::Blend);
        assert_eq!(
            cache.device().take_calls(),
            vec![DeviceCall::Enable(glow::BLEND)]
        );
    }

    #[test]
    fn test_prime_from_device_state() {
        let device = RecordingDevice::default();
        device.set_enabled_externally(glow::CULL_FACE, true);
        device.set_integer(glow::ARRAY_BUFFER_BINDING, 12);
        device.set_integer(glow::CURRENT_PROGRAM, 4);
        device.set_integer(glow::ACTIVE_TEXTURE, (glow::TEXTURE0 + 1) as i32);
        device.set_integer(glow::MAX_COMBINED_TEXTURE_IMAGE_UNITS, 2);
        device.set_unit_integer(1, glow::TEXTURE_BINDING_2D, 33);
        device.set_integer(glow::DEPTH_FUNC, glow::GEQUAL as i32);
        device.set_integer(glow::DEPTH_WRITEMASK, 1);
        device.set_integer(glow::CULL_FACE_MODE, glow::FRONT as i32);
        device.set_integer(glow::FRONT_FACE, glow::CW as i32);
        device.set_integer(glow::STENCIL_FUNC, glow::ALWAYS as i32);
        device.set_integer(glow::STENCIL_FAIL, glow::KEEP as i32);
        device.set_integer(glow::STENCIL_PASS_DEPTH_FAIL, glow::KEEP as i32);
        device.set_integer(glow::STENCIL_PASS_DEPTH_PASS, glow::KEEP as i32);
        device.set_integer(glow::STENCIL_VALUE_MASK, -1);
        device.set_integer(glow::STENCIL_WRITEMASK, -1);
        device.set_integer(glow::STENCIL_BACK_FUNC, glow::LESS as i32);
        device.set_integer(glow::STENCIL_BACK_REF, 2);
        device.set_integer(glow::POLYGON_MODE, glow::LINE as i32);

        let cache = GlStateCache::from_device_state(device, Default::default());

        assert!(cache.is_enabled(Capability::CullFace));
        assert!(!cache.is_enabled(Capability::Blend));
        assert_eq!(cache.bound_buffer(BufferTarget::Array), 12);
        assert_eq!(cache.bound_program(), 4);
        assert_eq!(cache.active_texture_layer(), 1);
        assert_eq!(cache.bound_texture(1, TextureTarget::Texture2D), 33);
        assert_eq!(cache.bound_texture(0, TextureTarget::Texture2D), 0);
        assert_eq!(cache.depth_func(), CompareFunc::GreaterOrEqual);
        assert!(cache.depth_write());
        assert_eq!(cache.cull_face(), CullFace::Front);
        assert_eq!(cache.front_face(), FrontFace::Clockwise);
        assert_eq!(cache.front_stencil_state(), StencilState::default());
        assert_eq!(cache.back_stencil_state().func, CompareFunc::Less);
        assert_eq!(cache.back_stencil_state().reference, 2);
        assert_eq!(
            cache.polygon_fill_mode(),
            Some((PolygonFace::FrontAndBack, PolygonFillMode::Line))
        );

        // Priming walks over the texture layers and returns to the active one.
        assert_eq!(
            cache.device().take_calls(),
            vec![
                DeviceCall::ActiveTexture(0),
                DeviceCall::ActiveTexture(1),
                DeviceCall::ActiveTexture(1),
            ]
        );

        cache.bind_program(4);
        cache.bind_texture(TextureTarget::Texture2D, 33);
        cache.enable(Capability::CullFace);
        cache.set_polygon_fill_mode(PolygonFace::FrontAndBack, PolygonFillMode::Line);
        assert_eq!(cache.device().call_count(), 0);

        // Fresh context defaults must not be mistaken for the primed device state.
        cache.set_polygon_fill_mode(PolygonFace::FrontAndBack, PolygonFillMode::Fill);
        cache.set_blend_states(&[BlendTarget::default()], true);
        assert_eq!(
            cache.device().take_calls(),
            vec![
                DeviceCall::PolygonMode(glow::FRONT_AND_BACK, glow::FILL),
                DeviceCall::ColorMask(true, true, true, true),
                DeviceCall::BlendFuncSeparate(glow::ONE, glow::ZERO, glow::ONE, glow::ZERO),
            ]
        );
    }

    #[test]
    fn test_prime_with_unknown_polygon_mode() {
        // Query answers 0, which is not a polygon mode.
        let cache = GlStateCache::from_device_state(RecordingDevice::default(), Default::default());
        assert_eq!(cache.polygon_fill_mode(), None);
        cache.device().take_calls();

        cache.set_polygon_fill_mode(PolygonFace::FrontAndBack, PolygonFillMode::Fill);
        cache.set_polygon_fill_mode(PolygonFace::FrontAndBack, PolygonFillMode::Fill);
        assert_eq!(
            cache.device().take_calls(),
            vec![DeviceCall::PolygonMode(glow::FRONT_AND_BACK, glow::FILL)]
        );
    }

    #[test]
    fn test_scope_restores_on_drop() {
        let cache = make_cache();
        cache.enable(Capability::DepthTest);
        cache.bind_program(1);
        cache.bind_buffer(BufferTarget::Uniform, 2);
        cache.bind_texture(TextureTarget::Texture2D, 3);

        {
            let scope = cache.scope();
            scope
                .push_state(Capability::DepthTest)
                .push_program()
                .push_bound_buffer(BufferTarget::Uniform)
                .push_bound_texture(0, TextureTarget::Texture2D);
            assert_eq!(scope.saved_count(), 4);

            scope.disable(Capability::DepthTest);
            scope.bind_program(10);
            scope.bind_buffer(BufferTarget::Uniform, 20);
            scope.active_texture(5);
            scope.bind_texture(TextureTarget::Texture2D, 30);
        }

        assert!(cache.is_enabled(Capability::DepthTest));
        assert_eq!(cache.bound_program(), 1);
        assert_eq!(cache.bound_buffer(BufferTarget::Uniform), 2);
        // Layer 0 binding was never changed, so the layer stays where it was.
        assert_eq!(cache.bound_texture(0, TextureTarget::Texture2D), 3);
        assert_eq!(cache.active_texture_layer(), 5);
    }

    #[test]
    fn test_statistics() {
        let cache = make_cache();
        cache.bind_program(1);
        cache.bind_program(1);
        cache.bind_texture(TextureTarget::Texture2D, 1);
        cache.bind_buffer_base(BufferTarget::Uniform, 0, 1);
        let stats = cache.statistics();
        assert_eq!(stats.program_binding_changes, 1);
        assert_eq!(stats.texture_binding_changes, 1);
        assert_eq!(stats.buffer_binding_changes, 1);
        assert_eq!(stats.redundant_calls_skipped, 1);
        assert!(stats.to_string().contains("Shaders: 1"));

        cache.reset_statistics();
        assert_eq!(cache.statistics(), Default::default());
    }
}
