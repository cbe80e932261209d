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

//! Binding tables: last known object bound to every buffer target, every texture target of
//! every texture layer, and the shader program slot.

use crate::ToGlConstant;
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use strum::EnumCount;
use strum_macros::{AsRefStr, EnumCount, EnumIter, EnumString, VariantNames};

/// Amount of texture layers (texture units) tracked by the cache.
pub const MAX_TEXTURE_LAYERS: usize = 32;

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
pub enum BufferTarget {
    /// Vertex attributes.
    Array,
    AtomicCounter,
    CopyRead,
    CopyWrite,
    DispatchIndirect,
    DrawIndirect,
    /// Vertex indices.
    ElementArray,
    PixelPack,
    PixelUnpack,
    Query,
    ShaderStorage,
    Texture,
    TransformFeedback,
    Uniform,
}

impl ToGlConstant for BufferTarget {
    fn into_gl(self) -> u32 {
        match self {
            Self::Array => glow::ARRAY_BUFFER,
            Self::AtomicCounter => glow::ATOMIC_COUNTER_BUFFER,
            Self::CopyRead => glow::COPY_READ_BUFFER,
            Self::CopyWrite => glow::COPY_WRITE_BUFFER,
            Self::DispatchIndirect => glow::DISPATCH_INDIRECT_BUFFER,
            Self::DrawIndirect => glow::DRAW_INDIRECT_BUFFER,
            Self::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
            Self::PixelPack => glow::PIXEL_PACK_BUFFER,
            Self::PixelUnpack => glow::PIXEL_UNPACK_BUFFER,
            Self::Query => glow::QUERY_BUFFER,
            Self::ShaderStorage => glow::SHADER_STORAGE_BUFFER,
            Self::Texture => glow::TEXTURE_BUFFER,
            Self::TransformFeedback => glow::TRANSFORM_FEEDBACK_BUFFER,
            Self::Uniform => glow::UNIFORM_BUFFER,
        }
    }
}

impl BufferTarget {
    /// Native query that returns the buffer bound to the target.
    pub fn binding_query(self) -> u32 {
        match self {
            Self::Array => glow::ARRAY_BUFFER_BINDING,
            Self::AtomicCounter => glow::ATOMIC_COUNTER_BUFFER_BINDING,
            Self::CopyRead => glow::COPY_READ_BUFFER_BINDING,
            Self::CopyWrite => glow::COPY_WRITE_BUFFER_BINDING,
            Self::DispatchIndirect => glow::DISPATCH_INDIRECT_BUFFER_BINDING,
            Self::DrawIndirect => glow::DRAW_INDIRECT_BUFFER_BINDING,
            Self::ElementArray => glow::ELEMENT_ARRAY_BUFFER_BINDING,
            Self::PixelPack => glow::PIXEL_PACK_BUFFER_BINDING,
            Self::PixelUnpack => glow::PIXEL_UNPACK_BUFFER_BINDING,
            Self::Query => glow::QUERY_BUFFER_BINDING,
            Self::ShaderStorage => glow::SHADER_STORAGE_BUFFER_BINDING,
            Self::Texture => glow::TEXTURE_BUFFER_BINDING,
            Self::TransformFeedback => glow::TRANSFORM_FEEDBACK_BUFFER_BINDING,
            Self::Uniform => glow::UNIFORM_BUFFER_BINDING,
        }
    }
}

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
pub enum TextureTarget {
    Texture1D,
    Texture2D,
    Texture3D,
    Texture1DArray,
    Texture2DArray,
    Rectangle,
    CubeMap,
    CubeMapArray,
    Buffer,
    Texture2DMultisample,
    Texture2DMultisampleArray,
}

impl ToGlConstant for TextureTarget {
    fn into_gl(self) -> u32 {
        match self {
            Self::Texture1D => glow::TEXTURE_1D,
            Self::Texture2D => glow::TEXTURE_2D,
            Self::Texture3D => glow::TEXTURE_3D,
            Self::Texture1DArray => glow::TEXTURE_1D_ARRAY,
            Self::Texture2DArray => glow::TEXTURE_2D_ARRAY,
            Self::Rectangle => glow::TEXTURE_RECTANGLE,
            Self::CubeMap => glow::TEXTURE_CUBE_MAP,
            Self::CubeMapArray => glow::TEXTURE_CUBE_MAP_ARRAY,
            Self::Buffer => glow::TEXTURE_BUFFER,
            Self::Texture2DMultisample => glow::TEXTURE_2D_MULTISAMPLE,
            Self::Texture2DMultisampleArray => glow::TEXTURE_2D_MULTISAMPLE_ARRAY,
        }
    }
}

impl TextureTarget {
    /// Native query that returns the texture bound to the target of the active layer.
    pub fn binding_query(self) -> u32 {
        match self {
            Self::Texture1D => glow::TEXTURE_BINDING_1D,
            Self::Texture2D => glow::TEXTURE_BINDING_2D,
            Self::Texture3D => glow::TEXTURE_BINDING_3D,
            Self::Texture1DArray => glow::TEXTURE_BINDING_1D_ARRAY,
            Self::Texture2DArray => glow::TEXTURE_BINDING_2D_ARRAY,
            Self::Rectangle => glow::TEXTURE_BINDING_RECTANGLE,
            Self::CubeMap => glow::TEXTURE_BINDING_CUBE_MAP,
            Self::CubeMapArray => glow::TEXTURE_BINDING_CUBE_MAP_ARRAY,
            Self::Buffer => glow::TEXTURE_BINDING_BUFFER,
            Self::Texture2DMultisample => glow::TEXTURE_BINDING_2D_MULTISAMPLE,
            Self::Texture2DMultisampleArray => glow::TEXTURE_BINDING_2D_MULTISAMPLE_ARRAY,
        }
    }
}

#[derive(Default)]
pub(crate) struct BufferBindings {
    bound: [u32; BufferTarget::COUNT],
    stacks: [Vec<u32>; BufferTarget::COUNT],
}

impl BufferBindings {
    pub fn get(&self, target: BufferTarget) -> u32 {
        self.bound[target as usize]
    }

    /// Returns `true` if the buffer differs from the cached one, the cache is updated anyway.
    pub fn update(&mut self, target: BufferTarget, buffer: u32) -> bool {
        let slot = &mut self.bound[target as usize];
        if *slot != buffer {
            *slot = buffer;
            true
        } else {
            false
        }
    }

    pub fn overwrite(&mut self, target: BufferTarget, buffer: u32) {
        self.bound[target as usize] = buffer;
    }

    pub fn push(&mut self, target: BufferTarget) {
        let current = self.get(target);
        self.stacks[target as usize].push(current);
    }

    /// # Panics
    ///
    /// Panics if nothing was pushed for the target.
    pub fn pop(&mut self, target: BufferTarget) -> u32 {
        match self.stacks[target as usize].pop() {
            Some(buffer) => buffer,
            None => panic!("Unbalanced buffer binding stack for {target:?}: nothing to pop!"),
        }
    }
}

/// Address of a single texture binding: texture layer and target inside it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct TextureSlot {
    pub layer: u32,
    pub target: TextureTarget,
}

#[derive(Copy, Clone, Default)]
struct TextureLayer {
    bound: [u32; TextureTarget::COUNT],
}

#[derive(Default)]
pub(crate) struct TextureBindings {
    active_layer: u32,
    layers: [TextureLayer; MAX_TEXTURE_LAYERS],
    stacks: FxHashMap<TextureSlot, Vec<u32>>,
}

fn check_layer(layer: u32) {
    assert!(
        (layer as usize) < MAX_TEXTURE_LAYERS,
        "Texture layer {layer} is out of range, only {MAX_TEXTURE_LAYERS} layers are supported!"
    );
}

impl TextureBindings {
    pub fn active_layer(&self) -> u32 {
        self.active_layer
    }

    /// # Panics
    ///
    /// Panics if the layer is out of range.
    pub fn set_active_layer(&mut self, layer: u32) -> bool {
        check_layer(layer);
        if self.active_layer != layer {
            self.active_layer = layer;
            true
        } else {
            false
        }
    }

    pub fn get(&self, slot: TextureSlot) -> u32 {
        check_layer(slot.layer);
        self.layers[slot.layer as usize].bound[slot.target as usize]
    }

    /// Updates the binding of the active layer, returns `true` if it has changed.
    pub fn update(&mut self, target: TextureTarget, texture: u32) -> bool {
        let slot = &mut self.layers[self.active_layer as usize].bound[target as usize];
        if *slot != texture {
            *slot = texture;
            true
        } else {
            false
        }
    }

    pub fn overwrite(&mut self, target: TextureTarget, texture: u32) {
        self.layers[self.active_layer as usize].bound[target as usize] = texture;
    }

    pub fn push(&mut self, slot: TextureSlot) {
        let current = self.get(slot);
        self.stacks.entry(slot).or_default().push(current);
    }

    /// # Panics
    ///
    /// Panics if nothing was pushed for the slot.
    pub fn pop(&mut self, slot: TextureSlot) -> u32 {
        match self.stacks.get_mut(&slot).and_then(|stack| stack.pop()) {
            Some(texture) => texture,
            None => panic!("Unbalanced texture binding stack for {slot:?}: nothing to pop!"),
        }
    }

    /// Every non-empty binding as `(layer, target, texture)`.
    pub fn bound_textures(&self) -> impl Iterator<Item = (u32, TextureTarget, u32)> + '_ {
        use strum::IntoEnumIterator;

        self.layers
            .iter()
            .enumerate()
            .flat_map(|(layer, bindings)| {
                TextureTarget::iter()
                    .map(move |target| (layer as u32, target, bindings.bound[target as usize]))
            })
            .filter(|(_, _, texture)| *texture != 0)
    }

    /// First layer that has nothing bound to any of its targets.
    pub fn free_layer(&self) -> Option<u32> {
        self.layers
            .iter()
            .position(|layer| layer.bound.iter().all(|texture| *texture == 0))
            .map(|index| index as u32)
    }

    /// Forgets every binding (stacks are preserved).
    pub fn clear(&mut self) {
        self.active_layer = 0;
        self.layers = Default::default();
    }
}

#[derive(Default)]
pub(crate) struct ProgramBinding {
    bound: u32,
    stack: Vec<u32>,
}

impl ProgramBinding {
    pub fn get(&self) -> u32 {
        self.bound
    }

    pub fn update(&mut self, program: u32) -> bool {
        if self.bound != program {
            self.bound = program;
            true
        } else {
            false
        }
    }

    pub fn push(&mut self) {
        self.stack.push(self.bound);
    }

    /// # Panics
    ///
    /// Panics if there is nothing to pop.
    pub fn pop(&mut self) -> u32 {
        match self.stack.pop() {
            Some(program) => program,
            None => panic!("Unbalanced shader program stack: nothing to pop!"),
        }
    }
}
