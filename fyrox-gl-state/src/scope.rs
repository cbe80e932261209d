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

//! Scoped save/restore on top of the cache's push/pop stacks.

use crate::{
    binding::{BufferTarget, TextureTarget},
    cache::GlStateCache,
    device::GlDevice,
    toggle::Capability,
};
use std::ops::Deref;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum SavedSlot {
    Capability,
    Buffer(BufferTarget),
    Texture { layer: u32, target: TextureTarget },
    Program,
}

/// Remembers every state pushed through it and pops them in reverse order when dropped. The
/// saved values themselves live on the cache's stacks, the scope only knows what to pop.
///
/// ```ignore
/// {
///     let scope = cache.scope();
///     scope.push_state(Capability::Blend).push_program();
///     scope.disable(Capability::Blend);
///     scope.bind_program(blit_program);
///     // draw
/// } // Blend and program are restored here.
/// ```
///
/// Pushes made directly on the cache while a scope is alive must be popped before the scope
/// ends, otherwise the scope would pop someone else's entry.
pub struct StateScope<'a, D: GlDevice> {
    cache: &'a GlStateCache<D>,
    saved: std::cell::RefCell<Vec<SavedSlot>>,
}

impl<'a, D: GlDevice> StateScope<'a, D> {
    pub(crate) fn new(cache: &'a GlStateCache<D>) -> Self {
        Self {
            cache,
            saved: Default::default(),
        }
    }

    pub fn push_state(&self, capability: Capability) -> &Self {
        self.cache.push_state(capability);
        self.saved.borrow_mut().push(SavedSlot::Capability);
        self
    }

    pub fn push_bound_buffer(&self, target: BufferTarget) -> &Self {
        self.cache.push_bound_buffer(target);
        self.saved.borrow_mut().push(SavedSlot::Buffer(target));
        self
    }

    pub fn push_bound_texture(&self, layer: u32, target: TextureTarget) -> &Self {
        self.cache.push_bound_texture(layer, target);
        self.saved
            .borrow_mut()
            .push(SavedSlot::Texture { layer, target });
        self
    }

    pub fn push_program(&self) -> &Self {
        self.cache.push_program();
        self.saved.borrow_mut().push(SavedSlot::Program);
        self
    }

    /// Amount of entries this scope will restore.
    pub fn saved_count(&self) -> usize {
        self.saved.borrow().len()
    }
}

impl<D: GlDevice> Deref for StateScope<'_, D> {
    type Target = GlStateCache<D>;

    fn deref(&self) -> &Self::Target {
        self.cache
    }
}

impl<D: GlDevice> Drop for StateScope<'_, D> {
    fn drop(&mut self) {
        while let Some(slot) = self.saved.get_mut().pop() {
            match slot {
                SavedSlot::Capability => self.cache.pop_state(),
                SavedSlot::Buffer(target) => self.cache.pop_bound_buffer(target),
                SavedSlot::Texture { layer, target } => self.cache.pop_bound_texture(layer, target),
                SavedSlot::Program => self.cache.pop_program(),
            }
        }
    }
}
