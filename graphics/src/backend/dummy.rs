//! Dummy rendering backend for testing and development.
//!
//! This backend doesn't touch a GPU. It records every call as a
//! [`RecordedCommand`] and keeps the bytes written to each buffer, so tests
//! can assert on exactly what a builder or mesh submitted.

use std::collections::{BTreeMap, HashMap};

use glimmer_core::mesh::{IndexFormat, PrimitiveTopology};
use parking_lot::Mutex;

use crate::error::GraphicsError;
use crate::types::{BufferDescriptor, BufferTarget, BufferUsage, VertexPointer};

use super::{GpuBuffer, GpuProgram, GpuTexture, RenderContext};

/// One call made on a [`DummyBackend`].
///
/// Buffer, program and texture ids are `None` when nothing was bound or the
/// handle did not come from a dummy backend.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCommand {
    CreateBuffer {
        id: u64,
        usage: BufferUsage,
        label: Option<String>,
    },
    DestroyBuffer {
        id: Option<u64>,
    },
    BindBuffer {
        target: BufferTarget,
        id: Option<u64>,
    },
    BufferData {
        target: BufferTarget,
        id: Option<u64>,
        len: usize,
        usage: BufferUsage,
    },
    AllocateBuffer {
        target: BufferTarget,
        id: Option<u64>,
        size: u64,
    },
    BufferSubData {
        target: BufferTarget,
        id: Option<u64>,
        offset: u64,
        len: usize,
    },
    VertexAttribPointer(VertexPointer),
    DisableVertexAttribArray {
        location: u32,
    },
    UseProgram {
        id: Option<u64>,
    },
    SetUniformMatrix4 {
        program: Option<u64>,
        name: String,
        value: [f32; 16],
    },
    SetUniformSampler {
        program: Option<u64>,
        name: String,
        unit: u32,
    },
    BindTexture {
        unit: u32,
        id: Option<u64>,
    },
    DrawArrays {
        topology: PrimitiveTopology,
        first: u32,
        count: u32,
    },
    DrawElements {
        topology: PrimitiveTopology,
        count: u32,
        format: IndexFormat,
        offset: u64,
    },
}

impl RecordedCommand {
    /// Whether this is a draw call.
    pub fn is_draw(&self) -> bool {
        matches!(self, Self::DrawArrays { .. } | Self::DrawElements { .. })
    }
}

#[derive(Debug, Default)]
struct DummyState {
    next_id: u64,
    commands: Vec<RecordedCommand>,
    buffers: HashMap<u64, Vec<u8>>,
    labels: HashMap<u64, String>,
    /// Enabled attribute locations and the buffer each was pointed into.
    enabled_arrays: BTreeMap<u32, Option<u64>>,
    textures: HashMap<u32, u64>,
    bound_vertex: Option<u64>,
    bound_index: Option<u64>,
    fail_buffer_creation: bool,
}

impl DummyState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn bound(&self, target: BufferTarget) -> Option<u64> {
        match target {
            BufferTarget::Vertex => self.bound_vertex,
            BufferTarget::Index => self.bound_index,
        }
    }

    fn bound_mut(&mut self, target: BufferTarget) -> &mut Option<u64> {
        match target {
            BufferTarget::Vertex => &mut self.bound_vertex,
            BufferTarget::Index => &mut self.bound_index,
        }
    }

    /// Warn about enabled arrays whose buffer is gone; GL rejects such draws.
    fn check_arrays(&self) {
        for (location, buffer) in &self.enabled_arrays {
            let alive = buffer.is_some_and(|id| self.buffers.contains_key(&id));
            if !alive {
                log::warn!("DummyBackend: attribute {location} enabled without a live buffer");
            }
        }
    }

    /// Contents of the buffer bound to `target`, if it is still alive.
    fn bound_contents(&mut self, target: BufferTarget) -> Option<&mut Vec<u8>> {
        let id = self.bound(target)?;
        self.buffers.get_mut(&id)
    }
}

/// Dummy rendering backend.
#[derive(Debug, Default)]
pub struct DummyBackend {
    state: Mutex<DummyState>,
}

impl DummyBackend {
    /// Create a new dummy backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a program handle, standing in for a compiled and linked program.
    pub fn create_program(&self, label: &str) -> GpuProgram {
        let id = self.state.lock().allocate_id();
        log::trace!("DummyBackend: creating program {label:?} (id: {id})");
        GpuProgram::Dummy { id }
    }

    /// Hand out a texture handle, standing in for a decoded and uploaded image.
    pub fn create_texture(&self, label: &str) -> GpuTexture {
        let id = self.state.lock().allocate_id();
        log::trace!("DummyBackend: creating texture {label:?} (id: {id})");
        GpuTexture::Dummy { id }
    }

    /// Make every following `create_buffer` fail (or succeed again).
    pub fn set_fail_buffer_creation(&self, fail: bool) {
        self.state.lock().fail_buffer_creation = fail;
    }

    /// Every command recorded so far.
    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.state.lock().commands.clone()
    }

    /// Drain the recorded commands.
    pub fn take_commands(&self) -> Vec<RecordedCommand> {
        std::mem::take(&mut self.state.lock().commands)
    }

    /// The recorded draw calls, in order.
    pub fn draw_calls(&self) -> Vec<RecordedCommand> {
        self.state
            .lock()
            .commands
            .iter()
            .filter(|command| command.is_draw())
            .cloned()
            .collect()
    }

    /// Bytes currently stored in `buffer`, or `None` if it was destroyed.
    pub fn buffer_contents(&self, buffer: &GpuBuffer) -> Option<Vec<u8>> {
        let id = buffer.dummy_id()?;
        self.state.lock().buffers.get(&id).cloned()
    }

    /// The most recently created live buffer labelled `label`.
    pub fn find_buffer(&self, label: &str) -> Option<GpuBuffer> {
        self.state
            .lock()
            .labels
            .iter()
            .filter(|(_, candidate)| candidate.as_str() == label)
            .map(|(id, _)| *id)
            .max()
            .map(|id| GpuBuffer::Dummy { id })
    }

    /// Attribute locations currently enabled, in ascending order.
    pub fn enabled_attributes(&self) -> Vec<u32> {
        self.state.lock().enabled_arrays.keys().copied().collect()
    }

    /// Whether some enabled attribute points into a destroyed buffer.
    pub fn has_stale_arrays(&self) -> bool {
        let state = self.state.lock();
        state
            .enabled_arrays
            .values()
            .any(|buffer| !buffer.is_some_and(|id| state.buffers.contains_key(&id)))
    }

    /// Id of the texture bound to `unit`.
    pub fn bound_texture(&self, unit: u32) -> Option<u64> {
        self.state.lock().textures.get(&unit).copied()
    }

    /// Id of the buffer bound to `target`.
    pub fn bound_buffer(&self, target: BufferTarget) -> Option<u64> {
        self.state.lock().bound(target)
    }

    /// Number of buffers created and not yet destroyed.
    pub fn live_buffer_count(&self) -> usize {
        self.state.lock().buffers.len()
    }

    fn record(&self, command: RecordedCommand) {
        self.state.lock().commands.push(command);
    }
}

impl RenderContext for DummyBackend {
    fn name(&self) -> &'static str {
        "Dummy Backend"
    }

    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<GpuBuffer, GraphicsError> {
        let mut state = self.state.lock();
        if state.fail_buffer_creation {
            return Err(GraphicsError::ResourceCreationFailed(format!(
                "dummy buffer {:?} refused",
                descriptor.label
            )));
        }
        let id = state.allocate_id();
        log::trace!(
            "DummyBackend: creating buffer {:?} (id: {}, size hint: {})",
            descriptor.label,
            id,
            descriptor.size
        );
        state.buffers.insert(id, Vec::new());
        if let Some(label) = &descriptor.label {
            state.labels.insert(id, label.clone());
        }
        state.commands.push(RecordedCommand::CreateBuffer {
            id,
            usage: descriptor.usage,
            label: descriptor.label.clone(),
        });
        Ok(GpuBuffer::Dummy { id })
    }

    fn destroy_buffer(&self, buffer: &GpuBuffer) {
        let id = buffer.dummy_id();
        let mut state = self.state.lock();
        if let Some(id) = id {
            log::trace!("DummyBackend: destroying buffer {id}");
            state.buffers.remove(&id);
            state.labels.remove(&id);
            for target in [BufferTarget::Vertex, BufferTarget::Index] {
                let bound = state.bound_mut(target);
                if *bound == Some(id) {
                    *bound = None;
                }
            }
        }
        state.commands.push(RecordedCommand::DestroyBuffer { id });
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<&GpuBuffer>) {
        let id = buffer.and_then(GpuBuffer::dummy_id);
        let mut state = self.state.lock();
        *state.bound_mut(target) = id;
        state.commands.push(RecordedCommand::BindBuffer { target, id });
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        let mut state = self.state.lock();
        let id = state.bound(target);
        match state.bound_contents(target) {
            Some(contents) => {
                contents.clear();
                contents.extend_from_slice(data);
            }
            None => log::warn!("DummyBackend: buffer_data with no {target:?} buffer bound"),
        }
        state.commands.push(RecordedCommand::BufferData {
            target,
            id,
            len: data.len(),
            usage,
        });
    }

    fn allocate_buffer(&self, target: BufferTarget, size: u64, _usage: BufferUsage) {
        let mut state = self.state.lock();
        let id = state.bound(target);
        match state.bound_contents(target) {
            Some(contents) => {
                contents.clear();
                contents.resize(size as usize, 0);
            }
            None => log::warn!("DummyBackend: allocate_buffer with no {target:?} buffer bound"),
        }
        state
            .commands
            .push(RecordedCommand::AllocateBuffer { target, id, size });
    }

    fn buffer_sub_data(&self, target: BufferTarget, offset: u64, data: &[u8]) {
        let mut state = self.state.lock();
        let id = state.bound(target);
        match state.bound_contents(target) {
            Some(contents) => {
                let start = offset as usize;
                let end = start + data.len();
                if end <= contents.len() {
                    contents[start..end].copy_from_slice(data);
                } else {
                    // GL raises INVALID_VALUE and leaves the buffer untouched
                    log::warn!(
                        "DummyBackend: sub-upload {start}..{end} past buffer end {}",
                        contents.len()
                    );
                }
            }
            None => log::warn!("DummyBackend: buffer_sub_data with no {target:?} buffer bound"),
        }
        state.commands.push(RecordedCommand::BufferSubData {
            target,
            id,
            offset,
            len: data.len(),
        });
    }

    fn vertex_attrib_pointer(&self, pointer: &VertexPointer) {
        let mut state = self.state.lock();
        if state.bound_vertex.is_none() {
            log::warn!(
                "DummyBackend: attribute {} pointed with no vertex buffer bound",
                pointer.location
            );
        }
        let buffer = state.bound_vertex;
        state.enabled_arrays.insert(pointer.location, buffer);
        state
            .commands
            .push(RecordedCommand::VertexAttribPointer(*pointer));
    }

    fn disable_vertex_attrib_array(&self, location: u32) {
        let mut state = self.state.lock();
        state.enabled_arrays.remove(&location);
        state
            .commands
            .push(RecordedCommand::DisableVertexAttribArray { location });
    }

    fn use_program(&self, program: Option<&GpuProgram>) {
        self.record(RecordedCommand::UseProgram {
            id: program.and_then(GpuProgram::dummy_id),
        });
    }

    fn set_uniform_matrix4(&self, program: &GpuProgram, name: &str, value: &[f32; 16]) {
        self.record(RecordedCommand::SetUniformMatrix4 {
            program: program.dummy_id(),
            name: name.to_string(),
            value: *value,
        });
    }

    fn set_uniform_sampler(&self, program: &GpuProgram, name: &str, unit: u32) {
        self.record(RecordedCommand::SetUniformSampler {
            program: program.dummy_id(),
            name: name.to_string(),
            unit,
        });
    }

    fn bind_texture(&self, unit: u32, texture: Option<&GpuTexture>) {
        let id = texture.and_then(GpuTexture::dummy_id);
        let mut state = self.state.lock();
        match id {
            Some(id) => state.textures.insert(unit, id),
            None => state.textures.remove(&unit),
        };
        state.commands.push(RecordedCommand::BindTexture { unit, id });
    }

    fn draw_arrays(&self, topology: PrimitiveTopology, first: u32, count: u32) {
        log::trace!("DummyBackend: draw_arrays {topology:?} first={first} count={count}");
        let mut state = self.state.lock();
        state.check_arrays();
        state.commands.push(RecordedCommand::DrawArrays {
            topology,
            first,
            count,
        });
    }

    fn draw_elements(
        &self,
        topology: PrimitiveTopology,
        count: u32,
        format: IndexFormat,
        offset: u64,
    ) {
        log::trace!("DummyBackend: draw_elements {topology:?} count={count} {format:?}");
        let mut state = self.state.lock();
        if state.bound_index.is_none() {
            log::warn!("DummyBackend: draw_elements with no index buffer bound");
        }
        state.check_arrays();
        state.commands.push(RecordedCommand::DrawElements {
            topology,
            count,
            format,
            offset,
        });
    }
}

// Ensure DummyBackend is Send + Sync
static_assertions::assert_impl_all!(DummyBackend: Send, Sync);
