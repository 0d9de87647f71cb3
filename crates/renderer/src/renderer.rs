//! Main renderer managing wgpu state and drawing the tree scene.

use crate::{
    camera::{CameraUniform, OrbitCamera},
    material::{blend_for_kind, shape_for_kind, starfield_shape, Blend, MaterialUniform},
    mesh::Mesh,
    pipeline::{create_camera_bind_group_layout, create_material_bind_group_layout, create_render_pipeline},
    texture::Texture,
};
use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use engine_core::{theme, Color, TransformRaw};
use glam::Vec3;
use morph::{InstanceBuffer, TreeScene};
use procgen::GroupKind;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// Lighting uniform (must match shader.wgsl LightingUniform).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LightingUniform {
    pub ambient: [f32; 4],
    pub key_direction: [f32; 4],
    pub key_color: [f32; 4],
    pub fill_positions: [[f32; 4]; 2],
    pub fill_colors: [[f32; 4]; 2],
    pub environment: [f32; 4],
}

impl Default for LightingUniform {
    fn default() -> Self {
        let rgb = |color: Color, intensity: f32| color.to_linear().to_rgba(intensity);
        let key = Vec3::new(20.0, 50.0, 20.0).normalize();
        Self {
            ambient: theme::EMERALD_DARK.to_linear().scaled(0.4).to_rgba(1.0),
            key_direction: key.extend(2.5).to_array(),
            key_color: rgb(theme::GOLD_LIGHT, 1.0),
            fill_positions: [[-15.0, 10.0, -15.0, 1.0], [15.0, -5.0, 15.0, 1.0]],
            fill_colors: [rgb(theme::EMERALD_LIGHT, 800.0), rgb(theme::ORANGE_GOLD, 800.0)],
            environment: rgb(theme::CHAMPAGNE, 0.6),
        }
    }
}

/// A uniform buffer and the bind group that exposes it.
struct MaterialBinding {
    _buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl MaterialBinding {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, material: MaterialUniform, label: &str) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Material Buffer")),
            contents: bytemuck::cast_slice(&[material]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} Material Bind Group")),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self {
            _buffer: buffer,
            bind_group,
        }
    }
}

/// Instance transform and color buffers on the GPU, grown on demand.
struct GpuInstances {
    label: String,
    transforms: wgpu::Buffer,
    colors: wgpu::Buffer,
    count: u32,
}

impl GpuInstances {
    fn new(device: &wgpu::Device, label: &str, source: &InstanceBuffer) -> Self {
        let count = source.len();
        let white;
        let colors = match source.colors() {
            Some(colors) => colors,
            None => {
                white = vec![[1.0_f32; 4]; count];
                &white[..]
            }
        };
        Self {
            label: label.to_string(),
            transforms: vertex_buffer(device, &format!("{label} Transforms"), bytemuck::cast_slice(source.transforms())),
            colors: vertex_buffer(device, &format!("{label} Colors"), bytemuck::cast_slice(colors)),
            count: count as u32,
        }
    }

    /// Upload whichever halves of `source` are dirty, clearing their flags.
    fn sync(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, source: &mut InstanceBuffer) {
        let count = source.len();
        let grown = count * std::mem::size_of::<TransformRaw>() > self.transforms.size() as usize;
        if grown {
            log::debug!("{}: instance buffer grown to {}", self.label, count);
            self.transforms.destroy();
            self.colors.destroy();
            *self = Self::new(device, &self.label, source);
            source.take_transforms_dirty();
            source.take_colors_dirty();
            return;
        }

        self.count = count as u32;
        if source.take_transforms_dirty() {
            queue.write_buffer(&self.transforms, 0, bytemuck::cast_slice(source.transforms()));
        }
        if source.take_colors_dirty() {
            if let Some(colors) = source.colors() {
                queue.write_buffer(&self.colors, 0, bytemuck::cast_slice(colors));
            }
        }
    }

    fn destroy(&self) {
        self.transforms.destroy();
        self.colors.destroy();
    }
}

fn vertex_buffer(device: &wgpu::Device, label: &str, contents: &[u8]) -> wgpu::Buffer {
    // Keep a non-empty allocation so the buffer can be bound
    let padding = [0u8; std::mem::size_of::<TransformRaw>()];
    let contents = if contents.is_empty() { &padding[..] } else { contents };
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    })
}

/// One instanced particle group.
struct GroupDraw {
    kind: GroupKind,
    blend: Blend,
    mesh: Mesh,
    instances: GpuInstances,
    material: MaterialBinding,
}

/// The star halo, drawn with the star's mesh.
struct HaloDraw {
    mesh: Mesh,
    instances: GpuInstances,
    material: MaterialBinding,
}

/// The background starfield. Uploaded once.
struct BackdropDraw {
    mesh: Mesh,
    instances: GpuInstances,
    material: MaterialBinding,
}

/// The ribbon tube, re-uploaded whenever the morpher rebuilds it.
struct RibbonDraw {
    mesh: Mesh,
    generation: u64,
    identity: GpuInstances,
    material: MaterialBinding,
}

/// Main renderer.
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    depth_texture: Texture,

    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    _lighting_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    material_bind_group_layout: wgpu::BindGroupLayout,

    opaque_pipeline: wgpu::RenderPipeline,
    halo_pipeline: wgpu::RenderPipeline,
    glow_pipeline: wgpu::RenderPipeline,
    clear_color: wgpu::Color,

    groups: Vec<GroupDraw>,
    halo: Option<HaloDraw>,
    ribbon: Option<RibbonDraw>,
    backdrop: Option<BackdropDraw>,
}

impl Renderer {
    /// Create a new renderer for the given window.
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        log::info!("Using GPU: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("Surface reports no texture formats"))?;

        // Mailbox when available, otherwise plain vsync; immediate when vsync is off.
        let present_mode = if vsync {
            surface_caps
                .present_modes
                .iter()
                .find(|m| matches!(m, wgpu::PresentMode::Mailbox))
                .copied()
                .unwrap_or(wgpu::PresentMode::AutoVsync)
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = Texture::create_depth_texture(&device, config.width, config.height, "Depth Texture");

        let camera_uniform = CameraUniform::new();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let lighting_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lighting Buffer"),
            contents: bytemuck::cast_slice(&[LightingUniform::default()]),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let camera_bind_group_layout = create_camera_bind_group_layout(&device);
        let material_bind_group_layout = create_material_bind_group_layout(&device);

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lighting_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline = |blend| {
            create_render_pipeline(
                &device,
                &config,
                &camera_bind_group_layout,
                &material_bind_group_layout,
                blend,
            )
        };
        let opaque_pipeline = pipeline(Blend::Opaque);
        let halo_pipeline = pipeline(Blend::HaloAdditive);
        let glow_pipeline = pipeline(Blend::GlowAdditive);

        let background = theme::BACKGROUND.to_linear();
        let clear_color = wgpu::Color {
            r: background.r as f64,
            g: background.g as f64,
            b: background.b as f64,
            a: 1.0,
        };

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            depth_texture,
            camera_uniform,
            camera_buffer,
            _lighting_buffer: lighting_buffer,
            camera_bind_group,
            material_bind_group_layout,
            opaque_pipeline,
            halo_pipeline,
            glow_pipeline,
            clear_color,
            groups: Vec::new(),
            halo: None,
            ribbon: None,
            backdrop: None,
        })
    }

    /// Create meshes, instance buffers and materials for every part of
    /// `scene`. Replaces anything prepared before.
    pub fn prepare_scene(&mut self, scene: &TreeScene) {
        self.release_scene();

        for group in scene.groups() {
            let Some(buffer) = group.buffer() else {
                log::warn!("{} group has no instance buffer, skipping", group.kind().name());
                continue;
            };
            let kind = group.kind();
            let label = kind.name();
            self.groups.push(GroupDraw {
                kind,
                blend: blend_for_kind(kind),
                mesh: Mesh::from_shape(&self.device, &shape_for_kind(kind), label),
                instances: GpuInstances::new(&self.device, label, buffer),
                material: MaterialBinding::new(
                    &self.device,
                    &self.material_bind_group_layout,
                    MaterialUniform::for_kind(kind),
                    label,
                ),
            });
        }

        self.halo = Some(HaloDraw {
            mesh: Mesh::from_shape(&self.device, &shape_for_kind(GroupKind::Star), "Halo"),
            instances: GpuInstances::new(&self.device, "Halo", scene.halo().buffer()),
            material: MaterialBinding::new(
                &self.device,
                &self.material_bind_group_layout,
                MaterialUniform::halo(),
                "Halo",
            ),
        });

        let ribbon = scene.ribbon();
        self.ribbon = Some(RibbonDraw {
            mesh: Mesh::from_shape(&self.device, ribbon.mesh(), "Ribbon"),
            generation: ribbon.generation(),
            identity: GpuInstances::new(&self.device, "Ribbon", &InstanceBuffer::new(1, false)),
            material: MaterialBinding::new(
                &self.device,
                &self.material_bind_group_layout,
                MaterialUniform::ribbon(),
                "Ribbon",
            ),
        });

        let backdrop = scene.backdrop();
        self.backdrop = Some(BackdropDraw {
            mesh: Mesh::from_shape(&self.device, &starfield_shape(), "Starfield"),
            instances: GpuInstances::new(&self.device, "Starfield", backdrop.buffer()),
            material: MaterialBinding::new(
                &self.device,
                &self.material_bind_group_layout,
                MaterialUniform::starfield(),
                "Starfield",
            ),
        });

        log::info!(
            "Prepared {} instanced groups ({} instances) and {} background stars",
            self.groups.len(),
            scene.instance_count(),
            backdrop.len()
        );
    }

    /// Upload whatever the scene changed since the last sync.
    pub fn sync(&mut self, scene: &mut TreeScene) {
        for group in scene.groups_mut() {
            let kind = group.kind();
            let (Some(draw), Some(buffer)) = (
                self.groups.iter_mut().find(|d| d.kind == kind),
                group.buffer_mut(),
            ) else {
                continue;
            };
            draw.instances.sync(&self.device, &self.queue, buffer);
        }

        if let Some(halo) = &mut self.halo {
            halo.instances.sync(&self.device, &self.queue, scene.halo_mut().buffer_mut());
        }

        if let Some(backdrop) = &mut self.backdrop {
            backdrop.instances.sync(&self.device, &self.queue, scene.backdrop_mut().buffer_mut());
        }

        if let Some(ribbon) = &mut self.ribbon {
            let morpher = scene.ribbon();
            if morpher.generation() != ribbon.generation {
                ribbon.mesh.destroy();
                ribbon.mesh = Mesh::from_shape(&self.device, morpher.mesh(), "Ribbon");
                ribbon.generation = morpher.generation();
            }
        }
    }

    fn release_scene(&mut self) {
        for draw in self.groups.drain(..) {
            draw.mesh.destroy();
            draw.instances.destroy();
        }
        if let Some(halo) = self.halo.take() {
            halo.mesh.destroy();
            halo.instances.destroy();
        }
        if let Some(ribbon) = self.ribbon.take() {
            ribbon.mesh.destroy();
            ribbon.identity.destroy();
        }
        if let Some(backdrop) = self.backdrop.take() {
            backdrop.mesh.destroy();
            backdrop.instances.destroy();
        }
    }

    /// Update camera uniform.
    pub fn update_camera(&mut self, camera: &OrbitCamera) {
        self.camera_uniform.update(camera);
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );
    }

    /// Begin a new frame. `None` when the surface had to be reconfigured and
    /// this frame should be skipped.
    pub fn begin_frame(&mut self) -> Result<Option<(wgpu::SurfaceTexture, wgpu::CommandEncoder)>> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        Ok(Some((output, encoder)))
    }

    /// Draw the prepared scene: background stars, then opaque groups and
    /// ribbon, then the additive halo and sparkles.
    pub fn render(&mut self) -> Result<()> {
        let Some((output, mut encoder)) = self.begin_frame()? else {
            return Ok(());
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_bind_group(0, &self.camera_bind_group, &[]);

            // Stars write no depth, so the tree draws over them
            if let Some(backdrop) = &self.backdrop {
                pass.set_pipeline(&self.glow_pipeline);
                draw_instanced(&mut pass, &backdrop.mesh, &backdrop.instances, &backdrop.material);
            }

            pass.set_pipeline(&self.opaque_pipeline);
            for draw in self.groups.iter().filter(|d| d.blend == Blend::Opaque) {
                draw_instanced(&mut pass, &draw.mesh, &draw.instances, &draw.material);
            }
            if let Some(ribbon) = &self.ribbon {
                draw_instanced(&mut pass, &ribbon.mesh, &ribbon.identity, &ribbon.material);
            }

            if let Some(halo) = &self.halo {
                pass.set_pipeline(&self.halo_pipeline);
                draw_instanced(&mut pass, &halo.mesh, &halo.instances, &halo.material);
            }

            pass.set_pipeline(&self.glow_pipeline);
            for draw in self.groups.iter().filter(|d| d.blend == Blend::GlowAdditive) {
                draw_instanced(&mut pass, &draw.mesh, &draw.instances, &draw.material);
            }
        }

        self.end_frame(output, encoder);
        Ok(())
    }

    /// End frame and present.
    pub fn end_frame(&self, output: wgpu::SurfaceTexture, encoder: wgpu::CommandEncoder) {
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    /// Handle window resize.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = Texture::create_depth_texture(
                &self.device,
                self.config.width,
                self.config.height,
                "Depth Texture",
            );
        }
    }

    /// Get window dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.size
    }

    /// Access the device for mesh creation.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }
}

fn draw_instanced(
    pass: &mut wgpu::RenderPass<'_>,
    mesh: &Mesh,
    instances: &GpuInstances,
    material: &MaterialBinding,
) {
    if instances.count == 0 || mesh.num_indices == 0 {
        return;
    }
    pass.set_bind_group(1, &material.bind_group, &[]);
    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
    pass.set_vertex_buffer(1, instances.transforms.slice(..));
    pass.set_vertex_buffer(2, instances.colors.slice(..));
    pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    pass.draw_indexed(0..mesh.num_indices, 0, 0..instances.count);
}
