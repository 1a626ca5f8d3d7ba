use anyhow::{Context, Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use seascape_common::Rgb;
use seascape_driver::{FrameScheduler, RenderLoop, SystemClock};
use seascape_render::{OrbitCamera, RenderError, RenderView, Renderer};
use seascape_render_wgpu::WgpuRenderer;
use seascape_scene::{BlockFont, Material, Scene, SceneConfig};
use seascape_tools::{CONTROLS, ColorSlot, SceneInspector, panel};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "seascape-desktop", about = "Animated water with floating text")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene config (YAML). Defaults to the stock scene.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the water plane's segments per side
    #[arg(long)]
    resolution: Option<u32>,
}

/// Scene, camera and loop state. Owned by the event-loop thread.
struct AppState {
    scene: Scene,
    camera: OrbitCamera,
    render_loop: RenderLoop<SystemClock>,
    show_panel: bool,
    dragging: bool,
    last_cursor: Option<(f64, f64)>,
    /// Set after a fatal render error; no further frames are scheduled.
    halted: bool,
}

impl AppState {
    fn new(config: &SceneConfig) -> Self {
        Self {
            scene: Scene::from_config(config, &BlockFont),
            camera: OrbitCamera::from_config(&config.camera),
            render_loop: RenderLoop::new(SystemClock::new()),
            show_panel: false,
            dragging: false,
            last_cursor: None,
            halted: false,
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed && key == KeyCode::F1 {
            self.show_panel = !self.show_panel;
        }
    }

    fn handle_cursor(&mut self, x: f64, y: f64) {
        if let (true, Some((lx, ly))) = (self.dragging, self.last_cursor) {
            self.camera.rotate((x - lx) as f32, (y - ly) as f32);
        }
        self.last_cursor = Some((x, y));
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_panel {
            return;
        }

        let summary = SceneInspector::summary(&self.scene);
        let names: Vec<String> = SceneInspector::list_objects(&self.scene)
            .into_iter()
            .map(str::to_owned)
            .collect();

        egui::SidePanel::right("panel")
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.heading("Seascape");
                ui.separator();
                let frame = self.render_loop.frame_count();
                ui.label(format!("Frame: {frame}  Time: {:.2}s", summary.time));
                ui.label(format!("Vertices: {}", summary.vertex_count));
                let [x, y, z] = self.camera.eye().to_array();
                ui.label(format!("Camera: ({x:.2}, {y:.2}, {z:.2})"));
                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    for name in &names {
                        let Some(object) = self.scene.object_mut(name) else {
                            continue;
                        };
                        let material = &mut object.material;
                        egui::CollapsingHeader::new(name.as_str())
                            .default_open(false)
                            .show(ui, |ui| material_controls(ui, material));
                    }
                });

                ui.separator();
                ui.small("F1: Toggle panel | LMB drag: Orbit | Wheel: Zoom");
            });
    }
}

/// Sliders and colour pickers for one material.
fn material_controls(ui: &mut egui::Ui, material: &mut Material) {
    for control in &CONTROLS {
        let mut value = control.param.get(material);
        let slider = egui::Slider::new(&mut value, control.min..=control.max)
            .step_by(control.step as f64)
            .text(control.label);
        if !ui.add(slider).changed() {
            continue;
        }
        if let Err(e) = panel::apply(material, control.param, value) {
            tracing::warn!("{e}");
        }
    }
    for slot in ColorSlot::ALL {
        ui.horizontal(|ui| {
            let mut srgb = panel::color(material, slot).to_u8();
            if ui.color_edit_button_srgb(&mut srgb).changed() {
                panel::set_color(material, slot, Rgb::from_u8(srgb));
            }
            ui.label(slot.label());
        });
    }
}

/// egui state plus the paint data prepared for the next frame.
struct Overlay {
    ctx: EguiContext,
    winit: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    prepared: Option<PreparedUi>,
}

struct PreparedUi {
    paint_jobs: Vec<egui::ClippedPrimitive>,
    textures: egui::TexturesDelta,
    screen: egui_wgpu::ScreenDescriptor,
}

impl Overlay {
    /// Draw the prepared UI on top of `target`, then free retired textures.
    fn paint(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, target: &wgpu::TextureView) {
        let Some(ui) = self.prepared.take() else {
            return;
        };
        let renderer = &mut self.renderer;
        for (id, image_delta) in &ui.textures.set {
            renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        renderer.update_buffers(device, queue, &mut encoder, &ui.paint_jobs, &ui.screen);
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            renderer.render(&mut pass, &ui.paint_jobs, &ui.screen);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &ui.textures.free {
            renderer.free_texture(id);
        }
    }
}

/// One frame on the window surface: acquire, draw scene and overlay, present.
struct SurfaceFrame<'a> {
    surface: &'a wgpu::Surface<'static>,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    renderer: &'a mut WgpuRenderer,
    overlay: &'a mut Overlay,
}

impl Renderer for SurfaceFrame<'_> {
    type Output = ();

    fn render(&mut self, scene: &Scene, view: &RenderView) -> Result<(), RenderError> {
        let output = self.surface.get_current_texture().map_err(surface_error)?;
        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.renderer
            .render(self.device, self.queue, &target, view, scene);
        self.overlay.paint(self.device, self.queue, &target);
        output.present();
        Ok(())
    }
}

fn surface_error(e: wgpu::SurfaceError) -> RenderError {
    match e {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => RenderError::SurfaceLost,
        wgpu::SurfaceError::Timeout => RenderError::Timeout,
        wgpu::SurfaceError::OutOfMemory => RenderError::OutOfMemory,
        other => RenderError::Backend(other.to_string()),
    }
}

/// Schedules the next frame through winit's redraw request.
struct WindowScheduler<'a>(&'a Window);

impl FrameScheduler for WindowScheduler<'_> {
    fn request_next_frame(&mut self) {
        self.0.request_redraw();
    }
}

struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    overlay: Overlay,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Seascape")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no compatible GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("seascape_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);

        let ctx = EguiContext::default();
        let overlay = Overlay {
            winit: egui_winit::State::new(
                ctx.clone(),
                egui::ViewportId::ROOT,
                &window,
                Some(window.scale_factor() as f32),
                None,
                None,
            ),
            renderer: egui_wgpu::Renderer::new(&device, surface_format, None, 1, false),
            ctx,
            prepared: None,
        };

        tracing::info!(
            "GPU initialized with {} backend, surface format {:?}",
            adapter.get_info().backend.to_str(),
            surface_format
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            overlay,
        })
    }

    fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    /// Run the panel UI and keep its paint data for the coming frame.
    fn prepare_ui(&mut self, state: &mut AppState) {
        let overlay = &mut self.overlay;
        let raw_input = overlay.winit.take_egui_input(&self.window);
        let full_output = overlay.ctx.run(raw_input, |ctx| state.draw_ui(ctx));
        overlay
            .winit
            .handle_platform_output(&self.window, full_output.platform_output);
        let paint_jobs = overlay
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        overlay.prepared = Some(PreparedUi {
            paint_jobs,
            textures: full_output.textures_delta,
            screen: egui_wgpu::ScreenDescriptor {
                size_in_pixels: [self.config.width, self.config.height],
                pixels_per_point: full_output.pixels_per_point,
            },
        });
    }
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
}

impl GpuApp {
    fn new(config: &SceneConfig) -> Self {
        Self {
            state: AppState::new(config),
            gpu: None,
        }
    }

    fn redraw(&mut self) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        if self.state.halted {
            return;
        }

        // Panel edits land before the frame reads parameters.
        gpu.prepare_ui(&mut self.state);

        let state = &mut self.state;
        let mut frame = SurfaceFrame {
            surface: &gpu.surface,
            device: &gpu.device,
            queue: &gpu.queue,
            renderer: &mut gpu.renderer,
            overlay: &mut gpu.overlay,
        };
        let mut scheduler = WindowScheduler(&gpu.window);
        let result = state.render_loop.tick(
            &mut state.scene,
            &mut state.camera,
            &mut frame,
            &mut scheduler,
        );

        if let Err(e) = result {
            if e.is_recoverable() {
                gpu.surface.configure(&gpu.device, &gpu.config);
                gpu.window.request_redraw();
            } else {
                tracing::error!("render loop stopped: {e}");
                state.halted = true;
            }
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop) {
            Ok(gpu) => {
                self.state.camera.aspect = gpu.aspect();
                gpu.window.request_redraw();
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to initialize GPU: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.overlay.winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    self.state.camera.aspect = gpu.aspect();
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                self.state.dragging = btn_state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state.handle_cursor(position.x, position.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 50.0,
                };
                self.state.camera.zoom(steps);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    tracing::info!("seascape-desktop starting");

    let config = match &cli.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    let config = config.with_resolution(cli.resolution)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GpuApp::new(&config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
