mod gpu;

use std::sync::Arc;

use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

use pixel_studio::{
    config::EditorConfig,
    editor::Editor,
    error::{EditorError, Result},
    event::{Event, Key},
    geometry::Vec2u,
    io,
    platform::EventTranslator,
    render::Frame,
};

use crate::gpu::Gpu;

/// File commands handled outside the editor because they open dialogs.
enum FileCommand {
    Import,
    Export,
    SaveProject,
    LoadProject,
}

impl FileCommand {
    fn from_event(event: &Event) -> Option<Self> {
        let Event::KeyPressed { key: Key::Char(c), modifiers } = *event else {
            return None;
        };
        if !modifiers.ctrl {
            return None;
        }
        match (c, modifiers.shift) {
            ('o', false) => Some(FileCommand::Import),
            ('e', false) => Some(FileCommand::Export),
            ('s', false) => Some(FileCommand::SaveProject),
            ('o', true) => Some(FileCommand::LoadProject),
            _ => None,
        }
    }
}

struct App {
    config: EditorConfig,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    editor: Option<Editor>,
    frame: Frame,
    translator: EventTranslator,
}

impl App {
    fn new(config: EditorConfig) -> Self {
        Self {
            config,
            window: None,
            gpu: None,
            editor: None,
            frame: Frame::new(1, 1),
            translator: EventTranslator::new(),
        }
    }

    fn run_file_command(editor: &mut Editor, command: FileCommand) -> Result<()> {
        match command {
            FileCommand::Import => {
                let layer = io::load_image(&io::select_image_file()?)?;
                editor.import_layer(layer);
            }
            FileCommand::Export => {
                let path = io::select_export_png_path()?;
                if let Some(canvas) = editor.canvas() {
                    io::export_canvas_as_png(canvas, &path)?;
                }
            }
            FileCommand::SaveProject => {
                let folder = io::select_project_folder()?;
                if let Some(canvas) = editor.canvas() {
                    let name = folder
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "Untitled".to_string());
                    let project = io::Project::from_canvas(name, canvas);
                    io::save_project(&project, canvas.layers(), &folder)?;
                }
            }
            FileCommand::LoadProject => {
                let (project, layers) = io::load_project(&io::select_project_folder()?)?;
                editor.replace_layers(layers);
                if let Some(canvas) = editor.canvas_mut() {
                    canvas.set_active_layer_index(project.active_layer);
                }
            }
        }
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gpu), Some(editor), Some(window)) = (self.gpu.as_mut(), self.editor.as_ref(), self.window.as_ref())
        else {
            return;
        };
        let size = window.inner_size();
        self.frame.resize(size.width.max(1), size.height.max(1));
        editor.draw(&mut self.frame);

        if let Err(e) = gpu.render(&mut self.frame) {
            match e {
                wgpu::SurfaceError::Lost => {
                    gpu.resize(size);
                    self.frame.dirty = true;
                }
                wgpu::SurfaceError::OutOfMemory => event_loop.exit(),
                other => warn!("render: {other:?}"),
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let [width, height] = self.config.window_size;
        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(width as f64, height as f64));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("window: {e}");
                event_loop.exit();
                return;
            }
        };

        let (gpu, size) = match pollster::block_on(Gpu::new(&window)) {
            Ok(created) => created,
            Err(e) => {
                error!("gpu: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = Vec2u::new(size.width.max(1), size.height.max(1));
        self.frame = Frame::new(size.x, size.y);
        self.editor = Some(Editor::new(self.config.clone(), size));
        self.gpu = Some(gpu);
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        event_loop.set_control_flow(ControlFlow::Wait);

        if let WindowEvent::RedrawRequested = event {
            self.redraw(event_loop);
            return;
        }
        if let (WindowEvent::Resized(size), Some(gpu)) = (&event, self.gpu.as_mut()) {
            gpu.resize(*size);
        }

        let Some(translated) = self.translator.translate(&event) else {
            return;
        };
        if translated == Event::Closed {
            event_loop.exit();
            return;
        }
        let Some(editor) = self.editor.as_mut() else {
            return;
        };

        let changed = match FileCommand::from_event(&translated) {
            Some(command) => match Self::run_file_command(editor, command) {
                Ok(()) => true,
                Err(EditorError::Cancelled) => false,
                Err(e) => {
                    error!("{e}");
                    false
                }
            },
            None => editor.handle_event(translated),
        };
        if changed {
            if let Some(window) = self.window.as_ref() {
                window.request_redraw();
            }
        }
    }
}

fn main() -> std::result::Result<(), winit::error::EventLoopError> {
    env_logger::init();

    let config = EditorConfig::load_or_default(&EditorConfig::default_path());
    info!("starting {}", config.title);

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)
}
