use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageBuffer, RgbaImage};
use log::{debug, info};
use rayon::prelude::*;
use rfd::FileDialog;
use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::error::{EditorError, Result};
use crate::geometry::{Color, Vec2u};
use crate::layer::Layer;

pub const PROJECT_FILE: &str = "project.json";

/// Open file dialog to select an image file (PNG/JPEG)
pub fn select_image_file() -> Result<PathBuf> {
    FileDialog::new()
        .add_filter("Images", &["png", "jpg", "jpeg"])
        .add_filter("PNG", &["png"])
        .add_filter("JPEG", &["jpg", "jpeg"])
        .pick_file()
        .ok_or(EditorError::Cancelled)
}

/// Save file dialog to export as PNG
pub fn select_export_png_path() -> Result<PathBuf> {
    FileDialog::new()
        .add_filter("PNG", &["png"])
        .set_file_name("export.png")
        .save_file()
        .ok_or(EditorError::Cancelled)
}

/// Folder dialog for saving or loading a project
pub fn select_project_folder() -> Result<PathBuf> {
    FileDialog::new()
        .set_directory(".")
        .pick_folder()
        .ok_or(EditorError::Cancelled)
}

fn layer_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("imported")
        .to_string()
}

/// Load a PNG or JPEG from disk into a layer named after the file.
pub fn load_image(path: &Path) -> Result<Layer> {
    let img = image::open(path)?.to_rgba8();
    let (width, height) = img.dimensions();
    let bytes = img.into_raw();
    let len = bytes.len();
    let layer = Layer::from_rgba(layer_name(path), width, height, &bytes)
        .ok_or(EditorError::BufferSize { width, height, len })?;
    info!("io: loaded {} ({}x{})", path.display(), width, height);
    Ok(layer)
}

fn rgba_image(size: Vec2u, bytes: Vec<u8>) -> Result<RgbaImage> {
    let len = bytes.len();
    ImageBuffer::from_raw(size.x, size.y, bytes).ok_or(EditorError::BufferSize {
        width: size.x,
        height: size.y,
        len,
    })
}

fn save_png(img: &RgbaImage, path: &Path) -> Result<()> {
    img.save_with_format(path, image::ImageFormat::Png)?;
    debug!("io: wrote {}", path.display());
    Ok(())
}

/// Export the full surface of a layer as a PNG file.
pub fn export_layer_as_png(layer: &Layer, path: &Path) -> Result<()> {
    let img = rgba_image(layer.full_size(), layer.to_rgba_bytes())?;
    save_png(&img, path)
}

/// Composites the visible layers bottom to top over `background`, covering
/// `size` pixels of each layer's full surface. Returns tight RGBA8 bytes.
pub fn composite_layers(size: Vec2u, layers: &[Layer], background: Color) -> Vec<u8> {
    let width = size.x as usize;
    let mut result = vec![0u8; size.area() * 4];
    if width == 0 {
        return result;
    }
    let visible: Vec<&Layer> = layers.iter().filter(|l| l.visible).collect();

    result
        .par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let pos = Vec2u::new(x as u32, y as u32);
                let color = visible
                    .iter()
                    .fold(background, |dst, layer| layer.get_full_pixel(pos).blend_over(dst));
                px.copy_from_slice(&color.to_array());
            }
        });
    result
}

/// Export the composite of a canvas's full surface as a PNG file.
pub fn export_canvas_as_png(canvas: &Canvas, path: &Path) -> Result<()> {
    let size = canvas.full_size();
    let bytes = composite_layers(size, canvas.layers(), canvas.background());
    save_png(&rgba_image(size, bytes)?, path)?;
    info!("io: exported {} layers to {}", canvas.num_layers(), path.display());
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerMetadata {
    pub name: String,
    pub visible: bool,
    pub file: String,
}

/// Project manifest, stored as `project.json` next to one PNG per layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub active_layer: usize,
    pub layers: Vec<LayerMetadata>,
}

impl Project {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self { name: name.into(), width, height, active_layer: 0, layers: Vec::new() }
    }

    /// Manifest describing every layer of `canvas`.
    pub fn from_canvas(name: impl Into<String>, canvas: &Canvas) -> Self {
        let size = canvas.full_size();
        let mut project = Self::new(name, size.x, size.y);
        for layer in canvas.layers() {
            project.add_layer_metadata(layer.name.clone(), layer.visible);
        }
        project.active_layer = canvas.active_layer_index();
        project
    }

    pub fn add_layer_metadata(&mut self, name: impl Into<String>, visible: bool) {
        let file = format!("layer_{:03}.png", self.layers.len());
        self.layers.push(LayerMetadata { name: name.into(), visible, file });
    }
}

/// Save a project (JSON manifest + one PNG per layer) to a folder.
pub fn save_project(project: &Project, layers: &[Layer], folder: &Path) -> Result<()> {
    if project.layers.len() != layers.len() {
        return Err(EditorError::Project(format!(
            "manifest lists {} layers, got {}",
            project.layers.len(),
            layers.len()
        )));
    }
    fs::create_dir_all(folder).map_err(|e| EditorError::io(folder, e))?;

    for (metadata, layer) in project.layers.iter().zip(layers) {
        export_layer_as_png(layer, &folder.join(&metadata.file))?;
    }

    let json = serde_json::to_string_pretty(project)?;
    let json_path = folder.join(PROJECT_FILE);
    fs::write(&json_path, json).map_err(|e| EditorError::io(&json_path, e))?;
    info!("io: saved project '{}' to {}", project.name, folder.display());
    Ok(())
}

/// Load a project from a folder. Layers come back with the names and
/// visibility stored in the manifest.
pub fn load_project(folder: &Path) -> Result<(Project, Vec<Layer>)> {
    let json_path = folder.join(PROJECT_FILE);
    let json = fs::read_to_string(&json_path).map_err(|e| EditorError::io(&json_path, e))?;
    let project: Project = serde_json::from_str(&json)?;
    if project.layers.is_empty() {
        return Err(EditorError::Project(format!("{} lists no layers", json_path.display())));
    }

    let layers = project
        .layers
        .iter()
        .map(|metadata| {
            let mut layer = load_image(&folder.join(&metadata.file))?;
            layer.name = metadata.name.clone();
            layer.visible = metadata.visible;
            Ok(layer)
        })
        .collect::<Result<Vec<_>>>()?;

    info!("io: loaded project '{}' ({} layers)", project.name, layers.len());
    Ok((project, layers))
}
