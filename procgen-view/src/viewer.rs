//! Static scene viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a generated [`Scene`] and
//! implements [`eframe::App`] to show it as two flat projections: the
//! terrain from above, coloured by height with the water sheet laid over
//! it, and the tree from the side with its skeleton and leftover
//! attraction points.

use eframe::App;
use glam::{Vec2, Vec3};
use procgen_core::scene::Scene;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ViewMode {
    Terrain,
    Tree,
}

/// Main application state for the viewer.
///
/// ### Fields
/// - `scene` - The generated scene; never regenerated.
/// - `mode` - Which projection the central panel shows.
/// - `zoom` - Zoom factor for world-to-screen coordinate mapping.
/// - `pan` - Screen-space pan offset in pixels.
/// - `show_water` - Whether the water overlay is drawn in terrain view.
pub struct Viewer {
    scene: Scene,
    mode: ViewMode,
    zoom: f32,
    pan: egui::Vec2,
    show_water: bool,
}

impl Viewer {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            mode: ViewMode::Terrain,
            zoom: 12.0,
            pan: egui::vec2(0.0, 0.0),
            show_water: true,
        }
    }

    /// Converts a world-space position to screen-space.
    ///
    /// World coordinates are scaled by `zoom`, offset by `pan`, and then
    /// centered inside the given `rect`. The y-axis is flipped so that
    /// positive y goes up in world space.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        egui::pos2(
            center.x + p.x * self.zoom + self.pan.x,
            center.y - p.y * self.zoom + self.pan.y,
        )
    }

    /// Inverse of [`Viewer::world_to_screen`] up to floating point rounding.
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (center.y - p.y + self.pan.y) / self.zoom;
        Vec2::new(x, y)
    }

    /// Top-down projection, centred on the terrain grid.
    fn plan_view(&self, p: Vec3) -> Vec2 {
        let half = self.terrain_half_extent();
        Vec2::new(p.x - half, half - p.z)
    }

    /// Side projection looking down `-Z`, centred on the terrain grid.
    fn side_view(&self, p: Vec3) -> Vec2 {
        Vec2::new(p.x - self.terrain_half_extent(), p.y)
    }

    fn terrain_half_extent(&self) -> f32 {
        self.scene.terrain.mesh.size.saturating_sub(1) as f32 / 2.0
    }

    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .selectable_label(self.mode == ViewMode::Terrain, "Terrain")
                    .clicked()
                {
                    self.mode = ViewMode::Terrain;
                }
                if ui
                    .selectable_label(self.mode == ViewMode::Tree, "Tree")
                    .clicked()
                {
                    self.mode = ViewMode::Tree;
                }

                ui.separator();
                ui.add_enabled(
                    self.scene.water.is_some(),
                    egui::Checkbox::new(&mut self.show_water, "Water"),
                );

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.5..=60.0).text("Zoom"));
                if ui.button("Recenter").clicked() {
                    self.pan = egui::vec2(0.0, 0.0);
                }
            });
        });
    }

    fn ui_status_bar(&self, ctx: &egui::Context) {
        let terrain = &self.scene.terrain.mesh;
        let tree = &self.scene.tree;
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!(
                    "height = {:.2} .. {:.2}",
                    terrain.min_height, terrain.max_height
                ));
                ui.label(format!(
                    "terrain vertices = {}, indices = {}",
                    terrain.vertices.len(),
                    terrain.indices.len()
                ));
                ui.separator();
                ui.label(format!("nodes = {}", tree.skeleton.node_count()));
                ui.label(format!(
                    "branch triangles = {}",
                    tree.branches.as_ref().map_or(0, |m| m.indices.len() / 3)
                ));
                ui.label(format!(
                    "remaining attractors = {}",
                    tree.skeleton.attractors.len()
                ));
            });
        });
    }

    fn draw_terrain(&self, painter: &egui::Painter, rect: egui::Rect, elapsed: f32) {
        let mesh = &self.scene.terrain.mesh;
        let transform = &self.scene.terrain.transform;
        let span = (mesh.max_height - mesh.min_height).max(f32::EPSILON);
        let cell = egui::vec2(self.zoom, self.zoom);

        for v in &mesh.vertices {
            let p = transform.transform_point(v.position);
            let t = (p.y - mesh.min_height) / span;
            let centre = self.world_to_screen(self.plan_view(p), rect);
            painter.rect_filled(
                egui::Rect::from_center_size(centre, cell),
                0.0,
                height_colour(t),
            );
        }

        let Some(water) = self.scene.water.as_ref().filter(|_| self.show_water) else {
            return;
        };
        let pulse = 0.5 + 0.5 * water.animation.phase(elapsed).sin();
        let alpha = (90.0 + 60.0 * pulse) as u8;
        let colour = egui::Color32::from_rgba_unmultiplied(40, 90, 200, alpha);
        let level = water.transform.translation.y;
        for v in &mesh.vertices {
            let p = transform.transform_point(v.position);
            if p.y < level {
                let centre = self.world_to_screen(self.plan_view(p), rect);
                painter.rect_filled(egui::Rect::from_center_size(centre, cell), 0.0, colour);
            }
        }
    }

    fn draw_tree(&self, painter: &egui::Painter, rect: egui::Rect) {
        let tree = &self.scene.tree;

        // Terrain profile through the tree's root.
        let mesh = &self.scene.terrain.mesh;
        let size = mesh.size;
        let row = size / 2;
        let profile: Vec<egui::Pos2> = mesh
            .vertices
            .iter()
            .skip(row * size)
            .take(size)
            .map(|v| self.world_to_screen(self.side_view(v.position), rect))
            .collect();
        painter.add(egui::Shape::line(
            profile,
            egui::Stroke::new(1.5, egui::Color32::from_rgb(140, 110, 70)),
        ));

        if let Some(water) = &self.scene.water {
            let y = water.transform.translation.y;
            let half = self.terrain_half_extent();
            let a = self.world_to_screen(Vec2::new(-half, y), rect);
            let b = self.world_to_screen(Vec2::new(half, y), rect);
            painter.line_segment([a, b], egui::Stroke::new(1.0, egui::Color32::LIGHT_BLUE));
        }

        let lines = &tree.lines;
        let width = (tree.skeleton.tree.nodes.len() as f32).log10().max(1.0);
        for pair in lines.indices.chunks_exact(2) {
            let a = self.side_view(lines.vertices[pair[0] as usize]);
            let b = self.side_view(lines.vertices[pair[1] as usize]);
            painter.line_segment(
                [self.world_to_screen(a, rect), self.world_to_screen(b, rect)],
                egui::Stroke::new(width, egui::Color32::LIGHT_GREEN),
            );
        }

        let root = self.side_view(tree.skeleton.root().pos);
        painter.circle_filled(
            self.world_to_screen(root, rect),
            3.0,
            egui::Color32::LIGHT_BLUE,
        );

        for point in &tree.skeleton.attractors.points {
            let p = self.world_to_screen(self.side_view(point.pos), rect);
            painter.circle_filled(p, 1.5, egui::Color32::LIGHT_RED);
        }
    }

    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            if response.dragged() {
                self.pan += response.drag_delta();
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(0.5, 60.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            match self.mode {
                ViewMode::Terrain => {
                    let elapsed = ctx.input(|i| i.time) as f32;
                    self.draw_terrain(&painter, rect, elapsed);
                    if self.show_water && self.scene.water.is_some() {
                        ctx.request_repaint();
                    }
                }
                ViewMode::Tree => self.draw_tree(&painter, rect),
            }
        });
    }
}

/// Low ground green, high ground pale grey-brown.
fn height_colour(t: f32) -> egui::Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
    egui::Color32::from_rgb(lerp(50, 200), lerp(110, 190), lerp(40, 170))
}

impl App for Viewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procgen_core::scene::{SceneConfig, build_scene};

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    fn test_viewer() -> Viewer {
        let mut config = SceneConfig::default();
        config.terrain.size = 9;
        config.terrain.seed = Some(5);
        config.water.surface.size = 5;
        config.water.surface.seed = Some(6);
        config.tree.seed = Some(7);
        config.tree.attraction_point_count = 60;
        Viewer::new(build_scene(&config).unwrap())
    }

    #[test]
    fn world_to_screen_and_back_is_roundtrip() {
        let mut viewer = test_viewer();
        viewer.zoom = 2.0;
        viewer.pan = egui::vec2(15.0, -7.0);
        let rect = test_rect();

        let eps = 1e-4;
        for p in [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, -5.0),
            Vec2::new(-3.5, 8.25),
        ] {
            let back = viewer.screen_to_world(viewer.world_to_screen(p, rect), rect);
            assert!(
                (back - p).abs().max_element() < eps,
                "roundtrip mismatch: p={p:?}, back={back:?}"
            );
        }
    }

    #[test]
    fn plan_view_centres_the_grid() {
        let viewer = test_viewer();
        assert_eq!(viewer.scene.terrain.mesh.size, 9);
        assert_eq!(viewer.terrain_half_extent(), 4.0);
        assert_eq!(viewer.plan_view(Vec3::new(4.0, 3.0, 4.0)), Vec2::ZERO);
        assert_eq!(viewer.plan_view(Vec3::new(0.0, 0.0, 8.0)), Vec2::new(-4.0, -4.0));
        assert_eq!(viewer.side_view(Vec3::new(8.0, 2.5, 1.0)), Vec2::new(4.0, 2.5));
    }

    #[test]
    fn height_colour_spans_low_to_high() {
        assert_eq!(height_colour(0.0), egui::Color32::from_rgb(50, 110, 40));
        assert_eq!(height_colour(1.0), egui::Color32::from_rgb(200, 190, 170));
        assert_eq!(height_colour(7.0), height_colour(1.0));
    }
}
