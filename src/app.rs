//! `TourApp`: the egui shell around the tour core.
//!
//! Owns the navigator, the scene, and the hotspot layer of the current
//! location, draws the chrome, and turns pointer input into core calls.

use std::sync::Arc;

use egui::{
    Align2, Color32, ColorImage, CursorIcon, FontId, Id, Order, Pos2, Rect, Sense, Stroke,
    TextureHandle, TextureOptions, Vec2,
};
use image::RgbImage;
use nalgebra::vector;
use panotour::{
    hotspot::{HotspotLayer, MarkerStyle},
    loader::PanoramaLoader,
    render::{render_view, ViewProjection},
    LocationId, Navigator, PanoramaScene, SceneEvent, Tour,
};

pub struct TourApp {
    tour: Arc<Tour>,
    navigator: Navigator,
    scene: PanoramaScene,
    layer: HotspotLayer,
    loader: PanoramaLoader,
    frame: Option<RgbImage>,
    texture: Option<TextureHandle>,
    error: Option<String>,
}

impl TourApp {
    pub fn new(cc: &eframe::CreationContext<'_>, tour: Tour) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let tour = Arc::new(tour);
        let viewer = tour.viewer();
        let mut app = Self {
            navigator: Navigator::new(Arc::clone(&tour)),
            scene: PanoramaScene::new(viewer),
            layer: HotspotLayer::new(tour.start_location(), viewer.hotspot_radius),
            loader: PanoramaLoader::new(),
            frame: None,
            texture: None,
            error: None,
            tour: Arc::clone(&tour),
        };
        app.enter_location(&cc.egui_ctx, tour.start());
        app
    }

    fn enter_location(&mut self, ctx: &egui::Context, id: LocationId) {
        let tour = Arc::clone(&self.tour);
        let Some(location) = tour.location(id) else {
            log::error!("cannot enter unknown location {id}");
            return;
        };

        let ticket = self.scene.set_image(location.image.clone());
        self.scene
            .set_auto_rotate(location.auto_rotate, location.auto_rotate_speed);
        self.scene
            .set_initial_pose(location.initial_pitch, location.initial_yaw, location.hfov);
        self.layer = HotspotLayer::new(location, tour.viewer().hotspot_radius);
        self.error = None;

        let ctx = ctx.clone();
        self.loader
            .request(ticket, &location.image, move || ctx.request_repaint());
    }

    fn report(&mut self, result: Result<bool, panotour::TourError>) {
        if let Err(e) = result {
            self.error = Some(e.to_string());
        }
    }

    fn chrome(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("chrome").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.navigator.can_go_back() && ui.button("⬅ Previous Location").clicked() {
                    self.navigator.go_back();
                }

                let home = self.navigator.home();
                let home_title = self
                    .tour
                    .location(home)
                    .map_or("Home", |l| l.title.as_str());
                if ui.button(format!("🏠 {home_title}")).clicked() {
                    let result = self.navigator.go_home(home).map(|_| true);
                    self.report(result);
                }

                ui.menu_button("All Views", |ui| {
                    let tour = Arc::clone(&self.tour);
                    let current = self.navigator.current();
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        for location in tour.locations() {
                            ui.horizontal(|ui| {
                                let uri = format!("file://{}", location.image);
                                ui.add(egui::Image::new(uri).max_size(Vec2::new(96.0, 48.0)));
                                let selected = location.id == current;
                                if ui.selectable_label(selected, location.title.as_str()).clicked() {
                                    let result = self.navigator.select_direct(location.id);
                                    self.report(result);
                                    ui.close_menu();
                                }
                            });
                        }
                    });
                });

                let fullscreen = is_fullscreen(ctx);
                let label = if fullscreen {
                    "Exit Fullscreen"
                } else {
                    "Fullscreen"
                };
                if ui.button(label).clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(!fullscreen));
                }

                ui.separator();
                if let Some(location) = self.tour.location(self.navigator.current()) {
                    let title = ui.strong(location.title.as_str());
                    if let Some(description) = &location.description {
                        title.on_hover_text(description.as_str());
                    }
                }
            });
        });
    }

    fn viewport(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::BLACK))
            .show(ctx, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
                let size = rect.size();
                if size.x < 1.0 || size.y < 1.0 {
                    return;
                }

                self.scene.on_resize(size.x / size.y);
                self.scene.begin_frame();

                if response.dragged() {
                    let delta = response.drag_delta();
                    self.scene
                        .controls_mut()
                        .drag(vector![delta.x, delta.y], vector![size.x, size.y]);
                }
                if response.hovered() {
                    let (scroll, zoom) = ui.input(|i| (i.smooth_scroll_delta.y, i.zoom_delta()));
                    if scroll != 0.0 {
                        self.scene.controls_mut().scroll(scroll);
                    }
                    if zoom != 1.0 {
                        self.scene.controls_mut().pinch(zoom);
                    }
                }
                self.scene.advance(ui.input(|i| i.stable_dt));

                let panorama = self.scene.panorama().cloned();
                let image_size = panorama
                    .as_ref()
                    .map_or(vector![2, 1], |p| vector![p.width(), p.height()]);
                let scale = self.tour.viewer().render_scale;
                let out_size = vector![
                    ((size.x * scale) as u32).max(1),
                    ((size.y * scale) as u32).max(1)
                ];
                let proj = ViewProjection::new(
                    image_size,
                    out_size,
                    &self.scene.camera_pose(),
                    self.scene.sphere_yaw(),
                );

                let resized = self
                    .frame
                    .as_ref()
                    .map_or(true, |f| f.dimensions() != (out_size.x, out_size.y));
                let redraw = self.scene.take_redraw();
                if let Some(panorama) = &panorama {
                    if redraw || resized || self.texture.is_none() {
                        if resized {
                            self.frame = None;
                        }
                        let frame = self
                            .frame
                            .get_or_insert_with(|| RgbImage::new(out_size.x, out_size.y));
                        render_view(panorama, frame, &proj);
                        let image = ColorImage::from_rgb(
                            [out_size.x as usize, out_size.y as usize],
                            frame.as_raw(),
                        );
                        match &mut self.texture {
                            Some(texture) => texture.set(image, TextureOptions::LINEAR),
                            None => {
                                self.texture =
                                    Some(ctx.load_texture("panorama", image, TextureOptions::LINEAR))
                            }
                        }
                    }
                }

                if let Some(texture) = &self.texture {
                    let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                    ui.painter().image(texture.id(), rect, uv, Color32::WHITE);
                }

                self.hotspots(ctx, rect, &proj);

                if self.scene.is_loading() {
                    ui.put(
                        Rect::from_center_size(rect.center(), Vec2::splat(48.0)),
                        egui::Spinner::new().size(48.0),
                    );
                }
                if let Some(error) = &self.error {
                    ui.painter().text(
                        rect.center_bottom() - Vec2::new(0.0, 16.0),
                        Align2::CENTER_BOTTOM,
                        format!("⚠ {error}"),
                        FontId::proportional(16.0),
                        Color32::from_rgb(255, 120, 120),
                    );
                }

                if self.scene.is_rotating() || self.scene.is_loading() {
                    ctx.request_repaint();
                }
            });
    }

    fn hotspots(&mut self, ctx: &egui::Context, rect: Rect, proj: &ViewProjection) {
        let location = self.layer.location();
        let mut hovered = None;
        let mut clicked = None;
        let mut tooltip_at = None;

        for (placed, pos) in self.layer.screen_positions(proj) {
            let at = rect.min + Vec2::new(pos.x * rect.width(), pos.y * rect.height());
            let is_hovered = self.layer.is_hovered(placed.index);
            let response = egui::Area::new(Id::new(("hotspot", location.0, placed.index)))
                .order(Order::Foreground)
                .fixed_pos(at)
                .pivot(Align2::CENTER_CENTER)
                .show(ctx, |ui| marker(ui, placed.style(), is_hovered))
                .inner;
            if response.hovered() {
                hovered = Some(placed.index);
                tooltip_at = Some(response.rect.center_top());
            }
            if response.clicked() {
                clicked = Some(placed.index);
            }
        }

        for (slot, (index, hotspot)) in self.layer.fixed().iter().enumerate() {
            let offset = Vec2::new(0.0, -24.0 - slot as f32 * 44.0);
            let response = egui::Area::new(Id::new(("fixed", location.0, *index)))
                .order(Order::Foreground)
                .anchor(Align2::CENTER_BOTTOM, offset)
                .show(ctx, |ui| ui.button(hotspot.label.as_str()))
                .inner;
            if response.hovered() {
                hovered = Some(*index);
            }
            if response.clicked() {
                clicked = Some(*index);
            }
        }

        self.layer.sync_hover(hovered);
        if self.layer.wants_pointer_cursor() {
            ctx.set_cursor_icon(CursorIcon::PointingHand);
        }
        if let (Some(text), Some(at)) = (self.layer.tooltip(), tooltip_at) {
            egui::Area::new(Id::new("hotspot-tooltip"))
                .order(Order::Tooltip)
                .fixed_pos(at - Vec2::new(0.0, 6.0))
                .pivot(Align2::CENTER_BOTTOM)
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.set_max_width(230.0);
                        ui.label(text);
                    });
                });
        }

        if let Some(target) = clicked.and_then(|index| self.layer.click(index)) {
            let result = self.navigator.navigate(target);
            self.report(result);
        }
    }
}

/// Fullscreen as the window reports it. The window manager or Esc can leave
/// fullscreen behind our back, so this is read every frame.
fn is_fullscreen(ctx: &egui::Context) -> bool {
    ctx.input(|i| i.viewport().fullscreen.unwrap_or(false))
}

fn marker(ui: &mut egui::Ui, style: MarkerStyle, hovered: bool) -> egui::Response {
    let size = if hovered { 40.0 } else { 36.0 };
    let (rect, response) = ui.allocate_exact_size(Vec2::splat(size), Sense::click());
    let painter = ui.painter();
    let radius = size / 2.0;

    match style {
        MarkerStyle::Info => {
            let alpha = if hovered { 204 } else { 153 };
            painter.circle(
                rect.center(),
                radius - 2.0,
                Color32::from_black_alpha(alpha),
                Stroke::new(1.0, Color32::from_white_alpha(102)),
            );
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "i",
                FontId::proportional(18.0),
                Color32::WHITE,
            );
        }
        MarkerStyle::Navigate | MarkerStyle::Fixed => {
            painter.circle_filled(rect.center(), radius, Color32::from_white_alpha(40));
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "🚶",
                FontId::proportional(size * 0.7),
                Color32::WHITE,
            );
        }
    }
    response
}

impl eframe::App for TourApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for decoded in self.loader.poll() {
            self.scene.complete(decoded.ticket, decoded.result);
        }
        for event in self.scene.drain_events() {
            match event {
                SceneEvent::LoadComplete(_) => self.error = None,
                SceneEvent::LoadFailed(e) => self.error = Some(e.to_string()),
            }
        }

        self.chrome(ctx);
        self.viewport(ctx);

        for event in self.navigator.drain_events() {
            log::debug!("now at {}, history {:?}", event.current, event.history);
            self.enter_location(ctx, event.current);
        }
    }
}
