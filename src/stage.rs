//! The live hero scene: owns the renderer, the star points and the title
//! mesh, and drives them from a single animation-frame loop.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo_net::http::Request;
use js_sys::{Math, JSON};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{window, HtmlCanvasElement, HtmlElement};

use crate::motion::registry::{LAYOUT_EPOCH, SCROLL_OBSERVER};
use crate::motion::{FrameClock, PinPlacement, ScrollRange, TriggerSpec};
use crate::scene::{
    FloatingTitle, OpacityTarget, PositionSink, Rgb, SceneConfig, StarField, TextMeshHandle,
    TitleMaterial, TitleParams,
};
use crate::telemetry::{log_event, LogLevel};
use crate::three::{
    self, AmbientLight, BufferAttribute, BufferGeometry, Color, DirectionalLight, FontLoader, Mesh,
    MeshStandardMaterial, OrbitControls, PerspectiveCamera, Points, RgbeLoader, Scene,
    ShaderMaterial, TextGeometry, Texture, WebGlRenderer,
};

const STAR_VERTEX_SHADER: &str = r#"
uniform float time;
attribute float size;
varying vec3 vColor;
void main() {
  vColor = color;
  vec4 mvPosition = modelViewMatrix * vec4(position, 0.5);
  gl_PointSize = size * (30.0 / -mvPosition.z) * (3.0 + sin(time + 100.0));
  gl_Position = projectionMatrix * mvPosition;
}
"#;

const STAR_FRAGMENT_SHADER: &str = r#"
uniform float fade;
varying vec3 vColor;
void main() {
  float opacity = 1.0;
  if (fade == 1.0) {
    float d = distance(gl_PointCoord, vec2(0.5, 0.5));
    opacity = 1.0 / (1.0 + exp(16.0 * (d - 0.25)));
  }
  gl_FragColor = vec4(vColor, opacity);
  #include <tonemapping_fragment>
  #include <colorspace_fragment>
}
"#;

pub struct TitleSurface(MeshStandardMaterial);

impl OpacityTarget for TitleSurface {
    fn set_opacity(&self, opacity: f32) {
        self.0.set_opacity(opacity);
    }
}

pub struct ThreeTitle {
    mesh: Mesh,
    geometry: TextGeometry,
    material: Option<TitleSurface>,
}

impl ThreeTitle {
    fn build(font: &three::Font, params: &TitleParams, look: &TitleMaterial) -> Result<Self, JsValue> {
        let geometry = TextGeometry::new(
            params.text,
            &three::params(&[
                ("font", JsValue::from(font.clone())),
                ("size", params.size.into()),
                ("depth", params.depth.into()),
                ("height", params.depth.into()),
                ("curveSegments", params.curve_segments.into()),
                ("bevelEnabled", params.bevel.enabled.into()),
                ("bevelThickness", params.bevel.thickness.into()),
                ("bevelSize", params.bevel.size.into()),
                ("bevelOffset", params.bevel.offset.into()),
                ("bevelSegments", params.bevel.segments.into()),
            ])?,
        );

        let material = MeshStandardMaterial::new(&three::params(&[
            ("color", color(look.color).into()),
            ("metalness", look.metalness.into()),
            ("roughness", look.roughness.into()),
            ("emissive", color(look.emissive).into()),
            ("emissiveIntensity", look.emissive_intensity.into()),
            ("transparent", look.transparent.into()),
            ("opacity", look.opacity.into()),
        ])?);

        let mesh = Mesh::new(&geometry, &material);
        let [x, y, z] = params.position;
        mesh.position().set(x, y, z);

        Ok(Self {
            mesh,
            geometry,
            material: Some(TitleSurface(material)),
        })
    }

    fn dispose(&self) {
        self.geometry.dispose();
        if let Some(TitleSurface(material)) = &self.material {
            material.dispose();
        }
    }
}

impl TextMeshHandle for ThreeTitle {
    type Material = TitleSurface;

    fn set_rotation_y(&self, radians: f32) {
        self.mesh.rotation().set_y(radians);
    }

    fn material(&self) -> Option<&TitleSurface> {
        self.material.as_ref()
    }
}

struct PositionAttribute(BufferAttribute);

impl PositionSink for PositionAttribute {
    fn upload(&self, positions: &[f32]) {
        self.0.array().copy_from(positions);
        self.0.set_needs_update(true);
    }
}

struct StarLayer {
    stars: StarField,
    points: Points,
    geometry: BufferGeometry,
    material: ShaderMaterial,
}

impl StarLayer {
    fn build(stars: StarField, fade: bool) -> Result<Self, JsValue> {
        let geometry = BufferGeometry::new();
        geometry.set_attribute("position", &three::float_attribute(stars.positions(), 3));
        geometry.set_attribute("color", &three::float_attribute(stars.colors(), 3));
        geometry.set_attribute("size", &three::float_attribute(stars.sizes(), 1));

        let uniforms = three::params(&[
            ("time", three::uniform(JsValue::from(0.0))?),
            ("fade", three::uniform(JsValue::from(if fade { 1.0 } else { 0.0 }))?),
        ])?;
        let material = ShaderMaterial::new(&three::params(&[
            ("uniforms", uniforms.into()),
            ("vertexShader", STAR_VERTEX_SHADER.into()),
            ("fragmentShader", STAR_FRAGMENT_SHADER.into()),
            ("blending", three::ADDITIVE_BLENDING.into()),
            ("depthWrite", JsValue::FALSE),
            ("transparent", JsValue::TRUE),
            ("vertexColors", JsValue::TRUE),
        ])?);

        let points = Points::new(&geometry, &material);

        Ok(Self {
            stars,
            points,
            geometry,
            material,
        })
    }

    fn drift(&mut self, elapsed_seconds: f64) {
        let attribute = self.geometry.get_attribute("position").map(PositionAttribute);
        self.stars.drift(elapsed_seconds as f32, attribute.as_ref());
    }

    fn twinkle(&mut self, delta_seconds: f64) {
        let time = self.stars.tick_twinkle(delta_seconds as f32);
        if let Err(error) = three::set_uniform(&self.material, "time", time) {
            log_js_error(LogLevel::Debug, "star_uniform_failed", &error);
        }
    }
}

pub struct Stage {
    renderer: WebGlRenderer,
    scene: Scene,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    canvas: HtmlCanvasElement,
    hero: HtmlElement,
    layer: HtmlElement,
    star_layer: StarLayer,
    title: FloatingTitle<ThreeTitle>,
    environment: Option<Texture>,
    trigger: TriggerSpec,
    range: Option<ScrollRange>,
    layout_epoch: Option<u64>,
    placement: Option<PinPlacement>,
    clock: FrameClock,
    animate: bool,
}

impl Stage {
    fn build(canvas: HtmlCanvasElement, hero: HtmlElement, config: &SceneConfig) -> Result<Self, JsValue> {
        if !three::is_available() {
            return Err(JsValue::from_str("three.js is not loaded"));
        }
        let layer = canvas
            .parent_element()
            .and_then(|parent| parent.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| JsValue::from_str("canvas has no enclosing layer"))?;

        let renderer = three::renderer_for(&canvas)?;
        if let Some(win) = window() {
            renderer.set_pixel_ratio(win.device_pixel_ratio());
        }

        let scene = Scene::new();
        let (width, height) = canvas_size(&canvas);
        let camera = PerspectiveCamera::new(
            config.camera.fov,
            (width / height) as f32,
            config.camera.near,
            config.camera.far,
        );
        let [x, y, z] = config.camera.position;
        camera.position().set(x, y, z);

        let lights = &config.lights;
        scene.add(&AmbientLight::new(&color(Rgb::WHITE), lights.ambient_intensity));
        let sun = DirectionalLight::new(&color(lights.directional_color), lights.directional_intensity);
        let [x, y, z] = lights.directional_position;
        sun.position().set(x, y, z);
        scene.add(&sun);

        let seed = config
            .seed
            .unwrap_or_else(|| (Math::random() * u64::MAX as f64) as u64);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let stars = StarField::generate(&config.stars, &config.drift, &mut rng);
        let star_layer = StarLayer::build(stars, config.stars.fade)?;
        scene.add(&star_layer.points);

        let controls = OrbitControls::new(&camera, &canvas);
        controls.set_enable_pan(config.controls.enable_pan);
        controls.set_enable_zoom(config.controls.enable_zoom);
        controls.set_enable_rotate(config.controls.enable_rotate);
        controls.set_enable_damping(config.controls.enable_damping);
        controls.set_damping_factor(config.controls.damping_factor);

        let animate = !config.reduced_motion;
        let title = FloatingTitle::new(config.title.clone(), config.title_material, config.rotation)
            .with_motion(animate);

        let mut stage = Self {
            renderer,
            scene,
            camera,
            controls,
            canvas,
            hero,
            layer,
            star_layer,
            title,
            environment: None,
            trigger: config.hero_trigger,
            range: None,
            layout_epoch: None,
            placement: None,
            clock: FrameClock::new(),
            animate,
        };
        stage.resize();
        stage.title.bind_fade(config.title_fade);

        Ok(stage)
    }

    fn resize(&mut self) {
        let (width, height) = canvas_size(&self.canvas);
        self.renderer.set_size(width, height, false);
        self.camera.set_aspect((width / height) as f32);
        self.camera.update_projection_matrix();
    }

    /// Re-resolves the hero's scroll range. Only the inner layer is ever
    /// pinned, so the section's rect is its document position.
    fn relayout(&mut self) {
        let scroll_y = scroll_y();
        let rect = self.hero.get_bounding_client_rect();
        let element_top = rect.top() + scroll_y;
        let viewport_height = window()
            .and_then(|win| win.inner_height().ok())
            .and_then(|value| value.as_f64())
            .unwrap_or(rect.height());

        let range = self.trigger.resolve(element_top, rect.height(), viewport_height);
        let _ = self
            .hero
            .style()
            .set_property("margin-bottom", &format!("{:.2}px", range.pin_spacer()));
        self.range = Some(range);
        self.placement = None;
    }

    /// Restyles the layer only when the scroll offset crosses a range edge.
    /// While fixed, the compositor keeps it still without per-frame writes.
    fn apply_pin(&mut self, range: &ScrollRange, scroll_y: f64) {
        let placement = range.pin_placement(scroll_y);
        if self.placement == Some(placement) {
            return;
        }
        self.placement = Some(placement);

        let style = self.layer.style();
        let result = match placement {
            PinPlacement::InFlow => style
                .remove_property("position")
                .and_then(|_| style.remove_property("top"))
                .map(drop),
            PinPlacement::Fixed => style
                .set_property("position", "fixed")
                .and_then(|_| style.set_property("top", "0")),
            PinPlacement::Released { offset } => style
                .set_property("position", "absolute")
                .and_then(|_| style.set_property("top", &format!("{offset:.2}px"))),
        };
        if let Err(error) = result {
            log_js_error(LogLevel::Debug, "pin_style_failed", &error);
        }
    }

    fn frame(&mut self, timestamp_ms: f64) {
        let (elapsed, delta) = self.clock.tick(timestamp_ms);

        let epoch = LAYOUT_EPOCH.current();
        if self.layout_epoch != Some(epoch) {
            self.resize();
            self.relayout();
            self.layout_epoch = Some(epoch);
        }

        if self.animate {
            self.star_layer.drift(elapsed);
            self.star_layer.twinkle(delta);
        }

        let scroll_y = scroll_y();
        let progress = match self.range {
            Some(range) => {
                self.apply_pin(&range, scroll_y);
                range.driven_progress(scroll_y)
            }
            None => 0.0,
        };
        self.title.tick(elapsed, progress);

        self.controls.update();
        self.renderer.render(&self.scene, &self.camera);
    }

    fn attach_title(&mut self, font: &three::Font) -> Result<(), JsValue> {
        let handle = ThreeTitle::build(font, &self.title.params, &self.title.material)?;
        self.scene.add(&handle.mesh);
        self.title.attach(handle, self.clock.elapsed());

        log_event(
            LogLevel::Info,
            "title_attached",
            serde_json::json!({ "fade_bound": self.title.is_fade_bound() }),
        );
        Ok(())
    }

    fn set_environment(&mut self, texture: Texture) {
        texture.set_mapping(three::EQUIRECTANGULAR_REFLECTION_MAPPING);
        self.scene.set_environment(&texture);
        if let Some(previous) = self.environment.replace(texture) {
            previous.dispose();
        }
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        if let Some(handle) = self.title.detach() {
            self.scene.remove(&handle.mesh);
            handle.dispose();
        }
        if let Some(texture) = self.environment.take() {
            texture.dispose();
        }
        self.star_layer.geometry.dispose();
        self.star_layer.material.dispose();
        self.controls.dispose();
        self.renderer.dispose();
        let _ = self.layer.style().remove_property("position");
        let _ = self.layer.style().remove_property("top");
        let _ = self.hero.style().remove_property("margin-bottom");
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Keeps a mounted [`Stage`] alive and its frame loop running. Dropping the
/// handle cancels the loop and tears the scene down.
pub struct StageHandle {
    stage: Rc<RefCell<Stage>>,
    frame: FrameCallback,
    request_id: Rc<Cell<Option<i32>>>,
}

impl StageHandle {
    pub fn mount(
        canvas: HtmlCanvasElement,
        hero: HtmlElement,
        config: &SceneConfig,
    ) -> Result<Self, JsValue> {
        SCROLL_OBSERVER.run(install_layout_listeners);

        let stage = Rc::new(RefCell::new(Stage::build(canvas, hero, config)?));
        let frame: FrameCallback = Rc::new(RefCell::new(None));
        let request_id = Rc::new(Cell::new(None));

        {
            let stage = stage.clone();
            let next = frame.clone();
            let request_id = request_id.clone();
            *frame.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
                if let Ok(mut stage) = stage.try_borrow_mut() {
                    stage.frame(timestamp);
                }
                request_id.set(schedule(&next));
            }));
        }
        request_id.set(schedule(&frame));

        spawn_local(load_title(Rc::downgrade(&stage), config.title.font_url));
        spawn_local(load_environment(Rc::downgrade(&stage), config.environment.url()));

        log_event(
            LogLevel::Info,
            "scene_mounted",
            serde_json::json!({
                "stars": config.stars.count,
                "seeded": config.seed.is_some(),
                "reduced_motion": config.reduced_motion,
            }),
        );

        Ok(Self {
            stage,
            frame,
            request_id,
        })
    }
}

impl Drop for StageHandle {
    fn drop(&mut self) {
        if let (Some(id), Some(win)) = (self.request_id.take(), window()) {
            let _ = win.cancel_animation_frame(id);
        }
        // Breaks the closure -> frame cell -> closure cycle.
        self.frame.borrow_mut().take();
        log_event(
            LogLevel::Debug,
            "scene_unmounted",
            serde_json::json!({ "strong_refs": Rc::strong_count(&self.stage) }),
        );
    }
}

fn schedule(frame: &FrameCallback) -> Option<i32> {
    let callback = frame.borrow();
    let callback = callback.as_ref()?;
    window()?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .ok()
}

fn install_layout_listeners() {
    let Some(win) = window() else {
        return;
    };

    let on_layout_change = Closure::<dyn FnMut()>::new(|| {
        LAYOUT_EPOCH.invalidate();
    });
    for event in ["resize", "load", "orientationchange"] {
        if let Err(error) =
            win.add_event_listener_with_callback(event, on_layout_change.as_ref().unchecked_ref())
        {
            log_js_error(LogLevel::Warn, "layout_listener_failed", &error);
        }
    }
    // Lives for the whole page.
    on_layout_change.forget();
}

async fn load_title(stage: Weak<RefCell<Stage>>, font_url: &'static str) {
    let font = match fetch_font(font_url).await {
        Ok(font) => font,
        Err(error) => {
            log_js_error(LogLevel::Warn, "title_font_failed", &error);
            return;
        }
    };

    let Some(stage) = stage.upgrade() else {
        return;
    };
    let result = stage.borrow_mut().attach_title(&font);
    if let Err(error) = result {
        log_js_error(LogLevel::Warn, "title_build_failed", &error);
    }
}

async fn fetch_font(url: &str) -> Result<three::Font, JsValue> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!(
            "font request returned {}",
            response.status()
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    let json = JSON::parse(&body)?;
    Ok(FontLoader::new().parse(&json))
}

async fn load_environment(stage: Weak<RefCell<Stage>>, url: String) {
    let texture = match JsFuture::from(RgbeLoader::new().load_async(&url)).await {
        Ok(texture) => texture.unchecked_into::<Texture>(),
        Err(error) => {
            log_js_error(LogLevel::Warn, "environment_failed", &error);
            return;
        }
    };

    match stage.upgrade() {
        Some(stage) => stage.borrow_mut().set_environment(texture),
        None => texture.dispose(),
    }
}

fn color(rgb: Rgb) -> Color {
    Color::new(rgb.r, rgb.g, rgb.b)
}

fn canvas_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
    let width = f64::from(canvas.client_width()).max(1.0);
    let height = f64::from(canvas.client_height()).max(1.0);
    (width, height)
}

fn scroll_y() -> f64 {
    window()
        .and_then(|win| win.scroll_y().ok())
        .unwrap_or(0.0)
}

pub fn log_js_error(level: LogLevel, event: &str, error: &JsValue) {
    let message = error
        .as_string()
        .or_else(|| {
            error
                .dyn_ref::<js_sys::Error>()
                .map(|error| String::from(error.message()))
        })
        .unwrap_or_else(|| "unknown error".to_string());

    log_event(level, event, serde_json::json!({ "error": message }));
}
