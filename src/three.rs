//! Bindings to the subset of three.js the hero scene uses. `index.html`
//! exposes the library and its addons on `globalThis.THREE`.

use js_sys::{Float32Array, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlElement};

pub const ADDITIVE_BLENDING: u32 = 2;
pub const EQUIRECTANGULAR_REFLECTION_MAPPING: u32 = 303;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = THREE)]
    pub type Object3D;

    #[wasm_bindgen(method, getter)]
    pub fn rotation(this: &Object3D) -> Euler;
    #[wasm_bindgen(method, getter)]
    pub fn position(this: &Object3D) -> Vector3;
    #[wasm_bindgen(method)]
    pub fn add(this: &Object3D, child: &Object3D);
    #[wasm_bindgen(method)]
    pub fn remove(this: &Object3D, child: &Object3D);

    #[wasm_bindgen(js_namespace = THREE)]
    pub type Euler;

    #[wasm_bindgen(method, setter = y)]
    pub fn set_y(this: &Euler, radians: f32);

    #[wasm_bindgen(js_namespace = THREE)]
    pub type Vector3;

    #[wasm_bindgen(method)]
    pub fn set(this: &Vector3, x: f32, y: f32, z: f32) -> Vector3;

    #[wasm_bindgen(js_namespace = THREE)]
    pub type Color;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(r: f32, g: f32, b: f32) -> Color;

    #[wasm_bindgen(js_namespace = THREE, extends = Object3D)]
    pub type Scene;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new() -> Scene;
    #[wasm_bindgen(method, setter = environment)]
    pub fn set_environment(this: &Scene, texture: &Texture);

    #[wasm_bindgen(js_namespace = THREE, extends = Object3D)]
    pub type PerspectiveCamera;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> PerspectiveCamera;
    #[wasm_bindgen(method, setter = aspect)]
    pub fn set_aspect(this: &PerspectiveCamera, aspect: f32);
    #[wasm_bindgen(method, js_name = updateProjectionMatrix)]
    pub fn update_projection_matrix(this: &PerspectiveCamera);

    #[wasm_bindgen(js_namespace = THREE, extends = Object3D)]
    pub type AmbientLight;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(color: &Color, intensity: f32) -> AmbientLight;

    #[wasm_bindgen(js_namespace = THREE, extends = Object3D)]
    pub type DirectionalLight;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(color: &Color, intensity: f32) -> DirectionalLight;

    #[wasm_bindgen(js_namespace = THREE, js_name = WebGLRenderer)]
    pub type WebGlRenderer;

    #[wasm_bindgen(constructor, js_namespace = THREE, catch, js_class = "WebGLRenderer")]
    pub fn new(parameters: &Object) -> Result<WebGlRenderer, JsValue>;
    #[wasm_bindgen(method, js_class = "WebGLRenderer", js_name = setPixelRatio)]
    pub fn set_pixel_ratio(this: &WebGlRenderer, ratio: f64);
    #[wasm_bindgen(method, js_class = "WebGLRenderer", js_name = setSize)]
    pub fn set_size(this: &WebGlRenderer, width: f64, height: f64, update_style: bool);
    #[wasm_bindgen(method, js_class = "WebGLRenderer")]
    pub fn render(this: &WebGlRenderer, scene: &Scene, camera: &PerspectiveCamera);
    #[wasm_bindgen(method, js_class = "WebGLRenderer")]
    pub fn dispose(this: &WebGlRenderer);

    #[wasm_bindgen(js_namespace = THREE)]
    pub type BufferAttribute;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(array: &Float32Array, item_size: u32) -> BufferAttribute;
    #[wasm_bindgen(method, getter)]
    pub fn array(this: &BufferAttribute) -> Float32Array;
    #[wasm_bindgen(method, setter = needsUpdate)]
    pub fn set_needs_update(this: &BufferAttribute, value: bool);

    #[wasm_bindgen(js_namespace = THREE)]
    pub type BufferGeometry;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new() -> BufferGeometry;
    #[wasm_bindgen(method, js_name = setAttribute)]
    pub fn set_attribute(this: &BufferGeometry, name: &str, attribute: &BufferAttribute);
    #[wasm_bindgen(method, js_name = getAttribute)]
    pub fn get_attribute(this: &BufferGeometry, name: &str) -> Option<BufferAttribute>;
    #[wasm_bindgen(method)]
    pub fn dispose(this: &BufferGeometry);

    #[wasm_bindgen(js_namespace = THREE, extends = BufferGeometry)]
    pub type TextGeometry;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(text: &str, parameters: &Object) -> TextGeometry;

    #[wasm_bindgen(js_namespace = THREE)]
    pub type Material;

    #[wasm_bindgen(method, setter = opacity)]
    pub fn set_opacity(this: &Material, opacity: f32);
    #[wasm_bindgen(method)]
    pub fn dispose(this: &Material);

    #[wasm_bindgen(js_namespace = THREE, extends = Material)]
    pub type ShaderMaterial;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(parameters: &Object) -> ShaderMaterial;
    #[wasm_bindgen(method, getter)]
    pub fn uniforms(this: &ShaderMaterial) -> Object;

    #[wasm_bindgen(js_namespace = THREE, extends = Material)]
    pub type MeshStandardMaterial;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(parameters: &Object) -> MeshStandardMaterial;

    #[wasm_bindgen(js_namespace = THREE, extends = Object3D)]
    pub type Points;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(geometry: &BufferGeometry, material: &Material) -> Points;

    #[wasm_bindgen(js_namespace = THREE, extends = Object3D)]
    pub type Mesh;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(geometry: &BufferGeometry, material: &Material) -> Mesh;

    #[wasm_bindgen(js_namespace = THREE)]
    pub type Texture;

    #[wasm_bindgen(method, setter = mapping)]
    pub fn set_mapping(this: &Texture, mapping: u32);
    #[wasm_bindgen(method)]
    pub fn dispose(this: &Texture);

    #[wasm_bindgen(js_namespace = THREE)]
    pub type Font;

    #[wasm_bindgen(js_namespace = THREE)]
    pub type FontLoader;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new() -> FontLoader;
    #[wasm_bindgen(method)]
    pub fn parse(this: &FontLoader, json: &JsValue) -> Font;

    #[wasm_bindgen(js_namespace = THREE, js_name = RGBELoader)]
    pub type RgbeLoader;

    #[wasm_bindgen(constructor, js_namespace = THREE, js_class = "RGBELoader")]
    pub fn new() -> RgbeLoader;
    #[wasm_bindgen(method, js_class = "RGBELoader", js_name = loadAsync)]
    pub fn load_async(this: &RgbeLoader, url: &str) -> Promise;

    #[wasm_bindgen(js_namespace = THREE)]
    pub type OrbitControls;

    #[wasm_bindgen(constructor, js_namespace = THREE)]
    pub fn new(camera: &PerspectiveCamera, dom_element: &HtmlElement) -> OrbitControls;
    #[wasm_bindgen(method, setter = enablePan)]
    pub fn set_enable_pan(this: &OrbitControls, value: bool);
    #[wasm_bindgen(method, setter = enableZoom)]
    pub fn set_enable_zoom(this: &OrbitControls, value: bool);
    #[wasm_bindgen(method, setter = enableRotate)]
    pub fn set_enable_rotate(this: &OrbitControls, value: bool);
    #[wasm_bindgen(method, setter = enableDamping)]
    pub fn set_enable_damping(this: &OrbitControls, value: bool);
    #[wasm_bindgen(method, setter = dampingFactor)]
    pub fn set_damping_factor(this: &OrbitControls, value: f32);
    #[wasm_bindgen(method)]
    pub fn update(this: &OrbitControls) -> bool;
    #[wasm_bindgen(method)]
    pub fn dispose(this: &OrbitControls);
}

/// Builds a plain parameter object from key/value pairs.
pub fn params(entries: &[(&str, JsValue)]) -> Result<Object, JsValue> {
    let object = Object::new();
    for (key, value) in entries {
        Reflect::set(&object, &JsValue::from_str(key), value)?;
    }
    Ok(object)
}

/// `{ value }` wrapper used by shader uniforms.
pub fn uniform(value: JsValue) -> Result<JsValue, JsValue> {
    params(&[("value", value)]).map(JsValue::from)
}

pub fn set_uniform(material: &ShaderMaterial, name: &str, value: f32) -> Result<(), JsValue> {
    let slot = Reflect::get(&material.uniforms(), &JsValue::from_str(name))?;
    Reflect::set(&slot, &JsValue::from_str("value"), &JsValue::from_f64(f64::from(value)))?;
    Ok(())
}

pub fn float_attribute(values: &[f32], item_size: u32) -> BufferAttribute {
    BufferAttribute::new(&Float32Array::from(values), item_size)
}

pub fn is_available() -> bool {
    Reflect::get(&js_sys::global(), &JsValue::from_str("THREE"))
        .map(|value| value.is_object())
        .unwrap_or(false)
}

pub fn renderer_for(canvas: &HtmlCanvasElement) -> Result<WebGlRenderer, JsValue> {
    WebGlRenderer::new(&params(&[
        ("canvas", JsValue::from(canvas.clone())),
        ("antialias", JsValue::TRUE),
        ("alpha", JsValue::TRUE),
    ])?)
}
