use js_sys::{wasm_bindgen::JsCast, Object, Reflect};
use wasm_bindgen::JsValue;
use web_sys::{Document, HtmlCanvasElement, WebGl2RenderingContext};

use crate::error::Error;

pub(crate) fn document() -> Result<Document, Error> {
    web_sys::window()
        .ok_or(Error::window_not_found())
        .and_then(|w| w.document().ok_or(Error::document_not_found()))
}

pub(crate) fn get_canvas_by_id(canvas_id: &str) -> Result<HtmlCanvasElement, Error> {
    document()?
        .query_selector(canvas_id)
        .map_err(|_| Error::canvas_not_found())?
        .ok_or(Error::canvas_not_found())?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| Error::canvas_not_found())
}

/// WebGL2 context with a depth buffer and straight (non-premultiplied) alpha,
/// matching the `SRC_ALPHA, ONE_MINUS_SRC_ALPHA` blending used for text.
pub(crate) fn get_webgl2_context(
    canvas: &HtmlCanvasElement,
) -> Result<WebGl2RenderingContext, Error> {
    let options = Object::new();
    for (key, value) in [("depth", true), ("premultipliedAlpha", false), ("antialias", true)] {
        Reflect::set(&options, &key.into(), &JsValue::from_bool(value))
            .map_err(|_| Error::canvas_context_failed())?;
    }

    canvas
        .get_context_with_context_options("webgl2", &options)
        .map_err(|_| Error::canvas_context_failed())?
        .ok_or(Error::webgl_context_failed())?
        .dyn_into::<WebGl2RenderingContext>()
        .map_err(|_| Error::webgl_context_failed())
}
