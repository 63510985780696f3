//! Mind-Map Viewer - eframe host for the graph widget

pub mod app;
pub mod loader;

pub use app::MindMapApp;
pub use loader::{load_tree, sample_tree, TreeFormat};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    wasm_bindgen_futures::spawn_local(async {
        let Some(canvas) = find_canvas("mindmap_canvas") else {
            tracing::error!("Canvas #mindmap_canvas not found");
            return;
        };
        let result = eframe::WebRunner::new()
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(|cc| {
                    let root = sample_tree()?;
                    let settings = mindmap_graph::global_config().clone();
                    let surface = mindmap_graph::MindMapSurface::new(root, settings)?;
                    Ok(Box::new(MindMapApp::new(cc, surface)) as Box<dyn eframe::App>)
                }),
            )
            .await;
        if let Err(e) = result {
            tracing::error!("Failed to start eframe: {:?}", e);
        }
    });
}

#[cfg(target_arch = "wasm32")]
fn find_canvas(id: &str) -> Option<web_sys::HtmlCanvasElement> {
    use wasm_bindgen::JsCast;
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .ok()
}
