mod engine;
mod error;
mod rpc;
mod tools;

use engine::core::app_setup::create_app;
use engine::core::window_config::ensure_mount_point;
use error::ViewerError;

fn main() -> Result<(), ViewerError> {
    ensure_mount_point()?;
    let mut app = create_app();

    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            app.run();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.run();
    }

    Ok(())
}
