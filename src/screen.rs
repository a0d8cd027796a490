//! The computer's screen: a wry child webview layered over the wgpu
//! surface and tracked each frame to the projected bounds of the 3D screen
//! plane. The native analog of compositing an iframe above the canvas.

use glam::{Mat4, Vec2, Vec3};
use winit::dpi::PhysicalSize;
use wry::{dpi, Rect, WebView, WebViewBuilder};

/// The page shown on the screen.
pub const SCREEN_URL: &str = "https://arjunphull123.github.io/black-space";

/// Logical document size, pixels.
pub const DOC_WIDTH: u32 = 1024;
pub const DOC_HEIGHT: u32 = 768;

/// Half extents of the screen plane in its local units (document pixels).
pub const HALF_EXTENTS: Vec2 = Vec2::new(DOC_WIDTH as f32 / 2.0, DOC_HEIGHT as f32 / 2.0);

/// The embedded page is a fixed-size surface; it must not scroll.
const NO_SCROLL_JS: &str = "\
    document.addEventListener('DOMContentLoaded', () => {\
        document.documentElement.style.overflow = 'hidden';\
        document.body.style.overflow = 'hidden';\
    });";

pub struct ScreenOverlay {
    webview: WebView,
}

impl ScreenOverlay {
    /// Creates the overlay as a child of the window, hidden until the
    /// first [`ScreenOverlay::track`].
    pub fn new<W: wry::raw_window_handle::HasWindowHandle>(window: &W) -> Result<Self, wry::Error> {
        let webview = WebViewBuilder::new()
            .with_bounds(hidden_bounds())
            .with_url(SCREEN_URL)
            .with_initialization_script(NO_SCROLL_JS)
            .with_focused(false)
            .build_as_child(window)?;

        Ok(Self { webview })
    }

    /// Repositions the overlay over the screen plane's projection. The
    /// plane's corners are mapped through `view_proj`; if any corner falls
    /// behind the camera the overlay is hidden for the frame.
    pub fn track(&self, world: &Mat4, view_proj: &Mat4, surface_size: PhysicalSize<u32>) {
        let corners = [
            Vec3::new(-HALF_EXTENTS.x, -HALF_EXTENTS.y, 0.0),
            Vec3::new(HALF_EXTENTS.x, -HALF_EXTENTS.y, 0.0),
            Vec3::new(HALF_EXTENTS.x, HALF_EXTENTS.y, 0.0),
            Vec3::new(-HALF_EXTENTS.x, HALF_EXTENTS.y, 0.0),
        ];

        let width = surface_size.width as f32;
        let height = surface_size.height as f32;

        let mut min = Vec2::MAX;
        let mut max = Vec2::MIN;

        for corner in corners {
            let clip = *view_proj * world.transform_point3(corner).extend(1.0);
            if clip.w <= 0.0 {
                let _ = self.webview.set_bounds(hidden_bounds());
                return;
            }
            let ndc = Vec2::new(clip.x / clip.w, clip.y / clip.w);
            let pixel = Vec2::new((ndc.x + 1.0) * 0.5 * width, (1.0 - ndc.y) * 0.5 * height);
            min = min.min(pixel);
            max = max.max(pixel);
        }

        let size = max - min;
        if size.x < 1.0 || size.y < 1.0 {
            let _ = self.webview.set_bounds(hidden_bounds());
            return;
        }

        let _ = self.webview.set_bounds(Rect {
            position: dpi::Position::Physical(dpi::PhysicalPosition::new(
                min.x.round() as i32,
                min.y.round() as i32,
            )),
            size: dpi::Size::Physical(dpi::PhysicalSize::new(
                size.x.round() as u32,
                size.y.round() as u32,
            )),
        });
    }
}

fn hidden_bounds() -> Rect {
    Rect {
        position: dpi::Position::Physical(dpi::PhysicalPosition::new(0, 0)),
        size: dpi::Size::Physical(dpi::PhysicalSize::new(0, 0)),
    }
}
