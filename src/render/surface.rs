use crate::foundation::core::Rgba8;
use crate::render::bitmap::Bitmap;

/// Destination of a render: a resizable premultiplied RGBA8 pixel buffer owned by the host.
pub trait Surface {
    /// Current `(width, height)` in pixels.
    fn size(&self) -> (u32, u32);

    /// Resize the buffer. Contents after a resize are unspecified.
    fn resize(&mut self, width: u32, height: u32);

    /// Mutable access to the `width * height * 4` premultiplied bytes.
    fn pixels_mut(&mut self) -> &mut [u8];

    /// Fill the whole buffer with one color.
    fn fill(&mut self, color: Rgba8) {
        let px = color.premultiplied();
        for dst in self.pixels_mut().chunks_exact_mut(4) {
            dst.copy_from_slice(&px);
        }
    }

    /// Resize to `frame` and copy its pixels in.
    fn present(&mut self, frame: &Bitmap) {
        self.resize(frame.width, frame.height);
        let (width, height) = self.size();
        let dst = self.pixels_mut();
        if dst.len() == frame.data.len() {
            dst.copy_from_slice(&frame.data);
        } else {
            tracing::warn!(
                frame_width = frame.width,
                frame_height = frame.height,
                width,
                height,
                buffer_len = dst.len(),
                "surface buffer does not match the frame after resize; frame not presented"
            );
        }
    }
}

/// In-memory [`Surface`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    /// Create a transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        let mut c = Self::default();
        c.resize(width, height);
        c
    }

    /// Canvas width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA8 bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Bitmap {
        Bitmap {
            width: self.width,
            height: self.height,
            data: self.data.clone(),
        }
    }
}

impl Surface for Canvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        let len = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        self.data.clear();
        self.data.resize(len, 0);
    }

    fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
