use std::marker::PhantomData;

/// A drawing surface the [`Map`](crate::Map) composites tiles onto.
///
/// The map never clears the canvas, tiles of a new render pass are drawn
/// over whatever the previous pass left behind.
pub trait Canvas {
    type Image;

    /// Width and height in pixels.
    fn size(&self) -> (u32, u32);

    /// Draw `image` with its top-left corner at `(x, y)`.
    fn draw_image(&mut self, image: &Self::Image, x: i32, y: i32);
}

/// A canvas that ignores draw calls.
///
/// Used by immediate-mode toolkits that repaint every frame from the cache
/// with [`Map::paint`](crate::Map::paint), and only need a render pass to
/// learn which tiles to fetch.
#[derive(Debug, Clone, Copy)]
pub struct DeferredPaint<I> {
    width: u32,
    height: u32,
    image: PhantomData<fn(&I)>,
}

impl<I> DeferredPaint<I> {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            image: PhantomData,
        }
    }
}

impl<I> Canvas for DeferredPaint<I> {
    type Image = I;

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn draw_image(&mut self, _image: &I, _x: i32, _y: i32) {}
}
