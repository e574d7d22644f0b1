/// Owned storage of packed RGBA8 pixels, indexed `x + y * width`.
///
/// The slice length always equals `width * height`. Replaced storage is
/// released when it is dropped by [`FrameBuffer::resize`].
#[derive(Debug, Default)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    data: Box<[u32]>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize].into_boxed_slice(),
        }
    }

    /// Reallocate for a new size. Requests for the current size are a no-op
    /// and return `false`.
    ///
    /// Zero or oversized dimensions are not rejected; callers pass sane sizes.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        *self = Self::new(width, height);
        true
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        let buffer = FrameBuffer::default();
        assert!(buffer.is_empty());
        assert_eq!((buffer.width(), buffer.height()), (0, 0));
    }

    #[test]
    fn resize_allocates_width_times_height() {
        let mut buffer = FrameBuffer::default();
        assert!(buffer.resize(7, 3));
        assert_eq!(buffer.data().len(), 21);
        assert!(buffer.resize(2, 2));
        assert_eq!(buffer.data().len(), 4);
    }

    #[test]
    fn resize_to_same_size_keeps_contents() {
        let mut buffer = FrameBuffer::default();
        buffer.resize(2, 2);
        buffer.data_mut().copy_from_slice(&[1, 2, 3, 4]);
        let before = buffer.data().as_ptr();

        assert!(!buffer.resize(2, 2));
        assert_eq!(buffer.data(), &[1, 2, 3, 4]);
        assert_eq!(buffer.data().as_ptr(), before);
    }
}
