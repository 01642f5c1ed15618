/// Per-column distance to the nearest wall for the current frame.
///
/// Rewritten column by column on every wall pass. Columns without a hit hold
/// `f32::INFINITY`, so nothing is ever occluded there.
#[derive(Clone, Debug)]
pub struct DepthBuffer {
    columns: Vec<f32>,
}

impl DepthBuffer {
    pub fn new(width: u32) -> Self {
        Self { columns: vec![f32::INFINITY; width as usize] }
    }

    pub fn reset(&mut self) {
        self.columns.fill(f32::INFINITY);
    }

    #[inline]
    pub fn set(&mut self, x: u32, distance: f32) {
        if let Some(c) = self.columns.get_mut(x as usize) {
            *c = distance;
        }
    }

    /// Stored distance, `INFINITY` outside the buffer.
    #[inline]
    pub fn get(&self, x: u32) -> f32 {
        self.columns.get(x as usize).copied().unwrap_or(f32::INFINITY)
    }

    /// True when something at `depth` in column `x` is hidden by the wall.
    #[inline]
    pub fn occludes(&self, x: u32, depth: f32) -> bool {
        depth >= self.get(x)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.columns
    }
}
