use crate::track::Track;

/// Emits the same frame forever. Handy for checking gain math.
#[derive(Debug, Clone, Copy)]
pub struct ConstantTrack {
    sample: (f32, f32),
}

impl ConstantTrack {
    pub fn new(left: f32, right: f32) -> Self {
        Self {
            sample: (left, right),
        }
    }
}

impl Track for ConstantTrack {
    fn name(&self) -> &str {
        "Constant"
    }

    fn fill_next_samples(&mut self, next_samples: &mut [(f32, f32)]) {
        next_samples.fill(self.sample);
    }
}
