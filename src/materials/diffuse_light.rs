use crate::math::Color;

/// Area light emitting `radiance` uniformly over its front hemisphere.
/// Its scattering lobes are all zero; paths terminate on it.
#[derive(Debug, Clone)]
pub struct DiffuseLight {
    pub radiance: Color,
}

impl DiffuseLight {
    pub fn new(radiance: Color) -> DiffuseLight {
        DiffuseLight { radiance }
    }
}
