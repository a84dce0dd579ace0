#[derive(Copy, Clone, Default, Debug)]
pub struct Profile {
    pub camera_rays: usize,
    pub bounce_rays: usize,  // surface interactions walked through
    pub shadow_rays: usize,  // visibility tests for direct lighting
    pub volume_events: usize,
}

impl Profile {
    pub fn combine(self, other: Self) -> Self {
        Profile {
            camera_rays: self.camera_rays + other.camera_rays,
            bounce_rays: self.bounce_rays + other.bounce_rays,
            shadow_rays: self.shadow_rays + other.shadow_rays,
            volume_events: self.volume_events + other.volume_events,
        }
    }

    pub fn log_summary(&self, elapsed: f32) {
        let total = self.camera_rays + self.bounce_rays + self.shadow_rays;
        info!(
            "{} camera rays, {} bounce rays, {} shadow rays, {} volume events",
            self.camera_rays, self.bounce_rays, self.shadow_rays, self.volume_events
        );
        if elapsed > 0.0 {
            info!(
                "{} total rays at {:.0} rays per second",
                total,
                total as f32 / elapsed
            );
        }
    }
}
