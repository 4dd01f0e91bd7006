use crate::config::constants::*;
use crate::engine::{Point, Rect, Renderer, Size};
use crate::tween::lerp;
use rand::Rng;
use std::f32::consts::PI;

/// Square that grows from `PARTICLE_MIN_R * 2` to `max_size` while
/// spiralling away from the focal point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Particle {
    angle: f32,
    distance: f32,
    radial_speed: f32,
    angular_speed: f32,
    min_size: f32,
    max_size: f32,
    color: u32,
    age_ms: f32,
    grow_ms: f32,
}

impl Particle {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let min_size = PARTICLE_MIN_R * 2.0;
        let max_size = PARTICLE_MAX_R * 2.0;

        // triangular distribution, most particles start near the focal point
        let x = (FOCAL_X + (rng.gen::<f32>() + rng.gen::<f32>() - 1.0) * GAME_W / 2.0)
            .clamp(0.0, GAME_W);
        let y = (FOCAL_Y + (rng.gen::<f32>() + rng.gen::<f32>() - 1.0) * GAME_H / 2.0)
            .clamp(0.0, GAME_H);
        let dx = x - FOCAL_X;
        let dy = y - FOCAL_Y;
        let distance = (dx * dx + dy * dy).sqrt().max(1.0);

        let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        Particle {
            angle: dy.atan2(dx),
            distance,
            radial_speed: PARTICLE_DRIFT_SPEED,
            angular_speed: PARTICLE_ANGULAR_SPEED * direction * rng.gen_range(0.6_f32..=1.4),
            min_size,
            max_size: rng.gen_range(min_size..=max_size),
            color: PARTICLE_COLORS[rng.gen_range(0..PARTICLE_COLORS.len())],
            age_ms: 0.0,
            grow_ms: rng.gen_range(PARTICLE_GROW_MS_MIN..=PARTICLE_GROW_MS_MAX),
        }
    }

    pub fn size(&self) -> f32 {
        lerp(self.min_size, self.max_size, (self.age_ms / self.grow_ms).min(1.0))
    }

    /// Area the particle covers once fully grown.
    pub fn committed_area(&self) -> f32 {
        self.max_size * self.max_size
    }

    pub fn position(&self) -> Point {
        Point {
            x: FOCAL_X + self.angle.cos() * self.distance,
            y: FOCAL_Y + self.angle.sin() * self.distance,
        }
    }

    pub fn age_ms(&self) -> f32 {
        self.age_ms
    }

    fn advance(&mut self, dt_ms: f32) {
        let dt_sec = dt_ms / 1000.0;
        self.age_ms += dt_ms;
        self.distance += self.radial_speed * dt_sec;
        self.angle = (self.angle + self.angular_speed * dt_sec) % (2.0 * PI);
    }

    fn has_left_canvas(&self) -> bool {
        let Point { x, y } = self.position();
        x < -PARTICLE_EXIT_MARGIN
            || x > GAME_W + PARTICLE_EXIT_MARGIN
            || y < -PARTICLE_EXIT_MARGIN
            || y > GAME_H + PARTICLE_EXIT_MARGIN
    }
}

/// Keeps roughly `PARTICLE_COVERAGE` of the canvas covered.
///
/// Each batch measures what is on screen now, then books every particle it
/// adds at its final size. Batches are capped so the growth of young
/// particles only overshoots the target briefly.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    spawn_elapsed_ms: f32,
    target_area: f32,
}

impl Default for ParticleField {
    fn default() -> Self {
        ParticleField::new(GAME_W * GAME_H * PARTICLE_COVERAGE)
    }
}

impl ParticleField {
    pub fn new(target_area: f32) -> Self {
        ParticleField {
            particles: Vec::new(),
            spawn_elapsed_ms: 0.0,
            target_area,
        }
    }

    pub fn reset(&mut self) {
        self.particles.clear();
        self.spawn_elapsed_ms = 0.0;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn target_area(&self) -> f32 {
        self.target_area
    }

    /// What is on screen right now.
    pub fn covered_area(&self) -> f32 {
        self.particles.iter().map(|p| p.size() * p.size()).sum()
    }

    pub fn update<R: Rng + ?Sized>(&mut self, dt_ms: f32, rng: &mut R) {
        for particle in self.particles.iter_mut() {
            particle.advance(dt_ms);
        }
        self.particles.retain(|particle| !particle.has_left_canvas());

        self.spawn_elapsed_ms += dt_ms;
        while self.spawn_elapsed_ms >= PARTICLE_SPAWN_INTERVAL_MS {
            self.spawn_elapsed_ms -= PARTICLE_SPAWN_INTERVAL_MS;
            self.spawn_batch(rng);
        }
    }

    fn spawn_batch<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut area = self.covered_area();
        for _ in 0..PARTICLE_BATCH_CAP {
            if area >= self.target_area {
                break;
            }
            let particle = Particle::spawn(rng);
            area += particle.committed_area();
            self.particles.push(particle);
        }
    }

    pub fn draw(&self, renderer: &Renderer) {
        for particle in &self.particles {
            let size = particle.size();
            if size < 0.5 {
                continue;
            }
            let rect = Rect::from_center(particle.position(), Size::new(size, size));
            renderer.fill_rect(&rect, particle.color, 0.9);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FRAME_SIZE;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const LARGEST_PARTICLE: f32 = PARTICLE_MAX_R * 2.0 * PARTICLE_MAX_R * 2.0;

    #[test]
    fn covered_area_settles_around_the_target() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut field = ParticleField::default();
        let target = field.target_area();

        let mut reached_at = None;
        let mut samples = Vec::new();
        for frame in 0..(30_000.0 / FRAME_SIZE) as usize {
            field.update(FRAME_SIZE, &mut rng);
            let covered = field.covered_area();
            let now = frame as f32 * FRAME_SIZE;
            assert!(covered <= target * 1.15, "covered {} target {}", covered, target);
            if reached_at.is_none() && covered >= target {
                reached_at = Some(now);
            }
            if now > 10_000.0 {
                samples.push(covered);
            }
        }

        assert!(reached_at.map_or(false, |ms| ms < 10_000.0), "reached at {:?}", reached_at);
        let mean = samples.iter().sum::<f32>() / samples.len() as f32;
        assert!(mean > target * 0.9, "mean {} target {}", mean, target);
        let lowest = samples.iter().cloned().fold(f32::MAX, f32::min);
        assert!(lowest > target * 0.6, "lowest {} target {}", lowest, target);
    }

    #[test]
    fn particles_are_eventually_removed() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut field = ParticleField::default();
        for _ in 0..(30_000.0 / FRAME_SIZE) as usize {
            field.update(FRAME_SIZE, &mut rng);
            // farthest corner is ~640px from the focal point at 50px/s
            assert!(field.particles().iter().all(|p| p.age_ms() < 16_000.0));
        }
    }

    #[test]
    fn spawned_particles_start_small_and_inside_the_canvas() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let particle = Particle::spawn(&mut rng);
            assert_eq!(particle.size(), PARTICLE_MIN_R * 2.0);
            assert!(particle.committed_area() <= LARGEST_PARTICLE);
            assert!(!particle.has_left_canvas());
        }
    }

    #[test]
    fn reset_empties_the_field() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut field = ParticleField::default();
        field.update(PARTICLE_SPAWN_INTERVAL_MS, &mut rng);
        assert_eq!(field.particles().len(), PARTICLE_BATCH_CAP);
        field.reset();
        assert!(field.particles().is_empty());
        assert_eq!(field.covered_area(), 0.0);
    }
}
