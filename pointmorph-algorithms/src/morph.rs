//! Point-to-point morphing between clouds of different sizes
//!
//! Every vertex of the larger cloud ("big") is paired with vertex
//! `i % small.len()` of the smaller one, so the shorter cloud is repeated
//! cyclically until both sides have the same length. The working buffer then
//! moves each vertex along a straight line towards its partner in a fixed
//! number of equal steps.
//!
//! The pairing ignores geometry entirely, which makes points visibly jump
//! across the model at every repetition boundary of the smaller cloud.

use log::{debug, info};
use pointmorph_core::{Error, Point3f, PointCloud, Result, Vector3f};
use rayon::prelude::*;

/// Number of interpolation steps used by the viewer
pub const DEFAULT_MORPH_STEPS: usize = 100;

/// Which input of a morph has the larger vertex count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

/// Map every index of the larger cloud onto the smaller one by cyclic repetition
pub fn correspondence_table(big_len: usize, small_len: usize) -> Result<Vec<usize>> {
    if small_len == 0 {
        return Err(Error::InvalidArgument(
            "Cannot build a correspondence against an empty cloud".to_string(),
        ));
    }
    if small_len > big_len {
        return Err(Error::InvalidArgument(format!(
            "Smaller cloud has {} points but the larger has only {}",
            small_len, big_len
        )));
    }

    Ok((0..big_len).map(|i| i % small_len).collect())
}

/// An in-flight morph that advances one interpolation step at a time
#[derive(Debug, Clone)]
pub struct Morph {
    working: PointCloud,
    goal: Vec<Point3f>,
    displacements: Vec<Vector3f>,
    correspondence: Vec<usize>,
    big: Side,
    steps: usize,
    step: usize,
}

impl Morph {
    /// Prepare a morph from `source` to `target` over `steps` frames.
    ///
    /// The working cloud starts at the source positions (repeated cyclically
    /// when the source is the smaller cloud), carries the normals of the
    /// larger cloud and inherits the source's rotation.
    pub fn new(source: &PointCloud, target: &PointCloud, steps: usize) -> Result<Self> {
        if steps == 0 {
            return Err(Error::InvalidArgument("Morph needs at least one step".to_string()));
        }
        for (name, cloud) in [("source", source), ("target", target)] {
            if cloud.is_empty() {
                return Err(Error::InvalidArgument(format!("Morph {} cloud is empty", name)));
            }
            if !cloud.is_aligned() {
                return Err(Error::InvalidArgument(format!(
                    "Morph {} cloud has {} normals for {} vertices",
                    name,
                    cloud.normals.len(),
                    cloud.vertices.len()
                )));
            }
        }

        // Ties go to the source, so equal sizes pair index for index
        let (big, big_cloud, small_cloud) = if source.len() >= target.len() {
            (Side::Source, source, target)
        } else {
            (Side::Target, target, source)
        };
        let correspondence = correspondence_table(big_cloud.len(), small_cloud.len())?;

        let pick = |cloud: &PointCloud, side: Side| -> Vec<Point3f> {
            if side == big {
                cloud.vertices.clone()
            } else {
                correspondence.iter().map(|&k| cloud.vertices[k]).collect()
            }
        };
        let start = pick(source, Side::Source);
        let goal = pick(target, Side::Target);

        let divisor = steps as f32;
        let displacements: Vec<Vector3f> = start
            .par_iter()
            .zip(goal.par_iter())
            .map(|(from, to)| (to - from) / divisor)
            .collect();

        let mut working = PointCloud::from_parts(start, big_cloud.normals.clone(), source.scale())?;
        // Rotation stays continuous from the source through the whole morph
        working.set_angle(source.angle());

        info!(
            "Morphing {} points into {} points over {} steps",
            source.len(),
            target.len(),
            steps
        );

        Ok(Self {
            working,
            goal,
            displacements,
            correspondence,
            big,
            steps,
            step: 0,
        })
    }

    /// Apply one interpolation step; returns whether the morph has finished.
    ///
    /// The final step lands exactly on the target positions. Calling this on
    /// a finished morph changes nothing.
    pub fn advance(&mut self) -> bool {
        if self.is_finished() {
            return true;
        }

        self.step += 1;
        if self.step == self.steps {
            self.working.vertices.copy_from_slice(&self.goal);
        } else {
            self.working
                .vertices
                .par_iter_mut()
                .zip(self.displacements.par_iter())
                .for_each(|(v, d)| *v += *d);
        }
        debug!("Morph step {}/{}", self.step, self.steps);

        self.is_finished()
    }

    /// Steps applied so far
    pub fn step(&self) -> usize {
        self.step
    }

    /// Total number of steps
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.steps
    }

    /// Fraction of the morph completed, in `[0, 1]`
    pub fn progress(&self) -> f32 {
        self.step as f32 / self.steps as f32
    }

    /// The cloud being morphed
    pub fn working(&self) -> &PointCloud {
        &self.working
    }

    /// Mutable access to the working cloud's rotation and normals.
    ///
    /// Vertex positions are owned by the stepping and should not be edited.
    pub fn working_mut(&mut self) -> &mut PointCloud {
        &mut self.working
    }

    /// Positions the working buffer reaches after the final step
    pub fn goal(&self) -> &[Point3f] {
        &self.goal
    }

    /// Index into the smaller cloud for each working vertex
    pub fn correspondence(&self) -> &[usize] {
        &self.correspondence
    }

    /// Per-vertex offset added at every step
    pub fn displacements(&self) -> &[Vector3f] {
        &self.displacements
    }

    /// Which input supplied the vertex count and normals
    pub fn big_side(&self) -> Side {
        self.big
    }

    /// Consume the morph, returning the working cloud
    pub fn into_working(self) -> PointCloud {
        self.working
    }
}

/// Morph `source` into `target`, calling `on_frame` after every step.
///
/// Runs all `steps` synchronously and returns the working cloud, whose
/// vertex count is the larger of the two inputs. An error from `on_frame`
/// stops the morph and is returned.
pub fn morph<F>(
    source: &PointCloud,
    target: &PointCloud,
    steps: usize,
    mut on_frame: F,
) -> Result<PointCloud>
where
    F: FnMut(&PointCloud) -> Result<()>,
{
    let mut morph = Morph::new(source, target, steps)?;
    loop {
        let finished = morph.advance();
        on_frame(morph.working())?;
        if finished {
            break;
        }
    }
    Ok(morph.into_working())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn cloud(points: &[[f32; 3]], normal: Vector3f) -> PointCloud {
        let vertices: Vec<Point3f> = points
            .iter()
            .map(|p| Point3f::new(p[0], p[1], p[2]))
            .collect();
        let normals = vec![normal; vertices.len()];
        PointCloud::from_parts(vertices, normals, 1.0).unwrap()
    }

    fn random_cloud(rng: &mut StdRng, len: usize) -> PointCloud {
        let vertices: Vec<Point3f> = (0..len)
            .map(|_| {
                Point3f::new(
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(-5.0..5.0),
                )
            })
            .collect();
        let normals = vec![Vector3f::z(); len];
        PointCloud::from_parts(vertices, normals, 1.0).unwrap()
    }

    #[test]
    fn test_correspondence_is_cyclic() {
        assert_eq!(correspondence_table(5, 2).unwrap(), vec![0, 1, 0, 1, 0]);
        assert_eq!(correspondence_table(3, 3).unwrap(), vec![0, 1, 2]);
        assert_eq!(correspondence_table(4, 1).unwrap(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_correspondence_rejects_bad_sizes() {
        assert!(matches!(correspondence_table(5, 0), Err(Error::InvalidArgument(_))));
        assert!(matches!(correspondence_table(2, 5), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_zero_steps_is_invalid() {
        let a = cloud(&[[0.0, 0.0, 0.0]], Vector3f::x());
        let b = cloud(&[[1.0, 0.0, 0.0]], Vector3f::y());
        assert!(matches!(Morph::new(&a, &b, 0), Err(Error::InvalidArgument(_))));

        let mut frames = 0;
        let result = morph(&a, &b, 0, |_| {
            frames += 1;
            Ok(())
        });
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert_eq!(frames, 0);
    }

    #[test]
    fn test_empty_or_misaligned_input_is_invalid() {
        let a = cloud(&[[0.0, 0.0, 0.0]], Vector3f::x());
        let empty = PointCloud::new();
        assert!(matches!(Morph::new(&a, &empty, 10), Err(Error::InvalidArgument(_))));
        assert!(matches!(Morph::new(&empty, &a, 10), Err(Error::InvalidArgument(_))));

        let mut broken = a.clone();
        broken.normals.clear();
        assert!(matches!(Morph::new(&broken, &a, 10), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_small_source_grows_into_big_target() {
        let source = cloud(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]], Vector3f::x());
        let target = cloud(
            &[[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0], [3.0, 3.0, 3.0], [-1.0, 0.0, 0.0]],
            Vector3f::y(),
        );

        let m = Morph::new(&source, &target, 4).unwrap();
        assert_eq!(m.big_side(), Side::Target);
        assert_eq!(m.correspondence(), &[0, 1, 0, 1, 0]);
        // The working buffer repeats the source cyclically
        assert_eq!(m.working()[2], Point3f::new(0.0, 0.0, 0.0));
        assert_eq!(m.working()[3], Point3f::new(1.0, 1.0, 1.0));
        assert_relative_eq!(m.displacements()[0], Vector3f::new(0.5, 0.0, 0.0));

        let result = morph(&source, &target, 4, |_| Ok(())).unwrap();
        assert_eq!(result.len(), 5);
        assert_eq!(result.normals, target.normals);
        for (got, expected) in result.iter().zip(target.iter()) {
            assert_relative_eq!(got, expected, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_big_source_collapses_onto_small_target() {
        let source = cloud(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]], Vector3f::x());
        let target = cloud(&[[5.0, 5.0, 5.0], [-5.0, -5.0, -5.0]], Vector3f::y());

        let result = morph(&source, &target, 10, |_| Ok(())).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result.normals, source.normals);
        assert_eq!(result[0], target[0]);
        assert_eq!(result[1], target[1]);
        assert_eq!(result[2], target[0]);
    }

    #[test]
    fn test_equal_sizes_pair_index_for_index() {
        let source = cloud(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]], Vector3f::x());
        let target = cloud(&[[0.0, 1.0, 0.0], [0.0, 0.0, 1.0]], Vector3f::y());

        let m = Morph::new(&source, &target, 2).unwrap();
        assert_eq!(m.big_side(), Side::Source);
        assert_eq!(m.correspondence(), &[0, 1]);
        assert_eq!(m.working().normals, source.normals);
    }

    #[test]
    fn test_on_frame_called_once_per_step() {
        let source = cloud(&[[0.0, 0.0, 0.0]], Vector3f::x());
        let target = cloud(&[[10.0, 0.0, 0.0]], Vector3f::x());

        let mut xs = Vec::new();
        morph(&source, &target, DEFAULT_MORPH_STEPS, |frame| {
            xs.push(frame[0].x);
            Ok(())
        })
        .unwrap();

        assert_eq!(xs.len(), DEFAULT_MORPH_STEPS);
        assert_relative_eq!(xs[0], 0.1, epsilon = 1e-5);
        assert_relative_eq!(xs[49], 5.0, epsilon = 1e-4);
        assert_eq!(xs[99], 10.0);
    }

    #[test]
    fn test_converges_for_random_clouds() {
        let mut rng = StdRng::seed_from_u64(7);
        let source = random_cloud(&mut rng, 37);
        let target = random_cloud(&mut rng, 101);

        let mut m = Morph::new(&source, &target, DEFAULT_MORPH_STEPS).unwrap();
        let mut steps = 0;
        while !m.advance() {
            steps += 1;
        }
        assert_eq!(steps + 1, DEFAULT_MORPH_STEPS);

        for (i, v) in m.working().iter().enumerate() {
            assert_relative_eq!(*v, target[i], epsilon = 1e-5);
        }
    }

    #[test]
    fn test_snapshots_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(42);
        let source = random_cloud(&mut rng, 64);
        let target = random_cloud(&mut rng, 23);

        let run = || {
            let mut snapshots = Vec::new();
            morph(&source, &target, 25, |frame| {
                snapshots.push(frame.vertices.clone());
                Ok(())
            })
            .unwrap();
            snapshots
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_advance_after_finish_is_noop() {
        let source = cloud(&[[0.0, 0.0, 0.0]], Vector3f::x());
        let target = cloud(&[[1.0, 2.0, 3.0]], Vector3f::x());

        let mut m = Morph::new(&source, &target, 1).unwrap();
        assert!(!m.is_finished());
        assert_eq!(m.progress(), 0.0);
        assert!(m.advance());
        assert!(m.advance());
        assert_eq!(m.step(), 1);
        assert_eq!(m.progress(), 1.0);
        assert_eq!(m.working()[0], Point3f::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_working_inherits_source_rotation() {
        let mut source = cloud(&[[0.0, 0.0, 0.0]], Vector3f::x());
        source.set_angle(45.0);
        let target = cloud(&[[1.0, 0.0, 0.0]], Vector3f::x());

        let m = Morph::new(&source, &target, 3).unwrap();
        assert_eq!(m.working().angle(), 45.0);
        assert_eq!(m.working().to_world(), source.to_world());
    }

    #[test]
    fn test_frame_error_stops_morph() {
        let source = cloud(&[[0.0, 0.0, 0.0]], Vector3f::x());
        let target = cloud(&[[1.0, 0.0, 0.0]], Vector3f::x());

        let mut frames = 0;
        let result = morph(&source, &target, 10, |_| {
            frames += 1;
            if frames == 3 {
                Err(Error::Gpu("surface lost".to_string()))
            } else {
                Ok(())
            }
        });

        assert!(matches!(result, Err(Error::Gpu(_))));
        assert_eq!(frames, 3);
    }
}
