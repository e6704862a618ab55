use crate::data::transforms::{Clamp, FlipHorizontal, FlipVertical, GaussianNoise, Normalize, Rescale};
use crate::data::{Compose, DataRole, Transform, TransformEnum};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeMap;

fn rng() -> StdRng {
    StdRng::seed_from_u64(0)
}

/// [1, 2, 2] 样本：[[0, 1], [2, 3]]
fn sample() -> Tensor {
    Tensor::new(&[0.0, 1.0, 2.0, 3.0], &[1, 2, 2])
}

#[test]
fn test_normalize_rescale_clamp() {
    let n = Normalize { mean: 1.0, std: 2.0 }.apply(&sample(), &mut rng());
    assert_eq!(n, Tensor::new(&[-0.5, 0.0, 0.5, 1.0], &[1, 2, 2]));

    let r = Rescale { min: -1.0, max: 1.0 }.apply(&sample(), &mut rng());
    assert_abs_diff_eq!(r.min(), -1.0);
    assert_abs_diff_eq!(r.max(), 1.0);

    let constant = Rescale { min: 0.0, max: 1.0 }.apply(&Tensor::full(&[1, 2, 2], 5.0), &mut rng());
    assert_eq!(constant, Tensor::zeros(&[1, 2, 2]));

    let c = Clamp { min: 0.5, max: 2.5 }.apply(&sample(), &mut rng());
    assert_eq!(c, Tensor::new(&[0.5, 1.0, 2.0, 2.5], &[1, 2, 2]));
}

#[test]
fn test_flips() {
    let h = FlipHorizontal { probability: 1.0 }.apply(&sample(), &mut rng());
    assert_eq!(h.to_matrix().iter().copied().collect::<Vec<_>>(), vec![1.0, 0.0, 3.0, 2.0]);

    let v = FlipVertical { probability: 1.0 }.apply(&sample(), &mut rng());
    assert_eq!(v.to_matrix().iter().copied().collect::<Vec<_>>(), vec![2.0, 3.0, 0.0, 1.0]);

    let never = FlipHorizontal { probability: 0.0 }.apply(&sample(), &mut rng());
    assert_eq!(never, sample());
}

#[test]
fn test_gaussian_noise_is_seeded() {
    let noise = GaussianNoise { std: 0.1, probability: 1.0 };
    let a = noise.apply(&sample(), &mut rng());
    let b = noise.apply(&sample(), &mut rng());
    assert_eq!(a, b);
    assert_ne!(a, sample());
}

#[test]
fn test_compose_applies_in_order() {
    let compose = Compose::new(vec![
        TransformEnum::from(Normalize { mean: 0.0, std: 0.5 }),
        TransformEnum::from(Clamp { min: 0.0, max: 4.0 }),
    ]);
    let out = compose.apply(&sample(), &mut rng());
    assert_eq!(out, Tensor::new(&[0.0, 2.0, 4.0, 4.0], &[1, 2, 2]));
    assert_eq!(compose.len(), 2);
}

#[test]
fn test_augmentation_only_for_train() {
    let mut pre = BTreeMap::new();
    pre.insert("train".to_string(), vec![TransformEnum::from(Normalize { mean: 0.0, std: 1.0 })]);
    pre.insert("val".to_string(), vec![TransformEnum::from(Normalize { mean: 0.0, std: 1.0 })]);
    let mut aug = BTreeMap::new();
    aug.insert("train".to_string(), vec![TransformEnum::from(FlipHorizontal { probability: 0.5 })]);
    aug.insert("val".to_string(), vec![TransformEnum::from(FlipHorizontal { probability: 0.5 })]);

    let train = Compose::for_role(&pre, &aug, DataRole::Train);
    let val = Compose::for_role(&pre, &aug, DataRole::Validation);
    let test = Compose::for_role(&pre, &aug, DataRole::Test);
    assert_eq!(train.map(|c| c.len()), Some(2));
    assert_eq!(val.map(|c| c.len()), Some(1));
    assert!(test.is_none());
}

#[test]
fn test_transform_from_yaml() -> Result<(), serde_yaml::Error> {
    let yaml = "
- type: normalize
  mean: 0.5
  std: 0.5
- type: flip_horizontal
- type: gaussian_noise
  std: 0.01
";
    let transforms: Vec<TransformEnum> = serde_yaml::from_str(yaml)?;
    assert_eq!(transforms.len(), 3);
    assert_eq!(
        transforms[1],
        TransformEnum::FlipHorizontal(FlipHorizontal { probability: 0.5 })
    );
    assert_eq!(
        transforms[2],
        TransformEnum::GaussianNoise(GaussianNoise { std: 0.01, probability: 1.0 })
    );
    Ok(())
}
