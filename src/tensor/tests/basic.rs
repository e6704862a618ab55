use crate::tensor::Tensor;

#[test]
fn test_new_and_shape() {
    let t = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    assert_eq!(t.shape(), &[2, 3]);
    assert_eq!(t.size(), 6);
    assert_eq!(t.batch_size(), 2);
    assert_eq!(t.sample_shape(), &[3]);
    assert_eq!(t.data()[&[1, 2][..]], 6.0);
}

#[test]
#[should_panic]
fn test_new_with_wrong_len() {
    let _ = Tensor::new(&[1.0, 2.0, 3.0], &[2, 2]);
}

#[test]
fn test_full_ones_zeros() {
    assert!(Tensor::ones(&[3, 1]).data().iter().all(|&x| x == 1.0));
    assert!(Tensor::zeros(&[3, 1]).data().iter().all(|&x| x == 0.0));
    assert!(Tensor::full(&[2, 2], 0.5).data().iter().all(|&x| x == 0.5));
}

#[test]
fn test_normal_seeded_is_reproducible() {
    let a = Tensor::normal_seeded(0.0, 1.0, &[4, 8], 7);
    let b = Tensor::normal_seeded(0.0, 1.0, &[4, 8], 7);
    let c = Tensor::normal_seeded(0.0, 1.0, &[4, 8], 8);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(!a.has_nan());
}

#[test]
fn test_matrix_round_trip_keeps_layout() {
    // [2, 1, 2, 2] -> [2, 4] -> [2, 1, 2, 2]
    let t = Tensor::new(&(0..8).map(|x| x as f32).collect::<Vec<_>>(), &[2, 1, 2, 2]);
    let m = t.to_matrix();
    assert_eq!(m.shape(), &[2, 4]);
    assert_eq!(m[[1, 0]], 4.0);
    let back = Tensor::from_matrix(&m, &[1, 2, 2]).unwrap();
    assert_eq!(back, t);
}

#[test]
fn test_from_matrix_shape_mismatch() {
    let t = Tensor::ones(&[2, 4]);
    assert!(Tensor::from_matrix(&t.to_matrix(), &[3]).is_err());
}

#[test]
fn test_stack_and_slice() {
    let a = Tensor::new(&[1.0, 2.0], &[2]);
    let b = Tensor::new(&[3.0, 4.0], &[2]);
    let batch = Tensor::stack(&[a.clone(), b.clone()]).unwrap();
    assert_eq!(batch.shape(), &[2, 2]);
    assert_eq!(batch.sample(1), b);
    assert_eq!(batch.slice_batch(0, 1).shape(), &[1, 2]);

    let c = Tensor::new(&[1.0, 2.0, 3.0], &[3]);
    assert!(Tensor::stack(&[a, c]).is_err());
    assert!(Tensor::stack(&[]).is_err());
}

#[test]
fn test_nan_and_statistics() {
    let t = Tensor::new(&[1.0, f32::NAN, 3.0], &[3]);
    assert!(t.has_nan());
    let t = Tensor::new(&[1.0, 2.0, 3.0], &[3]);
    assert!(!t.has_nan());
    assert_eq!(t.mean(), 2.0);
    assert_eq!(t.max(), 3.0);
    assert_eq!(t.min(), 1.0);
    assert_eq!(t.scaled(2.0), Tensor::new(&[2.0, 4.0, 6.0], &[3]));
}
