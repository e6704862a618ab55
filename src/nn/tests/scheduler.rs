/*
 * @Date         : 2026-02-03
 * @Description  : 学习率调度器单元测试
 */

use crate::nn::{
    ConstantLr, CosineAnnealingLr, ExponentialLr, LinearWarmupLr, LrScheduler, Optimizer, SGD,
    StepLr,
};
use approx::assert_abs_diff_eq;

#[test]
fn test_step_lr() {
    let mut opt = SGD::new(1.0);
    let mut sched = StepLr::new(&opt, 2, 0.5);
    let mut lrs = Vec::new();
    for _ in 0..5 {
        sched.step(&mut opt);
        lrs.push(opt.learning_rate());
    }
    assert_eq!(lrs, vec![1.0, 0.5, 0.5, 0.25, 0.25]);
    assert_eq!(sched.steps_taken(), 5);
}

#[test]
fn test_exponential_lr() {
    let mut opt = SGD::new(0.1);
    let mut sched = ExponentialLr::new(&opt, 0.9);
    sched.step(&mut opt);
    sched.step(&mut opt);
    assert_abs_diff_eq!(opt.learning_rate(), 0.1 * 0.81, epsilon = 1e-7);
}

#[test]
fn test_cosine_annealing_lr() {
    let opt = SGD::new(1.0);
    let sched = CosineAnnealingLr::new(&opt, 10, 0.0);
    assert_abs_diff_eq!(sched.lr_at(0), 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(sched.lr_at(5), 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(sched.lr_at(10), 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(sched.lr_at(50), 0.0, epsilon = 1e-6);
}

#[test]
fn test_linear_warmup_lr() {
    let opt = SGD::new(1.0);
    let sched = LinearWarmupLr::new(&opt, 4);
    assert_abs_diff_eq!(sched.lr_at(0), 0.25, epsilon = 1e-6);
    assert_abs_diff_eq!(sched.lr_at(3), 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(sched.lr_at(100), 1.0, epsilon = 1e-6);
}

#[test]
fn test_constant_lr() {
    let mut opt = SGD::new(0.3);
    let mut sched = ConstantLr::new(&opt);
    for _ in 0..3 {
        sched.step(&mut opt);
    }
    assert_abs_diff_eq!(opt.learning_rate(), 0.3);
    assert_eq!(sched.name(), "constant");
}
