/*
 * @Date         : 2026-02-03
 * @Description  : 优化器单元测试
 */

use crate::errors::SynthError;
use crate::nn::{Adam, Layer, Linear, Network, Optimizer, SGD, Sequential};
use approx::assert_abs_diff_eq;
use ndarray::array;

/// 单个 1→1 Linear 层构成的网络，w=2，b=0
fn tiny_network() -> Sequential {
    Sequential::new("tiny", &[1]).add(Linear::from_weights("fc", array![[2.0]], array![[0.0]]))
}

fn set_grads(net: &mut Sequential, gw: f32, gb: f32) {
    let mut params = net.parameters_mut();
    params[0].grad_mut().fill(gw);
    params[1].grad_mut().fill(gb);
}

fn weight(net: &Sequential) -> f32 {
    net.parameters()[0].value()[[0, 0]]
}

#[test]
fn test_sgd_plain_step() -> Result<(), SynthError> {
    let mut net = tiny_network();
    let mut sgd = SGD::new(0.1);
    set_grads(&mut net, 1.0, 0.5);
    sgd.step(&mut net)?;
    assert_abs_diff_eq!(weight(&net), 1.9, epsilon = 1e-6);
    assert_abs_diff_eq!(net.parameters()[1].value()[[0, 0]], -0.05, epsilon = 1e-6);
    assert_eq!(sgd.steps_taken(), 1);
    Ok(())
}

#[test]
fn test_sgd_momentum() -> Result<(), SynthError> {
    let mut net = tiny_network();
    let mut sgd = SGD::with_options(0.1, 0.9, 0.0);
    set_grads(&mut net, 1.0, 0.0);
    sgd.step(&mut net)?; // v=1   → w = 2 - 0.1
    sgd.step(&mut net)?; // v=1.9 → w = 1.9 - 0.19
    assert_abs_diff_eq!(weight(&net), 1.71, epsilon = 1e-5);

    sgd.reset();
    assert_eq!(sgd.steps_taken(), 0);
    Ok(())
}

#[test]
fn test_sgd_weight_decay() -> Result<(), SynthError> {
    let mut net = tiny_network();
    let mut sgd = SGD::with_options(0.1, 0.0, 0.5);
    set_grads(&mut net, 0.0, 0.0);
    sgd.step(&mut net)?; // g = 0 + 0.5·2 = 1
    assert_abs_diff_eq!(weight(&net), 1.9, epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_adam_first_step_is_lr_sized() -> Result<(), SynthError> {
    // 偏差修正后第一步的更新量约为 lr·sign(g)
    let mut net = tiny_network();
    let mut adam = Adam::new_default(0.01);
    set_grads(&mut net, 3.0, -4.0);
    adam.step(&mut net)?;
    assert_abs_diff_eq!(weight(&net), 2.0 - 0.01, epsilon = 1e-5);
    assert_abs_diff_eq!(net.parameters()[1].value()[[0, 0]], 0.01, epsilon = 1e-5);
    assert_eq!(adam.name(), "adam");
    Ok(())
}

#[test]
fn test_adamw_decouples_weight_decay() -> Result<(), SynthError> {
    let mut net = tiny_network();
    let mut adamw = Adam::adamw(0.1, 0.9, 0.999, 1e-8, 0.5);
    set_grads(&mut net, 0.0, 0.0);
    adamw.step(&mut net)?;
    // 梯度为0时只剩衰减项：w·(1 - lr·λ)
    assert_abs_diff_eq!(weight(&net), 2.0 * (1.0 - 0.05), epsilon = 1e-6);
    assert_eq!(adamw.name(), "adamw");
    Ok(())
}

#[test]
fn test_optimizer_only_touches_given_network() -> Result<(), SynthError> {
    let mut a = tiny_network();
    let mut b = tiny_network();
    set_grads(&mut a, 1.0, 1.0);
    set_grads(&mut b, 1.0, 1.0);
    let before = b.snapshot();
    SGD::new(0.5).step(&mut a)?;
    assert_eq!(b.snapshot(), before);
    assert_ne!(a.snapshot(), before);
    Ok(())
}

#[test]
fn test_optimizer_state_rejects_other_network() -> Result<(), SynthError> {
    let mut small = tiny_network();
    let mut large = Sequential::new("large", &[2])
        .add(Linear::from_weights("fc", array![[1.0, 1.0]], array![[0.0, 0.0]]));
    let mut adam = Adam::new_default(0.01);
    adam.step(&mut small)?;
    assert!(matches!(adam.step(&mut large), Err(SynthError::ShapeMismatch { .. })));
    // Layer trait 仍可直接访问参数
    assert_eq!(large.layers()[0].parameters().len(), 2);
    Ok(())
}
